use anyhow::Result;
use chianft_mint::{read_spend_bundles, SubmissionPipeline, SubmitOptions};

use crate::args::SubmitCommand;
use crate::commands::connect;

pub async fn submit(args: &SubmitCommand) -> Result<()> {
    let (node, wallet) = connect(&args.connection).await?;

    let bundles = read_spend_bundles(&args.bundle_input)?;

    let options = SubmitOptions {
        fee: args.fee,
        sell_offer_price: args.create_sell_offer,
        offer_dir: args.offer_dir.clone(),
    };

    let pipeline = SubmissionPipeline::new(&wallet, &node);
    pipeline.submit_all(&bundles, &options).await?;

    println!("all spend bundles have been processed");

    Ok(())
}
