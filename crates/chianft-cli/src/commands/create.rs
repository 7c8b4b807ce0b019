use anyhow::Result;
use chianft_mint::{read_metadata_csv, write_spend_bundles, BundleBuilder, MintParameters};

use crate::args::CreateCommand;
use crate::commands::connect;

pub async fn create(args: &CreateCommand) -> Result<()> {
    let (node, wallet) = connect(&args.connection).await?;

    let (records, targets) = read_metadata_csv(&args.metadata_input, true, args.has_targets)?;

    let params = MintParameters {
        wallet_id: args.wallet_id,
        mint_from_did: args.mint_from_did,
        royalty_address: args.royalty_address.clone(),
        royalty_percentage: args.royalty_percentage,
        chunk_size: args.chunk,
    };

    let builder = BundleBuilder::new(&wallet, &node);
    let bundles = builder.build_all(&records, &targets, &params).await?;

    write_spend_bundles(&args.bundle_output, &bundles)?;

    println!(
        "successfully created {} spend bundles at {}",
        bundles.len(),
        args.bundle_output.display()
    );

    Ok(())
}
