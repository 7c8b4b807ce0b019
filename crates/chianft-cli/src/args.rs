use std::path::PathBuf;

use clap::{Args, Parser};

/// NFT bulk minting for the Chia blockchain.
#[derive(Debug, Parser)]
#[clap(version)]
pub enum Command {
    /// Create a set of spend bundles for minting NFTs.
    CreateMintSpendBundles(CreateCommand),
    /// Submit previously created spend bundles to the mempool.
    SubmitSpendBundles(SubmitCommand),
}

#[derive(Debug, Parser)]
pub struct CreateCommand {
    /// The csv file of NFT metadata to mint.
    pub metadata_input: PathBuf,

    /// Where the serialized spend bundles will be written.
    pub bundle_output: PathBuf,

    /// The NFT wallet id for minting.
    #[clap(short, long)]
    pub wallet_id: u32,

    /// Mint the NFTs from the DID attached to the selected NFT wallet.
    #[clap(short = 'd', long)]
    pub mint_from_did: bool,

    /// A standard XCH address where royalties will be sent.
    #[clap(short = 'a', long, default_value = "")]
    pub royalty_address: String,

    /// Royalty in basis points of the offer price, up to 10000 (100%).
    #[clap(short = 'r', long, default_value_t = 0)]
    pub royalty_percentage: u16,

    /// The input csv has a trailing column of target addresses.
    #[clap(short = 't', long)]
    pub has_targets: bool,

    /// The number of NFTs to mint per spend bundle.
    #[clap(short, long, default_value_t = 25)]
    pub chunk: usize,

    #[clap(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Debug, Parser)]
pub struct SubmitCommand {
    /// The spend bundle file written by create-mint-spend-bundles.
    pub bundle_input: PathBuf,

    /// Attach this exact fee to every spend instead of estimating one
    /// from mempool congestion.
    #[clap(short = 'm', long)]
    pub fee: Option<u64>,

    /// Create a sell offer for each minted NFT at this price, in mojos.
    #[clap(short = 'o', long)]
    pub create_sell_offer: Option<u64>,

    /// Directory where offer files are written.
    #[clap(long, default_value = "offers")]
    pub offer_dir: PathBuf,

    #[clap(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// The full node RPC url.
    #[clap(long, default_value = "https://localhost:8555")]
    pub node_url: String,

    /// The wallet RPC url.
    #[clap(long, default_value = "https://localhost:9256")]
    pub wallet_url: String,

    /// The Chia root directory containing the RPC SSL certificates.
    /// Defaults to $CHIA_ROOT, or ~/.chia/mainnet.
    #[clap(long)]
    pub chia_root: Option<PathBuf>,

    /// The fingerprint of the wallet key to log in with.
    #[clap(short, long)]
    pub fingerprint: Option<u32>,
}

impl ConnectionArgs {
    pub fn chia_root(&self) -> PathBuf {
        if let Some(chia_root) = &self.chia_root {
            return chia_root.clone();
        }

        if let Ok(chia_root) = std::env::var("CHIA_ROOT") {
            return PathBuf::from(chia_root);
        }

        PathBuf::from(std::env::var("HOME").unwrap_or_default()).join(".chia/mainnet")
    }
}
