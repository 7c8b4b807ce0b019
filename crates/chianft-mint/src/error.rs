use chianft_rpc::RpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MintError {
    /// Bulk minting draws on a single funding coin for the whole run.
    #[error("bulk minting requires a single coin with value of at least {0}")]
    InsufficientFundingResource(u64),

    #[error("spend bundle could not be created for metadata rows {start} to {end}")]
    BundleConstructionFailed { start: usize, end: usize },

    #[error("all spend bundles have already been spent")]
    AllBundlesSpent,

    #[error("submission failed after {0} attempts; wait for a few blocks and retry")]
    SubmissionExhausted(u32),

    #[error("a previous spend is still waiting in the mempool; wait for a few blocks and retry")]
    PreviousSpendPending,

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("spend bundle {0} has no funding input")]
    MalformedBundle(usize),

    #[error("{0}")]
    LineageBroken(&'static str),

    #[error("no nft wallet is available for minting")]
    MissingNftWallet,

    #[error("no did wallet is attached to the nft wallet")]
    MissingDidWallet,

    #[error("metadata row {row}: {message}")]
    Metadata { row: usize, message: String },

    #[error("offer creation failed after {attempts} attempts for nft {launcher_id}")]
    OfferCreationFailed { attempts: u32, launcher_id: String },

    #[error("wallet error: {0}")]
    Wallet(String),

    #[error("full node error: {0}")]
    Node(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Streamable error: {0}")]
    Streamable(#[from] chia_traits::Error),

    #[error("CLVM error: {0}")]
    Eval(#[from] clvmr::reduction::EvalErr),
}
