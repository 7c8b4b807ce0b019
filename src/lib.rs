pub use chianft_mint::*;
pub use chianft_rpc::*;
