use chia_protocol::{Bytes32, Coin, SpendBundle};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct CoinRecord {
    pub coin: Coin,
    pub coinbase: bool,
    pub confirmed_block_index: u32,
    pub spent: bool,
    pub spent_block_index: u32,
    pub timestamp: u64,
}

/// A pending transaction as reported by `get_all_mempool_items`.
#[derive(Deserialize, Debug, Clone)]
pub struct MempoolItem {
    pub spend_bundle: SpendBundle,
    pub spend_bundle_name: Bytes32,
    pub fee: u64,
    pub cost: u64,
    pub additions: Vec<Coin>,
}

/// The subset of `get_blockchain_state` consumed by this crate's users.
/// Unknown fields returned by the node are ignored.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct BlockchainState {
    pub block_max_cost: u64,
    pub mempool_cost: u64,
    pub mempool_fees: u64,
    pub mempool_max_total_cost: u64,
    pub mempool_size: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WalletInfo {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub wallet_type: u8,
    pub data: String,
}

/// Wallet type discriminants used when listing wallets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletType {
    Standard = 0,
    Did = 8,
    Nft = 10,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SignedTransaction {
    pub spend_bundle: Option<SpendBundle>,
}
