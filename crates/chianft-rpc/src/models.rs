use chia_protocol::SpendBundle;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::{BlockchainState, CoinRecord, MempoolItem, SignedTransaction, WalletInfo};

// Full node responses.

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct BlockchainStateResponse {
    pub blockchain_state: Option<BlockchainState>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetCoinRecordResponse {
    pub coin_record: Option<CoinRecord>,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetAllMempoolItemsResponse {
    pub mempool_items: Option<IndexMap<String, MempoolItem>>,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PushTxResponse {
    pub status: Option<String>,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetNetworkInfoResponse {
    pub network_name: Option<String>,
    pub network_prefix: Option<String>,
    pub error: Option<String>,
    pub success: bool,
}

// Wallet responses.

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct LogInResponse {
    pub fingerprint: Option<u32>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetWalletsResponse {
    pub wallets: Option<Vec<WalletInfo>>,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SelectCoinsResponse {
    pub coins: Option<Vec<chia_protocol::Coin>>,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NftMintBulkResponse {
    pub spend_bundle: Option<SpendBundle>,
    pub nft_id_list: Option<Vec<String>>,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateSignedTransactionResponse {
    pub signed_tx: Option<SignedTransaction>,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateOfferForIdsResponse {
    pub offer: Option<String>,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NftGetWalletDidResponse {
    pub did_id: Option<String>,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DidGetDidResponse {
    pub my_did: Option<String>,
    pub coin_id: Option<String>,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DidGetInfoResponse {
    pub latest_coin: Option<String>,
    pub error: Option<String>,
    pub success: bool,
}
