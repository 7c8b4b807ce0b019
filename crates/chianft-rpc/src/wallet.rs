use std::future::Future;

use chia_protocol::{Bytes32, Coin};
use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    ser::{coin_json, hex_bytes32},
    ChiaRpcClient, CreateOfferForIdsResponse, CreateSignedTransactionResponse, DidGetDidResponse,
    DidGetInfoResponse, GetWalletsResponse, LogInResponse, NftGetWalletDidResponse,
    NftMintBulkResponse, RpcError, SelectCoinsResponse, WalletType,
};

/// A single output of a signed transaction request.
#[derive(Debug, Clone, Copy)]
pub struct Addition {
    pub amount: u64,
    pub puzzle_hash: Bytes32,
}

/// Arguments for the `nft_mint_bulk` wallet endpoint. Metadata entries are
/// passed through to the wallet verbatim.
#[derive(Debug, Clone)]
pub struct NftMintBulkRequest {
    pub wallet_id: u32,
    pub metadata_list: Vec<Value>,
    pub target_list: Vec<String>,
    pub royalty_percentage: u16,
    pub royalty_address: String,
    pub mint_number_start: u64,
    pub mint_total: u64,
    pub xch_coins: Vec<Coin>,
    pub xch_change_target: Bytes32,
    pub did_coin: Option<Coin>,
    pub did_lineage_parent: Option<Bytes32>,
    pub mint_from_did: bool,
}

/// The wallet RPC operations used for bundle construction, fee spends, and
/// offers. Available on every [`ChiaRpcClient`] transport.
pub trait WalletRpc: ChiaRpcClient {
    fn log_in(&self, fingerprint: u32) -> impl Future<Output = Result<LogInResponse, RpcError>> {
        self.make_post_request(
            "log_in",
            serde_json::json!({
                "fingerprint": fingerprint,
            }),
        )
    }

    fn get_wallets(
        &self,
        wallet_type: WalletType,
    ) -> impl Future<Output = Result<GetWalletsResponse, RpcError>> {
        self.make_post_request(
            "get_wallets",
            serde_json::json!({
                "type": wallet_type as u8,
            }),
        )
    }

    fn select_coins(
        &self,
        wallet_id: u32,
        amount: u64,
        excluded_coin_ids: Vec<Bytes32>,
    ) -> impl Future<Output = Result<SelectCoinsResponse, RpcError>> {
        self.make_post_request(
            "select_coins",
            serde_json::json!({
                "wallet_id": wallet_id,
                "amount": amount,
                "excluded_coin_ids": excluded_coin_ids
                    .into_iter()
                    .map(hex_bytes32)
                    .collect::<Vec<String>>(),
            }),
        )
    }

    fn nft_get_wallet_did(
        &self,
        wallet_id: u32,
    ) -> impl Future<Output = Result<NftGetWalletDidResponse, RpcError>> {
        self.make_post_request(
            "nft_get_wallet_did",
            serde_json::json!({
                "wallet_id": wallet_id,
            }),
        )
    }

    fn did_get_did(
        &self,
        wallet_id: u32,
    ) -> impl Future<Output = Result<DidGetDidResponse, RpcError>> {
        self.make_post_request(
            "did_get_did",
            serde_json::json!({
                "wallet_id": wallet_id,
            }),
        )
    }

    fn did_get_info(
        &self,
        coin_id: Bytes32,
        latest: bool,
    ) -> impl Future<Output = Result<DidGetInfoResponse, RpcError>> {
        self.make_post_request(
            "did_get_info",
            serde_json::json!({
                "coin_id": hex_bytes32(coin_id),
                "latest": latest,
            }),
        )
    }

    fn nft_mint_bulk(
        &self,
        request: &NftMintBulkRequest,
    ) -> impl Future<Output = Result<NftMintBulkResponse, RpcError>> {
        self.make_post_request(
            "nft_mint_bulk",
            serde_json::json!({
                "wallet_id": request.wallet_id,
                "metadata_list": request.metadata_list,
                "target_list": request.target_list,
                "royalty_percentage": request.royalty_percentage,
                "royalty_address": request.royalty_address,
                "mint_number_start": request.mint_number_start,
                "mint_total": request.mint_total,
                "xch_coins": request.xch_coins.iter().map(coin_json).collect::<Vec<Value>>(),
                "xch_change_target": hex_bytes32(request.xch_change_target),
                "did_coin": request.did_coin.as_ref().map(coin_json),
                "did_lineage_parent": request.did_lineage_parent.map(hex_bytes32),
                "mint_from_did": request.mint_from_did,
            }),
        )
    }

    fn create_signed_transaction(
        &self,
        additions: Vec<Addition>,
        coins: Vec<Coin>,
        fee: u64,
    ) -> impl Future<Output = Result<CreateSignedTransactionResponse, RpcError>> {
        self.make_post_request(
            "create_signed_transaction",
            serde_json::json!({
                "additions": additions
                    .into_iter()
                    .map(|addition| serde_json::json!({
                        "amount": addition.amount,
                        "puzzle_hash": hex_bytes32(addition.puzzle_hash),
                    }))
                    .collect::<Vec<Value>>(),
                "coins": coins.iter().map(coin_json).collect::<Vec<Value>>(),
                "fee": fee,
            }),
        )
    }

    fn create_offer_for_ids(
        &self,
        offer: &IndexMap<String, i64>,
        fee: u64,
    ) -> impl Future<Output = Result<CreateOfferForIdsResponse, RpcError>> {
        self.make_post_request(
            "create_offer_for_ids",
            serde_json::json!({
                "offer": offer,
                "fee": fee,
            }),
        )
    }
}

impl<T: ChiaRpcClient> WalletRpc for T {}
