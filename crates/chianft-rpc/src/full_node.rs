use std::future::Future;

use chia_protocol::{Bytes32, SpendBundle};

use crate::{
    ser::{hex_bytes32, spend_bundle_json},
    BlockchainStateResponse, ChiaRpcClient, GetAllMempoolItemsResponse, GetCoinRecordResponse,
    GetNetworkInfoResponse, PushTxResponse, RpcError,
};

/// The full node RPC operations used for submission and confirmation
/// tracking. Available on every [`ChiaRpcClient`] transport.
pub trait FullNodeRpc: ChiaRpcClient {
    fn get_blockchain_state(
        &self,
    ) -> impl Future<Output = Result<BlockchainStateResponse, RpcError>> {
        self.make_post_request("get_blockchain_state", serde_json::json!({}))
    }

    fn get_coin_record_by_name(
        &self,
        name: Bytes32,
    ) -> impl Future<Output = Result<GetCoinRecordResponse, RpcError>> {
        self.make_post_request(
            "get_coin_record_by_name",
            serde_json::json!({
                "name": hex_bytes32(name),
            }),
        )
    }

    fn get_all_mempool_items(
        &self,
    ) -> impl Future<Output = Result<GetAllMempoolItemsResponse, RpcError>> {
        self.make_post_request("get_all_mempool_items", serde_json::json!({}))
    }

    fn push_tx(
        &self,
        spend_bundle: &SpendBundle,
    ) -> impl Future<Output = Result<PushTxResponse, RpcError>> {
        self.make_post_request(
            "push_tx",
            serde_json::json!({
                "spend_bundle": spend_bundle_json(spend_bundle),
            }),
        )
    }

    fn get_network_info(&self) -> impl Future<Output = Result<GetNetworkInfoResponse, RpcError>> {
        self.make_post_request("get_network_info", serde_json::json!({}))
    }
}

impl<T: ChiaRpcClient> FullNodeRpc for T {}

#[cfg(test)]
mod tests {
    use chia_bls::Signature;
    use chia_protocol::{Coin, SpendBundle};
    use hex_literal::hex;

    use crate::MockRpcClient;

    use super::*;

    const INFINITY_SIG: &str = "0xc00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000";

    #[tokio::test]
    async fn test_get_blockchain_state() {
        let mut client = MockRpcClient::new();

        client.mock_response(
            "http://api.example.com/get_blockchain_state",
            r#"{
                "blockchain_state": {
                    "block_max_cost": 11000000000,
                    "mempool_cost": 88022711,
                    "mempool_fees": 10,
                    "mempool_max_total_cost": 110000000000,
                    "mempool_size": 2,
                    "node_id": "5c8c1640aae6b0ab0f16d5ec01be46aa10ad68f8aa85446fa65f1aee9d6b0b2d"
                },
                "success": true
            }"#,
        );

        let response = client.get_blockchain_state().await.unwrap();
        assert!(response.success);

        let state = response.blockchain_state.unwrap();
        assert_eq!(state.mempool_cost, 88_022_711);
        assert_eq!(state.mempool_max_total_cost, 110_000_000_000);
        assert_eq!(state.mempool_size, 2);
    }

    #[tokio::test]
    async fn test_get_coin_record_by_name() {
        let mut client = MockRpcClient::new();

        client.mock_response(
            "http://api.example.com/get_coin_record_by_name",
            r#"{
                "coin_record": {
                    "coin": {
                        "amount": 10019626640,
                        "parent_coin_info": "c325057d788bee13367cb8e2d71ff3e209b5e94b31b296322ba1a143053fef5b",
                        "puzzle_hash": "11cd056d9ec93f4612919b445e1ad9afeb7ef7739708c2d16cec4fd2d3cd5e63"
                    },
                    "coinbase": false,
                    "confirmed_block_index": 5910291,
                    "spent": false,
                    "spent_block_index": 0,
                    "timestamp": 1725991066
                },
                "success": true
            }"#,
        );

        let name = Bytes32::new(hex!(
            "88a8e404c419e12bb11e809ff7afc8b1fcda77270fe3f157cff8a2fab4f44e8b"
        ));
        let response = client.get_coin_record_by_name(name).await.unwrap();

        assert!(response.success);
        let record = response.coin_record.unwrap();
        assert_eq!(record.coin.amount, 10_019_626_640);
        assert_eq!(record.spent_block_index, 0);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].1["name"],
            "0x88a8e404c419e12bb11e809ff7afc8b1fcda77270fe3f157cff8a2fab4f44e8b"
        );
    }

    #[tokio::test]
    async fn test_get_all_mempool_items() {
        let mut client = MockRpcClient::new();

        client.mock_response(
            "http://api.example.com/get_all_mempool_items",
            &format!(
                r#"{{
                    "mempool_items": {{
                        "7e54c0d65def3ff9ef4bf1a0022bb4e57f97d4f08c7b1d1d27e505a9a8876bb5": {{
                            "spend_bundle": {{
                                "coin_spends": [],
                                "aggregated_signature": "{INFINITY_SIG}"
                            }},
                            "spend_bundle_name": "0x7e54c0d65def3ff9ef4bf1a0022bb4e57f97d4f08c7b1d1d27e505a9a8876bb5",
                            "fee": 500,
                            "cost": 6000000,
                            "additions": [{{
                                "amount": 1,
                                "parent_coin_info": "0xc325057d788bee13367cb8e2d71ff3e209b5e94b31b296322ba1a143053fef5b",
                                "puzzle_hash": "0x11cd056d9ec93f4612919b445e1ad9afeb7ef7739708c2d16cec4fd2d3cd5e63"
                            }}]
                        }}
                    }},
                    "success": true
                }}"#
            ),
        );

        let response = client.get_all_mempool_items().await.unwrap();
        assert!(response.success);

        let items = response.mempool_items.unwrap();
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.fee, 500);
        assert_eq!(item.cost, 6_000_000);
        assert_eq!(item.additions.len(), 1);
        assert_eq!(
            item.spend_bundle_name,
            Bytes32::new(hex!(
                "7e54c0d65def3ff9ef4bf1a0022bb4e57f97d4f08c7b1d1d27e505a9a8876bb5"
            ))
        );
    }

    #[tokio::test]
    async fn test_push_tx_double_spend() {
        let mut client = MockRpcClient::new();

        client.mock_response(
            "http://api.example.com/push_tx",
            r#"{
                "status": "FAILED",
                "error": "Failed to include transaction, error DOUBLE_SPEND",
                "success": false
            }"#,
        );

        let spend_bundle = SpendBundle::new(Vec::new(), Signature::default());
        let response = client.push_tx(&spend_bundle).await.unwrap();

        assert!(!response.success);
        assert!(response.error.unwrap().contains("DOUBLE_SPEND"));

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].1["spend_bundle"]["aggregated_signature"],
            INFINITY_SIG
        );
        assert_eq!(
            requests[0].1["spend_bundle"]["coin_spends"],
            serde_json::json!([])
        );
    }

    #[tokio::test]
    async fn test_push_tx_coin_spends() {
        let mut client = MockRpcClient::new();

        client.mock_response(
            "http://api.example.com/push_tx",
            r#"{"status": "SUCCESS", "success": true}"#,
        );

        let coin = Coin::new(Bytes32::new([1; 32]), Bytes32::new([2; 32]), 100);
        let spend_bundle = SpendBundle::new(
            vec![chia_protocol::CoinSpend::new(
                coin,
                chia_protocol::Program::default(),
                chia_protocol::Program::default(),
            )],
            Signature::default(),
        );

        let response = client.push_tx(&spend_bundle).await.unwrap();
        assert!(response.success);

        let requests = client.get_requests();
        let spends = &requests[0].1["spend_bundle"]["coin_spends"];
        assert_eq!(spends[0]["coin"]["amount"], 100);
        assert_eq!(
            spends[0]["coin"]["parent_coin_info"],
            format!("0x{}", "01".repeat(32))
        );
        assert_eq!(spends[0]["puzzle_reveal"], "0x");
    }
}
