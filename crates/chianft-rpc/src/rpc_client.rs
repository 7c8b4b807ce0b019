use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};

use crate::RpcError;

/// The POST transport shared by the full node and wallet RPC interfaces.
///
/// Implementors only provide the plumbing; the endpoint methods live on
/// [`FullNodeRpc`](crate::FullNodeRpc) and [`WalletRpc`](crate::WalletRpc),
/// which are blanket implemented for every transport.
pub trait ChiaRpcClient {
    fn base_url(&self) -> &str;

    fn make_post_request<R, B>(
        &self,
        endpoint: &str,
        body: B,
    ) -> impl Future<Output = Result<R, RpcError>>
    where
        B: Serialize + Send,
        R: DeserializeOwned + Send;
}
