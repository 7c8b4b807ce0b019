use reqwest::{Client, Identity};
use serde::{de::DeserializeOwned, Serialize};

use crate::{ChiaRpcClient, RpcError};

/// A reqwest backed transport for the node and wallet RPC services.
///
/// Chia RPC services authenticate callers with a client certificate signed
/// by the daemon's private CA, so [`HttpRpcClient::with_ssl`] is the
/// constructor used against a real deployment.
#[derive(Debug)]
pub struct HttpRpcClient {
    base_url: String,
    client: Client,
}

impl HttpRpcClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn with_ssl(base_url: String, cert_pem: &[u8], key_pem: &[u8]) -> Result<Self, RpcError> {
        let identity = Identity::from_pkcs8_pem(cert_pem, key_pem).map_err(RpcError::Tls)?;

        Ok(Self {
            base_url,
            client: Client::builder()
                .danger_accept_invalid_certs(true)
                .identity(identity)
                .build()
                .map_err(RpcError::Tls)?,
        })
    }
}

impl ChiaRpcClient for HttpRpcClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn make_post_request<R, B>(&self, endpoint: &str, body: B) -> Result<R, RpcError>
    where
        B: Serialize + Send,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}/{}", self.base_url(), endpoint);
        let res = self.client.post(&url).json(&body).send().await?;
        Ok(res.json::<R>().await?)
    }
}
