mod create;
mod submit;

pub use create::*;
pub use submit::*;

use std::fs;

use anyhow::{bail, Context, Result};
use chianft_rpc::{FullNodeRpc, HttpRpcClient, WalletRpc};

use crate::args::ConnectionArgs;

/// Connects the full node and wallet RPC clients using the daemon's SSL
/// certificates, and logs in with the requested key fingerprint.
pub(crate) async fn connect(args: &ConnectionArgs) -> Result<(HttpRpcClient, HttpRpcClient)> {
    let ssl_dir = args.chia_root().join("config/ssl");

    let node = ssl_client(
        args.node_url.clone(),
        &ssl_dir.join("full_node/private_full_node.crt"),
        &ssl_dir.join("full_node/private_full_node.key"),
    )?;

    let wallet = ssl_client(
        args.wallet_url.clone(),
        &ssl_dir.join("wallet/private_wallet.crt"),
        &ssl_dir.join("wallet/private_wallet.key"),
    )?;

    let network = node
        .get_network_info()
        .await
        .with_context(|| format!("connecting to the full node at {}", args.node_url))?;

    if !network.success {
        bail!("the full node rejected the network info request");
    }

    if let Some(fingerprint) = args.fingerprint {
        let response = wallet.log_in(fingerprint).await?;
        if !response.success {
            bail!("failed to log in with fingerprint {fingerprint}");
        }
    }

    Ok((node, wallet))
}

fn ssl_client(url: String, cert: &std::path::Path, key: &std::path::Path) -> Result<HttpRpcClient> {
    let cert_pem = fs::read(cert).with_context(|| format!("reading {}", cert.display()))?;
    let key_pem = fs::read(key).with_context(|| format!("reading {}", key.display()))?;

    Ok(HttpRpcClient::with_ssl(url, &cert_pem, &key_pem)?)
}
