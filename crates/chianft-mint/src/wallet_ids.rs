use chia_protocol::Bytes32;
use chianft_rpc::{parse_bytes32, WalletRpc, WalletType};

use crate::MintError;

/// The wallets involved in a mint run, discovered once up front.
#[derive(Debug, Clone, Copy)]
pub struct WalletIds {
    /// The standard wallet used for funding and fees.
    pub xch_wallet_id: u32,
    /// The NFT wallet used for minting, when one exists.
    pub nft_wallet_id: Option<u32>,
    /// The DID wallet attached to the NFT wallet, when one exists.
    pub did: Option<DidWallet>,
}

#[derive(Debug, Clone, Copy)]
pub struct DidWallet {
    pub wallet_id: u32,
    pub coin_id: Bytes32,
}

/// Resolves the NFT, DID, and standard wallet ids.
///
/// When `nft_wallet_id` is given, the DID attached to that wallet (if any)
/// is matched against the available DID wallets. Otherwise the first NFT
/// wallet with an attached DID is preferred, falling back to any NFT
/// wallet.
pub async fn resolve_wallet_ids<W: WalletRpc>(
    wallet: &W,
    nft_wallet_id: Option<u32>,
) -> Result<WalletIds, MintError> {
    let nft_wallets = list_wallets(wallet, WalletType::Nft).await?;

    let mut resolved_nft_id = nft_wallet_id;
    let mut did = None;

    if let Some(wallet_id) = nft_wallet_id {
        let response = wallet.nft_get_wallet_did(wallet_id).await?;
        if !response.success {
            return Err(MintError::Wallet(response.error.unwrap_or_default()));
        }

        if let Some(did_id) = response.did_id {
            did = find_did_wallet(wallet, &did_id).await?;
        }
    } else {
        for info in &nft_wallets {
            let response = wallet.nft_get_wallet_did(info.id).await?;
            if !response.success {
                return Err(MintError::Wallet(response.error.unwrap_or_default()));
            }

            if response.did_id.is_some() {
                resolved_nft_id = Some(info.id);
                break;
            }
        }

        if resolved_nft_id.is_none() {
            resolved_nft_id = nft_wallets.first().map(|info| info.id);
        }
    }

    let xch_wallets = list_wallets(wallet, WalletType::Standard).await?;
    let xch_wallet_id = xch_wallets
        .first()
        .map(|info| info.id)
        .ok_or_else(|| MintError::Wallet("no standard wallet is available".to_string()))?;

    Ok(WalletIds {
        xch_wallet_id,
        nft_wallet_id: resolved_nft_id,
        did,
    })
}

async fn find_did_wallet<W: WalletRpc>(
    wallet: &W,
    did_id: &str,
) -> Result<Option<DidWallet>, MintError> {
    for info in list_wallets(wallet, WalletType::Did).await? {
        let response = wallet.did_get_did(info.id).await?;
        if !response.success {
            return Err(MintError::Wallet(response.error.unwrap_or_default()));
        }

        if response.my_did.as_deref() != Some(did_id) {
            continue;
        }

        let coin_id = response
            .coin_id
            .ok_or_else(|| MintError::Wallet("did wallet has no coin id".to_string()))?;

        return Ok(Some(DidWallet {
            wallet_id: info.id,
            coin_id: parse_bytes32(&coin_id)?,
        }));
    }

    Ok(None)
}

async fn list_wallets<W: WalletRpc>(
    wallet: &W,
    wallet_type: WalletType,
) -> Result<Vec<chianft_rpc::WalletInfo>, MintError> {
    let response = wallet.get_wallets(wallet_type).await?;

    if !response.success {
        return Err(MintError::Wallet(response.error.unwrap_or_default()));
    }

    Ok(response.wallets.unwrap_or_default())
}
