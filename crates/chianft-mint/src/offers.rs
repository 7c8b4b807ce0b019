use std::fs;
use std::path::Path;

use chia_protocol::Bytes32;
use chianft_rpc::WalletRpc;
use indexmap::IndexMap;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{FeePolicy, MintError};

/// Requests a sell offer from the wallet for each minted NFT and persists
/// the artifacts, one file per launcher id.
#[derive(Debug)]
pub struct OfferGenerator<'a, W> {
    wallet: &'a W,
    xch_wallet_id: u32,
    policy: FeePolicy,
}

impl<'a, W: WalletRpc> OfferGenerator<'a, W> {
    pub fn new(wallet: &'a W, xch_wallet_id: u32, policy: FeePolicy) -> Self {
        Self {
            wallet,
            xch_wallet_id,
            policy,
        }
    }

    /// Creates an offer per launcher id. An offer that keeps failing is
    /// logged and skipped; offer generation never fails the mint run.
    pub async fn create_offers(
        &self,
        launcher_ids: &[Bytes32],
        price: u64,
        offer_dir: &Path,
    ) -> Result<(), MintError> {
        for &launcher_id in launcher_ids {
            let launcher_hex = hex::encode(launcher_id.to_bytes());

            match self.create_offer(&launcher_hex, price).await {
                Ok(offer) => {
                    let path = offer_dir.join(format!("{launcher_hex}.offer"));
                    fs::write(&path, offer)?;
                    info!(launcher_id = %launcher_hex, path = %path.display(), "offer created");
                }
                Err(error) => {
                    warn!(launcher_id = %launcher_hex, %error, "skipping offer");
                }
            }
        }

        Ok(())
    }

    async fn create_offer(&self, launcher_hex: &str, price: u64) -> Result<String, MintError> {
        let mut offer = IndexMap::new();
        offer.insert(launcher_hex.to_string(), -1);
        offer.insert(self.xch_wallet_id.to_string(), i64::try_from(price).unwrap_or(i64::MAX));

        for attempt in 1..=self.policy.offer_retries {
            let response = self.wallet.create_offer_for_ids(&offer, 0).await?;

            if response.success {
                if let Some(offer) = response.offer {
                    return Ok(offer);
                }
            }

            warn!(
                attempt,
                error = response.error.unwrap_or_default(),
                delay = ?self.policy.offer_retry_delay,
                "offer creation failed, retrying"
            );
            sleep(self.policy.offer_retry_delay).await;
        }

        Err(MintError::OfferCreationFailed {
            attempts: self.policy.offer_retries,
            launcher_id: launcher_hex.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use chianft_rpc::MockRpcClient;

    use super::*;

    fn test_policy() -> FeePolicy {
        FeePolicy {
            offer_retries: 2,
            offer_retry_delay: Duration::from_millis(1),
            ..FeePolicy::default()
        }
    }

    fn temp_offer_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chianft-offers-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_offer_is_persisted() -> anyhow::Result<()> {
        let mut wallet = MockRpcClient::new();
        wallet.mock_response(
            "http://api.example.com/create_offer_for_ids",
            r#"{"offer": "offer1qqz83wcsltt6wcmqvpsxygqq0qqzs338", "success": true}"#,
        );

        let launcher_id = chia_protocol::Bytes32::new([9; 32]);
        let dir = temp_offer_dir("ok");

        let generator = OfferGenerator::new(&wallet, 1, test_policy());
        generator.create_offers(&[launcher_id], 1000, &dir).await?;

        let path = dir.join(format!("{}.offer", hex::encode(launcher_id.to_bytes())));
        assert!(fs::read_to_string(&path)?.starts_with("offer1"));

        let requests = wallet.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].1["offer"][hex::encode(launcher_id.to_bytes())],
            -1
        );
        assert_eq!(requests[0].1["offer"]["1"], 1000);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[tokio::test]
    async fn test_offer_retries_then_succeeds() -> anyhow::Result<()> {
        let mut wallet = MockRpcClient::new();
        wallet.mock_response(
            "http://api.example.com/create_offer_for_ids",
            r#"{"error": "wallet is syncing", "success": false}"#,
        );
        wallet.mock_response(
            "http://api.example.com/create_offer_for_ids",
            r#"{"offer": "offer1qqz83wcsltt6wcmqvpsxygqq0qqzs338", "success": true}"#,
        );

        let launcher_id = chia_protocol::Bytes32::new([8; 32]);
        let dir = temp_offer_dir("retry");

        let generator = OfferGenerator::new(&wallet, 1, test_policy());
        generator.create_offers(&[launcher_id], 500, &dir).await?;

        let path = dir.join(format!("{}.offer", hex::encode(launcher_id.to_bytes())));
        assert!(path.exists());
        assert_eq!(wallet.get_requests().len(), 2);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[tokio::test]
    async fn test_exhausted_offer_is_skipped() -> anyhow::Result<()> {
        let mut wallet = MockRpcClient::new();
        wallet.mock_response(
            "http://api.example.com/create_offer_for_ids",
            r#"{"error": "wallet is syncing", "success": false}"#,
        );

        let launcher_id = chia_protocol::Bytes32::new([7; 32]);
        let dir = temp_offer_dir("skip");

        let generator = OfferGenerator::new(&wallet, 1, test_policy());

        // Non-fatal: the failed offer is skipped without an error.
        generator.create_offers(&[launcher_id], 500, &dir).await?;

        let path = dir.join(format!("{}.offer", hex::encode(launcher_id.to_bytes())));
        assert!(!path.exists());
        assert_eq!(wallet.get_requests().len(), 2);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
