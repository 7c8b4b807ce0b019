use std::fs;
use std::path::PathBuf;

use chia_protocol::{Bytes32, Coin, SpendBundle};
use chia_puzzles::SINGLETON_LAUNCHER_HASH;
use chianft_rpc::{Addition, FullNodeRpc, MempoolItem, WalletRpc};
use indexmap::IndexMap;
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use crate::{
    aggregate_bundles, bundle_additions, bundle_cost, bundle_removals, find_resume_point,
    resolve_wallet_ids, FeePolicy, MempoolSnapshot, MintError, OfferGenerator,
};

/// Options for submitting a bundle sequence.
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Attach this exact fee to every bundle instead of estimating one
    /// from mempool congestion.
    pub fee: Option<u64>,
    /// Create a sell offer for each minted NFT at this price, in mojos.
    pub sell_offer_price: Option<u64>,
    /// Directory where offer files are written.
    pub offer_dir: PathBuf,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            fee: None,
            sell_offer_price: None,
            offer_dir: PathBuf::from("offers"),
        }
    }
}

/// The singleton launcher coins spent by a mint bundle. Their ids are the
/// minted NFT ids.
pub fn launcher_ids(bundle: &SpendBundle) -> Vec<Bytes32> {
    bundle_removals(bundle)
        .into_iter()
        .filter(|coin| coin.puzzle_hash == Bytes32::new(SINGLETON_LAUNCHER_HASH))
        .map(|coin| coin.coin_id())
        .collect()
}

enum BundleOutcome {
    /// The bundle left the mempool and its minted coins exist on chain.
    Confirmed(SpendBundle),
    /// The node rejected the bundle as a double spend, meaning it was
    /// accepted during an earlier run.
    AlreadySpent,
}

enum MempoolVerdict {
    Confirmed,
    Evicted,
}

/// Submits each unconsumed bundle in order, attaching fees, monitoring the
/// mempool, and recovering from eviction and duplicate submissions.
///
/// Bundles are strictly sequential: each consumes coins created by its
/// predecessor, so there is nothing to parallelize.
#[derive(Debug)]
pub struct SubmissionPipeline<'a, W, N> {
    wallet: &'a W,
    node: &'a N,
    policy: FeePolicy,
}

impl<'a, W: WalletRpc, N: FullNodeRpc> SubmissionPipeline<'a, W, N> {
    pub fn new(wallet: &'a W, node: &'a N) -> Self {
        Self {
            wallet,
            node,
            policy: FeePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FeePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Drives a bundle sequence to completion, resuming where a previous
    /// run left off.
    pub async fn submit_all(
        &self,
        bundles: &[SpendBundle],
        options: &SubmitOptions,
    ) -> Result<(), MintError> {
        let ids = resolve_wallet_ids(self.wallet, None).await?;

        let resume = match find_resume_point(self.node, bundles).await {
            Ok(resume) => resume,
            Err(MintError::AllBundlesSpent) => {
                info!("all spend bundles are already spent; nothing to submit");
                return Ok(());
            }
            Err(error) => return Err(error),
        };

        if resume.index > 0 {
            info!(index = resume.index, "resuming from spend bundle");
        }

        if options.sell_offer_price.is_some() {
            fs::create_dir_all(&options.offer_dir)?;
        }

        if self.funding_spend_pending(resume.funding_coin).await? {
            return Err(MintError::PreviousSpendPending);
        }

        let mut fee_coin = self
            .select_fee_coin(ids.xch_wallet_id, bundles, resume.funding_coin, options.fee)
            .await?;

        let offers = OfferGenerator::new(self.wallet, ids.xch_wallet_id, self.policy);

        info!(count = bundles.len() - resume.index, "submitting spend bundles");

        for (index, bundle) in bundles.iter().enumerate().skip(resume.index) {
            match self.submit_bundle(bundle, fee_coin, options.fee).await? {
                BundleOutcome::Confirmed(final_bundle) => {
                    // The fee change chains across bundles just like the
                    // funding and DID coins do.
                    if let Some(change) = bundle_additions(&final_bundle)?
                        .into_iter()
                        .find(|coin| coin.parent_coin_info == fee_coin.coin_id())
                    {
                        fee_coin = change;
                    }

                    if let Some(price) = options.sell_offer_price {
                        offers
                            .create_offers(&launcher_ids(bundle), price, &options.offer_dir)
                            .await?;
                    }

                    info!(index, "spend bundle confirmed");
                    self.log_mempool_utilization().await?;
                }
                BundleOutcome::AlreadySpent => {
                    info!(index, "spend bundle was already submitted, skipping");
                }
            }
        }

        Ok(())
    }

    /// One bundle's submission state machine, bounded by the policy's
    /// attempt limit.
    async fn submit_bundle(
        &self,
        bundle: &SpendBundle,
        fee_coin: Coin,
        explicit_fee: Option<u64>,
    ) -> Result<BundleOutcome, MintError> {
        for attempt in 1..=self.policy.max_attempts {
            let (final_bundle, fee) = self
                .attach_fee(bundle, fee_coin, attempt, explicit_fee)
                .await?;

            info!(
                name = %hex::encode(final_bundle.name().to_bytes()),
                fee,
                attempt,
                "submitting spend bundle"
            );

            let response = self.node.push_tx(&final_bundle).await?;

            if response.success {
                match self.monitor_mempool(&final_bundle).await? {
                    MempoolVerdict::Confirmed => {
                        return Ok(BundleOutcome::Confirmed(final_bundle))
                    }
                    MempoolVerdict::Evicted => {
                        warn!(
                            attempt,
                            max_attempts = self.policy.max_attempts,
                            "spend bundle was evicted from the mempool, retrying with a higher fee"
                        );
                        continue;
                    }
                }
            }

            let error = response.error.unwrap_or_default();

            if error.contains("DOUBLE_SPEND") {
                return Ok(BundleOutcome::AlreadySpent);
            }

            warn!(
                error = %error,
                delay = ?self.policy.rejection_delay,
                "spend bundle was rejected, retrying"
            );
            sleep(self.policy.rejection_delay).await;
        }

        Err(MintError::SubmissionExhausted(self.policy.max_attempts))
    }

    /// Builds the bundle to actually push: the raw bundle, or the raw
    /// bundle aggregated with a fee spend from the dedicated fee coin.
    async fn attach_fee(
        &self,
        bundle: &SpendBundle,
        fee_coin: Coin,
        attempt: u32,
        explicit_fee: Option<u64>,
    ) -> Result<(SpendBundle, u64), MintError> {
        let total_fee = match explicit_fee {
            Some(fee) => fee,
            None => {
                let items = self.mempool_items().await?;
                let snapshot = MempoolSnapshot::measure(items.values());
                self.policy
                    .total_fee(bundle_cost(bundle)?, &snapshot, attempt)
            }
        };

        if total_fee == 0 {
            return Ok((bundle.clone(), 0));
        }

        let change = fee_coin.amount.checked_sub(total_fee).ok_or_else(|| {
            MintError::Wallet(format!(
                "fee coin is too small for the computed fee of {total_fee}"
            ))
        })?;

        let response = self
            .wallet
            .create_signed_transaction(
                vec![Addition {
                    amount: change,
                    puzzle_hash: fee_coin.puzzle_hash,
                }],
                vec![fee_coin],
                total_fee,
            )
            .await?;

        if !response.success {
            return Err(MintError::Wallet(response.error.unwrap_or_default()));
        }

        let fee_bundle = response
            .signed_tx
            .and_then(|tx| tx.spend_bundle)
            .ok_or_else(|| MintError::Wallet("signed transaction has no spend bundle".to_string()))?;

        Ok((aggregate_bundles(&fee_bundle, bundle), total_fee))
    }

    /// Watches a submitted bundle through the mempool until it confirms or
    /// is evicted. Both waits are cooperative polls on the policy interval.
    async fn monitor_mempool(&self, bundle: &SpendBundle) -> Result<MempoolVerdict, MintError> {
        let name = bundle.name();
        let deadline = Instant::now() + self.policy.inclusion_timeout;

        // Wait for the spend to show up in the mempool. Confirmation is
        // checked as well, since a fast block can confirm the spend before
        // any poll observes it pending.
        loop {
            if self.bundle_in_mempool(name).await? {
                break;
            }

            if self.bundle_confirmed(bundle).await? {
                return Ok(MempoolVerdict::Confirmed);
            }

            if Instant::now() >= deadline {
                return Ok(MempoolVerdict::Evicted);
            }

            sleep(self.policy.mempool_poll_interval).await;
        }

        // Wait for it to leave the mempool, then decide how it left.
        loop {
            if !self.bundle_in_mempool(name).await? {
                return Ok(if self.bundle_confirmed(bundle).await? {
                    MempoolVerdict::Confirmed
                } else {
                    MempoolVerdict::Evicted
                });
            }

            sleep(self.policy.mempool_poll_interval).await;
        }
    }

    async fn bundle_in_mempool(&self, name: Bytes32) -> Result<bool, MintError> {
        Ok(self
            .mempool_items()
            .await?
            .values()
            .any(|item| item.spend_bundle_name == name))
    }

    /// Checks that every minted NFT coin from the bundle is visible on the
    /// node. Coin visibility can lag the block, so each lookup is retried.
    async fn bundle_confirmed(&self, bundle: &SpendBundle) -> Result<bool, MintError> {
        let launcher_ids = bundle_removals(bundle)
            .into_iter()
            .filter(|coin| coin.amount == 0)
            .map(|coin| coin.coin_id())
            .collect::<Vec<Bytes32>>();

        let nft_coins = bundle_additions(bundle)?
            .into_iter()
            .filter(|coin| coin.amount == 1 && launcher_ids.contains(&coin.parent_coin_info))
            .collect::<Vec<Coin>>();

        let mut confirmed = 0;

        for coin in &nft_coins {
            for _ in 0..self.policy.confirmation_retries {
                let response = self.node.get_coin_record_by_name(coin.coin_id()).await?;

                if response.coin_record.is_some() {
                    confirmed += 1;
                    break;
                }

                sleep(self.policy.confirmation_delay).await;
            }
        }

        if confirmed < nft_coins.len() {
            info!(
                confirmed,
                total = nft_coins.len(),
                "not all minted coins are visible yet"
            );
            return Ok(false);
        }

        Ok(true)
    }

    /// Detects a submission from an earlier run that is still pending. A
    /// fee-wrapped bundle has a different name than the persisted one, so
    /// the check looks for mempool additions that are children of the
    /// funding coin instead.
    async fn funding_spend_pending(&self, funding_coin: Coin) -> Result<bool, MintError> {
        let funding_id = funding_coin.coin_id();

        Ok(self.mempool_items().await?.values().any(|item| {
            item.additions
                .iter()
                .any(|coin| coin.parent_coin_info == funding_id)
        }))
    }

    /// Selects a coin to pay fees from, budgeted for the worst case across
    /// the whole run and never overlapping the funding coin.
    async fn select_fee_coin(
        &self,
        xch_wallet_id: u32,
        bundles: &[SpendBundle],
        funding_coin: Coin,
        explicit_fee: Option<u64>,
    ) -> Result<Coin, MintError> {
        let estimated_max_fee = match explicit_fee {
            Some(fee) => bundles.len() as u64 * fee,
            None => {
                bundles.len() as u64 * bundle_cost(&bundles[0])? * self.policy.fee_per_cost_floor
            }
        };

        let response = self
            .wallet
            .select_coins(xch_wallet_id, estimated_max_fee, vec![funding_coin.coin_id()])
            .await?;

        if !response.success {
            return Err(MintError::Wallet(response.error.unwrap_or_default()));
        }

        response
            .coins
            .unwrap_or_default()
            .first()
            .copied()
            .ok_or_else(|| MintError::Wallet("no fee coin is available".to_string()))
    }

    async fn mempool_items(&self) -> Result<IndexMap<String, MempoolItem>, MintError> {
        let response = self.node.get_all_mempool_items().await?;

        if !response.success {
            return Err(MintError::Node(response.error.unwrap_or_default()));
        }

        Ok(response.mempool_items.unwrap_or_default())
    }

    #[allow(clippy::cast_precision_loss)]
    async fn log_mempool_utilization(&self) -> Result<(), MintError> {
        let response = self.node.get_blockchain_state().await?;

        if let Some(state) = response.blockchain_state {
            let utilization = state.mempool_cost as f64 / state.mempool_max_total_cost as f64;
            info!(
                utilization = format!("{:.0}%", utilization * 100.0),
                "mempool utilization"
            );
        }

        Ok(())
    }
}
