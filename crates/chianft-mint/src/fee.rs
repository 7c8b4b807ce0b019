use std::time::Duration;

use chianft_rpc::MempoolItem;

use crate::MAX_BLOCK_COST_CLVM;

/// Congestion measurements taken from one `get_all_mempool_items` snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct MempoolSnapshot {
    pub total_cost: u64,
    pub min_fee_per_cost: Option<f64>,
}

impl MempoolSnapshot {
    #[allow(clippy::cast_precision_loss)]
    pub fn measure<'a>(items: impl IntoIterator<Item = &'a MempoolItem>) -> Self {
        let mut total_cost = 0;
        let mut min_fee_per_cost: Option<f64> = None;

        for item in items {
            total_cost += item.cost;

            if item.cost > 0 {
                let rate = item.fee as f64 / item.cost as f64;
                min_fee_per_cost = Some(min_fee_per_cost.map_or(rate, |min| min.min(rate)));
            }
        }

        Self {
            total_cost,
            min_fee_per_cost,
        }
    }
}

/// Retry bounds, poll intervals, and the fee escalation formula used by the
/// submission pipeline.
///
/// The escalation formula mirrors the historical behavior of the minting
/// tool: when the mempool is full, outbid the cheapest queued item by a
/// fixed bump (with a floor), scaled by the attempt number. It is a
/// heuristic, not a law; tune the fields rather than hardcoding around it.
#[derive(Debug, Clone, Copy)]
pub struct FeePolicy {
    /// Minimum fee per cost offered when the mempool is full.
    pub fee_per_cost_floor: u64,
    /// Amount added to the cheapest observed fee rate when outbidding.
    pub fee_per_cost_bump: u64,
    /// Submission attempts per bundle before giving up.
    pub max_attempts: u32,
    /// Pause after the node rejects a bundle for a non-fatal reason.
    pub rejection_delay: Duration,
    /// Interval between mempool polls.
    pub mempool_poll_interval: Duration,
    /// How long to wait for a submitted bundle to appear in the mempool
    /// before treating it as evicted.
    pub inclusion_timeout: Duration,
    /// Coin lookups per minted coin when checking confirmation.
    pub confirmation_retries: u32,
    /// Pause between confirmation coin lookups.
    pub confirmation_delay: Duration,
    /// Attempts per offer before skipping it.
    pub offer_retries: u32,
    /// Pause between offer attempts.
    pub offer_retry_delay: Duration,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            fee_per_cost_floor: 5,
            fee_per_cost_bump: 5,
            max_attempts: 10,
            rejection_delay: Duration::from_secs(20),
            mempool_poll_interval: Duration::from_secs(5),
            inclusion_timeout: Duration::from_secs(600),
            confirmation_retries: 10,
            confirmation_delay: Duration::from_secs(1),
            offer_retries: 10,
            offer_retry_delay: Duration::from_secs(5),
        }
    }
}

impl FeePolicy {
    /// Whether the mempool has no room left for a bundle of this cost.
    pub fn is_mempool_full(&self, snapshot: &MempoolSnapshot, bundle_cost: u64) -> bool {
        snapshot.total_cost + bundle_cost >= MAX_BLOCK_COST_CLVM
    }

    /// The fee rate needed to displace the cheapest queued item.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fee_per_cost(&self, snapshot: &MempoolSnapshot) -> u64 {
        match snapshot.min_fee_per_cost {
            Some(rate) if rate >= self.fee_per_cost_floor as f64 => {
                rate as u64 + self.fee_per_cost_bump
            }
            _ => self.fee_per_cost_floor,
        }
    }

    /// The total fee to attach on the given attempt, or zero when the
    /// mempool still has room. Escalates monotonically with `attempt`.
    pub fn total_fee(&self, bundle_cost: u64, snapshot: &MempoolSnapshot, attempt: u32) -> u64 {
        if !self.is_mempool_full(snapshot, bundle_cost) {
            return 0;
        }

        bundle_cost * self.fee_per_cost(snapshot) * u64::from(attempt)
    }
}
