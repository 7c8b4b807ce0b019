use chia_protocol::{Coin, SpendBundle};
use chianft_rpc::FullNodeRpc;

use crate::{bundle_removals, MintError};

/// Where to pick up a previously built bundle sequence.
#[derive(Debug, Clone, Copy)]
pub struct ResumePoint {
    /// Index of the first bundle whose funding input is still unspent.
    pub index: usize,
    /// That bundle's funding input coin.
    pub funding_coin: Coin,
}

/// Finds the first bundle that has not yet reached the ledger.
///
/// The ledger's spent state is the only source of truth here: the bundle
/// file records what was computed, never what was submitted. A funding
/// coin the node does not know about yet is treated as unspent, since the
/// bundle that creates it cannot have been confirmed either.
///
/// Fails with [`MintError::AllBundlesSpent`] when the run is already
/// complete; callers treat that as success.
pub async fn find_resume_point<N: FullNodeRpc>(
    node: &N,
    bundles: &[SpendBundle],
) -> Result<ResumePoint, MintError> {
    for (index, bundle) in bundles.iter().enumerate() {
        let funding_coin = bundle_removals(bundle)
            .into_iter()
            .find(|coin| coin.amount > 1)
            .ok_or(MintError::MalformedBundle(index))?;

        let response = node.get_coin_record_by_name(funding_coin.coin_id()).await?;

        match response.coin_record {
            Some(record) if record.spent_block_index != 0 => {}
            _ => return Ok(ResumePoint {
                index,
                funding_coin,
            }),
        }
    }

    Err(MintError::AllBundlesSpent)
}
