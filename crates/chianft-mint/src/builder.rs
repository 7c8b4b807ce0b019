use chia_protocol::{Bytes32, Coin, SpendBundle};
use chianft_rpc::{parse_bytes32, FullNodeRpc, NftMintBulkRequest, WalletRpc};
use tracing::info;

use crate::{
    bundle_additions, bundle_removals, partition, resolve_wallet_ids, DidWallet, MintError,
    MintRecord,
};

/// Caller supplied settings for one mint run.
#[derive(Debug, Clone)]
pub struct MintParameters {
    /// The NFT wallet to mint from.
    pub wallet_id: u32,
    /// Mint under the DID attached to the NFT wallet.
    pub mint_from_did: bool,
    /// A standard XCH address where royalties will be sent.
    pub royalty_address: String,
    /// Royalty in basis points of the offer price.
    pub royalty_percentage: u16,
    /// The number of NFTs minted per spend bundle.
    pub chunk_size: usize,
}

/// The funding coin threaded through the bundle sequence. Each bundle pays
/// its change back to the original puzzle hash, and that change coin funds
/// the next bundle.
#[derive(Debug, Clone, Copy)]
pub struct FundingLineage {
    coin: Coin,
    change_puzzle_hash: Bytes32,
}

impl FundingLineage {
    pub fn new(coin: Coin) -> Self {
        Self {
            coin,
            change_puzzle_hash: coin.puzzle_hash,
        }
    }

    pub fn coin(&self) -> Coin {
        self.coin
    }

    pub fn change_puzzle_hash(&self) -> Bytes32 {
        self.change_puzzle_hash
    }

    /// Advances to the change coin created by the bundle.
    pub fn advance(&mut self, bundle: &SpendBundle) -> Result<(), MintError> {
        self.coin = bundle_additions(bundle)?
            .into_iter()
            .find(|coin| coin.puzzle_hash == self.change_puzzle_hash)
            .ok_or(MintError::LineageBroken(
                "spend bundle created no funding change coin",
            ))?;

        Ok(())
    }
}

/// The DID coin threaded through the bundle sequence. Each bundle spends
/// the current DID coin and recreates it with the same amount; the
/// recreated coin authorizes the next bundle.
#[derive(Debug, Clone, Copy)]
pub struct DidLineage {
    coin: Coin,
    lineage_parent: Option<Bytes32>,
}

impl DidLineage {
    /// Looks up the latest on-chain DID coin to start the lineage from.
    pub async fn resolve<W: WalletRpc, N: FullNodeRpc>(
        wallet: &W,
        node: &N,
        did: &DidWallet,
    ) -> Result<Self, MintError> {
        let response = wallet.did_get_did(did.wallet_id).await?;
        if !response.success {
            return Err(MintError::Wallet(response.error.unwrap_or_default()));
        }

        let coin_id = response
            .coin_id
            .ok_or_else(|| MintError::Wallet("did wallet has no coin id".to_string()))?;

        let info = wallet.did_get_info(parse_bytes32(&coin_id)?, true).await?;
        if !info.success {
            return Err(MintError::Wallet(info.error.unwrap_or_default()));
        }

        let latest_coin = info
            .latest_coin
            .ok_or_else(|| MintError::Wallet("did info has no latest coin".to_string()))?;

        let record = node
            .get_coin_record_by_name(parse_bytes32(&latest_coin)?)
            .await?
            .coin_record
            .ok_or(MintError::LineageBroken("latest did coin is unknown to the node"))?;

        Ok(Self {
            coin: record.coin,
            lineage_parent: None,
        })
    }

    pub fn coin(&self) -> Coin {
        self.coin
    }

    pub fn lineage_parent(&self) -> Option<Bytes32> {
        self.lineage_parent
    }

    /// Advances to the DID coin recreated by the bundle.
    pub fn advance(&mut self, bundle: &SpendBundle) -> Result<(), MintError> {
        let coin_id = self.coin.coin_id();

        let spent = bundle_removals(bundle)
            .into_iter()
            .find(|coin| coin.coin_id() == coin_id)
            .ok_or(MintError::LineageBroken("spend bundle did not spend the did coin"))?;

        self.lineage_parent = Some(spent.parent_coin_info);

        self.coin = bundle_additions(bundle)?
            .into_iter()
            .find(|coin| coin.parent_coin_info == coin_id && coin.amount == self.coin.amount)
            .ok_or(MintError::LineageBroken(
                "spend bundle did not recreate the did coin",
            ))?;

        Ok(())
    }
}

/// Builds the bundle sequence for a mint run by requesting one bundle per
/// metadata chunk from the wallet, threading the funding and DID lineages
/// across chunks.
#[derive(Debug)]
pub struct BundleBuilder<'a, W, N> {
    wallet: &'a W,
    node: &'a N,
}

impl<'a, W: WalletRpc, N: FullNodeRpc> BundleBuilder<'a, W, N> {
    pub fn new(wallet: &'a W, node: &'a N) -> Self {
        Self { wallet, node }
    }

    /// Builds every bundle for the run. Strictly sequential: each chunk
    /// consumes coins created by the previous chunk's bundle.
    pub async fn build_all(
        &self,
        records: &[MintRecord],
        targets: &[String],
        params: &MintParameters,
    ) -> Result<Vec<SpendBundle>, MintError> {
        let ids = resolve_wallet_ids(self.wallet, Some(params.wallet_id)).await?;
        let nft_wallet_id = ids.nft_wallet_id.ok_or(MintError::MissingNftWallet)?;
        let mint_total = records.len() as u64;

        let mut funding = FundingLineage::new(self.select_funding_coin(ids.xch_wallet_id, mint_total).await?);

        let mut did = if params.mint_from_did {
            let did = ids.did.as_ref().ok_or(MintError::MissingDidWallet)?;
            Some(DidLineage::resolve(self.wallet, self.node, did).await?)
        } else {
            None
        };

        let chunks = partition(records, params.chunk_size)?;
        let mut bundles = Vec::with_capacity(chunks.len());

        for (chunk_index, chunk) in chunks.into_iter().enumerate() {
            let start = chunk_index * params.chunk_size;
            let end = start + chunk.len();

            info!(rows = format!("{start}..{end}"), "requesting mint spend bundle");

            let request = NftMintBulkRequest {
                wallet_id: nft_wallet_id,
                metadata_list: chunk
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<Vec<serde_json::Value>, serde_json::Error>>()
                    .map_err(chianft_rpc::RpcError::from)?,
                target_list: chunk_targets(targets, start, chunk.len()),
                royalty_percentage: params.royalty_percentage,
                royalty_address: params.royalty_address.clone(),
                mint_number_start: start as u64 + 1,
                mint_total,
                xch_coins: vec![funding.coin()],
                xch_change_target: funding.change_puzzle_hash(),
                did_coin: did.as_ref().map(DidLineage::coin),
                did_lineage_parent: did.as_ref().and_then(DidLineage::lineage_parent),
                mint_from_did: params.mint_from_did,
            };

            let response = self.wallet.nft_mint_bulk(&request).await?;

            let bundle = if response.success {
                response.spend_bundle
            } else {
                None
            }
            .ok_or(MintError::BundleConstructionFailed { start, end })?;

            funding.advance(&bundle)?;
            if let Some(did) = &mut did {
                did.advance(&bundle)?;
            }

            bundles.push(bundle);
        }

        Ok(bundles)
    }

    /// Selects the single coin funding the entire run.
    async fn select_funding_coin(&self, xch_wallet_id: u32, amount: u64) -> Result<Coin, MintError> {
        let response = self
            .wallet
            .select_coins(xch_wallet_id, amount, Vec::new())
            .await?;

        if !response.success {
            return Err(MintError::Wallet(response.error.unwrap_or_default()));
        }

        let coins = response.coins.unwrap_or_default();

        if coins.len() != 1 {
            return Err(MintError::InsufficientFundingResource(amount));
        }

        Ok(coins[0])
    }
}

fn chunk_targets(targets: &[String], start: usize, len: usize) -> Vec<String> {
    let start = start.min(targets.len());
    let end = (start + len).min(targets.len());
    targets[start..end].to_vec()
}
