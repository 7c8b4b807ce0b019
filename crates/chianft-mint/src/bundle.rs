use chia_protocol::{Bytes32, Coin, SpendBundle};
use clvmr::{
    reduction::Reduction, run_program, serde::node_from_bytes, Allocator, ChiaDialect, NodePtr,
    SExp,
};

use crate::MintError;

/// The consensus limit on the total CLVM cost of a block.
pub const MAX_BLOCK_COST_CLVM: u64 = 11_000_000_000;

const CREATE_COIN: u32 = 51;

/// Runs every puzzle in the bundle and sums the execution costs.
pub fn bundle_cost(bundle: &SpendBundle) -> Result<u64, MintError> {
    let mut total = 0;

    for coin_spend in &bundle.coin_spends {
        let mut allocator = Allocator::new();
        let puzzle = node_from_bytes(&mut allocator, &coin_spend.puzzle_reveal.to_vec())?;
        let solution = node_from_bytes(&mut allocator, &coin_spend.solution.to_vec())?;

        let Reduction(cost, _) = run_program(
            &mut allocator,
            &ChiaDialect::new(0),
            puzzle,
            solution,
            MAX_BLOCK_COST_CLVM,
        )?;

        total += cost;
    }

    Ok(total)
}

/// The coins created by the bundle, derived by running each puzzle and
/// collecting its `CREATE_COIN` conditions.
pub fn bundle_additions(bundle: &SpendBundle) -> Result<Vec<Coin>, MintError> {
    let mut additions = Vec::new();

    for coin_spend in &bundle.coin_spends {
        let mut allocator = Allocator::new();
        let puzzle = node_from_bytes(&mut allocator, &coin_spend.puzzle_reveal.to_vec())?;
        let solution = node_from_bytes(&mut allocator, &coin_spend.solution.to_vec())?;

        let Reduction(_, output) = run_program(
            &mut allocator,
            &ChiaDialect::new(0),
            puzzle,
            solution,
            MAX_BLOCK_COST_CLVM,
        )?;

        let parent = coin_spend.coin.coin_id();
        let mut conditions = output;

        while let SExp::Pair(condition, rest) = allocator.sexp(conditions) {
            if let Some(coin) = create_coin_output(&allocator, condition, parent) {
                additions.push(coin);
            }
            conditions = rest;
        }
    }

    Ok(additions)
}

/// The coins consumed by the bundle.
pub fn bundle_removals(bundle: &SpendBundle) -> Vec<Coin> {
    bundle
        .coin_spends
        .iter()
        .map(|coin_spend| coin_spend.coin)
        .collect()
}

/// Combines two bundles into one atomic transaction.
pub fn aggregate_bundles(first: &SpendBundle, second: &SpendBundle) -> SpendBundle {
    let mut coin_spends = first.coin_spends.clone();
    coin_spends.extend(second.coin_spends.iter().cloned());

    let mut aggregated_signature = first.aggregated_signature.clone();
    aggregated_signature += &second.aggregated_signature;

    SpendBundle::new(coin_spends, aggregated_signature)
}

fn create_coin_output(allocator: &Allocator, condition: NodePtr, parent: Bytes32) -> Option<Coin> {
    let SExp::Pair(opcode, rest) = allocator.sexp(condition) else {
        return None;
    };

    if allocator.small_number(opcode) != Some(CREATE_COIN) {
        return None;
    }

    let SExp::Pair(puzzle_hash, rest) = allocator.sexp(rest) else {
        return None;
    };

    let puzzle_hash: [u8; 32] = allocator.atom(puzzle_hash).as_ref().try_into().ok()?;

    let SExp::Pair(amount, _) = allocator.sexp(rest) else {
        return None;
    };

    let amount = u64_amount(allocator.atom(amount).as_ref())?;

    Some(Coin::new(parent, Bytes32::new(puzzle_hash), amount))
}

// Coin amounts are minimally encoded unsigned big-endian integers, with at
// most one leading zero byte to keep the sign bit clear.
fn u64_amount(atom: &[u8]) -> Option<u64> {
    let bytes = match atom {
        [0, rest @ ..] => rest,
        bytes => bytes,
    };

    if bytes.len() > 8 || bytes.first().is_some_and(|byte| byte & 0x80 != 0) {
        return None;
    }

    let mut amount = 0u64;
    for &byte in bytes {
        amount = (amount << 8) | u64::from(byte);
    }
    Some(amount)
}

#[cfg(test)]
pub(crate) mod tests {
    use chia_bls::Signature;
    use chia_protocol::{CoinSpend, Program};
    use clvm_traits::{FromClvm, ToClvm};

    use super::*;

    /// Builds a bundle where each spend uses the identity puzzle, so its
    /// solution is the condition list itself.
    pub(crate) fn test_bundle(spends: &[(Coin, Vec<(Bytes32, u64)>)]) -> SpendBundle {
        let mut allocator = Allocator::new();

        let puzzle = 1.to_clvm(&mut allocator).unwrap();
        let puzzle_reveal = Program::from_clvm(&allocator, puzzle).unwrap();

        let mut coin_spends = Vec::new();

        for (coin, outputs) in spends {
            let conditions = outputs
                .iter()
                .map(|(puzzle_hash, amount)| (CREATE_COIN, (*puzzle_hash, (*amount, ()))))
                .collect::<Vec<_>>()
                .to_clvm(&mut allocator)
                .unwrap();
            let solution = Program::from_clvm(&allocator, conditions).unwrap();

            coin_spends.push(CoinSpend::new(*coin, puzzle_reveal.clone(), solution));
        }

        SpendBundle::new(coin_spends, Signature::default())
    }

    fn coin(seed: u8, amount: u64) -> Coin {
        Coin::new(Bytes32::new([seed; 32]), Bytes32::new([seed + 1; 32]), amount)
    }

    #[test]
    fn test_additions_and_removals() -> anyhow::Result<()> {
        let funding = coin(1, 100);
        let change = Bytes32::new([2; 32]);
        let launcher = coin(9, 0);
        let nft_puzzle_hash = Bytes32::new([10; 32]);

        let bundle = test_bundle(&[
            (funding, vec![(change, 75)]),
            (launcher, vec![(nft_puzzle_hash, 1)]),
        ]);

        let removals = bundle_removals(&bundle);
        assert_eq!(removals, vec![funding, launcher]);

        let additions = bundle_additions(&bundle)?;
        assert_eq!(
            additions,
            vec![
                Coin::new(funding.coin_id(), change, 75),
                Coin::new(launcher.coin_id(), nft_puzzle_hash, 1),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_bundle_cost_is_positive() -> anyhow::Result<()> {
        let bundle = test_bundle(&[(coin(1, 100), vec![(Bytes32::new([2; 32]), 50)])]);
        assert!(bundle_cost(&bundle)? > 0);
        Ok(())
    }

    #[test]
    fn test_aggregate_bundles() -> anyhow::Result<()> {
        let first = test_bundle(&[(coin(1, 100), vec![(Bytes32::new([2; 32]), 100)])]);
        let second = test_bundle(&[(coin(3, 10), vec![(Bytes32::new([4; 32]), 10)])]);

        let combined = aggregate_bundles(&first, &second);

        assert_eq!(combined.coin_spends.len(), 2);
        assert_eq!(combined.coin_spends[0].coin, first.coin_spends[0].coin);
        assert_eq!(combined.coin_spends[1].coin, second.coin_spends[0].coin);
        assert_ne!(combined.name(), first.name());
        assert_ne!(combined.name(), second.name());

        Ok(())
    }

    #[test]
    fn test_u64_amount() {
        assert_eq!(u64_amount(&[]), Some(0));
        assert_eq!(u64_amount(&[100]), Some(100));
        assert_eq!(u64_amount(&[0, 0xff]), Some(255));
        assert_eq!(u64_amount(&[1, 0]), Some(256));
        assert_eq!(u64_amount(&[0x80]), None);
        assert_eq!(u64_amount(&[1, 2, 3, 4, 5, 6, 7, 8, 9]), None);
    }
}
