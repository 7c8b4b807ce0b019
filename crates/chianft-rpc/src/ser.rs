use chia_protocol::{Bytes32, Coin, SpendBundle};
use serde_json::Value;

pub(crate) fn hex_bytes32(value: Bytes32) -> String {
    format!("0x{}", hex::encode(value.to_bytes()))
}

pub(crate) fn coin_json(coin: &Coin) -> Value {
    serde_json::json!({
        "amount": coin.amount,
        "parent_coin_info": hex_bytes32(coin.parent_coin_info),
        "puzzle_hash": hex_bytes32(coin.puzzle_hash),
    })
}

pub(crate) fn spend_bundle_json(spend_bundle: &SpendBundle) -> Value {
    serde_json::json!({
        "coin_spends": spend_bundle.coin_spends.iter().map(|coin_spend| {
            serde_json::json!({
                "coin": coin_json(&coin_spend.coin),
                "puzzle_reveal": format!("0x{}", hex::encode(coin_spend.puzzle_reveal.to_vec())),
                "solution": format!("0x{}", hex::encode(coin_spend.solution.to_vec())),
            })
        }).collect::<Vec<Value>>(),
        "aggregated_signature": format!("0x{}", hex::encode(spend_bundle.aggregated_signature.to_bytes())),
    })
}
