//! In-process ledger behind the deterministic SDK adapter.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::{keccak256, B256, U256};
use serde::Serialize;
use serde_json::{json, Value};

use nexus_console_core::{BalanceAsset, ChainInfo, PortError, SupportedChain, Token, TokenBreakdown};

pub(crate) const NOTE: &str = "deterministic fallback adapter";

const SEED: &[(Token, f64, &[(SupportedChain, &str)])] = &[
    (
        Token::Eth,
        2_450.0,
        &[
            (SupportedChain::Ethereum, "0.5"),
            (SupportedChain::Base, "0.25"),
            (SupportedChain::Arbitrum, "0.1"),
            (SupportedChain::Scroll, "0"),
        ],
    ),
    (
        Token::Usdc,
        1.0,
        &[
            (SupportedChain::Ethereum, "120.5"),
            (SupportedChain::Optimism, "40"),
            (SupportedChain::Polygon, "0"),
        ],
    ),
    (Token::Usdt, 1.0, &[(SupportedChain::Arbitrum, "75.25")]),
];

fn decimals(token: Token) -> u8 {
    match token {
        Token::Eth => 18,
        Token::Usdc | Token::Usdt => 6,
    }
}

fn units(raw: &str, decimals: u8) -> Result<U256, PortError> {
    parse_units(raw, decimals)
        .map(|v| v.get_absolute())
        .map_err(|e| PortError::Validation(format!("invalid amount {raw}: {e}")))
}

fn display(value: U256, decimals: u8) -> Result<String, PortError> {
    let text = format_units(value, decimals)
        .map_err(|e| PortError::Validation(format!("unformattable amount: {e}")))?;
    let trimmed = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    Ok(if trimmed.is_empty() { "0".to_owned() } else { trimmed.to_owned() })
}

fn price(asset: &BalanceAsset) -> f64 {
    let balance: f64 = asset.balance.parse().unwrap_or(0.0);
    if balance > 0.0 {
        asset.balance_in_fiat / balance
    } else {
        0.0
    }
}

pub(crate) fn seed_balances() -> Vec<BalanceAsset> {
    SEED.iter()
        .map(|(token, usd, chains)| {
            let decimals = decimals(*token);
            let breakdown: Vec<TokenBreakdown> = chains
                .iter()
                .map(|(chain, balance)| TokenBreakdown {
                    balance: (*balance).to_owned(),
                    balance_in_fiat: balance.parse::<f64>().unwrap_or(0.0) * usd,
                    chain: ChainInfo {
                        id: chain.id(),
                        name: chain.name().to_owned(),
                        logo: String::new(),
                    },
                    contract_address: String::new(),
                    decimals,
                    universe: 0,
                })
                .collect();
            let total: U256 = breakdown
                .iter()
                .filter_map(|b| units(&b.balance, decimals).ok())
                .fold(U256::ZERO, |acc, v| acc + v);
            let balance = display(total, decimals).unwrap_or_else(|_| "0".to_owned());
            BalanceAsset {
                balance_in_fiat: balance.parse::<f64>().unwrap_or(0.0) * usd,
                symbol: token.symbol().to_owned(),
                balance,
                breakdown,
                decimals,
                icon: String::new(),
                abstracted: true,
            }
        })
        .collect()
}

fn asset_mut(assets: &mut [BalanceAsset], token: Token) -> Result<&mut BalanceAsset, PortError> {
    assets
        .iter_mut()
        .find(|a| a.symbol == token.symbol())
        .ok_or_else(|| PortError::Validation(format!("no {} balance", token.symbol())))
}

/// Fails when the unified balance of `token` cannot cover `amount`.
pub(crate) fn check_funds(
    assets: &[BalanceAsset],
    token: Token,
    amount: &str,
) -> Result<(), PortError> {
    let asset = assets
        .iter()
        .find(|a| a.symbol == token.symbol())
        .ok_or_else(|| PortError::Validation(format!("no {} balance", token.symbol())))?;
    let wanted = units(amount, asset.decimals)?;
    if wanted.is_zero() {
        return Err(PortError::Validation("amount must be greater than zero".to_owned()));
    }
    let available = units(&asset.balance, asset.decimals)?;
    if wanted > available {
        return Err(PortError::Rejected(format!(
            "Insufficient balance: requested {amount} {}, available {}",
            asset.symbol, asset.balance
        )));
    }
    Ok(())
}

/// Takes `amount` out of the per-chain balances in listing order and
/// recomputes the unified totals.
pub(crate) fn debit(
    assets: &mut [BalanceAsset],
    token: Token,
    amount: &str,
) -> Result<(), PortError> {
    check_funds(assets, token, amount)?;
    let asset = asset_mut(assets, token)?;
    let price = price(asset);
    let decimals = asset.decimals;
    let mut remaining = units(amount, decimals)?;

    for row in asset.breakdown.iter_mut() {
        if remaining.is_zero() {
            break;
        }
        let held = units(&row.balance, decimals)?;
        let taken = held.min(remaining);
        remaining -= taken;
        row.balance = display(held - taken, decimals)?;
        row.balance_in_fiat = row.balance.parse::<f64>().unwrap_or(0.0) * price;
    }

    let mut total = U256::ZERO;
    for row in &asset.breakdown {
        total += units(&row.balance, decimals)?;
    }
    asset.balance = display(total, decimals)?;
    asset.balance_in_fiat = asset.balance.parse::<f64>().unwrap_or(0.0) * price;
    Ok(())
}

/// Chains the bridge would pull `token` from: every non-zero balance outside
/// the destination.
pub(crate) fn bridge_sources(assets: &[BalanceAsset], token: Token, destination: u64) -> Vec<Value> {
    assets
        .iter()
        .filter(|a| a.symbol == token.symbol())
        .flat_map(|a| a.non_zero_breakdown())
        .filter(|b| b.chain.id != destination)
        .map(|b| {
            json!({
                "chainID": b.chain.id,
                "chainName": b.chain.name,
                "token": token.symbol(),
                "balance": b.balance,
                "allowance": { "current": "0", "minimum": b.balance },
            })
        })
        .collect()
}

pub(crate) fn receipt_hash<T: Serialize>(
    kind: &str,
    params: &T,
    nonce: u64,
) -> Result<B256, PortError> {
    let mut seed = kind.as_bytes().to_vec();
    seed.extend_from_slice(
        &serde_json::to_vec(params)
            .map_err(|e| PortError::Validation(format!("params serialization failed: {e}")))?,
    );
    seed.extend_from_slice(&nonce.to_be_bytes());
    Ok(keccak256(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(assets: &[BalanceAsset]) -> &BalanceAsset {
        assets.iter().find(|a| a.symbol == "ETH").unwrap()
    }

    #[test]
    fn seed_totals_match_breakdown() {
        let assets = seed_balances();
        assert_eq!(eth(&assets).balance, "0.85");
        assert_eq!(eth(&assets).non_zero_breakdown().count(), 3);
    }

    #[test]
    fn debit_drains_chains_in_order() {
        let mut assets = seed_balances();
        debit(&mut assets, Token::Eth, "0.6").unwrap();
        let eth = eth(&assets);
        assert_eq!(eth.balance, "0.25");
        assert_eq!(eth.breakdown[0].balance, "0");
        assert_eq!(eth.breakdown[1].balance, "0.15");
        assert!((eth.balance_in_fiat - 0.25 * 2_450.0).abs() < 1e-6);
    }

    #[test]
    fn overdraft_is_rejected_without_change() {
        let mut assets = seed_balances();
        let err = debit(&mut assets, Token::Usdt, "100").unwrap_err();
        assert!(err.to_string().starts_with("Insufficient balance"));
        assert_eq!(assets[2].balance, "75.25");
    }

    #[test]
    fn sources_exclude_destination_and_empty_chains() {
        let assets = seed_balances();
        let sources = bridge_sources(&assets, Token::Eth, SupportedChain::Base.id());
        let chains: Vec<u64> = sources.iter().map(|s| s["chainID"].as_u64().unwrap()).collect();
        assert_eq!(chains, vec![1, 42161]);
    }
}
