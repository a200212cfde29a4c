use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Destination chains offered by the transfer and bridge panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedChain {
    Ethereum,
    Optimism,
    Polygon,
    Arbitrum,
    Avalanche,
    Base,
    Scroll,
}

impl SupportedChain {
    pub const ALL: [SupportedChain; 7] = [
        SupportedChain::Ethereum,
        SupportedChain::Optimism,
        SupportedChain::Polygon,
        SupportedChain::Arbitrum,
        SupportedChain::Avalanche,
        SupportedChain::Base,
        SupportedChain::Scroll,
    ];

    pub fn id(self) -> u64 {
        match self {
            SupportedChain::Ethereum => 1,
            SupportedChain::Optimism => 10,
            SupportedChain::Polygon => 137,
            SupportedChain::Arbitrum => 42161,
            SupportedChain::Avalanche => 43114,
            SupportedChain::Base => 8453,
            SupportedChain::Scroll => 534352,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SupportedChain::Ethereum => "Ethereum",
            SupportedChain::Optimism => "Optimism",
            SupportedChain::Polygon => "Polygon",
            SupportedChain::Arbitrum => "Arbitrum",
            SupportedChain::Avalanche => "Avalanche",
            SupportedChain::Base => "Base",
            SupportedChain::Scroll => "Scroll",
        }
    }

    pub fn from_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == chain_id)
    }
}

/// Display name for an arbitrary chain id, "Unknown" outside the supported set.
pub fn chain_display_name(chain_id: Option<u64>) -> &'static str {
    chain_id
        .and_then(SupportedChain::from_id)
        .map(SupportedChain::name)
        .unwrap_or("Unknown")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "USDC")]
    Usdc,
    #[serde(rename = "USDT")]
    Usdt,
}

impl Token {
    pub const ALL: [Token; 3] = [Token::Eth, Token::Usdc, Token::Usdt];

    pub fn symbol(self) -> &'static str {
        match self {
            Token::Eth => "ETH",
            Token::Usdc => "USDC",
            Token::Usdt => "USDT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo: String,
}

/// One chain's share of a unified token balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBreakdown {
    pub balance: String,
    pub balance_in_fiat: f64,
    pub chain: ChainInfo,
    pub contract_address: String,
    pub decimals: u8,
    #[serde(default)]
    pub universe: u64,
}

impl TokenBreakdown {
    pub fn is_zero(&self) -> bool {
        display_number(&self.balance) == 0.0
    }
}

/// A token aggregated across every chain the SDK tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAsset {
    pub symbol: String,
    pub balance: String,
    pub balance_in_fiat: f64,
    #[serde(default)]
    pub breakdown: Vec<TokenBreakdown>,
    #[serde(default)]
    pub decimals: u8,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub abstracted: bool,
}

impl BalanceAsset {
    /// Per-chain rows worth showing; zero balances are hidden.
    pub fn non_zero_breakdown(&self) -> impl Iterator<Item = &TokenBreakdown> {
        self.breakdown.iter().filter(|b| !b.is_zero())
    }
}

/// Sum of fiat values across a balance snapshot. Non-finite entries count as zero.
pub fn unified_total_fiat(assets: &[BalanceAsset]) -> f64 {
    assets
        .iter()
        .map(|a| a.balance_in_fiat)
        .filter(|v| v.is_finite())
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferParams {
    pub token: Token,
    pub amount: String,
    pub chain_id: u64,
    pub recipient: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeParams {
    pub token: Token,
    pub amount: String,
    pub chain_id: u64,
}

/// SDK results are shown as-is.
pub type SimulationResult = Value;
pub type ExecutionResult = Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a decimal number")]
    NotDecimal(String),
    #[error("amount must be greater than zero")]
    Zero,
}

/// Validates a user-entered amount and returns it as trimmed decimal text.
/// The text is never converted to a float so no precision is lost.
pub fn parse_decimal_amount(raw: &str) -> Result<String, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (trimmed, None),
    };
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    let valid = digits_only(int_part)
        && frac_part.map_or(true, digits_only)
        && !(int_part.is_empty() && frac_part.map_or(true, str::is_empty));
    if !valid {
        return Err(AmountError::NotDecimal(trimmed.to_owned()));
    }
    if trimmed.chars().all(|c| c == '0' || c == '.') {
        return Err(AmountError::Zero);
    }
    Ok(trimmed.to_owned())
}

/// `0x1234...abcd` form used wherever an account is displayed.
pub fn truncate_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_owned();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Lossy numeric view of SDK decimal text, for display only.
pub fn display_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

/// Formats a number with thousands separators and at most `max_fraction_digits`
/// decimals, dropping trailing zeros.
pub fn format_grouped(value: f64, max_fraction_digits: usize) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let fixed = format!("{:.*}", max_fraction_digits, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_owned(), f.trim_end_matches('0').to_owned()),
        None => (fixed.clone(), String::new()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && (int_part.chars().any(|c| c != '0') || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

pub fn format_fiat(value: f64) -> String {
    format!("${}", format_grouped(value, 2))
}

pub fn format_token_amount(raw: &str) -> String {
    format_grouped(display_number(raw), 6)
}
