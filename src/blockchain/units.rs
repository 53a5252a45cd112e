// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ether unit conversion between decimal strings and wei.

use alloy::primitives::U256;

/// Decimals of the native token (ETH on Arbitrum).
pub const ETHER_DECIMALS: u8 = 18;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("Too many decimal places (max {0})")]
    TooPrecise(u8),

    #[error("Amount overflow")]
    Overflow,
}

/// Parse a human-readable amount (e.g. `"0.0005"`) into the smallest unit.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, UnitsError> {
    let amount = amount.trim();
    let parts: Vec<&str> = amount.split('.').collect();

    if parts.len() > 2 || parts.iter().all(|p| p.is_empty()) {
        return Err(UnitsError::InvalidFormat(amount.to_string()));
    }

    let whole = if parts[0].is_empty() {
        U256::ZERO
    } else {
        parse_digits(parts[0])?
    };

    let fraction = match parts.get(1) {
        Some(dec_str) if !dec_str.is_empty() => {
            if dec_str.len() > decimals as usize {
                return Err(UnitsError::TooPrecise(decimals));
            }
            let padded = format!("{:0<width$}", dec_str, width = decimals as usize);
            parse_digits(&padded)?
        }
        _ => U256::ZERO,
    };

    let multiplier = U256::from(10u64).pow(U256::from(decimals));
    whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction))
        .ok_or(UnitsError::Overflow)
}

/// Parse an ether amount into wei.
pub fn parse_ether(amount: &str) -> Result<U256, UnitsError> {
    parse_amount(amount, ETHER_DECIMALS)
}

/// Format an amount in the smallest unit as a decimal string.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }
}

/// Format wei as ether.
pub fn format_ether(wei: U256) -> String {
    format_amount(wei, ETHER_DECIMALS)
}

fn parse_digits(digits: &str) -> Result<U256, UnitsError> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UnitsError::InvalidFormat(digits.to_string()));
    }
    U256::from_str_radix(digits, 10).map_err(|_| UnitsError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ether_default_mint_price() {
        assert_eq!(
            parse_ether("0.0005").unwrap(),
            U256::from(500_000_000_000_000u64)
        );
    }

    #[test]
    fn test_parse_amount_whole_and_fraction() {
        assert_eq!(
            parse_amount("1", 18).unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
        assert_eq!(parse_amount("1.5", 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(parse_amount(".25", 2).unwrap(), U256::from(25u64));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(matches!(parse_ether("abc"), Err(UnitsError::InvalidFormat(_))));
        assert!(matches!(parse_ether("1.2.3"), Err(UnitsError::InvalidFormat(_))));
        assert!(matches!(parse_ether("-1"), Err(UnitsError::InvalidFormat(_))));
        assert!(matches!(parse_ether("."), Err(UnitsError::InvalidFormat(_))));
        assert_eq!(parse_amount("0.001", 2), Err(UnitsError::TooPrecise(2)));
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(U256::from(1_000_000_000_000_000_000u64)), "1");
        assert_eq!(format_ether(U256::from(1_500_000_000_000_000_000u64)), "1.5");
        assert_eq!(format_ether(U256::from(500_000_000_000_000u64)), "0.0005");
    }
}
