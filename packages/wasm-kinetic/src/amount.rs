//! Decimal amount strings to raw token units.

use crate::error::KineticError;

/// Convert a decimal string such as `"10.5"` into raw units of a mint with
/// `decimals` decimal places.
///
/// The integer part is required and the fractional part may not be longer
/// than `decimals`. Signs, exponents and whitespace are rejected.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<u64, KineticError> {
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (amount, None),
    };

    if whole.is_empty() {
        return Err(KineticError::invalid_amount(amount, "missing integer part"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KineticError::invalid_amount(amount, "not a decimal number"));
    }

    let fraction = fraction.unwrap_or("");
    if amount.contains('.') && fraction.is_empty() {
        return Err(KineticError::invalid_amount(amount, "missing fractional digits"));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KineticError::invalid_amount(amount, "not a decimal number"));
    }
    if fraction.len() > decimals as usize {
        return Err(KineticError::invalid_amount(
            amount,
            format!("more than {} decimal places", decimals),
        ));
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals as usize - fraction.len()));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse::<u64>()
        .map_err(|_| KineticError::invalid_amount(amount, "exceeds the maximum token amount"))
}

/// Inverse of [`parse_amount`], without trailing zeros.
pub fn format_amount(raw: u64, decimals: u8) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}
