//! Lakh / crore presentation of amounts for table output.
//!
//! Purely cosmetic: values arrive as the decimal strings the core emits and
//! leave as display strings. Nothing here feeds back into a calculation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::NumberStyle;

const LAKH: Decimal = dec!(100000);
const CRORE: Decimal = dec!(10000000);

/// Render a table cell in the requested style. Non-numeric text passes through.
pub fn style_cell(text: &str, style: NumberStyle) -> String {
    match style {
        NumberStyle::Plain => text.to_string(),
        NumberStyle::Indian => match Decimal::from_str(text) {
            Ok(value) => indian_grouping(text, value),
            Err(_) => text.to_string(),
        },
    }
}

/// Group the integer digits as 12,34,567 while keeping the original fraction.
fn indian_grouping(text: &str, value: Decimal) -> String {
    let unsigned = text.trim_start_matches('-');
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    // Plain integer counts like periods and months stay ungrouped.
    if frac_part.is_none() && value.abs() < dec!(1000) {
        return text.to_string();
    }

    let grouped = group_indian(int_part);
    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last_three) = digits.split_at(digits.len() - 3);

    let mut pairs: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        pairs.push(&head[start..end]);
        end = start;
    }
    pairs.reverse();

    format!("{},{}", pairs.join(","), last_three)
}

/// Short amount label: `1.25 Cr`, `10.00 L`, or the grouped amount below a lakh.
pub fn abbreviate_amount(amount: Decimal) -> String {
    let abs = amount.abs();
    if abs >= CRORE {
        format!("{} Cr", two_places(amount / CRORE))
    } else if abs >= LAKH {
        format!("{} L", two_places(amount / LAKH))
    } else {
        let whole = amount.round_dp(0);
        match whole.to_i64() {
            Some(n) => indian_grouping(&n.to_string(), whole),
            None => whole.to_string(),
        }
    }
}

fn two_places(value: Decimal) -> Decimal {
    let mut v = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    v.rescale(2);
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian("999"), "999");
        assert_eq!(group_indian("1000"), "1,000");
        assert_eq!(group_indian("100000"), "1,00,000");
        assert_eq!(group_indian("1234567"), "12,34,567");
        assert_eq!(group_indian("10000000"), "1,00,00,000");
    }

    #[test]
    fn test_style_cell_indian() {
        assert_eq!(style_cell("2007456.17", NumberStyle::Indian), "20,07,456.17");
        assert_eq!(style_cell("-1234.50", NumberStyle::Indian), "-1,234.50");
        assert_eq!(style_cell("240", NumberStyle::Indian), "240");
        assert_eq!(style_cell("n/a", NumberStyle::Indian), "n/a");
    }

    #[test]
    fn test_style_cell_plain_untouched() {
        assert_eq!(style_cell("2007456.17", NumberStyle::Plain), "2007456.17");
    }

    #[test]
    fn test_abbreviate_amount() {
        assert_eq!(abbreviate_amount(dec!(12500000)), "1.25 Cr");
        assert_eq!(abbreviate_amount(dec!(1000000)), "10.00 L");
        assert_eq!(abbreviate_amount(dec!(100000)), "1.00 L");
        assert_eq!(abbreviate_amount(dec!(99999)), "99,999");
        assert_eq!(abbreviate_amount(dec!(500)), "500");
    }
}
