use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use tracing::trace;

use crate::error::EmiError;
use crate::types::{Money, Percent, Rate};
use crate::EmiResult;

/// Periods per year for monthly installments.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Convert an annual percentage rate into a per-period decimal rate.
///
/// `8.5` with 12 periods per year gives `8.5 / 1200`.
pub fn periodic_rate(annual_rate_percent: Percent, periods_per_year: u32) -> EmiResult<Rate> {
    if periods_per_year == 0 {
        return Err(EmiError::InvalidInput {
            field: "periods_per_year".into(),
            reason: "Periods per year must be > 0".into(),
        });
    }
    Ok(annual_rate_percent / (Decimal::from(periods_per_year) * dec!(100)))
}

/// Compound growth factor `(1 + r)^n`.
pub fn growth_factor(rate: Rate, periods: u32) -> EmiResult<Decimal> {
    checked_growth_factor(rate, periods)?.ok_or_else(|| {
        EmiError::FinancialImpossibility(format!(
            "growth factor (1 + {rate})^{periods} exceeds decimal range"
        ))
    })
}

/// `(1 + r)^n`, or `None` when it is beyond the decimal range.
fn checked_growth_factor(rate: Rate, periods: u32) -> EmiResult<Option<Decimal>> {
    if rate <= dec!(-1) {
        return Err(EmiError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }

    let factor = (Decimal::ONE + rate).checked_powu(u64::from(periods));
    trace!(%rate, periods, factor = ?factor, "growth factor");
    Ok(factor)
}

/// Level payment that fully amortises `principal` over `periods` at `rate`.
///
/// `P × r × (1+r)^n / ((1+r)^n − 1)`, or `P / n` when the rate is zero.
pub fn level_payment(principal: Money, rate: Rate, periods: u32) -> EmiResult<Money> {
    if periods == 0 {
        return Err(EmiError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    // factor / (factor - 1) stays near 1 for long tenures, so divide first.
    let ratio = match checked_growth_factor(rate, periods)? {
        Some(factor) => {
            let annuity_factor = factor - Decimal::ONE;
            if annuity_factor.is_zero() {
                return Err(EmiError::DivisionByZero {
                    context: "level payment annuity factor".into(),
                });
            }
            factor / annuity_factor
        }
        // Past the decimal range f / (f - 1) is 1 to all 28 digits.
        None => Decimal::ONE,
    };

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(ratio))
        .ok_or_else(|| {
            EmiError::FinancialImpossibility("level payment exceeds decimal range".into())
        })
}
