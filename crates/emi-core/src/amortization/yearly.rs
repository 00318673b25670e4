use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::engine::PeriodRecord;
use crate::time_value::MONTHS_PER_YEAR;
use crate::types::{round_currency, Money};

/// Twelve months of a schedule rolled into one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: u32,
    /// Months that fell in this year (12 except possibly the last).
    pub months: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub total_paid: Money,
    pub closing_balance: Money,
}

/// Roll a full-precision monthly schedule up into loan years.
///
/// Sums are taken before rounding, so pass the unrounded records.
pub fn summarize_by_year(periods: &[PeriodRecord]) -> Vec<YearlySummary> {
    periods
        .chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .filter_map(|(idx, months)| {
            let last = months.last()?;
            let principal_paid: Decimal = months.iter().map(|p| p.principal_component).sum();
            let interest_paid: Decimal = months.iter().map(|p| p.interest_component).sum();
            Some(YearlySummary {
                year: idx as u32 + 1,
                months: months.len() as u32,
                principal_paid: round_currency(principal_paid),
                interest_paid: round_currency(interest_paid),
                total_paid: round_currency(principal_paid + interest_paid),
                closing_balance: round_currency(last.remaining_balance),
            })
        })
        .collect()
}
