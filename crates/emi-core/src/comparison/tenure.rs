use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::amortization::engine::{calculate_amortization, LoanInput};
use crate::error::EmiError;
use crate::types::*;
use crate::EmiResult;

/// Tenures offered by the reference loan form, in years.
pub const STANDARD_TENURES_YEARS: [u32; 6] = [5, 10, 15, 20, 25, 30];

/// Input for comparing one loan across several tenures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenureComparisonInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    /// Tenures to compare; defaults to [`STANDARD_TENURES_YEARS`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenures_years: Option<Vec<u32>>,
}

/// One tenure's headline figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenureRow {
    pub tenure_years: u32,
    pub installment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub interest_to_principal_pct: Percent,
}

/// Output of a tenure comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenureComparisonOutput {
    /// Ascending by tenure
    pub rows: Vec<TenureRow>,
    pub lowest_installment_tenure: u32,
    pub lowest_total_interest_tenure: u32,
}

/// Sorted, de-duplicated tenures to evaluate.
fn resolve_tenures(requested: Option<&[u32]>) -> EmiResult<Vec<u32>> {
    let mut tenures = match requested {
        Some(list) => list.to_vec(),
        None => STANDARD_TENURES_YEARS.to_vec(),
    };

    if tenures.is_empty() {
        return Err(EmiError::InvalidInput {
            field: "tenures_years".into(),
            reason: "At least one tenure is required".into(),
        });
    }
    if tenures.contains(&0) {
        return Err(EmiError::InvalidInput {
            field: "tenures_years".into(),
            reason: "Tenures must be at least 1 year".into(),
        });
    }

    tenures.sort_unstable();
    tenures.dedup();
    Ok(tenures)
}

/// Run the full amortization for each tenure and line the results up.
pub fn compare_tenures(
    input: &TenureComparisonInput,
) -> EmiResult<ComputationOutput<TenureComparisonOutput>> {
    let start = Instant::now();
    let tenures = resolve_tenures(input.tenures_years.as_deref())?;

    debug!(count = tenures.len(), "comparing tenures");

    let mut warnings: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(tenures.len());

    for tenure_years in tenures {
        let loan = LoanInput {
            principal: input.principal,
            annual_rate_percent: input.annual_rate_percent,
            tenure_years,
            include_yearly: false,
        };
        let out = calculate_amortization(&loan)?;
        for w in out.warnings {
            if !warnings.contains(&w) {
                warnings.push(w);
            }
        }
        let r = out.result;
        rows.push(TenureRow {
            tenure_years,
            installment: r.installment_amount,
            total_interest: r.total_interest,
            total_payment: r.total_payment,
            interest_to_principal_pct: r.interest_to_principal_pct,
        });
    }

    let lowest_installment_tenure = pick_tenure(&rows, |r| r.installment)?;
    let lowest_total_interest_tenure = pick_tenure(&rows, |r| r.total_interest)?;

    let output = TenureComparisonOutput {
        rows,
        lowest_installment_tenure,
        lowest_total_interest_tenure,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "EMI Tenure Comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Tenure of the row minimising `metric`; ties go to the shorter tenure.
fn pick_tenure(rows: &[TenureRow], metric: impl Fn(&TenureRow) -> Decimal) -> EmiResult<u32> {
    rows.iter()
        .min_by(|a, b| metric(a).cmp(&metric(b)))
        .map(|r| r.tenure_years)
        .ok_or_else(|| EmiError::InvalidInput {
            field: "tenures_years".into(),
            reason: "At least one tenure is required".into(),
        })
}
