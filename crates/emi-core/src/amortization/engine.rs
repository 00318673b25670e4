//! Level-payment (EMI) loan amortization.
//!
//! Covers:
//! 1. **Installment** -- the equated monthly installment from the annuity formula.
//! 2. **Schedule** -- the month-by-month principal / interest / balance recurrence.
//! 3. **Summary** -- total payment and interest-to-principal ratio.
//!
//! Everything is accumulated at full `Decimal` precision. Only the fields of
//! [`AmortizationResult`] are rounded to the cent.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::amortization::yearly::{summarize_by_year, YearlySummary};
use crate::error::EmiError;
use crate::time_value::{level_payment, periodic_rate, MONTHS_PER_YEAR};
use crate::types::*;
use crate::EmiResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Longest tenure offered by the reference loan form. Longer tenures are
/// computed but flagged.
pub const MAX_STANDARD_TENURE_YEARS: u32 = 30;

/// Hard ceiling on schedule length (1,000 years of monthly periods).
pub const MAX_TENURE_MONTHS: u32 = 12_000;

/// Final unclamped balance beyond which the schedule is reported as not
/// fully amortised.
const RESIDUAL_TOLERANCE: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Loan terms supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed, in currency units.
    pub principal: Money,
    /// Annual interest rate as a percentage (8.5 = 8.5%).
    pub annual_rate_percent: Percent,
    /// Tenure in whole years.
    pub tenure_years: u32,
    /// Also return a year-by-year rollup of the schedule.
    #[serde(default)]
    pub include_yearly: bool,
}

impl LoanInput {
    /// Tenure converted to whole months, saturating at `u32::MAX` so that
    /// oversized tenures fail validation rather than wrap.
    pub fn tenure_months(&self) -> u32 {
        self.tenure_years.saturating_mul(MONTHS_PER_YEAR)
    }
}

/// One month of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based month index.
    pub period: u32,
    pub installment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Balance after this month's installment, never below zero.
    pub remaining_balance: Money,
}

impl PeriodRecord {
    /// Copy of this record with every amount rounded to the cent.
    pub fn rounded(&self) -> PeriodRecord {
        PeriodRecord {
            period: self.period,
            installment: round_currency(self.installment),
            principal_component: round_currency(self.principal_component),
            interest_component: round_currency(self.interest_component),
            remaining_balance: round_currency(self.remaining_balance),
        }
    }
}

/// Full-precision schedule produced by [`build_schedule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub periods: Vec<PeriodRecord>,
    /// Exact sum of every `interest_component` in `periods`.
    pub total_interest: Money,
    /// Balance after the final month before clamping. Should be ~0.
    pub residual_balance: Money,
}

/// Derived totals for a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub total_payment: Money,
    pub interest_to_principal_pct: Percent,
}

/// Complete EMI calculation, rounded for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub installment_amount: Money,
    pub tenure_months: u32,
    /// Monthly decimal rate used by the recurrence (unrounded).
    pub monthly_rate: Rate,
    pub schedule: Vec<PeriodRecord>,
    pub total_interest: Money,
    pub total_payment: Money,
    pub interest_to_principal_pct: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly: Option<Vec<YearlySummary>>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Equated monthly installment for a fully amortising loan.
///
/// A zero rate takes the `principal / tenure_months` branch instead of the
/// annuity formula.
pub fn compute_installment(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> EmiResult<Money> {
    validate_loan_terms(principal, annual_rate_percent, tenure_months)?;
    let rate = periodic_rate(annual_rate_percent, MONTHS_PER_YEAR)?;
    level_payment(principal, rate, tenure_months)
}

/// Walk the balance forward month by month.
///
/// Each month's interest is charged on the previous month's closing balance,
/// so periods are produced strictly in order. A negative balance is recorded
/// as zero but the true value keeps feeding the recurrence.
pub fn build_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
    installment: Money,
) -> EmiResult<AmortizationSchedule> {
    validate_loan_terms(principal, annual_rate_percent, tenure_months)?;
    if installment <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "installment".into(),
            reason: "Installment must be positive".into(),
        });
    }

    let rate = periodic_rate(annual_rate_percent, MONTHS_PER_YEAR)?;

    let mut periods = Vec::with_capacity(tenure_months as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;

    for period in 1..=tenure_months {
        let interest_component = balance * rate;
        let principal_component = installment - interest_component;
        balance -= principal_component;

        periods.push(PeriodRecord {
            period,
            installment,
            principal_component,
            interest_component,
            remaining_balance: balance.max(Decimal::ZERO),
        });

        total_interest += interest_component;
    }

    Ok(AmortizationSchedule {
        periods,
        total_interest,
        residual_balance: balance,
    })
}

/// Total payment and interest as a percentage of principal.
pub fn summarize(principal: Money, total_interest: Money) -> EmiResult<LoanSummary> {
    if principal <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }

    Ok(LoanSummary {
        total_payment: principal + total_interest,
        interest_to_principal_pct: total_interest / principal * dec!(100),
    })
}

/// Compute the installment, schedule and totals for a loan in one call.
pub fn calculate_amortization(
    input: &LoanInput,
) -> EmiResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();

    let tenure_months = input.tenure_months();
    validate_loan_terms(input.principal, input.annual_rate_percent, tenure_months)?;

    debug!(
        principal = %input.principal,
        annual_rate_percent = %input.annual_rate_percent,
        tenure_months,
        "calculating amortization"
    );

    let mut warnings = loan_warnings(input);

    let monthly_rate = periodic_rate(input.annual_rate_percent, MONTHS_PER_YEAR)?;
    let installment =
        compute_installment(input.principal, input.annual_rate_percent, tenure_months)?;
    let schedule = build_schedule(
        input.principal,
        input.annual_rate_percent,
        tenure_months,
        installment,
    )?;
    let summary = summarize(input.principal, schedule.total_interest)?;

    if schedule.residual_balance.abs() > RESIDUAL_TOLERANCE {
        let w = format!(
            "Schedule leaves a residual balance of {} beyond decimal precision",
            round_currency(schedule.residual_balance)
        );
        warn!("{w}");
        warnings.push(w);
    }

    debug!(
        %installment,
        total_interest = %schedule.total_interest,
        residual_balance = %schedule.residual_balance,
        "amortization complete"
    );

    let yearly = input
        .include_yearly
        .then(|| summarize_by_year(&schedule.periods));

    let output = AmortizationResult {
        installment_amount: round_currency(installment),
        tenure_months,
        monthly_rate,
        schedule: schedule.periods.iter().map(PeriodRecord::rounded).collect(),
        total_interest: round_currency(schedule.total_interest),
        total_payment: round_currency(summary.total_payment),
        interest_to_principal_pct: round_ratio(summary.interest_to_principal_pct),
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment Amortization (EMI)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Caveats about otherwise valid loan terms, logged as they are raised.
pub fn loan_warnings(input: &LoanInput) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();
    if input.annual_rate_percent.is_zero() {
        warnings.push("Interest-free loan: installment is principal / months".into());
    }
    if input.tenure_years > MAX_STANDARD_TENURE_YEARS {
        warnings.push(format!(
            "Tenure of {} years exceeds the standard maximum of {MAX_STANDARD_TENURE_YEARS} years",
            input.tenure_years
        ));
    }
    for w in &warnings {
        warn!("{w}");
    }
    warnings
}

/// Checked in order: principal, tenure, rate.
pub(crate) fn validate_loan_terms(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> EmiResult<()> {
    if principal <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if tenure_months == 0 {
        return Err(EmiError::InvalidInput {
            field: "tenure".into(),
            reason: "Tenure must be at least 1 month".into(),
        });
    }
    if tenure_months > MAX_TENURE_MONTHS {
        return Err(EmiError::InvalidInput {
            field: "tenure".into(),
            reason: format!("Tenure cannot exceed {MAX_TENURE_MONTHS} months"),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    Ok(())
}

pub(crate) fn round_ratio(value: Percent) -> Percent {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
