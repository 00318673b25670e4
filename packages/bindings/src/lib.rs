use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use emi_core::amortization::engine::{self, LoanInput};
use emi_core::comparison::tenure::{self, TenureComparisonInput};
use emi_core::types::round_currency;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct InstallmentRequest {
    principal: Decimal,
    annual_rate_percent: Decimal,
    tenure_months: u32,
}

/// Installment only, as a 2-dp decimal string.
#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: InstallmentRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let emi = engine::compute_installment(
        input.principal,
        input.annual_rate_percent,
        input.tenure_months,
    )
    .map_err(to_napi_error)?;
    Ok(round_currency(emi).to_string())
}

#[napi]
pub fn calculate_amortization(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::calculate_amortization(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct SummaryRequest {
    principal: Decimal,
    total_interest: Decimal,
}

#[napi]
pub fn summarize_loan(input_json: String) -> NapiResult<String> {
    let input: SummaryRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        engine::summarize(input.principal, input.total_interest).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_tenures(input_json: String) -> NapiResult<String> {
    let input: TenureComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tenure::compare_tenures(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
