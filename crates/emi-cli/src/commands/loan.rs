use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use emi_core::amortization::engine::{self, LoanInput};
use emi_core::comparison::tenure::{self, TenureComparisonInput};
use emi_core::time_value::{periodic_rate, MONTHS_PER_YEAR};
use emi_core::types::{round_currency, with_metadata, Money, Percent, Rate};

use crate::input;

/// Loan terms shared by the EMI and schedule commands
#[derive(Args)]
pub struct LoanTermArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in whole years
    #[arg(long)]
    pub tenure_years: Option<u32>,
}

impl LoanTermArgs {
    fn into_loan_input(self) -> Result<LoanInput, Box<dyn std::error::Error>> {
        let piped = if self.input.is_none() {
            input::stdin::read_stdin()?
        } else {
            None
        };
        self.resolve(piped)
    }

    /// Input file first, then piped JSON, then individual flags.
    fn resolve(self, piped: Option<Value>) -> Result<LoanInput, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_input_file(path);
        }
        if let Some(data) = piped {
            return Ok(serde_json::from_value(data)?);
        }

        let principal = self
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let annual_rate_percent = self.rate.ok_or("--rate is required (or provide --input)")?;
        let tenure_years = self
            .tenure_years
            .ok_or("--tenure-years is required (or provide --input)")?;

        Ok(LoanInput {
            principal,
            annual_rate_percent,
            tenure_years,
            include_yearly: false,
        })
    }
}

/// Arguments for the installment-only calculation
#[derive(Args)]
pub struct EmiArgs {
    #[command(flatten)]
    pub terms: LoanTermArgs,
}

#[derive(Serialize)]
struct InstallmentOutput {
    installment_amount: Money,
    tenure_months: u32,
    monthly_rate: Rate,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let loan = args.terms.into_loan_input()?;
    let tenure_months = loan.tenure_months();

    let installment =
        engine::compute_installment(loan.principal, loan.annual_rate_percent, tenure_months)?;
    let monthly_rate = periodic_rate(loan.annual_rate_percent, MONTHS_PER_YEAR)?;
    let warnings = engine::loan_warnings(&loan);

    let result = with_metadata(
        "Equated Monthly Installment",
        &loan,
        warnings,
        start.elapsed().as_micros() as u64,
        InstallmentOutput {
            installment_amount: round_currency(installment),
            tenure_months,
            monthly_rate,
        },
    );
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the full amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub terms: LoanTermArgs,

    /// Include a year-by-year rollup of the schedule
    #[arg(long)]
    pub yearly: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut loan = args.terms.into_loan_input()?;
    loan.include_yearly |= args.yearly;

    let result = engine::calculate_amortization(&loan)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the tenure comparison
#[derive(Args)]
pub struct CompareTenuresArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.5)
    #[arg(long)]
    pub rate: Option<Percent>,

    /// Tenures in years (comma-separated, defaults to 5,10,15,20,25,30)
    #[arg(long, value_delimiter = ',')]
    pub tenures: Option<Vec<u32>>,
}

pub fn run_compare_tenures(args: CompareTenuresArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison_input: TenureComparisonInput = if let Some(ref path) = args.input {
        input::file::read_input_file(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let principal = args
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let annual_rate_percent = args.rate.ok_or("--rate is required (or provide --input)")?;

        TenureComparisonInput {
            principal,
            annual_rate_percent,
            tenures_years: args.tenures,
        }
    };

    let result = tenure::compare_tenures(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}
