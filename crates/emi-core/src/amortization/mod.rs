pub mod engine;
pub mod yearly;

pub use engine::{
    build_schedule, calculate_amortization, compute_installment, summarize, AmortizationResult,
    AmortizationSchedule, LoanInput, LoanSummary, PeriodRecord,
};
pub use yearly::{summarize_by_year, YearlySummary};
