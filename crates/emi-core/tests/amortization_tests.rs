use emi_core::amortization::{
    build_schedule, calculate_amortization, compute_installment, summarize, LoanInput,
};
use emi_core::EmiError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{}: expected ~{}, got {} (diff = {})",
        msg,
        expected,
        actual,
        diff
    );
}

fn loan(principal: Decimal, rate: Decimal, years: u32) -> LoanInput {
    LoanInput {
        principal,
        annual_rate_percent: rate,
        tenure_years: years,
        include_yearly: false,
    }
}

/// Loans spanning the tenure set, low and high rates, and odd principals.
fn sample_loans() -> Vec<(Decimal, Decimal, u32)> {
    vec![
        (dec!(1000000), dec!(8), 20),
        (dec!(500000), dec!(0), 10),
        (dec!(100000), dec!(30), 5),
        (dec!(2500000), dec!(8.5), 30),
        (dec!(75000.55), dec!(11.75), 15),
        (dec!(1), dec!(0.1), 25),
        (dec!(999.99), dec!(19.99), 1),
    ]
}

// ===========================================================================
// Concrete scenarios
// ===========================================================================

#[test]
fn test_scenario_home_loan_8pct_20y() {
    let out = calculate_amortization(&loan(dec!(1000000), dec!(8), 20)).unwrap();
    let r = &out.result;
    assert_eq!(r.installment_amount, dec!(8364.40));
    // Exact annuity result; ~1,007,455.87 when totals are built from a
    // pre-rounded installment.
    assert_close(r.total_interest, dec!(1007456.17), dec!(0.01), "total interest");
    assert_close(r.total_payment, dec!(2007456.17), dec!(0.01), "total payment");
    assert_close(r.total_interest, dec!(1007455.87), dec!(1), "within one unit");
}

#[test]
fn test_scenario_interest_free_10y() {
    let out = calculate_amortization(&loan(dec!(500000), dec!(0), 10)).unwrap();
    let r = &out.result;
    assert_eq!(r.installment_amount, dec!(4166.67));
    assert_eq!(r.total_interest, Decimal::ZERO);
    assert_eq!(r.total_payment, dec!(500000));
    assert_eq!(r.interest_to_principal_pct, Decimal::ZERO);
}

#[test]
fn test_scenario_zero_principal_rejected() {
    let err = calculate_amortization(&loan(Decimal::ZERO, dec!(8), 20)).unwrap_err();
    match err {
        EmiError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
        other => panic!("expected InvalidInput, got {other}"),
    }
    assert!(compute_installment(Decimal::ZERO, dec!(8), 240).is_err());
    assert!(build_schedule(Decimal::ZERO, dec!(8), 240, dec!(100)).is_err());
}

#[test]
fn test_boundary_high_rate_short_tenure() {
    let emi = compute_installment(dec!(100000), dec!(30), 60).unwrap();
    let sched = build_schedule(dec!(100000), dec!(30), 60, emi).unwrap();
    assert_eq!(sched.periods.len(), 60);

    let mut previous = dec!(100000);
    for p in &sched.periods {
        assert!(
            p.remaining_balance < previous,
            "balance did not fall at period {}",
            p.period
        );
        previous = p.remaining_balance;
    }
    assert_close(
        sched.periods[59].remaining_balance,
        Decimal::ZERO,
        dec!(0.01),
        "final balance",
    );
}

#[test]
fn test_invalid_tenure_and_rate_rejected() {
    assert!(calculate_amortization(&loan(dec!(1000), dec!(8), 0)).is_err());
    assert!(calculate_amortization(&loan(dec!(1000), dec!(-1), 5)).is_err());
    assert!(summarize(dec!(-5), dec!(1)).is_err());
}

// ===========================================================================
// Properties over a spread of loans
// ===========================================================================

#[test]
fn test_schedule_length_is_months() {
    for (p, r, y) in sample_loans() {
        let out = calculate_amortization(&loan(p, r, y)).unwrap();
        assert_eq!(out.result.schedule.len(), (y * 12) as usize);
        for (i, rec) in out.result.schedule.iter().enumerate() {
            assert_eq!(rec.period, i as u32 + 1);
        }
    }
}

#[test]
fn test_principal_components_repay_principal() {
    for (p, r, y) in sample_loans() {
        let n = y * 12;
        let emi = compute_installment(p, r, n).unwrap();
        let sched = build_schedule(p, r, n, emi).unwrap();
        let repaid: Decimal = sched.periods.iter().map(|x| x.principal_component).sum();
        assert_close(repaid, p, dec!(1), "principal repaid");
        assert_close(sched.residual_balance, Decimal::ZERO, dec!(0.01), "residual");
    }
}

#[test]
fn test_interest_components_sum_to_total_exactly() {
    for (p, r, y) in sample_loans() {
        let n = y * 12;
        let emi = compute_installment(p, r, n).unwrap();
        let sched = build_schedule(p, r, n, emi).unwrap();
        let sum: Decimal = sched.periods.iter().map(|x| x.interest_component).sum();
        assert_eq!(sum, sched.total_interest);
    }
}

#[test]
fn test_total_payment_is_principal_plus_interest() {
    for (p, r, y) in sample_loans() {
        let out = calculate_amortization(&loan(p, r, y)).unwrap();
        let res = &out.result;
        assert_close(
            res.total_payment,
            p + res.total_interest,
            dec!(0.01),
            "total payment",
        );
    }
}

#[test]
fn test_installment_is_level() {
    for (p, r, y) in sample_loans() {
        let out = calculate_amortization(&loan(p, r, y)).unwrap();
        let emi = out.result.installment_amount;
        assert!(out.result.schedule.iter().all(|rec| rec.installment == emi));
    }
}

#[test]
fn test_balances_never_negative() {
    for (p, r, y) in sample_loans() {
        let out = calculate_amortization(&loan(p, r, y)).unwrap();
        assert!(out
            .result
            .schedule
            .iter()
            .all(|rec| rec.remaining_balance >= Decimal::ZERO));
    }
}

#[test]
fn test_zero_rate_has_no_interest() {
    let emi = compute_installment(dec!(360000), Decimal::ZERO, 360).unwrap();
    assert_eq!(emi, dec!(1000));
    let sched = build_schedule(dec!(360000), Decimal::ZERO, 360, emi).unwrap();
    assert!(sched.periods.iter().all(|p| p.interest_component.is_zero()));
    assert_eq!(sched.total_interest, Decimal::ZERO);
    assert_eq!(sched.residual_balance, Decimal::ZERO);
}

// ===========================================================================
// Statelessness
// ===========================================================================

#[test]
fn test_repeated_calls_are_identical() {
    let input = loan(dec!(750000), dec!(9.1), 15);
    let a = calculate_amortization(&input).unwrap().result;
    let b = calculate_amortization(&input).unwrap().result;
    assert_eq!(a.schedule, b.schedule);
    assert_eq!(a.total_interest, b.total_interest);
}

#[test]
fn test_parallel_invocations_agree() {
    let expected = calculate_amortization(&loan(dec!(1000000), dec!(8), 20))
        .unwrap()
        .result;

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    calculate_amortization(&loan(dec!(1000000), dec!(8), 20))
                        .unwrap()
                        .result
                })
            })
            .collect();
        for h in handles {
            let got = h.join().unwrap();
            assert_eq!(got.schedule, expected.schedule);
            assert_eq!(got.total_payment, expected.total_payment);
        }
    });
}

#[test]
fn test_loan_input_from_json() {
    let input: LoanInput = serde_json::from_str(
        r#"{ "principal": "1000000", "annual_rate_percent": 8.5, "tenure_years": 20 }"#,
    )
    .unwrap();
    assert_eq!(input.annual_rate_percent, dec!(8.5));
    assert!(!input.include_yearly);

    let out = calculate_amortization(&input).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["tenure_months"], 240);
    assert!(json["result"].get("yearly").is_none());
    assert_eq!(json["result"]["schedule"][0]["period"], 1);
}
