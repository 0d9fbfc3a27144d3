// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finora::analytics::{BudgetStatus, Remaining, Utilization, budget_overview};
use finora::config::seed_categories;
use finora::format::{describe_remaining, describe_usage};
use finora::models::{Budget, PaymentSource, Transaction, TxKind, YearMonth};
use finora::settings::{Currency, Settings};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn usd() -> Settings {
    Settings {
        currency: Currency::Usd,
        ..Default::default()
    }
}

#[test]
fn thresholds() {
    let cases = [
        ("79", BudgetStatus::Safe),
        ("80", BudgetStatus::Warning),
        ("99.99", BudgetStatus::Warning),
        ("100", BudgetStatus::OverBudget),
        ("150", BudgetStatus::OverBudget),
    ];
    for (spent, want) in cases {
        let u = Utilization::compute(dec("100"), dec(spent));
        assert_eq!(u.status, want, "spent {}", spent);
    }
}

#[test]
fn remaining_wording() {
    let s = usd();
    let over = Utilization::compute(dec("100"), dec("150"));
    assert_eq!(over.remaining_state(), Remaining::Over(dec("50")));
    assert_eq!(describe_remaining(&over, &s), "Over by $50.00");
    assert_eq!(over.bar_percentage(), Decimal::ONE_HUNDRED);
    assert_eq!(describe_usage(&over), "150% used");

    let exact = Utilization::compute(dec("100"), dec("100"));
    assert_eq!(describe_remaining(&exact, &s), "Limit reached");

    let left = Utilization::compute(dec("100"), dec("79"));
    assert_eq!(describe_remaining(&left, &s), "$21.00 left");
    assert_eq!(describe_usage(&left), "79% used");
}

#[test]
fn zero_limit_does_not_divide() {
    assert_eq!(Utilization::compute(Decimal::ZERO, Decimal::ZERO).percentage, Decimal::ZERO);
    let u = Utilization::compute(Decimal::ZERO, dec("5"));
    assert_eq!(u.status, BudgetStatus::OverBudget);
}

#[test]
fn tiny_limit_with_huge_spend_is_over_budget() {
    let u = Utilization::compute(dec("0.0000000000000000000000000001"), Decimal::MAX);
    assert_eq!(u.percentage, Decimal::MAX);
    assert_eq!(u.status, BudgetStatus::OverBudget);
    assert!(u.remaining < Decimal::ZERO);
    assert_eq!(u.bar_percentage(), Decimal::ONE_HUNDRED);
}

#[test]
fn overview_totals_saturate() {
    let jan = YearMonth::new(2025, 1).unwrap();
    let budget = |id: &str, cat: &str| Budget {
        budget_id: id.into(),
        category_id: cat.into(),
        month_year: jan,
        limit_amount: Decimal::MAX,
    };
    let budgets = vec![budget("bgt-1", "cat-004"), budget("bgt-2", "cat-005")];
    let o = budget_overview(&budgets, &[], &seed_categories(), jan);
    assert_eq!(o.total_limit, Decimal::MAX);
    assert_eq!(o.total_remaining, Decimal::MAX);
}

#[test]
fn overview_sums_only_that_month_and_category() {
    let jan = YearMonth::new(2025, 1).unwrap();
    let budgets = vec![
        Budget {
            budget_id: "bgt-1".into(),
            category_id: "cat-004".into(),
            month_year: jan,
            limit_amount: dec("400"),
        },
        Budget {
            budget_id: "bgt-2".into(),
            category_id: "cat-005".into(),
            month_year: jan,
            limit_amount: dec("100"),
        },
        Budget {
            budget_id: "bgt-3".into(),
            category_id: "cat-004".into(),
            month_year: jan.previous(),
            limit_amount: dec("999"),
        },
    ];
    let t = |date: &str, amount: &str, cat: &str, kind: TxKind| Transaction {
        transaction_id: format!("t-{}-{}", date, cat),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount: dec(amount),
        kind,
        category_id: cat.into(),
        description: "x".into(),
        payment_source: PaymentSource::Cash,
        is_recurring: false,
    };
    let txns = vec![
        t("2025-01-03", "330", "cat-004", TxKind::Expense),
        t("2025-01-04", "120", "cat-005", TxKind::Expense),
        t("2024-12-30", "70", "cat-004", TxKind::Expense),
        t("2025-01-05", "2000", "cat-001", TxKind::Income),
    ];
    let o = budget_overview(&budgets, &txns, &seed_categories(), jan);
    assert_eq!(o.lines.len(), 2);
    assert_eq!(o.lines[0].category_name, "Groceries");
    assert_eq!(o.lines[0].utilization.spent, dec("330"));
    assert_eq!(o.lines[0].utilization.status, BudgetStatus::Warning);
    assert_eq!(o.lines[1].utilization.status, BudgetStatus::OverBudget);
    assert_eq!(o.total_limit, dec("500"));
    assert_eq!(o.total_spent, dec("450"));
    assert_eq!(o.total_remaining, dec("50"));
}
