// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finora::analytics::{
    Direction, Insight, Outcome, Period, TransactionFilter, activity_stats, category_breakdown,
    category_comparison, insights, monthly_trend, paginate, period_change, period_transactions,
    resolve_breakdown, savings_rate, summarize, top_spending_drivers,
};
use finora::config::seed_categories;
use finora::models::{Budget, PaymentSource, Transaction, TxKind, YearMonth};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(id: &str, date: &str, amount: &str, kind: TxKind, cat: &str, desc: &str) -> Transaction {
    Transaction {
        transaction_id: id.into(),
        date: d(date),
        amount: dec(amount),
        kind,
        category_id: cat.into(),
        description: desc.into(),
        payment_source: PaymentSource::Cash,
        is_recurring: false,
    }
}

/// January 2025 salary and two expenses, plus one December expense.
fn sample() -> Vec<Transaction> {
    vec![
        tx("t1", "2025-01-01", "2000", TxKind::Income, "cat-001", "Salary"),
        tx("t2", "2025-01-05", "300", TxKind::Expense, "cat-004", "Weekly shop"),
        tx("t3", "2025-01-09", "150", TxKind::Expense, "cat-005", "Dinner"),
        tx("t4", "2024-12-20", "500", TxKind::Expense, "cat-004", "Holiday shop"),
    ]
}

#[test]
fn current_month_summary() {
    let txns = sample();
    let today = d("2025-01-15");
    let current = period_transactions(&txns, &Period::CurrentMonth, today);
    let s = summarize(current);
    assert_eq!(s.income, dec("2000"));
    assert_eq!(s.expense, dec("450"));
    assert_eq!(s.net, dec("1550"));
    assert_eq!(savings_rate(&s), dec("77.5"));
}

#[test]
fn last_month_and_year_windows() {
    let txns = sample();
    let today = d("2025-01-15");
    let last = summarize(period_transactions(&txns, &Period::LastMonth, today));
    assert_eq!(last.expense, dec("500"));
    assert_eq!(last.income, Decimal::ZERO);

    let year = period_transactions(&txns, &Period::Year, today);
    assert_eq!(year.len(), 3);

    let custom = Period::Custom {
        from: d("2024-12-20"),
        to: d("2025-01-05"),
    };
    let ids: Vec<_> = period_transactions(&txns, &custom, today)
        .iter()
        .map(|t| t.transaction_id.as_str())
        .collect();
    assert_eq!(ids, vec!["t1", "t2", "t4"]);
}

#[test]
fn last_month_wraps_year_boundary() {
    let w = Period::LastMonth.window(d("2025-01-31"));
    assert!(w.contains(d("2024-12-01")));
    assert!(!w.contains(d("2025-01-01")));
    let prev = Period::LastMonth.previous_window(d("2025-01-31")).unwrap();
    assert!(prev.contains(d("2024-11-30")));
}

#[test]
fn breakdown_is_descending_and_stable() {
    let txns = vec![
        tx("a", "2025-01-01", "50", TxKind::Expense, "cat-006", "bus"),
        tx("b", "2025-01-02", "80", TxKind::Expense, "cat-004", "shop"),
        tx("c", "2025-01-03", "50", TxKind::Expense, "cat-009", "film"),
        tx("e", "2025-01-04", "999", TxKind::Income, "cat-001", "pay"),
    ];
    let b = category_breakdown(&txns, TxKind::Expense);
    let ids: Vec<_> = b.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["cat-004", "cat-006", "cat-009"]);

    let resolved = resolve_breakdown(&b, &seed_categories());
    assert_eq!(resolved[0].name, "Groceries");
    assert_eq!(resolved[0].share, dec("80") / dec("180") * Decimal::ONE_HUNDRED);
}

#[test]
fn dangling_category_resolves_to_unknown() {
    let txns = vec![tx("a", "2025-01-01", "5", TxKind::Expense, "cat-gone", "x")];
    let resolved = resolve_breakdown(&category_breakdown(&txns, TxKind::Expense), &seed_categories());
    assert_eq!(resolved[0].name, "Unknown");
    assert_eq!(resolved[0].icon, "circle");
}

#[test]
fn period_change_rules() {
    assert!(period_change(dec("100"), Decimal::ZERO, false).is_none());

    let flat = period_change(dec("100"), dec("100"), true).unwrap();
    assert_eq!(flat.direction, Direction::Flat);
    assert_eq!(flat.outcome, Outcome::Neutral);

    let up = period_change(dec("150"), dec("100"), false).unwrap();
    assert_eq!(up.direction, Direction::Up);
    assert_eq!(up.percent_magnitude, dec("50"));
    assert_eq!(up.outcome, Outcome::Positive);

    // Spending falling is good news.
    let down = period_change(dec("75"), dec("100"), true).unwrap();
    assert_eq!(down.direction, Direction::Down);
    assert_eq!(down.percent_magnitude, dec("25"));
    assert_eq!(down.outcome, Outcome::Positive);
}

#[test]
fn comparison_marks_new_categories_as_hundred_percent() {
    let current = vec![("cat-004".to_string(), dec("300")), ("cat-005".to_string(), dec("150"))];
    let previous = vec![("cat-004".to_string(), dec("500")), ("cat-007".to_string(), dec("900"))];
    let rows = category_comparison(&current, &previous, &seed_categories());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].name, "Groceries");
    assert_eq!(rows[0].percent_change, dec("-40"));
    assert_eq!(rows[1].name, "Dining Out");
    assert_eq!(rows[1].percent_change, Decimal::ONE_HUNDRED);
    assert_eq!(rows[2].name, "Rent");
    assert_eq!(rows[2].current, Decimal::ZERO);
    assert_eq!(rows[2].percent_change, dec("-100"));
}

#[test]
fn monthly_trend_covers_twelve_months() {
    let months = monthly_trend(&sample(), 2025);
    assert_eq!(months.len(), 12);
    assert_eq!(months[0].income, dec("2000"));
    assert_eq!(months[0].expense, dec("450"));
    assert!(months[1..].iter().all(|m| m.income.is_zero() && m.expense.is_zero()));
}

#[test]
fn insights_for_sample_month() {
    let txns = sample();
    let today = d("2025-01-15");
    let current = summarize(period_transactions(&txns, &Period::CurrentMonth, today));
    let previous = summarize(period_transactions(&txns, &Period::LastMonth, today));
    let expenses = resolve_breakdown(
        &category_breakdown(period_transactions(&txns, &Period::CurrentMonth, today), TxKind::Expense),
        &seed_categories(),
    );
    let found = insights(&current, Some(&previous), &expenses);
    // Exactly -10% sits inside the steady band.
    assert_eq!(found[0], Insight::SpendingSteady { percent: dec("10") });
    assert!(matches!(&found[1], Insight::TopCategory { name, .. } if name == "Groceries"));
    assert!(matches!(found[2], Insight::SavingsExcellent { .. }));
    // No income last month, so no income insight.
    assert_eq!(found.len(), 3);
}

#[test]
fn overspending_when_nothing_saved() {
    let s = summarize(&[
        tx("a", "2025-01-01", "100", TxKind::Income, "cat-001", "pay"),
        tx("b", "2025-01-02", "120", TxKind::Expense, "cat-004", "shop"),
    ]);
    let found = insights(&s, None, &[]);
    assert_eq!(found, vec![Insight::Overspending]);
}

#[test]
fn filter_matches_description_and_category_name() {
    let txns = sample();
    let cats = seed_categories();
    let by_name = TransactionFilter {
        search: Some("dining".into()),
        ..Default::default()
    };
    let hits: Vec<_> = by_name.apply(&txns, &cats).iter().map(|t| t.transaction_id.clone()).collect();
    assert_eq!(hits, vec!["t3"]);

    let expenses_in_jan = TransactionFilter {
        kind: Some(TxKind::Expense),
        from: Some(d("2025-01-01")),
        to: Some(d("2025-01-31")),
        ..Default::default()
    };
    assert_eq!(expenses_in_jan.apply(&txns, &cats).len(), 2);
    assert_eq!(TransactionFilter::default().apply(&txns, &cats).len(), 4);
}

#[test]
fn paginate_clamps_page() {
    let items: Vec<u32> = (1..=23).collect();
    let p = paginate(&items, 3, 10);
    assert_eq!(p.items, &[21u32, 22, 23]);
    assert_eq!(p.total_pages, 3);
    let past_end = paginate(&items, 9, 10);
    assert_eq!(past_end.page, 3);
    let empty: Vec<u32> = Vec::new();
    let p = paginate(&empty, 1, 10);
    assert_eq!(p.total_pages, 1);
    assert!(p.items.is_empty());
}

#[test]
fn activity_counts() {
    let budgets = vec![Budget {
        budget_id: "bgt-1".into(),
        category_id: "cat-004".into(),
        month_year: YearMonth::new(2025, 1).unwrap(),
        limit_amount: dec("400"),
    }];
    let stats = activity_stats(&sample(), &budgets, d("2025-01-15"));
    assert_eq!(stats.total_transactions, 4);
    assert_eq!(stats.active_budgets, 1);
    assert_eq!(stats.active_days, 4);
    assert_eq!(stats.total_income, dec("2000"));
    assert_eq!(stats.total_expense, dec("950"));
    assert_eq!(stats.net, dec("1050"));
}

#[test]
fn drivers_share_the_top_three_total() {
    let txns = vec![
        tx("a", "2025-01-02", "400", TxKind::Expense, "cat-007", "Rent"),
        tx("b", "2025-01-03", "300", TxKind::Expense, "cat-004", "Shop"),
        tx("c", "2025-01-04", "200", TxKind::Expense, "cat-005", "Dinner"),
        tx("d", "2025-01-05", "100", TxKind::Expense, "cat-006", "Bus"),
    ];
    let expenses = resolve_breakdown(
        &category_breakdown(&txns, TxKind::Expense),
        &seed_categories(),
    );
    assert_eq!(expenses[0].share, dec("40"));

    let top = top_spending_drivers(&expenses, 3);
    let names: Vec<_> = top.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Rent", "Groceries", "Dining Out"]);
    assert_eq!(top[0].share.round_dp(1), dec("44.4"));
    assert_eq!(top[2].share.round_dp(1), dec("22.2"));
    assert_eq!(top[1].amount, dec("300"));

    assert_eq!(top_spending_drivers(&expenses[..2], 3).len(), 2);
    assert!(top_spending_drivers(&[], 3).is_empty());
}

#[test]
fn huge_amounts_saturate_instead_of_panicking() {
    let max = Decimal::MAX;
    let txns = vec![
        tx("a", "2025-01-02", &max.to_string(), TxKind::Expense, "cat-004", "x"),
        tx("b", "2025-01-03", &max.to_string(), TxKind::Expense, "cat-004", "y"),
        tx("c", "2025-01-04", "0.01", TxKind::Income, "cat-001", "z"),
    ];
    let s = summarize(&txns);
    assert_eq!(s.expense, max);
    assert_eq!(s.net, dec("0.01") - max);
    assert_eq!(savings_rate(&s), Decimal::MIN);

    let breakdown = category_breakdown(&txns, TxKind::Expense);
    assert_eq!(breakdown[0].1, max);
    let resolved = resolve_breakdown(&breakdown, &seed_categories());
    assert_eq!(resolved[0].share, Decimal::ONE_HUNDRED);

    let change = period_change(max, dec("0.5"), false).unwrap();
    assert_eq!(change.direction, Direction::Up);
    assert_eq!(change.percent_magnitude, max);

    let found = insights(&s, Some(&summarize(&txns[2..])), &resolved);
    assert!(found.contains(&Insight::Overspending));

    let stats = activity_stats(&txns, &[], d("2025-01-15"));
    assert_eq!(stats.total_expense, max);
    assert_eq!(monthly_trend(&txns, 2025)[0].expense, max);
}
