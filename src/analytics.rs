// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period filtering and financial aggregates.
//!
//! Everything here is a pure function of the collections passed in and an
//! explicit `today`; nothing reads storage or the clock. Amounts are always
//! positive magnitudes, so income and expense are told apart only by
//! [`TxKind`].
//!
//! Sums saturate and ratios are checked: a hand-edited blob holding amounts
//! near `Decimal::MAX` yields clamped figures, never a panic.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{FALLBACK_ICON, UNKNOWN_CATEGORY};
use crate::models::{Budget, Category, Transaction, TxKind, YearMonth};

/// At or above this share of the limit a budget is nearly spent.
pub const WARNING_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
/// At or above this share of the limit a budget is over.
pub const OVER_BUDGET_PERCENT: Decimal = Decimal::ONE_HUNDRED;

const SPENDING_TREND_BAND: Decimal = Decimal::TEN;
const INCOME_TREND_BAND: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const SAVINGS_EXCELLENT: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
const SAVINGS_GOOD: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Sum that clamps at `Decimal::MAX` instead of overflowing.
pub fn total<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `num / den` in percent, clamped to `Decimal`'s range. `den` is non-zero.
fn ratio_percent(num: Decimal, den: Decimal) -> Decimal {
    num.checked_div(den)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if num.is_sign_negative() == den.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

// Periods

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    CurrentMonth,
    LastMonth,
    Year,
    /// Inclusive on both ends.
    Custom { from: NaiveDate, to: NaiveDate },
}

/// A concrete calendar window, resolved from a [`Period`] and a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Window {
    Month { month: YearMonth },
    Year { year: i32 },
    Range { from: NaiveDate, to: NaiveDate },
}

impl Window {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Window::Month { month } => month.contains(date),
            Window::Year { year } => chrono::Datelike::year(&date) == *year,
            Window::Range { from, to } => *from <= date && date <= *to,
        }
    }
}

impl Period {
    pub fn window(&self, today: NaiveDate) -> Window {
        let this_month = YearMonth::of(today);
        match *self {
            Period::CurrentMonth => Window::Month { month: this_month },
            Period::LastMonth => Window::Month {
                month: this_month.previous(),
            },
            Period::Year => Window::Year {
                year: this_month.year(),
            },
            Period::Custom { from, to } => Window::Range { from, to },
        }
    }

    /// The window this period is compared against, if it has one.
    pub fn previous_window(&self, today: NaiveDate) -> Option<Window> {
        let this_month = YearMonth::of(today);
        match self {
            Period::CurrentMonth => Some(Window::Month {
                month: this_month.back(1),
            }),
            Period::LastMonth => Some(Window::Month {
                month: this_month.back(2),
            }),
            Period::Year | Period::Custom { .. } => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Period::CurrentMonth => "This Month".to_string(),
            Period::LastMonth => "Last Month".to_string(),
            Period::Year => "This Year".to_string(),
            Period::Custom { from, to } => format!("{} to {}", from, to),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current-month" | "month" | "this-month" => Ok(Period::CurrentMonth),
            "last-month" | "previous-month" => Ok(Period::LastMonth),
            "year" | "this-year" => Ok(Period::Year),
            other => Err(format!(
                "Invalid period '{}', expected current-month, last-month or year",
                other
            )),
        }
    }
}

pub fn window_transactions<'a, I>(transactions: I, window: &Window) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| window.contains(t.date))
        .collect()
}

/// Transactions falling in `period`, keeping their stored order.
pub fn period_transactions<'a, I>(
    transactions: I,
    period: &Period,
    today: NaiveDate,
) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    window_transactions(transactions, &period.window(today))
}

// Totals

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (income, expense) =
        transactions
            .into_iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), t| match t.kind {
                TxKind::Income => (inc.saturating_add(t.amount), exp),
                TxKind::Expense => (inc, exp.saturating_add(t.amount)),
            });
    Summary {
        income,
        expense,
        net: income.saturating_sub(expense),
    }
}

/// Share of income kept, in percent; zero when there was no income.
pub fn savings_rate(summary: &Summary) -> Decimal {
    if summary.income > Decimal::ZERO {
        ratio_percent(summary.net, summary.income)
    } else {
        Decimal::ZERO
    }
}

// Categories

/// Sums per category id for transactions of `kind`, largest first.
/// Equal sums keep the order the categories were first seen in.
pub fn category_breakdown<'a, I>(transactions: I, kind: TxKind) -> Vec<(String, Decimal)>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut order: Vec<(String, Decimal)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for t in transactions.into_iter().filter(|t| t.kind == kind) {
        match index.get(t.category_id.as_str()) {
            Some(&i) => order[i].1 = order[i].1.saturating_add(t.amount),
            None => {
                index.insert(t.category_id.as_str(), order.len());
                order.push((t.category_id.clone(), t.amount));
            }
        }
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    pub category_id: String,
    pub name: String,
    pub icon: String,
    pub amount: Decimal,
    /// Percent of the breakdown total.
    pub share: Decimal,
}

fn resolve_category<'c>(categories: &'c [Category], id: &str) -> Option<&'c Category> {
    categories.iter().find(|c| c.category_id == id)
}

/// Attaches names and icons; dangling ids become "Unknown".
pub fn resolve_breakdown(
    breakdown: &[(String, Decimal)],
    categories: &[Category],
) -> Vec<CategorySpend> {
    let whole = total(breakdown.iter().map(|(_, a)| *a));
    breakdown
        .iter()
        .map(|(id, amount)| {
            let cat = resolve_category(categories, id);
            CategorySpend {
                category_id: id.clone(),
                name: cat
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                icon: cat
                    .map(|c| c.icon.clone())
                    .unwrap_or_else(|| FALLBACK_ICON.to_string()),
                amount: *amount,
                share: percent_of(*amount, whole),
            }
        })
        .collect()
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        ratio_percent(part, whole)
    } else {
        Decimal::ZERO
    }
}

/// The `n` largest entries of a resolved breakdown, with each share
/// recomputed against the total of those `n` alone.
pub fn top_spending_drivers(expenses: &[CategorySpend], n: usize) -> Vec<CategorySpend> {
    let top = &expenses[..expenses.len().min(n)];
    let whole = total(top.iter().map(|s| s.amount));
    top.iter()
        .map(|s| CategorySpend {
            share: percent_of(s.amount, whole),
            ..s.clone()
        })
        .collect()
}

/// Expense total for one category within one month.
pub fn category_spend<'a, I>(transactions: I, category_id: &str, month: YearMonth) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    total(
        transactions
            .into_iter()
            .filter(|t| {
                t.kind == TxKind::Expense && t.category_id == category_id && month.contains(t.date)
            })
            .map(|t| t.amount),
    )
}

// Budgets

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    Safe,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    pub fn from_percentage(percentage: Decimal) -> Self {
        if percentage >= OVER_BUDGET_PERCENT {
            BudgetStatus::OverBudget
        } else if percentage >= WARNING_PERCENT {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Safe => "safe",
            BudgetStatus::Warning => "warning",
            BudgetStatus::OverBudget => "over-budget",
        }
    }
}

/// What is left of a limit, as the user reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Left(Decimal),
    Reached,
    /// Overspend, as a positive amount.
    Over(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Utilization {
    pub limit: Decimal,
    pub spent: Decimal,
    pub percentage: Decimal,
    pub remaining: Decimal,
    pub status: BudgetStatus,
}

impl Utilization {
    pub fn compute(limit: Decimal, spent: Decimal) -> Self {
        let percentage = if limit > Decimal::ZERO {
            ratio_percent(spent, limit)
        } else if spent > Decimal::ZERO {
            OVER_BUDGET_PERCENT
        } else {
            Decimal::ZERO
        };
        Utilization {
            limit,
            spent,
            percentage,
            remaining: limit.saturating_sub(spent),
            status: BudgetStatus::from_percentage(percentage),
        }
    }

    pub fn remaining_state(&self) -> Remaining {
        if self.remaining > Decimal::ZERO {
            Remaining::Left(self.remaining)
        } else if self.remaining.is_zero() {
            Remaining::Reached
        } else {
            Remaining::Over(self.remaining.abs())
        }
    }

    /// Percentage capped at 100, for progress bars.
    pub fn bar_percentage(&self) -> Decimal {
        self.percentage.min(Decimal::ONE_HUNDRED)
    }
}

pub fn budget_utilization(budget: &Budget, spent: Decimal) -> Utilization {
    Utilization::compute(budget.limit_amount, spent)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub budget: Budget,
    pub category_name: String,
    pub icon: String,
    pub utilization: Utilization,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub month: YearMonth,
    pub lines: Vec<BudgetLine>,
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
}

/// Utilization of every budget set for `month`, in stored order, with totals.
pub fn budget_overview(
    budgets: &[Budget],
    transactions: &[Transaction],
    categories: &[Category],
    month: YearMonth,
) -> BudgetOverview {
    let lines: Vec<BudgetLine> = budgets
        .iter()
        .filter(|b| b.month_year == month)
        .map(|b| {
            let cat = resolve_category(categories, &b.category_id);
            let spent = category_spend(transactions, &b.category_id, month);
            BudgetLine {
                budget: b.clone(),
                category_name: cat
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                icon: cat
                    .map(|c| c.icon.clone())
                    .unwrap_or_else(|| FALLBACK_ICON.to_string()),
                utilization: budget_utilization(b, spent),
            }
        })
        .collect();
    let total_limit = total(lines.iter().map(|l| l.budget.limit_amount));
    let total_spent = total(lines.iter().map(|l| l.utilization.spent));
    BudgetOverview {
        month,
        lines,
        total_limit,
        total_spent,
        total_remaining: total_limit.saturating_sub(total_spent),
    }
}

// Period-over-period

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Whether a change is good news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub direction: Direction,
    /// Magnitude of the relative change, in percent.
    pub percent_magnitude: Decimal,
    pub outcome: Outcome,
}

/// Relative change from `previous` to `current`.
///
/// Returns `None` when `previous` is zero. With `inverse`, a decrease is the
/// favourable outcome (expenses).
pub fn period_change(current: Decimal, previous: Decimal, inverse: bool) -> Option<Change> {
    if previous.is_zero() {
        return None;
    }
    let delta = current.saturating_sub(previous);
    let percent_magnitude = ratio_percent(delta, previous).abs();
    let direction = if delta > Decimal::ZERO {
        Direction::Up
    } else if delta < Decimal::ZERO {
        Direction::Down
    } else {
        Direction::Flat
    };
    let outcome = match (direction, inverse) {
        (Direction::Flat, _) => Outcome::Neutral,
        (Direction::Up, false) | (Direction::Down, true) => Outcome::Positive,
        (Direction::Up, true) | (Direction::Down, false) => Outcome::Negative,
    };
    Some(Change {
        direction,
        percent_magnitude,
        outcome,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComparison {
    pub category_id: String,
    pub name: String,
    pub current: Decimal,
    pub previous: Decimal,
    pub change: Decimal,
    /// Signed; 100 when a category is new this period.
    pub percent_change: Decimal,
}

/// Side-by-side category totals for two periods, largest current first.
pub fn category_comparison(
    current: &[(String, Decimal)],
    previous: &[(String, Decimal)],
    categories: &[Category],
) -> Vec<CategoryComparison> {
    let lookup = |set: &[(String, Decimal)], id: &str| {
        set.iter()
            .find(|(k, _)| k == id)
            .map(|(_, a)| *a)
            .unwrap_or(Decimal::ZERO)
    };
    let mut seen = HashSet::new();
    let ids: Vec<&str> = current
        .iter()
        .chain(previous.iter())
        .map(|(id, _)| id.as_str())
        .filter(|id| seen.insert(*id))
        .collect();

    let mut rows: Vec<CategoryComparison> = ids
        .into_iter()
        .map(|id| {
            let cur = lookup(current, id);
            let prev = lookup(previous, id);
            let change = cur.saturating_sub(prev);
            let percent_change = if prev > Decimal::ZERO {
                ratio_percent(change, prev)
            } else if cur > Decimal::ZERO {
                Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
            CategoryComparison {
                category_id: id.to_string(),
                name: resolve_category(categories, id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                current: cur,
                previous: prev,
                change,
                percent_change,
            }
        })
        .filter(|r| r.current > Decimal::ZERO || r.previous > Decimal::ZERO)
        .collect();
    rows.sort_by(|a, b| b.current.cmp(&a.current));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub month: YearMonth,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Income and expense for each of the twelve months of `year`.
pub fn monthly_trend(transactions: &[Transaction], year: i32) -> Vec<MonthTotals> {
    (1..=12)
        .filter_map(|m| YearMonth::new(year, m))
        .map(|month| {
            let s = summarize(transactions.iter().filter(|t| month.contains(t.date)));
            MonthTotals {
                month,
                income: s.income,
                expense: s.expense,
                net: s.net,
            }
        })
        .collect()
}

// Insights

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Insight {
    SpendingUp { percent: Decimal },
    SpendingDown { percent: Decimal },
    SpendingSteady { percent: Decimal },
    TopCategory { name: String, amount: Decimal, share: Decimal },
    SavingsExcellent { rate: Decimal },
    SavingsGood { rate: Decimal },
    SavingsLow { rate: Decimal },
    Overspending,
    IncomeUp { percent: Decimal },
    IncomeDown { percent: Decimal },
}

impl Insight {
    pub fn tone(&self) -> Tone {
        match self {
            Insight::SpendingUp { .. } | Insight::SavingsLow { .. } | Insight::IncomeDown { .. } => {
                Tone::Warning
            }
            Insight::SpendingDown { .. }
            | Insight::SavingsExcellent { .. }
            | Insight::IncomeUp { .. } => Tone::Success,
            Insight::SpendingSteady { .. }
            | Insight::TopCategory { .. }
            | Insight::SavingsGood { .. } => Tone::Info,
            Insight::Overspending => Tone::Danger,
        }
    }
}

fn signed_percent(current: Decimal, previous: Decimal) -> Decimal {
    ratio_percent(current.saturating_sub(previous), previous)
}

/// Observations about a period. `previous` is absent for periods that are not
/// compared (a whole year, a custom range); `expenses` is the resolved expense
/// breakdown of the current period, largest first.
pub fn insights(
    current: &Summary,
    previous: Option<&Summary>,
    expenses: &[CategorySpend],
) -> Vec<Insight> {
    let mut out = Vec::new();

    if let Some(prev) = previous.filter(|p| p.expense > Decimal::ZERO) {
        let change = signed_percent(current.expense, prev.expense);
        out.push(if change > SPENDING_TREND_BAND {
            Insight::SpendingUp { percent: change }
        } else if change < -SPENDING_TREND_BAND {
            Insight::SpendingDown {
                percent: change.abs(),
            }
        } else {
            Insight::SpendingSteady {
                percent: change.abs(),
            }
        });
    }

    if let Some(top) = expenses.first() {
        out.push(Insight::TopCategory {
            name: top.name.clone(),
            amount: top.amount,
            share: percent_of(top.amount, current.expense),
        });
    }

    let rate = savings_rate(current);
    out.push(if rate >= SAVINGS_EXCELLENT {
        Insight::SavingsExcellent { rate }
    } else if rate >= SAVINGS_GOOD {
        Insight::SavingsGood { rate }
    } else if rate > Decimal::ZERO {
        Insight::SavingsLow { rate }
    } else {
        Insight::Overspending
    });

    if let Some(prev) = previous.filter(|p| p.income > Decimal::ZERO) {
        let change = signed_percent(current.income, prev.income);
        if change > INCOME_TREND_BAND {
            out.push(Insight::IncomeUp { percent: change });
        } else if change < -INCOME_TREND_BAND {
            out.push(Insight::IncomeDown {
                percent: change.abs(),
            });
        }
    }

    out
}

// Listing

/// Criteria for narrowing the transaction list. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Case-insensitive; matched against description and category name.
    pub search: Option<String>,
    pub kind: Option<TxKind>,
    pub category_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction, categories: &[Category]) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                let cat_name = resolve_category(categories, &t.category_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or(UNKNOWN_CATEGORY);
                t.description.to_lowercase().contains(&term)
                    || cat_name.to_lowercase().contains(&term)
            }
        };
        search_ok
            && self.kind.is_none_or(|k| t.kind == k)
            && self
                .category_id
                .as_deref()
                .is_none_or(|c| t.category_id == c)
            && self.from.is_none_or(|d| t.date >= d)
            && self.to.is_none_or(|d| t.date <= d)
    }

    pub fn apply<'a>(
        &self,
        transactions: &'a [Transaction],
        categories: &[Category],
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|t| self.matches(t, categories))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based, clamped into range.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(items.len());
    Page {
        items: items.get(start..end).unwrap_or(&[]),
        page,
        total_pages,
        total_items: items.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_transactions: usize,
    pub active_budgets: usize,
    pub active_days: usize,
    /// All-time totals, every stored transaction included.
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net: Decimal,
}

pub fn activity_stats(
    transactions: &[Transaction],
    budgets: &[Budget],
    today: NaiveDate,
) -> ActivityStats {
    let this_month = YearMonth::of(today);
    let days: HashSet<NaiveDate> = transactions.iter().map(|t| t.date).collect();
    let all_time = summarize(transactions);
    ActivityStats {
        total_transactions: transactions.len(),
        active_budgets: budgets.iter().filter(|b| b.month_year == this_month).count(),
        active_days: days.len(),
        total_income: all_time.income,
        total_expense: all_time.expense,
        net: all_time.net,
    }
}
