// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "Income",
            TxKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(format!("Invalid type '{}', expected Income or Expense", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentSource {
    Cash,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Digital Wallet")]
    DigitalWallet,
    #[default]
    #[serde(other)]
    Other,
}

impl PaymentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentSource::Cash => "Cash",
            PaymentSource::DebitCard => "Debit Card",
            PaymentSource::CreditCard => "Credit Card",
            PaymentSource::BankTransfer => "Bank Transfer",
            PaymentSource::DigitalWallet => "Digital Wallet",
            PaymentSource::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        crate::config::PAYMENT_SOURCES
            .iter()
            .copied()
            .find(|p| {
                p.as_str()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase()
                    == wanted
            })
            .ok_or_else(|| format!("Invalid payment source '{}'", s))
    }
}

/// A calendar month, persisted as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(YearMonth { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is always 1..=12, and day 1 exists in every month
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The month `n` months before this one.
    pub fn back(&self, n: u32) -> Self {
        self.first_day()
            .checked_sub_months(Months::new(n))
            .map(YearMonth::of)
            .unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        self.back(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMonth(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(m: YearMonth) -> Self {
        m.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: Profile,
}

impl User {
    /// The profile's full name when set, else first and last name.
    pub fn display_name(&self) -> String {
        if !self.profile.full_name.trim().is_empty() {
            return self.profile.full_name.clone();
        }
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn merge(&mut self, p: UserPatch) {
        let text = |v: String| v.trim().to_string();
        if let Some(v) = p.full_name {
            self.profile.full_name = text(v);
        }
        if let Some(v) = p.phone {
            self.profile.phone = text(v);
        }
        if let Some(v) = p.date_of_birth {
            self.profile.date_of_birth = v;
        }
        if let Some(v) = p.location {
            self.profile.location = text(v);
        }
        if let Some(v) = p.occupation {
            self.profile.occupation = text(v);
        }
    }
}

/// Optional personal details, stored alongside the user's identity fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub full_name: String,
    pub phone: String,
    #[serde(rename = "dob", deserialize_with = "blank_as_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub location: String,
    pub occupation: String,
}

// Profiles saved from an empty form carry `"dob": ""`.
fn blank_as_none<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(de)? {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub category_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub payment_source: PaymentSource,
    #[serde(default)]
    pub is_recurring: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub budget_id: String,
    pub category_id: String,
    pub month_year: YearMonth,
    pub limit_amount: Decimal,
}

/// Everything a new transaction needs except its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: TxKind,
    pub category_id: String,
    pub description: String,
    pub payment_source: PaymentSource,
    pub is_recurring: bool,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub kind: Option<TxKind>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub payment_source: Option<PaymentSource>,
    pub is_recurring: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetDraft {
    pub category_id: String,
    pub month_year: YearMonth,
    pub limit_amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetPatch {
    pub category_id: Option<String>,
    pub month_year: Option<YearMonth>,
    pub limit_amount: Option<Decimal>,
}

/// `date_of_birth: Some(None)` clears the stored date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub location: Option<String>,
    pub occupation: Option<String>,
}
