// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::models::{Category, PaymentSource, TxKind};

pub const NAMESPACE: &str = "finora";

/// The independently persisted values under the namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    User,
    Transactions,
    Budgets,
    Categories,
    IsAuthenticated,
    Settings,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::User,
        Slot::Transactions,
        Slot::Budgets,
        Slot::Categories,
        Slot::IsAuthenticated,
        Slot::Settings,
    ];

    fn suffix(&self) -> &'static str {
        match self {
            Slot::User => "user",
            Slot::Transactions => "transactions",
            Slot::Budgets => "budgets",
            Slot::Categories => "categories",
            Slot::IsAuthenticated => "isAuthenticated",
            Slot::Settings => "settings",
        }
    }

    /// Storage key, e.g. `finora.transactions`.
    pub fn key(&self) -> String {
        format!("{}.{}", NAMESPACE, self.suffix())
    }

    /// Key used by earlier builds, migrated on open.
    pub fn legacy_key(&self) -> String {
        format!("{}_{}", NAMESPACE, self.suffix())
    }
}

pub const PAYMENT_SOURCES: [PaymentSource; 6] = [
    PaymentSource::Cash,
    PaymentSource::DebitCard,
    PaymentSource::CreditCard,
    PaymentSource::BankTransfer,
    PaymentSource::DigitalWallet,
    PaymentSource::Other,
];

const CATEGORY_SEED: [(&str, &str, TxKind, &str); 13] = [
    ("cat-001", "Salary", TxKind::Income, "briefcase"),
    ("cat-002", "Freelance", TxKind::Income, "code"),
    ("cat-003", "Investment Returns", TxKind::Income, "trending-up"),
    ("cat-004", "Groceries", TxKind::Expense, "shopping-cart"),
    ("cat-005", "Dining Out", TxKind::Expense, "utensils"),
    ("cat-006", "Transportation", TxKind::Expense, "car"),
    ("cat-007", "Rent", TxKind::Expense, "home"),
    ("cat-008", "Utilities", TxKind::Expense, "zap"),
    ("cat-009", "Entertainment", TxKind::Expense, "film"),
    ("cat-010", "Healthcare", TxKind::Expense, "heart"),
    ("cat-011", "Shopping", TxKind::Expense, "shopping-bag"),
    ("cat-012", "Education", TxKind::Expense, "book"),
    ("cat-013", "Subscriptions", TxKind::Expense, "repeat"),
];

/// The category catalog written on first run.
pub fn seed_categories() -> Vec<Category> {
    CATEGORY_SEED
        .iter()
        .map(|(id, name, kind, icon)| Category {
            category_id: id.to_string(),
            name: name.to_string(),
            kind: *kind,
            icon: icon.to_string(),
        })
        .collect()
}

pub const UNKNOWN_CATEGORY: &str = "Unknown";
pub const FALLBACK_ICON: &str = "circle";

pub const TRANSACTION_ID_PREFIX: &str = "txn";
pub const BUDGET_ID_PREFIX: &str = "bgt";
pub const USER_ID_PREFIX: &str = "user";

/// Smallest amount a transaction or budget limit may hold.
pub const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
/// Largest amount a transaction or budget limit may hold (1,000,000,000,000).
/// Sums of many such values stay far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

pub const MIN_PASSWORD_LEN: usize = 6;
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// How many categories `report drivers` ranks.
pub const TOP_DRIVERS: usize = 3;
