// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Durable CRUD over the finance collections.
//!
//! Each collection is a single JSON array under one key of a [`BlobStore`].
//! Every write reads the whole array, changes it in memory and writes it back.
//! A missing or unparseable value reads as empty; lookups that miss return
//! `None` rather than an error.
//!
//! Reads decode record by record, so one bad entry hides only itself. Writes
//! work on the raw JSON items: entries that do not decode are carried over
//! untouched, and a value that is not JSON of the expected shape is never
//! overwritten (see [`StoreError::Unreadable`]).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{self, Slot};
use crate::db::BlobStore;
use crate::error::{StoreError, StoreResult, ValidationError};
use crate::models::{
    Budget, BudgetDraft, BudgetPatch, Category, Transaction, TransactionDraft, TransactionPatch,
    TxKind, User, UserPatch,
};
use crate::settings::Settings;

/// A record kept in one of the CRUD collections.
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Draft;
    type Patch;

    const SLOT: Slot;
    const ID_PREFIX: &'static str;
    /// JSON field holding the id, used to match items that do not decode.
    const ID_FIELD: &'static str;
    /// New records go to the front of the collection instead of the back.
    const PREPEND: bool;

    fn id(&self) -> &str;
    fn from_draft(id: String, draft: Self::Draft) -> Self;
    fn merge(&mut self, patch: Self::Patch);
}

impl Record for Transaction {
    type Draft = TransactionDraft;
    type Patch = TransactionPatch;

    const SLOT: Slot = Slot::Transactions;
    const ID_PREFIX: &'static str = config::TRANSACTION_ID_PREFIX;
    const ID_FIELD: &'static str = "transactionId";
    const PREPEND: bool = true;

    fn id(&self) -> &str {
        &self.transaction_id
    }

    fn from_draft(id: String, d: TransactionDraft) -> Self {
        Transaction {
            transaction_id: id,
            date: d.date,
            amount: d.amount,
            kind: d.kind,
            category_id: d.category_id,
            description: d.description,
            payment_source: d.payment_source,
            is_recurring: d.is_recurring,
        }
    }

    fn merge(&mut self, p: TransactionPatch) {
        if let Some(v) = p.date {
            self.date = v;
        }
        if let Some(v) = p.amount {
            self.amount = v;
        }
        if let Some(v) = p.kind {
            self.kind = v;
        }
        if let Some(v) = p.category_id {
            self.category_id = v;
        }
        if let Some(v) = p.description {
            self.description = v;
        }
        if let Some(v) = p.payment_source {
            self.payment_source = v;
        }
        if let Some(v) = p.is_recurring {
            self.is_recurring = v;
        }
    }
}

impl Record for Budget {
    type Draft = BudgetDraft;
    type Patch = BudgetPatch;

    const SLOT: Slot = Slot::Budgets;
    const ID_PREFIX: &'static str = config::BUDGET_ID_PREFIX;
    const ID_FIELD: &'static str = "budgetId";
    const PREPEND: bool = false;

    fn id(&self) -> &str {
        &self.budget_id
    }

    fn from_draft(id: String, d: BudgetDraft) -> Self {
        Budget {
            budget_id: id,
            category_id: d.category_id,
            month_year: d.month_year,
            limit_amount: d.limit_amount,
        }
    }

    fn merge(&mut self, p: BudgetPatch) {
        if let Some(v) = p.category_id {
            self.category_id = v;
        }
        if let Some(v) = p.month_year {
            self.month_year = v;
        }
        if let Some(v) = p.limit_amount {
            self.limit_amount = v;
        }
    }
}

/// A stored value before it is decoded into domain types.
enum Stored {
    Absent,
    Json(Value),
    Unreadable,
}

/// Decodes each item on its own, keeping its index in the stored array.
fn decode_each<T: DeserializeOwned>(slot: Slot, items: &[Value]) -> Vec<(usize, T)> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
            Ok(record) => Some((index, record)),
            Err(e) => {
                warn!(key = %slot.key(), index, error = %e, "skipping unreadable record");
                None
            }
        })
        .collect()
}

/// Writes the fields of `typed` into `target`, keeping keys `typed` lacks.
fn overlay(target: &mut Value, typed: Value) {
    match (target, typed) {
        (Value::Object(stored), Value::Object(fields)) => stored.extend(fields),
        (target, typed) => *target = typed,
    }
}

/// `<prefix>-<uuid v4>`.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Everything the store holds, as one exportable document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub user: Option<User>,
    pub settings: Settings,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub export_date: DateTime<Utc>,
}

pub struct Store<B: BlobStore> {
    backend: B,
}

impl<B: BlobStore> Store<B> {
    /// Wraps `backend`, migrating legacy keys and seeding first-run values.
    pub fn open(backend: B) -> StoreResult<Self> {
        let store = Store { backend };
        store.migrate_legacy_keys()?;
        store.initialize()?;
        Ok(store)
    }

    fn migrate_legacy_keys(&self) -> StoreResult<()> {
        for slot in Slot::ALL {
            let legacy = slot.legacy_key();
            let Some(value) = self.backend.get(&legacy)? else {
                continue;
            };
            if self.backend.get(&slot.key())?.is_none() {
                warn!(from = %legacy, to = %slot.key(), "migrating legacy storage key");
                self.backend.set(&slot.key(), &value)?;
                self.backend.remove(&legacy)?;
            }
        }
        Ok(())
    }

    fn initialize(&self) -> StoreResult<()> {
        if self.backend.get(&Slot::Categories.key())?.is_none() {
            info!("seeding category catalog");
            self.write_value(Slot::Categories, &config::seed_categories())?;
        }
        for slot in [Slot::Transactions, Slot::Budgets] {
            if self.backend.get(&slot.key())?.is_none() {
                self.backend.set(&slot.key(), "[]")?;
            }
        }
        if self.backend.get(&Slot::IsAuthenticated.key())?.is_none() {
            self.backend.set(&Slot::IsAuthenticated.key(), "false")?;
        }
        Ok(())
    }

    fn load(&self, slot: Slot) -> StoreResult<Stored> {
        let Some(raw) = self.backend.get(&slot.key())? else {
            return Ok(Stored::Absent);
        };
        match serde_json::from_str(&raw) {
            Ok(Value::Null) => Ok(Stored::Absent),
            Ok(v) => Ok(Stored::Json(v)),
            Err(e) => {
                warn!(key = %slot.key(), error = %e, "stored value is not valid JSON");
                Ok(Stored::Unreadable)
            }
        }
    }

    fn read_value<T: DeserializeOwned>(&self, slot: Slot) -> StoreResult<Option<T>> {
        let Stored::Json(value) = self.load(slot)? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warn!(key = %slot.key(), error = %e, "ignoring malformed stored value");
                Ok(None)
            }
        }
    }

    fn write_value<T: Serialize + ?Sized>(&self, slot: Slot, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(&slot.key(), &raw)?;
        Ok(())
    }

    /// Every readable item of a JSON array value.
    fn read_items<T: DeserializeOwned>(&self, slot: Slot) -> StoreResult<Vec<T>> {
        Ok(match self.load(slot)? {
            Stored::Json(Value::Array(items)) => decode_each(slot, &items)
                .into_iter()
                .map(|(_, record)| record)
                .collect(),
            Stored::Json(_) => {
                warn!(key = %slot.key(), "stored value is not a list; reading it as empty");
                Vec::new()
            }
            Stored::Absent | Stored::Unreadable => Vec::new(),
        })
    }

    /// Raw items of a collection about to be rewritten.
    fn writable_items(&self, slot: Slot) -> StoreResult<Vec<Value>> {
        match self.load(slot)? {
            Stored::Absent => Ok(Vec::new()),
            Stored::Json(Value::Array(items)) => Ok(items),
            Stored::Json(_) | Stored::Unreadable => Err(StoreError::Unreadable { key: slot.key() }),
        }
    }

    /// Raw object under `slot`, or an empty one when nothing is stored.
    fn writable_object(&self, slot: Slot) -> StoreResult<Map<String, Value>> {
        match self.load(slot)? {
            Stored::Absent => Ok(Map::new()),
            Stored::Json(Value::Object(map)) => Ok(map),
            Stored::Json(_) | Stored::Unreadable => Err(StoreError::Unreadable { key: slot.key() }),
        }
    }

    /// The readable part of the collection, in stored order.
    pub fn list<T: Record>(&self) -> StoreResult<Vec<T>> {
        self.read_items(T::SLOT)
    }

    pub fn get<T: Record>(&self, id: &str) -> StoreResult<Option<T>> {
        Ok(self.list::<T>()?.into_iter().find(|r| r.id() == id))
    }

    fn insert<T: Record>(&self, record: T) -> StoreResult<T> {
        let mut items = self.writable_items(T::SLOT)?;
        let value = serde_json::to_value(&record)?;
        if T::PREPEND {
            items.insert(0, value);
        } else {
            items.push(value);
        }
        self.write_value(T::SLOT, &items)?;
        debug!(collection = ?T::SLOT, id = %record.id(), "added record");
        Ok(record)
    }

    fn patch<T, F>(&self, id: &str, patch: T::Patch, check: F) -> StoreResult<Option<T>>
    where
        T: Record,
        F: FnOnce(&T, &[T]) -> Result<(), ValidationError>,
    {
        let mut items = self.writable_items(T::SLOT)?;
        let decoded = decode_each::<T>(T::SLOT, &items);
        let Some((idx, mut updated)) = decoded.iter().find(|(_, r)| r.id() == id).cloned() else {
            debug!(collection = ?T::SLOT, id, "update of unknown record ignored");
            return Ok(None);
        };
        updated.merge(patch);
        let all: Vec<T> = decoded.into_iter().map(|(_, r)| r).collect();
        check(&updated, &all)?;
        overlay(&mut items[idx], serde_json::to_value(&updated)?);
        self.write_value(T::SLOT, &items)?;
        debug!(collection = ?T::SLOT, id, "updated record");
        Ok(Some(updated))
    }

    /// Drops `id` from the collection. Succeeds whether or not it was present.
    pub fn remove<T: Record>(&self, id: &str) -> StoreResult<bool> {
        let mut items = self.writable_items(T::SLOT)?;
        items.retain(|item| item.get(T::ID_FIELD).and_then(Value::as_str) != Some(id));
        self.write_value(T::SLOT, &items)?;
        debug!(collection = ?T::SLOT, id, "removed record");
        Ok(true)
    }

    /// Stored values that reads skip or that writes would refuse, one line
    /// per key.
    pub fn unreadable_entries(&self) -> StoreResult<Vec<(String, String)>> {
        let mut found = Vec::new();
        self.check_items::<Transaction>(Slot::Transactions, &mut found)?;
        self.check_items::<Budget>(Slot::Budgets, &mut found)?;
        self.check_items::<Category>(Slot::Categories, &mut found)?;
        for slot in [Slot::User, Slot::Settings] {
            let detail = match self.load(slot)? {
                Stored::Json(Value::Object(_)) | Stored::Absent => None,
                Stored::Json(_) => Some("not an object"),
                Stored::Unreadable => Some("not valid JSON"),
            };
            found.extend(detail.map(|d| (slot.key(), d.to_string())));
        }
        Ok(found)
    }

    fn check_items<T: DeserializeOwned>(
        &self,
        slot: Slot,
        found: &mut Vec<(String, String)>,
    ) -> StoreResult<()> {
        let detail = match self.load(slot)? {
            Stored::Json(Value::Array(items)) => {
                let skipped = items.len() - decode_each::<T>(slot, &items).len();
                (skipped > 0).then(|| format!("{} unreadable record(s)", skipped))
            }
            Stored::Json(_) => Some("not a list".to_string()),
            Stored::Unreadable => Some("not valid JSON".to_string()),
            Stored::Absent => None,
        };
        found.extend(detail.map(|d| (slot.key(), d)));
        Ok(())
    }

    // Transactions

    pub fn transactions(&self) -> StoreResult<Vec<Transaction>> {
        self.list()
    }

    pub fn transaction(&self, id: &str) -> StoreResult<Option<Transaction>> {
        self.get(id)
    }

    pub fn add_transaction(&self, draft: TransactionDraft) -> StoreResult<Transaction> {
        let record = Transaction::from_draft(new_id(Transaction::ID_PREFIX), draft);
        self.check_transaction(&record)?;
        self.insert(record)
    }

    pub fn update_transaction(
        &self,
        id: &str,
        patch: TransactionPatch,
    ) -> StoreResult<Option<Transaction>> {
        let categories = self.categories()?;
        self.patch(id, patch, |t: &Transaction, _| {
            validate_transaction(t, &categories)
        })
    }

    pub fn remove_transaction(&self, id: &str) -> StoreResult<bool> {
        self.remove::<Transaction>(id)
    }

    fn check_transaction(&self, t: &Transaction) -> StoreResult<()> {
        validate_transaction(t, &self.categories()?)?;
        Ok(())
    }

    // Budgets

    pub fn budgets(&self) -> StoreResult<Vec<Budget>> {
        self.list()
    }

    pub fn budget(&self, id: &str) -> StoreResult<Option<Budget>> {
        self.get(id)
    }

    pub fn add_budget(&self, draft: BudgetDraft) -> StoreResult<Budget> {
        let record = Budget::from_draft(new_id(Budget::ID_PREFIX), draft);
        validate_budget(&record, &self.budgets()?, &self.categories()?)?;
        self.insert(record)
    }

    pub fn update_budget(&self, id: &str, patch: BudgetPatch) -> StoreResult<Option<Budget>> {
        let categories = self.categories()?;
        self.patch(id, patch, |b: &Budget, all| {
            validate_budget(b, all, &categories)
        })
    }

    pub fn remove_budget(&self, id: &str) -> StoreResult<bool> {
        self.remove::<Budget>(id)
    }

    // Categories (read-only)

    pub fn categories(&self) -> StoreResult<Vec<Category>> {
        self.read_items(Slot::Categories)
    }

    pub fn category(&self, id: &str) -> StoreResult<Option<Category>> {
        Ok(self
            .categories()?
            .into_iter()
            .find(|c| c.category_id == id))
    }

    /// Display name, or "Unknown" for a dangling reference.
    pub fn category_name(&self, id: &str) -> StoreResult<String> {
        Ok(self
            .category(id)?
            .map(|c| c.name)
            .unwrap_or_else(|| config::UNKNOWN_CATEGORY.to_string()))
    }

    // User and session

    pub fn user(&self) -> StoreResult<Option<User>> {
        self.read_value(Slot::User)
    }

    pub fn set_user(&self, user: &User) -> StoreResult<()> {
        self.write_value(Slot::User, user)?;
        debug!(user_id = %user.user_id, "stored user");
        Ok(())
    }

    /// Applies profile changes to the stored user, keeping any stored fields
    /// this build does not know. `None` when nobody is stored.
    pub fn update_user(&self, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut stored = match self.load(Slot::User)? {
            Stored::Absent => return Ok(None),
            Stored::Json(v @ Value::Object(_)) => v,
            Stored::Json(_) | Stored::Unreadable => {
                return Err(StoreError::Unreadable { key: Slot::User.key() });
            }
        };
        let mut user: User = serde_json::from_value(stored.clone())
            .map_err(|_| StoreError::Unreadable { key: Slot::User.key() })?;
        user.merge(patch);
        overlay(&mut stored, serde_json::to_value(&user)?);
        self.write_value(Slot::User, &stored)?;
        debug!(user_id = %user.user_id, "updated profile");
        Ok(Some(user))
    }

    pub fn clear_user(&self) -> StoreResult<()> {
        self.backend.remove(&Slot::User.key())?;
        Ok(())
    }

    pub fn is_authenticated(&self) -> StoreResult<bool> {
        Ok(self.backend.get(&Slot::IsAuthenticated.key())?.as_deref() == Some("true"))
    }

    pub fn set_authenticated(&self, status: bool) -> StoreResult<()> {
        self.backend
            .set(&Slot::IsAuthenticated.key(), if status { "true" } else { "false" })?;
        Ok(())
    }

    pub fn logout(&self) -> StoreResult<()> {
        self.clear_user()?;
        self.set_authenticated(false)
    }

    // Settings

    /// Stored settings. Fields that are absent or unreadable take defaults.
    pub fn settings(&self) -> StoreResult<Settings> {
        Ok(match self.load(Slot::Settings)? {
            Stored::Json(Value::Object(map)) => Settings::from_stored(&map),
            _ => Settings::default(),
        })
    }

    /// Changes one stored field; every other stored field is written back as
    /// it was, readable or not.
    pub fn set_setting(&self, key: &str, value: &str) -> StoreResult<Settings> {
        let mut stored = self.writable_object(Slot::Settings)?;
        let mut settings = Settings::from_stored(&stored);
        let field = settings.set(key, value)?;
        if let Some(v) = serde_json::to_value(&settings)?.get(field) {
            stored.insert(field.to_string(), v.clone());
        }
        self.write_value(Slot::Settings, &stored)?;
        debug!(key = field, value, "setting changed");
        Ok(settings)
    }

    // Bulk

    /// Empties transactions and budgets; user, settings and categories stay.
    pub fn clear_financial_data(&self) -> StoreResult<()> {
        self.write_value::<[Transaction]>(Slot::Transactions, &[])?;
        self.write_value::<[Budget]>(Slot::Budgets, &[])?;
        info!("cleared transactions and budgets");
        Ok(())
    }

    /// Removes every namespaced value. Reopening the store seeds it again.
    pub fn wipe(&self) -> StoreResult<()> {
        for slot in Slot::ALL {
            self.backend.remove(&slot.key())?;
        }
        info!("wiped all stored data");
        Ok(())
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> StoreResult<Snapshot> {
        Ok(Snapshot {
            user: self.user()?,
            settings: self.settings()?,
            categories: self.categories()?,
            transactions: self.transactions()?,
            budgets: self.budgets()?,
            export_date: now,
        })
    }
}

fn check_range(field: &'static str, amount: Decimal) -> Result<(), ValidationError> {
    if amount < config::MIN_AMOUNT || amount > config::MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field,
            min: config::MIN_AMOUNT,
            max: config::MAX_AMOUNT,
        });
    }
    Ok(())
}

fn validate_transaction(t: &Transaction, categories: &[Category]) -> Result<(), ValidationError> {
    if t.amount <= Decimal::ZERO {
        return Err(ValidationError::NotPositive("Amount"));
    }
    check_range("Amount", t.amount)?;
    if t.description.trim().is_empty() {
        return Err(ValidationError::MissingField("Description"));
    }
    let category = categories
        .iter()
        .find(|c| c.category_id == t.category_id)
        .ok_or_else(|| ValidationError::UnknownCategory(t.category_id.clone()))?;
    if category.kind != t.kind {
        return Err(ValidationError::CategoryTypeMismatch {
            category: category.name.clone(),
            expected: t.kind,
            actual: category.kind,
        });
    }
    Ok(())
}

/// `all` may contain `b` itself (on update); it never counts as its own duplicate.
fn validate_budget(b: &Budget, all: &[Budget], categories: &[Category]) -> Result<(), ValidationError> {
    if b.limit_amount <= Decimal::ZERO {
        return Err(ValidationError::NotPositive("Limit amount"));
    }
    check_range("Limit amount", b.limit_amount)?;
    let category = categories
        .iter()
        .find(|c| c.category_id == b.category_id)
        .ok_or_else(|| ValidationError::UnknownCategory(b.category_id.clone()))?;
    if category.kind != TxKind::Expense {
        return Err(ValidationError::NotAnExpenseCategory(category.name.clone()));
    }
    let duplicate = all.iter().any(|o| {
        o.budget_id != b.budget_id && o.category_id == b.category_id && o.month_year == b.month_year
    });
    if duplicate {
        return Err(ValidationError::DuplicateBudget {
            category: category.name.clone(),
            month: b.month_year,
        });
    }
    Ok(())
}
