// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finora::commands::{doctor, exporter};
use finora::db::{BlobStore, MemoryBlobStore};
use finora::models::{PaymentSource, TransactionDraft, TxKind};
use finora::store::Store;
use tempfile::tempdir;

fn store_with_one() -> Store<MemoryBlobStore> {
    let store = Store::open(MemoryBlobStore::new()).unwrap();
    store
        .add_transaction(TransactionDraft {
            date: NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(),
            amount: "12.34".parse().unwrap(),
            kind: TxKind::Expense,
            category_id: "cat-005".into(),
            description: "Lunch, with team".into(),
            payment_source: PaymentSource::CreditCard,
            is_recurring: false,
        })
        .unwrap();
    store
}

#[test]
fn export_transactions_csv_quotes_and_names_categories() {
    let store = store_with_one();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    let n = exporter::export_transactions(&store, "csv", &out).unwrap();
    assert_eq!(n, 1);
    let text = std::fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,type,category,description,amount,paymentSource,isRecurring,transactionId"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("2025-08-10,Expense,Dining Out,\"Lunch, with team\",12.34,Credit Card,false,txn-"));
}

#[test]
fn export_transactions_json() {
    let store = store_with_one();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.json");
    exporter::export_transactions(&store, "json", &out).unwrap();
    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v[0]["category"], "Dining Out");
    assert_eq!(v[0]["type"], "Expense");
    assert_eq!(v[0]["amount"], "12.34");
    assert_eq!(v[0]["paymentSource"], "Credit Card");
}

#[test]
fn unknown_format_is_an_error() {
    let store = store_with_one();
    let dir = tempdir().unwrap();
    assert!(exporter::export_transactions(&store, "xml", &dir.path().join("x")).is_err());
}

#[test]
fn export_all_writes_snapshot() {
    let store = store_with_one();
    store.set_setting("currency", "EUR").unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("all.json");
    exporter::export_all(&store, &out).unwrap();
    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["settings"]["currency"], "EUR");
    assert_eq!(v["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(v["categories"].as_array().unwrap().len(), 13);
    assert!(v["user"].is_null());
}

#[test]
fn doctor_flags_tampered_data() {
    let mem = MemoryBlobStore::new();
    let store = Store::open(&mem).unwrap();
    assert!(
        doctor::diagnose(
            &store.transactions().unwrap(),
            &store.budgets().unwrap(),
            &store.categories().unwrap()
        )
        .is_empty()
    );

    mem.set(
        "finora.transactions",
        r#"[{"transactionId":"txn-1","date":"2025-01-01","amount":"5","type":"Income","categoryId":"cat-004","description":"x"},
            {"transactionId":"txn-2","date":"2025-01-01","amount":"5","type":"Expense","categoryId":"cat-404","description":"y"}]"#,
    )
    .unwrap();
    mem.set(
        "finora.budgets",
        r#"[{"budgetId":"bgt-1","categoryId":"cat-004","monthYear":"2025-01","limitAmount":"100"},
            {"budgetId":"bgt-2","categoryId":"cat-004","monthYear":"2025-01","limitAmount":"0"}]"#,
    )
    .unwrap();
    let kinds: Vec<&str> = doctor::diagnose(
        &store.transactions().unwrap(),
        &store.budgets().unwrap(),
        &store.categories().unwrap(),
    )
    .into_iter()
    .map(|(k, _)| k)
    .collect();
    assert_eq!(
        kinds,
        vec![
            "txn_type_mismatch",
            "txn_unknown_category",
            "non_positive_limit",
            "duplicate_budget"
        ]
    );
}
