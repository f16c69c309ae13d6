//! Test utilities for tint-core
//!
//! Stores with scripted failure modes and small data fixtures, shared by the
//! core's unit tests and (via the `test-utils` feature) the CLI tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::kv::{KeyValueStore, MemoryStore};
use crate::models::{Budget, BudgetPeriod, Transaction};

/// Store where every call fails, as if the backend were unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Err(Error::Store(format!("read of {} refused", key)))
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(Error::Store(format!("write of {} refused", key)))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        Err(Error::Store(format!("remove of {} refused", key)))
    }
}

/// Store that reads from an in-memory map but rejects every write
#[derive(Debug, Clone, Default)]
pub struct WriteFailingStore {
    pub inner: MemoryStore,
}

impl WriteFailingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for WriteFailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(Error::Store(format!("disk full writing {}", key)))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        Err(Error::Store(format!("disk full removing {}", key)))
    }
}

/// In-memory store that counts writes
#[derive(Debug, Clone, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    writes: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` and `remove` calls so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key).await
    }
}

/// Shorthand for a calendar date
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// A January 2024 period for category `id`
pub fn period(id: &str, budgeted: f64, spent: f64) -> BudgetPeriod {
    BudgetPeriod::new(
        format!("period-{}", id),
        format!("budget-{}", id),
        id,
        budgeted,
        spent,
        date(2024, 1, 1),
        date(2024, 1, 31),
    )
}

/// A budget for `category` with the given allotment
pub fn budget(category: &str, amount: f64) -> Budget {
    Budget::new(format!("budget-{}", category), category, amount).with_name(category)
}

/// A categorized transaction
pub fn transaction(id: &str, on: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction::new(id, on, amount).with_category(category)
}
