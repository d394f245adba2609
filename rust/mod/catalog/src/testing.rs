//! In-memory gateway and counting reload policy for controller tests.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use llama_client::{ApiError, EntityGateway, Envelope};

use crate::model::Llama;
use crate::reload::{Mutation, ReloadPolicy};

/// Gateway backed by a `Vec`, recording every call it receives.
#[derive(Default)]
pub struct MemoryGateway {
    records: Mutex<Vec<Llama>>,
    calls: Mutex<Vec<&'static str>>,
    next_id: AtomicU64,
    fail_list: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryGateway {
    pub fn with(records: Vec<Llama>) -> Self {
        let gateway = Self::default();
        *gateway.records.lock().unwrap() = records;
        gateway
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<Llama> {
        self.records.lock().unwrap().clone()
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::Relaxed);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl EntityGateway<Llama> for MemoryGateway {
    async fn list(&self) -> Envelope<Vec<Llama>> {
        self.record("list");
        if self.fail_list.load(Ordering::Relaxed) {
            return Envelope::failure("network: connection refused");
        }
        Envelope::ok(self.records())
    }

    async fn create(&self, item: &Llama) -> Result<Llama, ApiError> {
        self.record("create");
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(ApiError::Server { status: 500, message: "write failed".into() });
        }
        let mut created = item.clone();
        created.id = Some(format!("m{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1));
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, item: &Llama) -> Result<Llama, ApiError> {
        self.record("update");
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(ApiError::Server { status: 500, message: "write failed".into() });
        }
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| ApiError::Server { status: 404, message: format!("llamas '{}' not found", id) })?;
        let mut replaced = item.clone();
        replaced.id = Some(id.to_string());
        *slot = replaced.clone();
        Ok(replaced)
    }
}

/// Reload policy that always reloads and counts how often it was asked.
#[derive(Default)]
pub struct CountingReload {
    asked: AtomicUsize,
    mutations: Mutex<Vec<Mutation>>,
}

impl CountingReload {
    pub fn count(&self) -> usize {
        self.asked.load(Ordering::Relaxed)
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().unwrap().clone()
    }
}

impl ReloadPolicy for CountingReload {
    fn should_reload(&self, mutation: Mutation) -> bool {
        self.asked.fetch_add(1, Ordering::Relaxed);
        self.mutations.lock().unwrap().push(mutation);
        true
    }
}
