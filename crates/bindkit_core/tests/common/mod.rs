#![allow(dead_code)]

use bindkit_core::{ComponentRegistry, LiveEntryId, RegistrationError, RemovalError, StagedBinding};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Registry double that records every call it receives.
#[derive(Default)]
pub struct CountingRegistry {
    registrations: AtomicUsize,
    removals: AtomicUsize,
    reject_key: Option<String>,
    registered: Mutex<Vec<StagedBinding>>,
}

impl CountingRegistry {
    /// Rejects any binding carrying the `key` contract.
    pub fn rejecting(key: &str) -> Self {
        Self {
            reject_key: Some(key.to_string()),
            ..Self::default()
        }
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }

    pub fn registered(&self) -> Vec<StagedBinding> {
        self.registered.lock().unwrap().clone()
    }
}

impl ComponentRegistry for CountingRegistry {
    fn resolve_and_register(
        &self,
        binding: &StagedBinding,
    ) -> Result<LiveEntryId, RegistrationError> {
        if let Some(key) = &self.reject_key {
            if binding.contract_keys().contains(&key.as_str()) {
                return Err(RegistrationError::Rejected(format!("{key} is reserved")));
            }
        }
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.registered.lock().unwrap().push(binding.clone());
        Ok(LiveEntryId::new())
    }

    fn remove(&self, _entry: LiveEntryId) -> Result<(), RemovalError> {
        self.removals.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
