//! In-process reference registry.

use crate::contract::Contract;
use crate::registry::{ComponentRegistry, LiveEntryId, RegistrationError, RemovalError};
use crate::session::binding::StagedBinding;
use crate::signature::key::TypeKeyError;
use crate::signature::type_signature::TypeSignature;
use log::debug;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Registry that keeps live entries in memory, indexed by contract key.
///
/// Lookups return entries in registration order.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    state: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    entries: BTreeMap<LiveEntryId, StagedBinding>,
    contract_index: BTreeMap<String, Vec<LiveEntryId>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Returns a copy of the binding registered as `entry`.
    pub fn get(&self, entry: LiveEntryId) -> Option<StagedBinding> {
        self.state.read().entries.get(&entry).cloned()
    }

    /// Returns live entries registered under `key`.
    pub fn lookup(&self, key: &str) -> Vec<LiveEntryId> {
        self.state
            .read()
            .contract_index
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn lookup_contract(&self, contract: &Contract) -> Vec<LiveEntryId> {
        self.lookup(contract.lookup_key())
    }

    /// Returns live entries matching the canonical key of `signature`.
    pub fn lookup_type(
        &self,
        signature: &TypeSignature,
    ) -> Result<Vec<LiveEntryId>, TypeKeyError> {
        let key = signature.canonical_key()?;
        Ok(self.lookup(&key))
    }

    /// Returns the entry registered under `key` with qualifier `name`.
    pub fn lookup_named(&self, key: &str, name: &str) -> Option<LiveEntryId> {
        let state = self.state.read();
        state.contract_index.get(key).and_then(|ids| {
            ids.iter().copied().find(|id| {
                state
                    .entries
                    .get(id)
                    .is_some_and(|binding| binding.name.as_deref() == Some(name))
            })
        })
    }
}

impl RegistryState {
    fn conflicting_contract(&self, binding: &StagedBinding) -> Option<String> {
        let name = binding.name.as_deref()?;
        binding
            .contract_keys()
            .into_iter()
            .find(|key| {
                self.contract_index.get(*key).is_some_and(|ids| {
                    ids.iter().any(|id| {
                        self.entries
                            .get(id)
                            .is_some_and(|existing| existing.name.as_deref() == Some(name))
                    })
                })
            })
            .map(str::to_string)
    }
}

impl ComponentRegistry for InMemoryRegistry {
    fn resolve_and_register(
        &self,
        binding: &StagedBinding,
    ) -> Result<LiveEntryId, RegistrationError> {
        if !binding.has_contracts() {
            return Err(RegistrationError::Rejected(format!(
                "binding {} has no contract",
                binding.id
            )));
        }

        let mut state = self.state.write();
        if let Some(contract) = state.conflicting_contract(binding) {
            return Err(RegistrationError::Conflict {
                contract,
                name: binding.name.clone(),
            });
        }

        let entry = LiveEntryId::new();
        for key in binding.contract_keys() {
            let ids = state.contract_index.entry(key.to_string()).or_default();
            if !ids.contains(&entry) {
                ids.push(entry);
            }
        }
        state.entries.insert(entry, binding.clone());
        debug!(
            "event=entry_register module=registry status=ok entry={} contracts={}",
            entry,
            binding.contracts.len()
        );
        Ok(entry)
    }

    fn remove(&self, entry: LiveEntryId) -> Result<(), RemovalError> {
        let mut state = self.state.write();
        let Some(binding) = state.entries.remove(&entry) else {
            return Err(RemovalError::UnknownEntry(entry));
        };

        for key in binding.contract_keys() {
            if let Some(ids) = state.contract_index.get_mut(key) {
                ids.retain(|id| *id != entry);
                if ids.is_empty() {
                    state.contract_index.remove(key);
                }
            }
        }
        debug!("event=entry_remove module=registry status=ok entry={entry}");
        Ok(())
    }
}
