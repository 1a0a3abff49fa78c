//! Staged binding model and declaration handle.
//!
//! # Responsibility
//! - Hold one unresolved binding: its contracts plus declaration attributes.
//! - Provide the narrow configuration surface callers use after a declare call.
//!
//! # Invariants
//! - A binding must carry at least one non-blank contract before it can be
//!   committed (`StagedBinding::validate`).
//! - Contracts on one binding are deduplicated; order of first insertion wins.

use crate::contract::{Contract, TypeName};
use crate::signature::key::TypeKeyError;
use crate::signature::type_signature::TypeSignature;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one staged binding.
pub type BindingId = Uuid;

/// Unresolved binding declaration.
///
/// `name`, `implementation` and `scope` are carried through to the registry
/// untouched; this crate does not interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedBinding {
    pub id: BindingId,
    /// Alternate lookup keys for the same eventual registry entry.
    pub contracts: Vec<Contract>,
    /// Qualifier name, distinguishing entries that share a contract.
    pub name: Option<String>,
    pub implementation: Option<String>,
    pub scope: Option<String>,
}

impl StagedBinding {
    /// Creates an empty binding with a generated id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            contracts: Vec::new(),
            name: None,
            implementation: None,
            scope: None,
        }
    }

    /// Appends `contract` unless an equal one is already attached.
    pub fn add_contract(&mut self, contract: Contract) {
        if !self.contracts.contains(&contract) {
            self.contracts.push(contract);
        }
    }

    pub fn has_contracts(&self) -> bool {
        !self.contracts.is_empty()
    }

    /// Returns lookup keys in attachment order.
    pub fn contract_keys(&self) -> Vec<&str> {
        self.contracts.iter().map(Contract::lookup_key).collect()
    }

    /// Validates commit-time invariants.
    pub fn validate(&self) -> Result<(), MalformedContractError> {
        if self.contracts.is_empty() {
            return Err(MalformedContractError::NoContract(self.id));
        }
        if self
            .contracts
            .iter()
            .any(|contract| contract.lookup_key().trim().is_empty())
        {
            return Err(MalformedContractError::BlankContract(self.id));
        }
        Ok(())
    }
}

impl Default for StagedBinding {
    fn default() -> Self {
        Self::new()
    }
}

/// Binding shape errors detected at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedContractError {
    NoContract(BindingId),
    BlankContract(BindingId),
}

impl Display for MalformedContractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoContract(id) => write!(f, "binding {id} has no contract"),
            Self::BlankContract(id) => write!(f, "binding {id} has a blank contract"),
        }
    }
}

impl Error for MalformedContractError {}

/// Mutable view over a freshly declared binding.
///
/// Returned by every `BindingSession::declare_*` call; borrowing the session
/// keeps declaration single-threaded.
#[derive(Debug)]
pub struct BindingDeclaration<'s> {
    binding: &'s mut StagedBinding,
}

impl<'s> BindingDeclaration<'s> {
    pub(crate) fn new(binding: &'s mut StagedBinding) -> Self {
        Self { binding }
    }

    pub fn id(&self) -> BindingId {
        self.binding.id
    }

    pub fn binding(&self) -> &StagedBinding {
        &*self.binding
    }

    /// Sets the qualifier name.
    pub fn named(self, name: impl Into<String>) -> Self {
        self.binding.name = Some(name.into());
        self
    }

    /// Selects the implementation the registry should resolve.
    pub fn to(self, implementation: impl Into<String>) -> Self {
        self.binding.implementation = Some(implementation.into());
        self
    }

    pub fn in_scope(self, scope: impl Into<String>) -> Self {
        self.binding.scope = Some(scope.into());
        self
    }

    pub fn add_name(self, name: impl Into<String>) -> Self {
        self.binding.add_contract(Contract::name(name));
        self
    }

    pub fn add_type(self, type_name: impl Into<TypeName>) -> Result<Self, TypeKeyError> {
        self.binding.add_contract(Contract::of_type(type_name)?);
        Ok(self)
    }

    pub fn add_type_literal(self, signature: &TypeSignature) -> Result<Self, TypeKeyError> {
        self.binding.add_contract(Contract::signature(signature)?);
        Ok(self)
    }
}
