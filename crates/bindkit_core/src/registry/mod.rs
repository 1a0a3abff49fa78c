//! Component registry boundary.
//!
//! # Responsibility
//! - Define the two operations commit/release consume from a registry.
//! - Provide an in-process reference registry with a contract-key index.
//!
//! # Invariants
//! - Registries are shared across sessions and handles; implementations must
//!   be internally synchronized (`Send + Sync`, `&self` methods).
//! - A `LiveEntryId` is opaque to callers and only meaningful to the registry
//!   that issued it.

pub mod in_memory;

use crate::session::binding::StagedBinding;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque handle of one activated registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LiveEntryId(Uuid);

impl LiveEntryId {
    /// Issues a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for LiveEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for LiveEntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry contract consumed by `BindingSession::commit` and
/// `BindingsHandle::release`.
pub trait ComponentRegistry: Send + Sync {
    /// Resolves `binding` and registers it under every contract it carries.
    fn resolve_and_register(&self, binding: &StagedBinding)
        -> Result<LiveEntryId, RegistrationError>;

    /// Removes one previously registered entry.
    fn remove(&self, entry: LiveEntryId) -> Result<(), RemovalError>;
}

/// Registry rejection of one staged binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Another live entry already holds this `(contract, name)` pair.
    Conflict {
        contract: String,
        name: Option<String>,
    },
    Rejected(String),
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict {
                contract,
                name: Some(name),
            } => write!(f, "contract `{contract}` already bound with name `{name}`"),
            Self::Conflict {
                contract,
                name: None,
            } => write!(f, "contract `{contract}` already bound"),
            Self::Rejected(reason) => write!(f, "registration rejected: {reason}"),
        }
    }
}

impl Error for RegistrationError {}

/// Registry failure while removing one live entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalError {
    UnknownEntry(LiveEntryId),
    Failed { entry: LiveEntryId, reason: String },
}

impl RemovalError {
    pub fn entry(&self) -> LiveEntryId {
        match self {
            Self::UnknownEntry(entry) | Self::Failed { entry, .. } => *entry,
        }
    }
}

impl Display for RemovalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEntry(entry) => write!(f, "live entry not registered: {entry}"),
            Self::Failed { entry, reason } => {
                write!(f, "failed to remove live entry {entry}: {reason}")
            }
        }
    }
}

impl Error for RemovalError {}
