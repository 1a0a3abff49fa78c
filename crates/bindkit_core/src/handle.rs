//! Group lifecycle for one committed batch of bindings.
//!
//! # Responsibility
//! - Own the `(binding, live entry)` pairs produced by one commit.
//! - Tear all of them down through the registry in a single `release`.
//!
//! # Invariants
//! - State is either fully present (active) or fully cleared (released).
//! - The active check and the clear happen in one critical section, so at
//!   most one `release` call ever reaches the registry.
//! - The internal lock is never held while calling into the registry.

use crate::registry::{ComponentRegistry, LiveEntryId, RemovalError};
use crate::session::binding::StagedBinding;
use log::{info, warn};
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// One staged binding together with the entry the registry issued for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedBinding {
    pub binding: StagedBinding,
    pub entry: LiveEntryId,
}

struct ActiveBindings {
    registry: Arc<dyn ComponentRegistry>,
    committed: Vec<CommittedBinding>,
}

/// Releasable handle returned by `BindingSession::commit`.
///
/// Dropping an active handle does not release anything; entries stay
/// registered until `release` is called.
#[must_use = "dropping an active handle leaves its bindings registered"]
pub struct BindingsHandle {
    state: Mutex<Option<ActiveBindings>>,
}

impl BindingsHandle {
    pub(crate) fn new(
        registry: Arc<dyn ComponentRegistry>,
        committed: Vec<CommittedBinding>,
    ) -> Self {
        Self {
            state: Mutex::new(Some(ActiveBindings {
                registry,
                committed,
            })),
        }
    }

    /// Returns `true` until a `release` call has claimed this handle.
    pub fn is_active(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Number of live entries owned; `0` once released.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .as_ref()
            .map_or(0, |active| active.committed.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of owned live entries in commit order; empty once released.
    pub fn entries(&self) -> Vec<LiveEntryId> {
        self.state.lock().as_ref().map_or_else(Vec::new, |active| {
            active.committed.iter().map(|item| item.entry).collect()
        })
    }

    /// Snapshot of owned bindings in commit order; empty once released.
    pub fn committed(&self) -> Vec<CommittedBinding> {
        self.state
            .lock()
            .as_ref()
            .map_or_else(Vec::new, |active| active.committed.clone())
    }

    /// Removes every owned entry from the registry and deactivates the handle.
    ///
    /// The handle turns inactive as soon as this call claims it, before the
    /// registry removals run. Every removal is attempted even if some fail.
    ///
    /// # Errors
    /// - `AlreadyReleased` when another call already released this handle.
    /// - `Removal` with every per-entry failure; the handle is still inactive.
    pub fn release(&self) -> Result<(), ReleaseError> {
        let Some(active) = self.state.lock().take() else {
            return Err(ReleaseError::AlreadyReleased);
        };

        let mut failures = Vec::new();
        for item in &active.committed {
            if let Err(err) = active.registry.remove(item.entry) {
                warn!(
                    "event=bindings_release module=handle status=error entry={} error={}",
                    item.entry, err
                );
                failures.push(err);
            }
        }

        let status = if failures.is_empty() { "ok" } else { "error" };
        info!(
            "event=bindings_release module=handle status={} removed={} failed={}",
            status,
            active.committed.len() - failures.len(),
            failures.len()
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ReleaseError::Removal(failures))
        }
    }
}

impl Debug for BindingsHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BindingsHandle")
            .field("active", &state.is_some())
            .field(
                "entries",
                &state.as_ref().map_or(0, |active| active.committed.len()),
            )
            .finish()
    }
}

/// Errors returned by `BindingsHandle::release`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseError {
    AlreadyReleased,
    /// Removal failures collected across all entries.
    Removal(Vec<RemovalError>),
}

impl Display for ReleaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyReleased => write!(f, "bindings handle already released"),
            Self::Removal(failures) => {
                write!(f, "{} live entries failed to release", failures.len())?;
                if let Some(first) = failures.first() {
                    write!(f, ": {first}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for ReleaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadyReleased => None,
            Self::Removal(failures) => failures.first().map(|err| err as &(dyn Error + 'static)),
        }
    }
}
