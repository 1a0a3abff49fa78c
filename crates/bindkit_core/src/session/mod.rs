//! Binding staging and commit.
//!
//! # Responsibility
//! - Accumulate declared-but-unresolved bindings in declaration order.
//! - Commit a whole batch into a registry and hand back one releasable handle.
//!
//! # Invariants
//! - `commit` drains the pending list by move; it is empty afterwards even
//!   when a binding fails.
//! - Bindings are resolved strictly in declaration order.

pub mod binding;
pub mod binding_session;
