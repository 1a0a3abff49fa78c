//! Transactional service-binding sessions.
//!
//! Callers stage contract bindings on a `BindingSession`, commit the batch into
//! a `ComponentRegistry`, and later tear the whole batch down through the
//! returned `BindingsHandle`.

pub mod contract;
pub mod handle;
pub mod logging;
pub mod registry;
pub mod session;
pub mod signature;

pub use contract::{Contract, TypeName};
pub use handle::{BindingsHandle, CommittedBinding, ReleaseError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use registry::in_memory::InMemoryRegistry;
pub use registry::{ComponentRegistry, LiveEntryId, RegistrationError, RemovalError};
pub use session::binding::{BindingDeclaration, BindingId, MalformedContractError, StagedBinding};
pub use session::binding_session::{BindingSession, CommitError, CommitFailure};
pub use signature::key::{derive_type_key, is_valid_type_name, TypeKeyError, MAX_SIGNATURE_DEPTH};
pub use signature::parse::SignatureParseError;
pub use signature::type_signature::TypeSignature;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
