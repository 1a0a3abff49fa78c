//! Single-pass binding session.

use crate::contract::{Contract, TypeName};
use crate::handle::{BindingsHandle, CommittedBinding};
use crate::registry::{ComponentRegistry, RegistrationError};
use crate::session::binding::{BindingDeclaration, MalformedContractError, StagedBinding};
use crate::signature::key::TypeKeyError;
use crate::signature::type_signature::TypeSignature;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Staging area for one batch of bindings.
///
/// Declaration and commit take `&mut self`, so a session is assembled and
/// committed from one thread at a time.
#[derive(Debug, Default)]
pub struct BindingSession {
    pending: Vec<StagedBinding>,
}

impl BindingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bindings waiting for commit.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending bindings in declaration order.
    pub fn pending(&self) -> &[StagedBinding] {
        &self.pending
    }

    /// Declares one binding looked up by `name`.
    pub fn declare_by_name(&mut self, name: impl Into<String>) -> BindingDeclaration<'_> {
        self.declare_with([Contract::name(name)])
    }

    /// Declares one binding carrying every name in `names` as alternate keys.
    pub fn declare_by_names<I, S>(&mut self, names: I) -> BindingDeclaration<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare_with(names.into_iter().map(Contract::name))
    }

    /// Declares one binding looked up by a class-like type.
    ///
    /// An invalid type name is rejected here and nothing is staged.
    pub fn declare_by_type(
        &mut self,
        type_name: impl Into<TypeName>,
    ) -> Result<BindingDeclaration<'_>, TypeKeyError> {
        let contract = Contract::of_type(type_name)?;
        Ok(self.declare_with([contract]))
    }

    /// Declares one binding carrying every type in `types` as alternate keys.
    ///
    /// Every name is checked before the binding is staged.
    pub fn declare_by_types<I, T>(
        &mut self,
        types: I,
    ) -> Result<BindingDeclaration<'_>, TypeKeyError>
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        let contracts = types
            .into_iter()
            .map(Contract::of_type)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.declare_with(contracts))
    }

    /// Declares one binding looked up by a parameterized type.
    ///
    /// The canonical key is derived up front, so a malformed signature is
    /// rejected here and nothing is staged.
    pub fn declare_by_type_literal(
        &mut self,
        signature: &TypeSignature,
    ) -> Result<BindingDeclaration<'_>, TypeKeyError> {
        let contract = Contract::signature(signature)?;
        Ok(self.declare_with([contract]))
    }

    /// Declares a binding with no contract yet.
    ///
    /// A contract must be attached through the returned declaration before
    /// commit, otherwise commit fails on this binding.
    pub fn declare_unqualified(&mut self) -> BindingDeclaration<'_> {
        self.declare_with(std::iter::empty())
    }

    fn declare_with(
        &mut self,
        contracts: impl IntoIterator<Item = Contract>,
    ) -> BindingDeclaration<'_> {
        let mut binding = StagedBinding::new();
        for contract in contracts {
            binding.add_contract(contract);
        }
        let index = self.pending.len();
        self.pending.push(binding);
        BindingDeclaration::new(&mut self.pending[index])
    }

    /// Registers every pending binding with `registry`, in declaration order.
    ///
    /// The registry is taken as a shared trait object; the returned handle
    /// keeps its own reference for `release`.
    ///
    /// The pending list is drained before the first registration, so the
    /// session is empty afterwards whatever the outcome.
    ///
    /// # Errors
    /// Stops at the first binding that is malformed or rejected. Bindings
    /// registered earlier in the same call are not rolled back: they are
    /// returned inside `CommitError` as a partial handle, and stay registered
    /// if that handle is dropped without `release`.
    pub fn commit(
        &mut self,
        registry: Arc<dyn ComponentRegistry>,
    ) -> Result<BindingsHandle, CommitError> {
        let pending = std::mem::take(&mut self.pending);
        let total = pending.len();
        info!("event=bindings_commit module=session status=start pending={total}");

        let mut committed = Vec::with_capacity(total);
        let mut remaining = pending.into_iter();
        while let Some(binding) = remaining.next() {
            let outcome = match binding.validate() {
                Ok(()) => registry
                    .resolve_and_register(&binding)
                    .map_err(CommitFailure::Registration),
                Err(err) => Err(CommitFailure::MalformedContract(err)),
            };

            match outcome {
                Ok(entry) => committed.push(CommittedBinding { binding, entry }),
                Err(failure) => {
                    let position = committed.len();
                    error!(
                        "event=bindings_commit module=session status=error position={} contracts={:?} error={}",
                        position,
                        binding.contract_keys(),
                        failure
                    );
                    let mut unresolved = vec![binding];
                    unresolved.extend(remaining);
                    return Err(CommitError {
                        failure,
                        position,
                        partial: BindingsHandle::new(registry, committed),
                        unresolved,
                    });
                }
            }
        }

        info!("event=bindings_commit module=session status=ok registered={total}");
        Ok(BindingsHandle::new(registry, committed))
    }
}

/// Why one binding could not be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitFailure {
    MalformedContract(MalformedContractError),
    Registration(RegistrationError),
}

impl Display for CommitFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedContract(err) => write!(f, "{err}"),
            Self::Registration(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommitFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedContract(err) => Some(err),
            Self::Registration(err) => Some(err),
        }
    }
}

/// Failed commit, carrying whatever the caller needs to clean up.
#[derive(Debug)]
pub struct CommitError {
    failure: CommitFailure,
    position: usize,
    partial: BindingsHandle,
    unresolved: Vec<StagedBinding>,
}

impl CommitError {
    pub fn failure(&self) -> &CommitFailure {
        &self.failure
    }

    /// Declaration index of the failing binding.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Handle over the bindings registered before the failure.
    pub fn partial(&self) -> &BindingsHandle {
        &self.partial
    }

    /// The failing binding followed by every binding never attempted.
    pub fn unresolved(&self) -> &[StagedBinding] {
        &self.unresolved
    }

    pub fn into_parts(self) -> (CommitFailure, BindingsHandle, Vec<StagedBinding>) {
        (self.failure, self.partial, self.unresolved)
    }
}

impl Display for CommitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "commit failed at binding #{} ({} registered before it): {}",
            self.position,
            self.partial.len(),
            self.failure
        )
    }
}

impl Error for CommitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.failure)
    }
}

#[cfg(test)]
mod tests {
    use super::{BindingSession, CommitFailure};
    use crate::registry::in_memory::InMemoryRegistry;
    use crate::registry::{ComponentRegistry, RemovalError};
    use crate::session::binding::MalformedContractError;
    use crate::signature::key::TypeKeyError;
    use crate::signature::type_signature::TypeSignature;
    use std::sync::Arc;

    #[test]
    fn declare_by_names_stages_one_binding() {
        let mut session = BindingSession::new();
        let id = session.declare_by_names(["A", "B"]).id();
        assert_eq!(session.pending_len(), 1);
        assert_eq!(session.pending()[0].id, id);
        assert_eq!(session.pending()[0].contract_keys(), vec!["A", "B"]);
    }

    #[test]
    fn declare_by_types_stages_one_binding() {
        let mut session = BindingSession::new();
        session
            .declare_by_types(["com.acme.Foo", "com.acme.FooApi"])
            .expect("valid type names");
        session.declare_by_type("com.acme.Bar").expect("valid type name");
        assert_eq!(session.pending_len(), 2);
        assert_eq!(
            session.pending()[0].contract_keys(),
            vec!["com.acme.Foo", "com.acme.FooApi"]
        );
    }

    #[test]
    fn generic_text_is_not_a_type_contract() {
        let mut session = BindingSession::new();
        let err = session
            .declare_by_type("List<Foo>")
            .expect_err("generic text must go through a type literal");
        assert_eq!(err, TypeKeyError::InvalidTypeName("List<Foo>".to_string()));

        let err = session
            .declare_by_types(["com.acme.Foo", "com..Bad"])
            .expect_err("one invalid name rejects the whole binding");
        assert_eq!(err, TypeKeyError::InvalidTypeName("com..Bad".to_string()));
        assert!(session.is_empty());

        let literal = TypeSignature::parse("List<Foo>").expect("parse");
        session.declare_by_type_literal(&literal).expect("type literal");
        assert_eq!(session.pending()[0].contract_keys(), vec!["List<Foo>"]);
    }

    #[test]
    fn commits_through_shared_trait_object() {
        let registry: Arc<dyn ComponentRegistry> = Arc::new(InMemoryRegistry::new());
        let mut session = BindingSession::new();
        session.declare_by_name("shared").to("com.acme.Shared");

        let handle = session.commit(Arc::clone(&registry)).expect("commit");
        assert!(session.is_empty());
        let entries = handle.entries();
        assert_eq!(entries.len(), 1);

        handle.release().expect("release");
        assert_eq!(
            registry.remove(entries[0]),
            Err(RemovalError::UnknownEntry(entries[0]))
        );
    }

    #[test]
    fn invalid_type_literal_stages_nothing() {
        let mut session = BindingSession::new();
        let err = session
            .declare_by_type_literal(&TypeSignature::wildcard())
            .expect_err("wildcard is not a contract");
        assert_eq!(err, TypeKeyError::BareWildcard);
        assert!(session.is_empty());
    }

    #[test]
    fn unqualified_binding_needs_a_contract_before_commit() {
        let registry = Arc::new(InMemoryRegistry::new());
        let mut session = BindingSession::new();
        session.declare_unqualified().named("orphan");

        let err = session.commit(registry.clone()).expect_err("no contract attached");
        assert!(matches!(
            err.failure(),
            CommitFailure::MalformedContract(MalformedContractError::NoContract(_))
        ));
        assert_eq!(err.position(), 0);
        assert!(session.is_empty());
        assert!(registry.is_empty());

        session.declare_unqualified().add_name("late");
        let handle = session.commit(registry.clone()).expect("contract attached late");
        assert_eq!(handle.len(), 1);
        assert_eq!(registry.lookup("late"), handle.entries());
    }
}
