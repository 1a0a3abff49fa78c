mod common;

use bindkit_core::{BindingSession, CommitFailure, RegistrationError, TypeSignature};
use common::CountingRegistry;
use std::sync::Arc;

#[test]
fn commit_registers_in_declaration_order_and_drains_session() {
    let registry = Arc::new(CountingRegistry::default());
    let mut session = BindingSession::new();
    session.declare_by_name("first");
    session.declare_by_type("com.acme.Second").unwrap();
    session
        .declare_by_type_literal(&TypeSignature::parse("Provider<Third>").unwrap())
        .unwrap();

    let handle = session.commit(registry.clone()).unwrap();

    assert!(session.is_empty());
    assert_eq!(session.pending_len(), 0);
    assert_eq!(handle.len(), 3);
    let order: Vec<Vec<String>> = registry
        .registered()
        .iter()
        .map(|binding| binding.contract_keys().into_iter().map(str::to_string).collect())
        .collect();
    assert_eq!(
        order,
        vec![
            vec!["first".to_string()],
            vec!["com.acme.Second".to_string()],
            vec!["Provider<Third>".to_string()],
        ]
    );
}

#[test]
fn second_commit_without_declarations_is_empty() {
    let registry = Arc::new(CountingRegistry::default());
    let mut session = BindingSession::new();
    session.declare_by_names(["A", "B"]);
    let first = session.commit(registry.clone()).unwrap();
    assert_eq!(first.len(), 1);

    let second = session.commit(registry.clone()).unwrap();
    assert!(second.is_active());
    assert!(second.is_empty());
    assert_eq!(registry.registrations(), 1);

    second.release().unwrap();
    assert_eq!(registry.removals(), 0);
}

#[test]
fn session_accepts_a_new_batch_after_commit() {
    let registry = Arc::new(CountingRegistry::default());
    let mut session = BindingSession::new();
    session.declare_by_name("batch-one");
    let one = session.commit(registry.clone()).unwrap();

    session.declare_by_name("batch-two");
    session.declare_by_name("batch-two-b");
    let two = session.commit(registry.clone()).unwrap();

    assert_eq!(one.len(), 1);
    assert_eq!(two.len(), 2);
    assert!(one.entries().iter().all(|entry| !two.entries().contains(entry)));
}

#[test]
fn committed_bindings_carry_declaration_attributes() {
    let registry = Arc::new(CountingRegistry::default());
    let mut session = BindingSession::new();
    session
        .declare_by_type("com.acme.Greeter")
        .unwrap()
        .named("english")
        .to("com.acme.EnglishGreeter")
        .in_scope("singleton");

    let handle = session.commit(registry.clone()).unwrap();
    let committed = handle.committed();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].binding.name.as_deref(), Some("english"));
    assert_eq!(
        committed[0].binding.implementation.as_deref(),
        Some("com.acme.EnglishGreeter")
    );
    assert_eq!(committed[0].binding.scope.as_deref(), Some("singleton"));
}

#[test]
fn registration_failure_stops_commit_without_rollback() {
    let registry = Arc::new(CountingRegistry::rejecting("reserved"));
    let mut session = BindingSession::new();
    session.declare_by_name("ok-1");
    session.declare_by_name("ok-2");
    session.declare_by_name("reserved");
    session.declare_by_name("never-attempted");

    let err = session.commit(registry.clone()).unwrap_err();

    assert_eq!(err.position(), 2);
    assert!(matches!(
        err.failure(),
        CommitFailure::Registration(RegistrationError::Rejected(_))
    ));
    assert!(session.is_empty());
    // Earlier registrations stay in the registry.
    assert_eq!(registry.registrations(), 2);
    assert_eq!(registry.removals(), 0);

    let unresolved: Vec<&str> = err
        .unresolved()
        .iter()
        .flat_map(|binding| binding.contract_keys())
        .collect();
    assert_eq!(unresolved, vec!["reserved", "never-attempted"]);

    let (_, partial, _) = err.into_parts();
    assert_eq!(partial.len(), 2);
    partial.release().unwrap();
    assert_eq!(registry.removals(), 2);
}

#[test]
fn dropping_partial_handle_leaks_registrations() {
    let registry = Arc::new(CountingRegistry::rejecting("reserved"));
    let mut session = BindingSession::new();
    session.declare_by_name("leaked");
    session.declare_by_name("reserved");

    let err = session.commit(registry.clone()).unwrap_err();
    assert!(err.partial().is_active());
    drop(err);

    assert_eq!(registry.registrations(), 1);
    assert_eq!(registry.removals(), 0);
}

#[test]
fn malformed_binding_fails_before_reaching_registry() {
    let registry = Arc::new(CountingRegistry::default());
    let mut session = BindingSession::new();
    session.declare_by_name("fine");
    session.declare_unqualified().to("com.acme.Nameless");

    let err = session.commit(registry.clone()).unwrap_err();
    assert!(matches!(err.failure(), CommitFailure::MalformedContract(_)));
    assert_eq!(err.position(), 1);
    assert_eq!(registry.registrations(), 1);
    assert!(err.to_string().contains("binding #1"));
}
