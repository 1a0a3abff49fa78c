mod common;

use bindkit_core::{BindingSession, ComponentRegistry, InMemoryRegistry, TypeSignature};
use common::CountingRegistry;
use std::sync::Arc;

#[test]
fn multi_name_and_generic_bindings_round_trip_counts() {
    let registry = Arc::new(CountingRegistry::default());
    let mut session = BindingSession::new();
    session.declare_by_names(["A", "B"]);
    session
        .declare_by_type_literal(&TypeSignature::parameterized(
            "List",
            [TypeSignature::raw("Foo")],
        ))
        .unwrap();

    let handle = session.commit(registry.clone()).unwrap();
    assert_eq!(registry.registrations(), 2);

    handle.release().unwrap();
    assert_eq!(registry.removals(), 2);
    assert!(!handle.is_active());
}

#[test]
fn in_memory_registry_serves_generic_lookup_until_release() {
    let registry = Arc::new(InMemoryRegistry::new());
    let mut session = BindingSession::new();
    session.declare_by_names(["A", "B"]).to("com.acme.Ab");
    session
        .declare_by_type_literal(&TypeSignature::parse("Provider<java.util.List<Foo>>").unwrap())
        .unwrap()
        .to("com.acme.FooListProvider");

    let handle = session.commit(registry.clone()).unwrap();
    let entries = handle.entries();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.lookup("A"), vec![entries[0]]);
    assert_eq!(registry.lookup("B"), vec![entries[0]]);

    let wanted = TypeSignature::parse("Provider<java.util.List<Foo>>").unwrap();
    assert_eq!(registry.lookup_type(&wanted).unwrap(), vec![entries[1]]);
    assert_eq!(
        registry
            .get(entries[1])
            .and_then(|binding| binding.implementation),
        Some("com.acme.FooListProvider".to_string())
    );

    handle.release().unwrap();
    assert!(registry.is_empty());
    assert!(registry.lookup("A").is_empty());
    assert!(registry.lookup_type(&wanted).unwrap().is_empty());
}

#[test]
fn releasing_one_batch_leaves_other_batches_registered() {
    let registry = Arc::new(InMemoryRegistry::new());
    let mut session = BindingSession::new();
    session.declare_by_name("shared").named("first");
    let first = session.commit(registry.clone()).unwrap();

    session.declare_by_name("shared").named("second");
    let second = session.commit(registry.clone()).unwrap();
    assert_eq!(registry.lookup("shared").len(), 2);

    first.release().unwrap();
    assert_eq!(registry.lookup("shared"), second.entries());
    assert!(registry.lookup_named("shared", "first").is_none());
    assert!(second.is_active());
}

#[test]
fn conflicting_batch_reports_partial_handle() {
    let registry = Arc::new(InMemoryRegistry::new());
    let mut session = BindingSession::new();
    session.declare_by_name("greeter").named("en");
    let _existing = session.commit(registry.clone()).unwrap();

    session.declare_by_name("farewell").named("en");
    session.declare_by_name("greeter").named("en");
    let err = session.commit(registry.clone()).unwrap_err();

    assert_eq!(err.position(), 1);
    assert_eq!(err.partial().len(), 1);
    assert_eq!(registry.len(), 2);

    err.partial().release().unwrap();
    assert_eq!(registry.len(), 1);
    assert!(registry.lookup("farewell").is_empty());
}

#[test]
fn sessions_share_one_registry_trait_object() {
    let counting = Arc::new(CountingRegistry::default());
    let shared: Arc<dyn ComponentRegistry> = counting.clone();

    let mut first = BindingSession::new();
    first.declare_by_name("alpha");
    let mut second = BindingSession::new();
    second.declare_by_names(["beta", "gamma"]);
    second.declare_by_type("com.acme.Delta").unwrap();

    let one = first.commit(Arc::clone(&shared)).unwrap();
    let two = second.commit(Arc::clone(&shared)).unwrap();
    assert_eq!(counting.registrations(), 3);

    two.release().unwrap();
    assert_eq!(counting.removals(), 2);
    assert!(one.is_active());
    one.release().unwrap();
    assert_eq!(counting.removals(), 3);
}
