use trellis_reflect::{
    cast, construct, construct_as, construct_by_id, dynamic_type, hash, static_type,
    TypeAttribute, TypeIdentifier,
};

mod common;
use self::common::*;

#[test]
fn construct_exact_types() {
    init();

    assert_eq!(construct::<BranchedOne>().as_deref(), Some(&BranchedOne::default()));
    assert_eq!(construct::<Empty>().as_deref(), Some(&Empty));
}

#[test]
fn construct_by_identifier() {
    init();

    let object = construct_by_id(TypeIdentifier::of::<Derived>()).unwrap();
    assert!(object.is::<Derived>());
    assert_eq!(object.name(), "Derived");

    let object = dynamic_type::<BranchedTwo>().instantiate().unwrap();
    assert_eq!(object.downcast_ref::<BranchedTwo>(), Some(&BranchedTwo::default()));
}

#[test]
fn abstract_types_are_not_constructed() {
    init();

    assert!(construct::<Abstract>().is_none());
    assert!(construct::<TypeAttribute>().is_none());
    assert!(construct_by_id(TypeIdentifier::of::<Abstract>()).is_none());
    assert!(!static_type::<Abstract>().is_constructible());
}

#[test]
fn unregistered_types_are_not_constructed() {
    init();

    assert!(construct_by_id(hash("NeverDeclared")).is_none());
    assert!(construct::<NeverRegistered>().is_none());

    // The static description works without the registry.
    let object = static_type::<NeverRegistered>().instantiate().unwrap();
    assert!(object.is::<NeverRegistered>());
}

#[test]
fn construct_as_base() {
    init();
    let two = TypeIdentifier::of::<BranchedTwo>();

    let object = construct_as::<Base>(two).unwrap();
    assert_eq!(object.name(), "BranchedTwo");
    assert!(cast::<Base>(&*object).is_some());

    assert!(construct_as::<BranchedTwo>(two).is_some());
    assert!(construct_as::<BranchedOne>(two).is_none());
    assert!(construct_as::<Inner>(two).is_none());
}
