use pretty_assertions::assert_eq;
use trellis_reflect::{
    dynamic_type, dynamic_type_by_id, dynamic_type_of, hash, is_registered, name_of, static_type,
    DynamicTypeInfo, FieldAttribute, MethodAttribute, NullType, Object, TypeAttribute,
    TypeIdentifier,
};

mod common;
use self::common::*;

fn names<'r>(infos: impl Iterator<Item = DynamicTypeInfo<'r>>) -> Vec<&'static str> {
    infos.map(|info| info.name()).collect()
}

#[test]
fn lookup_by_identifier() {
    let registry = init();

    for name in ["Base", "Derived", "BranchedOne", "Empty", "fixtures::Abstract"] {
        let info = registry.lookup(hash(name));
        assert!(info.is_registered(), "{name} is not registered");
        assert_eq!(info.identifier(), hash(name));
        assert_eq!(info.name(), name);
    }

    assert_eq!(registry.lookup_name("Inner"), dynamic_type::<Inner>());
    assert_eq!(registry.lookup_type::<Inner>(), dynamic_type::<Inner>());
}

#[test]
fn unregistered_queries_never_fail() {
    init();

    assert!(!is_registered(hash("NeverDeclared")));

    let missing = dynamic_type_by_id(hash("NeverDeclared"));
    assert!(!missing.is_registered());
    assert_eq!(missing.name(), "<UnregisteredType>");
    assert!(missing.identifier().is_invalid());
    assert!(!missing.has_base_type());
    assert_eq!(missing.derived_types().count(), 0);
    assert!(missing.instantiate().is_none());
    assert!(!missing.is_a(TypeIdentifier::of::<Base>()));
    assert!(!missing.is_type(TypeIdentifier::INVALID));

    let reflected = dynamic_type::<NeverRegistered>();
    assert!(!reflected.is_registered());
    assert!(reflected.static_info().is_none());
}

#[test]
fn type_equality() {
    init();
    let derived = dynamic_type::<Derived>();

    assert!(derived.is_type(TypeIdentifier::of::<Derived>()));
    assert!(derived.is_type(derived));
    assert!(!derived.is_type(TypeIdentifier::of::<Base>()));
    assert!(!derived.is_type(TypeIdentifier::of::<Inner>()));

    assert_eq!(derived, dynamic_type_by_id(hash("Derived")));
    assert_ne!(derived, dynamic_type::<Base>());
    assert_eq!(derived.static_info(), Some(static_type::<Derived>()));
}

#[test]
fn inheritance_is_transitive() {
    init();
    let base = dynamic_type::<Base>();
    let derived = dynamic_type::<Derived>();
    let one = dynamic_type::<BranchedOne>();

    assert!(one.is_derived_from(derived));
    assert!(derived.is_derived_from(base));
    assert!(one.is_derived_from(base));

    assert!(base.is_base_of(derived));
    assert!(derived.is_base_of(one));
    assert!(base.is_base_of(one));

    // Antisymmetric and irreflexive.
    assert!(!base.is_derived_from(one));
    assert!(!one.is_base_of(base));
    assert!(!one.is_derived_from(one));
    assert!(!one.is_base_of(one));

    assert!(one.is_a(one));
    assert!(one.is_a(base));
    assert!(!base.is_a(one));
}

#[test]
fn siblings_are_unrelated() {
    init();
    let one = dynamic_type::<BranchedOne>();
    let two = dynamic_type::<BranchedTwo>();

    assert!(!one.is_derived_from(two));
    assert!(!one.is_base_of(two));
    assert!(!two.is_a(one));
}

#[test]
fn base_and_derived_types() {
    init();
    let base = dynamic_type::<Base>();
    let derived = dynamic_type::<Derived>();

    assert_eq!(derived.base_type(), base);
    assert!(derived.has_base_type());
    assert!(!base.has_base_type());
    assert!(!base.base_type().is_registered());

    assert_eq!(names(base.derived_types()), ["Derived"]);
    assert_eq!(names(derived.derived_types()), ["BranchedOne", "BranchedTwo"]);
    assert_eq!(
        names(base.descendants()),
        ["Derived", "BranchedOne", "BranchedTwo"]
    );
    assert_eq!(
        names(dynamic_type::<BranchedTwo>().ancestors()),
        ["Derived", "Base"]
    );
}

#[test]
fn null_type_lists_roots() {
    let registry = init();
    let null = registry.null_type();

    assert!(null.is_null_type());
    assert!(null.is_type(TypeIdentifier::of::<NullType>()));
    assert!(!null.has_base_type());

    let roots = names(null.derived_types());
    for root in ["Base", "Empty", "Inner", "trellis::TypeAttribute"] {
        assert!(roots.contains(&root), "{root} is missing from {roots:?}");
    }
    assert!(!roots.contains(&"Derived"));

    // The sentinel takes no part in the base relation.
    assert!(!null.is_base_of(TypeIdentifier::of::<Base>()));
    assert!(!dynamic_type::<Base>().is_derived_from(null));
}

#[test]
fn builtin_attribute_types() {
    init();

    for info in [
        dynamic_type::<TypeAttribute>(),
        dynamic_type::<FieldAttribute>(),
        dynamic_type::<MethodAttribute>(),
    ] {
        assert!(info.is_registered());
        assert!(!info.is_constructible());
        assert!(!info.has_base_type());
    }

    assert!(dynamic_type::<State>().is_derived_from(&TypeAttribute));
    assert!(dynamic_type::<Range>().is_derived_from(&FieldAttribute));
    assert_eq!(
        names(dynamic_type::<TypeAttribute>().derived_types()),
        ["State"]
    );
}

#[test]
fn instance_queries() {
    init();
    let one = branched_one();
    let two = branched_two();

    assert_eq!(dynamic_type_of(&one), dynamic_type::<BranchedOne>());
    assert_eq!(name_of(&two), "BranchedTwo");

    let object: &dyn Object = &one;
    assert_eq!(object.type_info(), dynamic_type::<BranchedOne>());
    assert!(object.type_info().is_a(&two.base));

    assert!(dynamic_type::<Base>().is_a_instance(&one));
    assert!(dynamic_type::<BranchedOne>().is_a_instance(&one));
    assert!(!dynamic_type::<BranchedTwo>().is_a_instance(&one));
    assert!(!dynamic_type::<Inner>().is_a_instance(&one));

    // Instances convert into identifiers directly.
    assert!(dynamic_type::<Derived>().is_base_of(&one));
    assert!(!dynamic_type::<Derived>().is_base_of(&one.base));
}

#[test]
fn constructibility() {
    init();

    assert!(dynamic_type::<Base>().is_constructible());
    assert!(dynamic_type::<Empty>().is_constructible());
    assert!(!dynamic_type::<Abstract>().is_constructible());
}

#[test]
fn handles_order_by_identifier() {
    init();
    let mut infos = vec![
        dynamic_type::<Base>(),
        dynamic_type::<Derived>(),
        dynamic_type::<Inner>(),
    ];
    infos.sort();

    let identifiers: Vec<_> = infos.iter().map(|info| info.identifier()).collect();
    let mut sorted = identifiers.clone();
    sorted.sort();
    assert_eq!(identifiers, sorted);
}
