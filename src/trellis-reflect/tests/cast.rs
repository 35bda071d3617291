use std::ptr;

use trellis_reflect::{cast, cast_box, cast_mut, Object, Reflect, RegistryBuilder};

mod common;
use self::common::*;

#[test]
fn exact_cast_yields_the_same_object() {
    init();
    let one = branched_one();

    let view = cast::<BranchedOne>(&one).unwrap();
    assert!(ptr::eq(view.get(), &one));
    assert_eq!(view.type_info().name(), "BranchedOne");
}

#[test]
fn upcast_to_ancestors() {
    init();
    let one = branched_one();

    let derived = cast::<Derived>(&one).unwrap();
    assert!(ptr::eq(derived.get(), &one.base));
    assert_eq!(derived.value, 1);
    assert_eq!(derived.type_info().name(), "BranchedOne");

    let base = cast::<Base>(&one).unwrap();
    assert_eq!(base.name, "one");
    assert_eq!(base.identifier(), one.as_object().identifier());
}

#[test]
fn views_keep_the_complete_object() {
    init();
    let one = branched_one();

    let derived = cast::<Derived>(&one).unwrap();
    let base = derived.cast::<Base>().unwrap();
    assert_eq!(base.type_info().name(), "BranchedOne");
    assert!(ptr::eq(
        base.object().downcast_ref::<BranchedOne>().unwrap(),
        &one
    ));

    // Casting back down only reaches the actual type.
    assert!(base.cast::<BranchedOne>().is_some());
    assert!(base.cast::<BranchedTwo>().is_none());

    // The embedded subobject on its own is just a Derived.
    let inner = cast::<Base>(derived.get()).unwrap();
    assert_eq!(inner.type_info().name(), "Derived");
    assert!(inner.cast::<BranchedOne>().is_none());
}

#[test]
fn siblings_and_descendants_are_rejected() {
    init();
    let one = branched_one();

    assert!(cast::<BranchedTwo>(&one).is_none());
    assert!(cast::<Inner>(&one).is_none());
    assert!(cast::<Empty>(&one).is_none());

    let derived = Derived::default();
    assert!(cast::<BranchedOne>(&derived).is_none());
    assert!(cast::<BranchedTwo>(&derived).is_none());
}

#[test]
fn casts_through_erased_references() {
    let registry = init();
    let objects: Vec<Box<dyn Object>> = vec![
        Box::new(branched_one()),
        Box::new(branched_two()),
        Box::new(Inner::default()),
    ];

    let names: Vec<_> = objects
        .iter()
        .filter_map(|object| cast::<Base>(&**object))
        .map(|base| base.name.clone())
        .collect();
    assert_eq!(names, ["one", "two"]);

    assert!(registry.can_cast::<Derived>(&*objects[1]));
    assert!(!registry.can_cast::<BranchedOne>(&*objects[1]));
    assert!(!registry.can_cast::<Base>(&*objects[2]));
}

#[test]
fn mutable_casts() {
    init();
    let mut one = branched_one();

    {
        let mut base = cast_mut::<Base>(&mut one).unwrap();
        assert_eq!(base.type_info().name(), "BranchedOne");
        base.name.push_str("-renamed");

        let mut actual = base.cast::<BranchedOne>().unwrap();
        actual.enabled = false;
        assert!(base.cast::<BranchedTwo>().is_none());
    }

    assert_eq!(one.base.base.name, "one-renamed");
    assert!(!one.enabled);

    assert!(cast_mut::<BranchedTwo>(&mut one).is_none());

    let mut derived = cast_mut::<Derived>(&mut one).unwrap();
    derived.value += 1;
    assert_eq!(derived.as_ref().value, 2);
    assert_eq!(derived.into_object().name(), "BranchedOne");
}

#[test]
fn owned_casts_are_exact() {
    init();
    let object: Box<dyn Object> = Box::new(branched_two());

    let object = match cast_box::<Derived>(object) {
        Ok(_) => panic!("owned cast to a base succeeded"),
        Err(object) => object,
    };
    let two = cast_box::<BranchedTwo>(object).ok().unwrap();
    assert_eq!(*two, branched_two());
}

#[test]
fn casts_consult_the_given_registry() {
    init();
    let one = branched_one();

    let mut builder = RegistryBuilder::new();
    builder.register::<Base>().unwrap();
    let registry = builder.build();

    // BranchedOne is unknown here, so its ancestry is too.
    assert!(registry.cast::<Base>(&one).is_none());
    assert!(registry.cast::<BranchedOne>(&one).is_some());

    let base = Base::default();
    assert!(registry.cast::<Base>(&base).is_some());
}

#[test]
fn views_keep_their_registry() {
    #[derive(Default, Reflect)]
    struct Root {
        #[field]
        depth: u32,
    }

    #[derive(Default, Reflect)]
    struct Middle {
        #[field(base)]
        base: Root,
    }

    #[derive(Default, Reflect)]
    struct Leaf {
        #[field(base)]
        base: Middle,
    }

    init();
    let mut builder = RegistryBuilder::new();
    builder.register::<Leaf>().unwrap();
    let registry = builder.build();

    // The global registry does not know the chain at all.
    let mut leaf = Leaf::default();
    assert!(cast::<Root>(&leaf).is_none());

    let middle = registry.cast::<Middle>(&leaf).unwrap();
    assert_eq!(middle.cast::<Root>().map(|root| root.depth), Some(0));

    let mut middle = registry.cast_mut::<Middle>(&mut leaf).unwrap();
    middle.cast::<Root>().unwrap().depth = 3;
    assert_eq!(leaf.base.base.depth, 3);
}
