use trellis_utils::hash::*;

#[test]
fn test_djb2() {
    assert_eq!(djb2("m_packedName"), 307420154);
    assert_eq!(djb2(""), 5381);
}

#[test]
fn test_fnv1a() {
    assert_eq!(fnv1a(""), 0xcbf29ce484222325);
    assert_eq!(fnv1a("a"), 0xaf63dc4c8601ec8c);
    assert_eq!(fnv1a("foobar"), 0x85944171f73967e8);
}

#[test]
fn test_fnv1a_builder() {
    assert_eq!(
        Fnv1aBuilder::new()
            .feed("foo")
            .feed("")
            .feed("bar")
            .finish(),
        fnv1a("foobar")
    );
}

#[test]
fn test_const_evaluation() {
    const BASE: u64 = fnv1a("Base");

    assert_eq!(BASE, fnv1a("Base"));
    assert_ne!(BASE, fnv1a("Derived"));
}
