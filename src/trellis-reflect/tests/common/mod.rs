#![allow(dead_code)]

use trellis_reflect::{initialize, unreflected, FieldAttribute, Reflect, Registry, TypeAttribute};

/// Type-level attribute carrying a flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct State {
    #[field(base)]
    pub base: TypeAttribute,
    #[field]
    pub state: bool,
}

impl State {
    pub const fn new(state: bool) -> Self {
        Self {
            base: TypeAttribute,
            state,
        }
    }
}

/// Field-level attribute bounding a numeric value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct Range {
    #[field(base)]
    pub base: FieldAttribute,
    #[field]
    pub min: i32,
    #[field]
    pub max: i32,
}

impl Range {
    pub const fn new(min: i32, max: i32) -> Self {
        Self {
            base: FieldAttribute,
            min,
            max,
        }
    }
}

/// Marker attribute without any data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct Serializable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct Empty;

#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct Base {
    #[field]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(attributes(State { base: TypeAttribute, state: false }))]
pub struct Derived {
    #[field(base)]
    pub base: Base,
    #[field(attributes(Range::new(0, 100), Serializable))]
    pub value: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct Inner {
    #[field]
    pub flag: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(attributes(Serializable, State::new(true)))]
pub struct BranchedOne {
    #[field(base)]
    pub base: Derived,
    #[field]
    pub enabled: bool,
    #[field(name = "nested")]
    pub inner: Inner,
    pub scratch: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct BranchedTwo {
    #[field(base)]
    pub base: Derived,
    #[field]
    pub ratio: f32,
}

#[derive(Debug, PartialEq, Reflect)]
#[reflect(name = "fixtures::Abstract", no_default)]
pub struct Abstract {
    #[field]
    pub id: u32,
}

/// Reflected, but deliberately left out of [`init`].
#[derive(Debug, Default, Reflect)]
pub struct NeverRegistered {
    #[field]
    pub id: u32,
}

pub struct Undefined;

unreflected!(Undefined);

pub fn branched_one() -> BranchedOne {
    BranchedOne {
        base: Derived {
            base: Base {
                name: "one".to_owned(),
            },
            value: 1,
        },
        enabled: true,
        inner: Inner { flag: true },
        scratch: 0,
    }
}

pub fn branched_two() -> BranchedTwo {
    BranchedTwo {
        base: Derived {
            base: Base {
                name: "two".to_owned(),
            },
            value: 2,
        },
        ratio: 0.5,
    }
}

/// Installs the global registry with every fixture except
/// [`NeverRegistered`].
pub fn init() -> &'static Registry {
    initialize(|builder| {
        builder.register::<State>()?;
        builder.register::<Range>()?;
        builder.register::<Serializable>()?;
        builder.register::<Empty>()?;
        builder.register::<BranchedOne>()?;
        builder.register::<BranchedTwo>()?;
        builder.register::<Inner>()?;
        builder.register::<Abstract>()?;
        Ok(())
    })
    .expect("fixture registration failed")
}
