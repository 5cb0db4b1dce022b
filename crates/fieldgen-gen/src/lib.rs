//! Code synthesizers consuming the structural model: field constants,
//! accessors, builders, constructors with options, map conversions and
//! enum-constant helpers, plus the output assembler they register their
//! fragments into.

pub mod access;
pub mod accessors;
pub mod asmap;
pub mod builder;
pub mod config;
pub mod consts;
pub mod ctor;
pub mod enums;
pub mod error;
pub mod output;
pub mod rewrite;

pub mod prelude {
    pub use crate::access::{GuardMode, ReadValue, read_value, wrap_value, write_target};
    pub use crate::accessors::AccessorSpec;
    pub use crate::asmap::AsMapSpec;
    pub use crate::builder::BuilderSpec;
    pub use crate::config::{ConstCasing, KeyPolicy, Visibility};
    pub use crate::consts::{ConstSpec, FieldConst, emit_const_block, synthesize};
    pub use crate::ctor::CtorSpec;
    pub use crate::enums::EnumHelperSpec;
    pub use crate::error::GenError;
    pub use crate::output::{ImplTarget, OutputBuilder};
    pub use crate::rewrite::CodeRewriter;
}
