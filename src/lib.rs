pub mod cli;
pub mod output;
pub mod run;

pub use fieldgen_expr as expr;
pub use fieldgen_gen as codegen;
pub use fieldgen_ir as ir;

pub mod prelude {
    pub use fieldgen_gen::prelude::*;
    pub use fieldgen_ir::prelude::*;
}
