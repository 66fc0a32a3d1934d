extern crate source_span;

pub mod eval;
pub mod expression;
pub mod grammar;
pub mod input;
pub mod report;
pub mod result;
pub mod serialize;
pub mod syntax;

pub use expression::Expression;
pub use grammar::{Grammar, ParseError};
pub use input::Input;
pub use result::{EvaluateResult, TreeItem, TreeValue};
