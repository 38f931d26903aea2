//! Formula language for variable transformations.
//!
//! A formula wraps one base variable in nested function calls, for example
//! `log(adstock(lag(tv_spend, 1), 0.5))`. This crate provides:
//!
//! - [`parse`]: lenient parsing into a [`TransformationSpec`]
//! - [`validate`]: strict pre-flight checking against known variables
//! - [`format_formula`]: canonical rendering, the inverse of [`parse`]
//!
//! The grammar is deliberately shallow: one temporal wrapper, one
//! decay/saturation stage and one outer pre-transform per formula.
//!
//! [`TransformationSpec`]: mmx_model::TransformationSpec

pub mod format;
pub mod function;
pub mod lexer;
pub mod parse;
pub mod parser;
pub mod validate;

pub use format::{format_formula, formula_examples};
pub use function::{Function, Stage};
pub use parse::parse;
pub use parser::{FormulaSyntax, parse_syntax};
pub use validate::{FormulaValidation, validate};
