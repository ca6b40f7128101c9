//! Advanced filtering
//!
//! Users build a [`FilterConfig`] of groups of conditions. The field
//! registry describes which fields each entity exposes, the compiler turns a
//! configuration into a [`Predicate`] and the codec shares configurations as
//! URL-safe tokens.

pub mod codec;
pub mod compiler;
pub mod error;
pub mod fields;
pub mod model;
pub mod operators;
pub mod predicate;
pub mod validation;

pub use codec::{decode, decode_strict, encode, SCHEMA_VERSION};
pub use compiler::{compile, FilterCompiler};
pub use error::{CodecError, FilterError, Position};
pub use fields::{fields_for, fields_for_name, find_field, FieldType, FilterField};
pub use model::{FilterCondition, FilterConfig, FilterGroup, FilterValue, LogicalOperator, Scalar};
pub use operators::{operator_catalog, operators_for, FilterOperator, OperatorInfo, ValueArity};
pub use predicate::{relative_range, Comparison, Filterable, Predicate};
pub use validation::{validate, ValidationResult};
