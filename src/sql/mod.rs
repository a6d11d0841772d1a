pub mod bind;
pub mod error;
pub mod partial_update;
pub mod predicate;
pub mod types;

pub use error::SqlError;
pub use partial_update::{sql_for_partial_update, Column, SetClause};
pub use predicate::{Op, Operand, Predicate, WhereClause};
pub use types::{SqlResult, SqlValue};
