//! Type casting module
//!
//! Converts a looked-up attribute value into the type declared by a column.

mod caster;
mod types;

pub use caster::{cast, cast_row};
pub use types::{Row, TypedValue};
