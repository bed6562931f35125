//! Field validation engine.
//!
//! Provides the violation types, a composable rule set that evaluates every
//! applicable rule without stopping at the first failure, and a bridge from
//! `validator` derive errors into the same shape.

pub mod params;
pub mod rule_set;
pub mod rules;

pub use rule_set::RuleSet;
pub use rules::{FieldError, ValidationErrors};
