#![forbid(unsafe_code)]

//! Pairwise UAX #14 line breaking with an editable rule table.
//!
//! The table is an ordered list of named rules. Callers that need a
//! different policy at some boundary (treating whitespace runs as units,
//! for example) insert their own rule in front of a standard one or replace
//! it by name, and carry any extra state in the `E` slot of [`BreakState`].
//!
//! # Example
//! ```
//! use lwrap_linebreak::Rules;
//!
//! let rules = Rules::<()>::new();
//! let positions: Vec<usize> = rules.breaks("foo bar").map(|b| b.position).collect();
//! assert_eq!(positions, vec![4, 7]);
//! ```

pub mod breaks;
pub mod class;
pub mod rules;
pub mod state;

pub use breaks::{Breaks, LineBreak};
pub use class::LineClass;
pub use rules::{Rule, RuleError, Rules};
pub use state::{BreakState, CharInfo, Opportunity, Props};
