//! Typed failures for program validation and area calculation.
//!
//! Every variant names the offending field or identifier so a form,
//! CLI menu, or loader can point the user at what to correct.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgramError {
    /// Circulation or loss factor outside `[0, 1)`, or not finite.
    #[error("{field} must be in [0, 1), got {value}")]
    InvalidFactor { field: &'static str, value: f64 },

    /// A workspace or support-space count below zero.
    #[error("{field} must not be negative, got {count}")]
    NegativeCount { field: String, count: i64 },

    /// A count too large to store as a seat or room count.
    #[error("{field} must be at most {}, got {count}", u32::MAX)]
    CountTooLarge { field: String, count: i64 },

    /// Remote work policy identifier outside the canonical six.
    #[error("unknown remote work policy: {policy}")]
    UnknownPolicy { policy: String },

    /// A per-person metric requested for a program with no staff.
    #[error("{metric} is undefined for a program with zero staff")]
    UndefinedPerPersonMetric { metric: &'static str },

    /// Custom standard whose size is not a positive finite number.
    #[error("standard {id} must have a positive size, got {sf}")]
    InvalidStandard { id: String, sf: f64 },

    /// Baseline totals computed with different factors than the program.
    #[error("baseline {field} is {baseline}, program has {program}")]
    BaselineMismatch {
        field: &'static str,
        baseline: f64,
        program: f64,
    },
}
