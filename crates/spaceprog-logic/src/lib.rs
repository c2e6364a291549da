//! Pure space programming logic for SpaceProg.
//!
//! This crate sizes office space from staff counts and space standards and
//! compares remote work policies. Functions take plain data and return
//! results, with no storage, network or rendering dependencies, so the same
//! engine serves a CLI menu, a web form, or a report exporter.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`calculator`] | NASF → USF → RSF totals, itemized by department and support |
//! | [`error`] | Typed validation and calculation failures |
//! | [`program`] | Space program data model, boundary validation |
//! | [`remote`] | Remote work policies, hoteling scenarios, recommendation |
//! | [`standards`] | Workspace types, default sizes, layered overrides |
//!
//! # Pipeline
//!
//! ```
//! use spaceprog_logic::calculator::calculate_totals;
//! use spaceprog_logic::program::{Department, SpaceProgram};
//! use spaceprog_logic::remote::{analyze_scenarios, recommend, RemoteWorkPolicy};
//!
//! let mut program = SpaceProgram::default();
//! program.add_department(Department {
//!     open_workstations: 10,
//!     standard_offices: 2,
//!     ..Department::named("Design")
//! });
//! program.set_remote_work_policy(RemoteWorkPolicy::HybridModerate);
//!
//! let totals = calculate_totals(&program, None)?;
//! let scenarios = analyze_scenarios(&program, &totals)?;
//! let pick = recommend(&program, &scenarios)?;
//! assert!(pick.usable_sf < totals.totals.usable_sf);
//! # Ok::<(), spaceprog_logic::error::ProgramError>(())
//! ```

pub mod calculator;
pub mod error;
pub mod program;
pub mod remote;
pub mod standards;

pub use error::ProgramError;
