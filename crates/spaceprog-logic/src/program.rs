//! Space program data model — company header, departments, support spaces,
//! factors and remote work policy selection.
//!
//! Counts are fixed-shape records with every field defaulting to zero, so
//! summing over a department is a total fold with no missing keys. Negative
//! counts can only arrive through untyped input (JSON, form fields); those go
//! through the signed `*Record` types and are rejected with
//! [`ProgramError::NegativeCount`] before a `Department` or `SupportSpaces`
//! exists.
//!
//! ```
//! use spaceprog_logic::program::{Department, SpaceProgram};
//!
//! let mut program = SpaceProgram::default();
//! program.add_department(Department {
//!     open_workstations: 10,
//!     standard_offices: 2,
//!     ..Department::named("Design")
//! });
//! assert!(program.validate().is_ok());
//! assert_eq!(program.total_staff(), 12);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ProgramError;
use crate::remote::{PolicySelection, RemoteWorkPolicy};
use crate::standards::{StandardOverrides, StandardsTable, WorkspaceType};

/// Share of net assignable area added for corridors and aisles.
pub const DEFAULT_CIRCULATION_FACTOR: f64 = 0.35;
/// Share of rentable area lost to building core and structure.
pub const DEFAULT_LOSS_FACTOR: f64 = 0.15;

// ============================================================================
// DEPARTMENTS
// ============================================================================

/// Staff seating allocation for one department.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DepartmentRecord")]
pub struct Department {
    pub name: String,
    pub open_workstations: u32,
    pub standard_workstations: u32,
    pub large_workstations: u32,
    pub small_offices: u32,
    pub standard_offices: u32,
    pub large_offices: u32,
    pub executive_offices: u32,
}

impl Department {
    /// Empty department, for struct-update construction.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Seats of the given staff type. Support types always return zero.
    pub fn count(&self, ty: WorkspaceType) -> u32 {
        match ty {
            WorkspaceType::WorkstationOpen => self.open_workstations,
            WorkspaceType::WorkstationStandard => self.standard_workstations,
            WorkspaceType::WorkstationLarge => self.large_workstations,
            WorkspaceType::OfficeSmall => self.small_offices,
            WorkspaceType::OfficeStandard => self.standard_offices,
            WorkspaceType::OfficeLarge => self.large_offices,
            WorkspaceType::OfficeExecutive => self.executive_offices,
            _ => 0,
        }
    }

    /// Headcount: one person per seat of any staff type.
    pub fn total_staff(&self) -> u64 {
        WorkspaceType::STAFF
            .iter()
            .map(|&ty| u64::from(self.count(ty)))
            .sum()
    }

    pub fn total_workstations(&self) -> u64 {
        WorkspaceType::STAFF
            .iter()
            .filter(|ty| ty.is_workstation())
            .map(|&ty| u64::from(self.count(ty)))
            .sum()
    }

    pub fn total_offices(&self) -> u64 {
        WorkspaceType::STAFF
            .iter()
            .filter(|ty| ty.is_office())
            .map(|&ty| u64::from(self.count(ty)))
            .sum()
    }

    /// Build from signed form input, counts in [`WorkspaceType::STAFF`] order.
    pub fn from_signed_counts(
        name: impl Into<String>,
        counts: [i64; 7],
    ) -> Result<Self, ProgramError> {
        let [open, standard, large, small_off, standard_off, large_off, executive] = counts;
        Self::try_from(DepartmentRecord {
            name: name.into(),
            open_workstations: open,
            standard_workstations: standard,
            large_workstations: large,
            small_offices: small_off,
            standard_offices: standard_off,
            large_offices: large_off,
            executive_offices: executive,
        })
    }
}

/// Untyped department input as it arrives from JSON or a form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DepartmentRecord {
    pub name: String,
    pub open_workstations: i64,
    pub standard_workstations: i64,
    pub large_workstations: i64,
    pub small_offices: i64,
    pub standard_offices: i64,
    pub large_offices: i64,
    pub executive_offices: i64,
}

impl TryFrom<DepartmentRecord> for Department {
    type Error = ProgramError;

    fn try_from(r: DepartmentRecord) -> Result<Self, Self::Error> {
        let field = |f: &str| format!("{}.{f}", r.name);
        Ok(Self {
            open_workstations: checked_count(field("open_workstations"), r.open_workstations)?,
            standard_workstations: checked_count(
                field("standard_workstations"),
                r.standard_workstations,
            )?,
            large_workstations: checked_count(field("large_workstations"), r.large_workstations)?,
            small_offices: checked_count(field("small_offices"), r.small_offices)?,
            standard_offices: checked_count(field("standard_offices"), r.standard_offices)?,
            large_offices: checked_count(field("large_offices"), r.large_offices)?,
            executive_offices: checked_count(field("executive_offices"), r.executive_offices)?,
            name: r.name,
        })
    }
}

// ============================================================================
// SUPPORT SPACES
// ============================================================================

/// Shared rooms and amenities, counted once for the whole program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SupportSpacesRecord")]
pub struct SupportSpaces {
    pub small_conference: u32,
    pub medium_conference: u32,
    pub large_conference: u32,
    pub huddle_rooms: u32,
    pub phone_booths: u32,
    pub break_rooms: u32,
    pub reception_areas: u32,
    pub copy_print_centers: u32,
    pub storage_rooms: u32,
    pub server_rooms: u32,
    pub wellness_rooms: u32,
    pub training_rooms: u32,
    pub collaboration_areas: u32,
}

impl SupportSpaces {
    /// Rooms of the given support type. Staff types always return zero.
    pub fn count(&self, ty: WorkspaceType) -> u32 {
        match ty {
            WorkspaceType::ConferenceSmall => self.small_conference,
            WorkspaceType::ConferenceMedium => self.medium_conference,
            WorkspaceType::ConferenceLarge => self.large_conference,
            WorkspaceType::HuddleRoom => self.huddle_rooms,
            WorkspaceType::PhoneBooth => self.phone_booths,
            WorkspaceType::BreakRoom => self.break_rooms,
            WorkspaceType::Reception => self.reception_areas,
            WorkspaceType::CopyPrint => self.copy_print_centers,
            WorkspaceType::Storage => self.storage_rooms,
            WorkspaceType::ServerRoom => self.server_rooms,
            WorkspaceType::WellnessRoom => self.wellness_rooms,
            WorkspaceType::TrainingRoom => self.training_rooms,
            WorkspaceType::CollaborationArea => self.collaboration_areas,
            _ => 0,
        }
    }

    pub fn total_rooms(&self) -> u64 {
        WorkspaceType::SUPPORT
            .iter()
            .map(|&ty| u64::from(self.count(ty)))
            .sum()
    }
}

/// Untyped support-space input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SupportSpacesRecord {
    pub small_conference: i64,
    pub medium_conference: i64,
    pub large_conference: i64,
    pub huddle_rooms: i64,
    pub phone_booths: i64,
    pub break_rooms: i64,
    pub reception_areas: i64,
    pub copy_print_centers: i64,
    pub storage_rooms: i64,
    pub server_rooms: i64,
    pub wellness_rooms: i64,
    pub training_rooms: i64,
    pub collaboration_areas: i64,
}

impl TryFrom<SupportSpacesRecord> for SupportSpaces {
    type Error = ProgramError;

    fn try_from(r: SupportSpacesRecord) -> Result<Self, Self::Error> {
        let field = |f: &str| format!("support_spaces.{f}");
        Ok(Self {
            small_conference: checked_count(field("small_conference"), r.small_conference)?,
            medium_conference: checked_count(field("medium_conference"), r.medium_conference)?,
            large_conference: checked_count(field("large_conference"), r.large_conference)?,
            huddle_rooms: checked_count(field("huddle_rooms"), r.huddle_rooms)?,
            phone_booths: checked_count(field("phone_booths"), r.phone_booths)?,
            break_rooms: checked_count(field("break_rooms"), r.break_rooms)?,
            reception_areas: checked_count(field("reception_areas"), r.reception_areas)?,
            copy_print_centers: checked_count(field("copy_print_centers"), r.copy_print_centers)?,
            storage_rooms: checked_count(field("storage_rooms"), r.storage_rooms)?,
            server_rooms: checked_count(field("server_rooms"), r.server_rooms)?,
            wellness_rooms: checked_count(field("wellness_rooms"), r.wellness_rooms)?,
            training_rooms: checked_count(field("training_rooms"), r.training_rooms)?,
            collaboration_areas: checked_count(
                field("collaboration_areas"),
                r.collaboration_areas,
            )?,
        })
    }
}

fn checked_count(field: String, count: i64) -> Result<u32, ProgramError> {
    if count < 0 {
        return Err(ProgramError::NegativeCount { field, count });
    }
    u32::try_from(count).map_err(|_| ProgramError::CountTooLarge { field, count })
}

// ============================================================================
// PROGRAM
// ============================================================================

/// Everything needed to size an office: who sits where, what is shared,
/// and how net area grows into rentable area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceProgram {
    pub company_name: String,
    pub location: String,
    pub project_name: String,
    pub prepared_by: String,
    pub date_created: String,
    /// Report order follows input order.
    pub departments: Vec<Department>,
    pub support_spaces: SupportSpaces,
    pub circulation_factor: f64,
    pub loss_factor: f64,
    pub remote_work_policy: PolicySelection,
    pub custom_standards: StandardOverrides,
    pub notes: String,
}

impl Default for SpaceProgram {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            location: String::new(),
            project_name: String::new(),
            prepared_by: String::new(),
            date_created: String::new(),
            departments: Vec::new(),
            support_spaces: SupportSpaces::default(),
            circulation_factor: DEFAULT_CIRCULATION_FACTOR,
            loss_factor: DEFAULT_LOSS_FACTOR,
            remote_work_policy: PolicySelection::default(),
            custom_standards: StandardOverrides::new(),
            notes: String::new(),
        }
    }
}

impl SpaceProgram {
    pub fn add_department(&mut self, department: Department) {
        self.departments.push(department);
    }

    pub fn set_support_spaces(&mut self, support: SupportSpaces) {
        self.support_spaces = support;
    }

    /// Replace both factors. Nothing is changed if either is out of range.
    pub fn set_factors(&mut self, circulation: f64, loss: f64) -> Result<(), ProgramError> {
        check_factor("circulation_factor", circulation)?;
        check_factor("loss_factor", loss)?;
        self.circulation_factor = circulation;
        self.loss_factor = loss;
        Ok(())
    }

    pub fn set_remote_work_policy(&mut self, policy: RemoteWorkPolicy) {
        self.remote_work_policy = policy.into();
    }

    /// Parsed selected policy.
    pub fn policy(&self) -> Result<RemoteWorkPolicy, ProgramError> {
        self.remote_work_policy.policy()
    }

    pub fn total_staff(&self) -> u64 {
        self.departments.iter().map(Department::total_staff).sum()
    }

    /// First problem found, if any. See [`validate_program`] for all of them.
    pub fn validate(&self) -> Result<(), ProgramError> {
        match validate_program(self).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Factors must be finite and in `[0, 1)`.
pub fn check_factor(field: &'static str, value: f64) -> Result<(), ProgramError> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ProgramError::InvalidFactor { field, value })
    }
}

/// Validate a program, returning all errors found.
///
/// Counts are already non-negative by construction; this covers the
/// fields that stay loosely typed: factors, policy identifier and
/// custom standard sizes.
pub fn validate_program(program: &SpaceProgram) -> Vec<ProgramError> {
    let mut errors = Vec::new();

    if let Err(e) = check_factor("circulation_factor", program.circulation_factor) {
        errors.push(e);
    }
    if let Err(e) = check_factor("loss_factor", program.loss_factor) {
        errors.push(e);
    }
    if let Err(e) = program.policy() {
        errors.push(e);
    }
    if let Err(e) = StandardsTable::resolve(&program.custom_standards, None) {
        errors.push(e);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standards::WorkspaceStandard;

    #[test]
    fn test_default_program() {
        let p = SpaceProgram::default();
        assert_eq!(p.circulation_factor, 0.35);
        assert_eq!(p.loss_factor, 0.15);
        assert_eq!(
            p.remote_work_policy,
            PolicySelection::Known(RemoteWorkPolicy::FullOnsite)
        );
        assert!(p.departments.is_empty());
        assert!(validate_program(&p).is_empty());
    }

    #[test]
    fn test_department_total_staff() {
        let d = Department {
            open_workstations: 10,
            standard_workstations: 3,
            standard_offices: 2,
            executive_offices: 1,
            ..Department::named("Studio")
        };
        assert_eq!(d.total_staff(), 16);
        assert_eq!(d.total_workstations(), 13);
        assert_eq!(d.total_offices(), 3);
        assert_eq!(d.count(WorkspaceType::Reception), 0);
    }

    #[test]
    fn test_support_count_by_type() {
        let s = SupportSpaces {
            phone_booths: 12,
            reception_areas: 1,
            ..SupportSpaces::default()
        };
        assert_eq!(s.count(WorkspaceType::PhoneBooth), 12);
        assert_eq!(s.count(WorkspaceType::Reception), 1);
        assert_eq!(s.count(WorkspaceType::WorkstationOpen), 0);
        assert_eq!(s.total_rooms(), 13);
    }

    #[test]
    fn test_negative_department_count_rejected() {
        let json = r#"{"name": "Finance", "small_offices": -2}"#;
        let err = serde_json::from_str::<Department>(json).unwrap_err();
        assert!(err.to_string().contains("Finance.small_offices"), "{err}");

        let record = DepartmentRecord {
            name: "Finance".into(),
            small_offices: -2,
            ..DepartmentRecord::default()
        };
        assert_eq!(
            Department::try_from(record),
            Err(ProgramError::NegativeCount {
                field: "Finance.small_offices".into(),
                count: -2,
            })
        );
    }

    #[test]
    fn test_negative_support_count_rejected() {
        let record = SupportSpacesRecord {
            storage_rooms: -1,
            ..SupportSpacesRecord::default()
        };
        let err = SupportSpaces::try_from(record).unwrap_err();
        assert_eq!(
            err,
            ProgramError::NegativeCount {
                field: "support_spaces.storage_rooms".into(),
                count: -1,
            }
        );
    }

    #[test]
    fn test_from_signed_counts() {
        let d = Department::from_signed_counts("Design", [6, 4, 0, 2, 1, 0, 1]).unwrap();
        assert_eq!(d.open_workstations, 6);
        assert_eq!(d.small_offices, 2);
        assert_eq!(d.executive_offices, 1);
        assert_eq!(d.total_staff(), 14);

        assert_eq!(
            Department::from_signed_counts("Design", [6, 4, 0, -3, 1, 0, 1]),
            Err(ProgramError::NegativeCount {
                field: "Design.small_offices".into(),
                count: -3,
            })
        );
    }

    #[test]
    fn test_count_above_u32_rejected() {
        let too_big = i64::from(u32::MAX) + 1;
        assert_eq!(
            Department::from_signed_counts("Ops", [0, too_big, 0, 0, 0, 0, 0]),
            Err(ProgramError::CountTooLarge {
                field: "Ops.standard_workstations".into(),
                count: too_big,
            })
        );
    }

    #[test]
    fn test_max_counts_roundtrip() {
        let d = Department {
            open_workstations: u32::MAX,
            executive_offices: u32::MAX,
            ..Department::named("Campus")
        };
        let json = serde_json::to_string(&d).unwrap();
        let back: Department = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
        assert_eq!(back.total_staff(), 2 * u64::from(u32::MAX));

        let s = SupportSpaces {
            phone_booths: u32::MAX,
            ..SupportSpaces::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<SupportSpaces>(&json).unwrap(), s);
    }

    #[test]
    fn test_unrecognized_policy_survives_roundtrip() {
        let json = r#"{"remote_work_policy": "four_day_week"}"#;
        let p: SpaceProgram = serde_json::from_str(json).unwrap();
        assert_eq!(
            p.remote_work_policy,
            PolicySelection::Unrecognized("four_day_week".into())
        );
        let back: SpaceProgram = serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
        assert_eq!(back, p);
        assert!(matches!(p.policy(), Err(ProgramError::UnknownPolicy { .. })));

        let p: SpaceProgram = serde_json::from_str(r#"{"remote_work_policy": "hybrid_light"}"#).unwrap();
        assert_eq!(p.policy(), Ok(RemoteWorkPolicy::HybridLight));
    }

    #[test]
    fn test_sparse_department_json_defaults_zero() {
        let d: Department = serde_json::from_str(r#"{"name": "IT", "standard_offices": 3}"#).unwrap();
        assert_eq!(d.standard_offices, 3);
        assert_eq!(d.total_staff(), 3);
    }

    #[test]
    fn test_factor_bounds() {
        assert!(check_factor("loss_factor", 0.0).is_ok());
        assert!(check_factor("loss_factor", 0.99).is_ok());
        assert!(check_factor("loss_factor", 1.0).is_err());
        assert!(check_factor("loss_factor", -0.1).is_err());
        assert!(check_factor("loss_factor", f64::NAN).is_err());
    }

    #[test]
    fn test_set_factors_leaves_program_on_error() {
        let mut p = SpaceProgram::default();
        let err = p.set_factors(0.30, 1.0).unwrap_err();
        assert_eq!(
            err,
            ProgramError::InvalidFactor {
                field: "loss_factor",
                value: 1.0
            }
        );
        assert_eq!(p.circulation_factor, 0.35);
        assert_eq!(p.loss_factor, 0.15);

        p.set_factors(0.30, 0.10).unwrap();
        assert_eq!(p.circulation_factor, 0.30);
        assert_eq!(p.loss_factor, 0.10);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut p = SpaceProgram {
            circulation_factor: 1.5,
            loss_factor: 1.0,
            remote_work_policy: "four_day_week".into(),
            ..SpaceProgram::default()
        };
        p.custom_standards.insert(
            "phone_booth".into(),
            WorkspaceStandard {
                name: "Booth".into(),
                sf: 0.0,
                description: String::new(),
            },
        );
        let errors = validate_program(&p);
        assert_eq!(errors.len(), 4);
        assert!(matches!(
            errors[0],
            ProgramError::InvalidFactor {
                field: "circulation_factor",
                ..
            }
        ));
        assert!(matches!(p.validate(), Err(ProgramError::InvalidFactor { .. })));
    }

    #[test]
    fn test_json_roundtrip_preserves_fields() {
        let mut p = SpaceProgram {
            company_name: "Acme".into(),
            location: "Denver, CO".into(),
            project_name: "HQ".into(),
            prepared_by: "Studio".into(),
            date_created: "2024-03-01".into(),
            notes: "growth 10%".into(),
            circulation_factor: 0.3,
            loss_factor: 0.12,
            ..SpaceProgram::default()
        };
        p.add_department(Department {
            open_workstations: 4,
            ..Department::named("B")
        });
        p.add_department(Department {
            executive_offices: 1,
            ..Department::named("A")
        });
        p.set_remote_work_policy(RemoteWorkPolicy::HybridHeavy);
        p.custom_standards.insert(
            "office_small".into(),
            WorkspaceStandard {
                name: "Small Office".into(),
                sf: 90.0,
                description: "Compact".into(),
            },
        );

        let json = serde_json::to_string(&p).unwrap();
        let back: SpaceProgram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.departments[0].name, "B", "order preserved");
    }
}
