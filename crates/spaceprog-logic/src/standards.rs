//! Space standards — workspace types and their default sizes.
//!
//! Each recognized workspace type has a built-in standard (display name,
//! size in square feet, description). A program may replace any of them by
//! identifier. The effective table is layered: defaults first, then program
//! overrides, then caller overrides. Defaults are never mutated; a fresh
//! `StandardsTable` is built for every calculation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ProgramError;

/// Identifier-keyed replacements for built-in standards.
pub type StandardOverrides = BTreeMap<String, WorkspaceStandard>;

/// Whether a workspace type seats staff or serves the whole office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpaceCategory {
    Staff,
    Support,
}

/// Every recognized workspace type, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WorkspaceType {
    // Staff seating
    WorkstationOpen = 0,
    WorkstationStandard = 1,
    WorkstationLarge = 2,
    OfficeSmall = 3,
    OfficeStandard = 4,
    OfficeLarge = 5,
    OfficeExecutive = 6,
    // Support
    ConferenceSmall = 7,
    ConferenceMedium = 8,
    ConferenceLarge = 9,
    HuddleRoom = 10,
    PhoneBooth = 11,
    BreakRoom = 12,
    Reception = 13,
    CopyPrint = 14,
    Storage = 15,
    ServerRoom = 16,
    WellnessRoom = 17,
    TrainingRoom = 18,
    CollaborationArea = 19,
}

impl WorkspaceType {
    pub const STAFF: [WorkspaceType; 7] = [
        Self::WorkstationOpen,
        Self::WorkstationStandard,
        Self::WorkstationLarge,
        Self::OfficeSmall,
        Self::OfficeStandard,
        Self::OfficeLarge,
        Self::OfficeExecutive,
    ];

    pub const SUPPORT: [WorkspaceType; 13] = [
        Self::ConferenceSmall,
        Self::ConferenceMedium,
        Self::ConferenceLarge,
        Self::HuddleRoom,
        Self::PhoneBooth,
        Self::BreakRoom,
        Self::Reception,
        Self::CopyPrint,
        Self::Storage,
        Self::ServerRoom,
        Self::WellnessRoom,
        Self::TrainingRoom,
        Self::CollaborationArea,
    ];

    pub fn all() -> impl Iterator<Item = WorkspaceType> {
        Self::STAFF.into_iter().chain(Self::SUPPORT)
    }

    /// Stable identifier used in overrides and persisted programs.
    pub fn id(self) -> &'static str {
        match self {
            Self::WorkstationOpen => "workstation_open",
            Self::WorkstationStandard => "workstation_standard",
            Self::WorkstationLarge => "workstation_large",
            Self::OfficeSmall => "office_small",
            Self::OfficeStandard => "office_standard",
            Self::OfficeLarge => "office_large",
            Self::OfficeExecutive => "office_executive",
            Self::ConferenceSmall => "conference_small",
            Self::ConferenceMedium => "conference_medium",
            Self::ConferenceLarge => "conference_large",
            Self::HuddleRoom => "huddle_room",
            Self::PhoneBooth => "phone_booth",
            Self::BreakRoom => "break_room",
            Self::Reception => "reception",
            Self::CopyPrint => "copy_print",
            Self::Storage => "storage",
            Self::ServerRoom => "server_room",
            Self::WellnessRoom => "wellness_room",
            Self::TrainingRoom => "training_room",
            Self::CollaborationArea => "collaboration_area",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().find(|ty| ty.id() == id)
    }

    pub fn category(self) -> SpaceCategory {
        if (self as u8) < Self::ConferenceSmall as u8 {
            SpaceCategory::Staff
        } else {
            SpaceCategory::Support
        }
    }

    /// Open-plan seating that hoteling can share.
    pub fn is_workstation(self) -> bool {
        matches!(
            self,
            Self::WorkstationOpen | Self::WorkstationStandard | Self::WorkstationLarge
        )
    }

    /// Enclosed, assigned offices (including executive suites).
    pub fn is_office(self) -> bool {
        matches!(
            self,
            Self::OfficeSmall | Self::OfficeStandard | Self::OfficeLarge | Self::OfficeExecutive
        )
    }

    /// Built-in industry standard for this type.
    pub fn default_standard(self) -> WorkspaceStandard {
        let (name, sf, description) = match self {
            Self::WorkstationOpen => ("Open Workstation", 48.0, "Open plan workstation"),
            Self::WorkstationStandard => {
                ("Standard Workstation", 64.0, "Standard cubicle workstation")
            }
            Self::WorkstationLarge => ("Large Workstation", 80.0, "Large/senior workstation"),
            Self::OfficeSmall => ("Small Private Office", 100.0, "Small enclosed office"),
            Self::OfficeStandard => ("Standard Private Office", 150.0, "Standard private office"),
            Self::OfficeLarge => (
                "Large Private Office",
                200.0,
                "Executive/large private office",
            ),
            Self::OfficeExecutive => ("Executive Suite", 300.0, "C-suite/executive office"),
            Self::ConferenceSmall => ("Small Conference Room", 150.0, "4-6 person meeting room"),
            Self::ConferenceMedium => (
                "Medium Conference Room",
                300.0,
                "8-12 person conference room",
            ),
            Self::ConferenceLarge => ("Large Conference Room", 500.0, "16-20 person board room"),
            Self::HuddleRoom => ("Huddle Room", 80.0, "2-4 person huddle space"),
            Self::PhoneBooth => ("Phone Booth", 35.0, "Single person phone/focus booth"),
            Self::BreakRoom => ("Break Room", 200.0, "Kitchen/break area"),
            Self::Reception => ("Reception Area", 250.0, "Reception/waiting area"),
            Self::CopyPrint => ("Copy/Print Center", 100.0, "Copy/print/mail area"),
            Self::Storage => ("Storage Room", 150.0, "General storage"),
            Self::ServerRoom => ("Server/IT Room", 120.0, "Server/IT closet"),
            Self::WellnessRoom => ("Wellness/Mother's Room", 80.0, "Wellness/lactation room"),
            Self::TrainingRoom => ("Training Room", 600.0, "Large training/all-hands room"),
            Self::CollaborationArea => ("Collaboration Zone", 200.0, "Open collaboration space"),
        };
        WorkspaceStandard {
            name: name.to_string(),
            sf,
            description: description.to_string(),
        }
    }
}

/// Display name and size of one workspace type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceStandard {
    pub name: String,
    /// Size in square feet.
    pub sf: f64,
    #[serde(default)]
    pub description: String,
}

/// Effective standards for one calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardsTable {
    // Indexed by `WorkspaceType as usize`.
    entries: Vec<WorkspaceStandard>,
}

impl StandardsTable {
    pub fn defaults() -> Self {
        Self {
            entries: WorkspaceType::all()
                .map(WorkspaceType::default_standard)
                .collect(),
        }
    }

    /// Build the layered table: defaults, then `program`, then `extra`.
    pub fn resolve(
        program: &StandardOverrides,
        extra: Option<&StandardOverrides>,
    ) -> Result<Self, ProgramError> {
        let mut table = Self::defaults();
        table.apply(program)?;
        if let Some(extra) = extra {
            table.apply(extra)?;
        }
        Ok(table)
    }

    /// Replace whole entries by identifier. Unrecognized identifiers are skipped.
    pub fn apply(&mut self, overrides: &StandardOverrides) -> Result<(), ProgramError> {
        for (id, standard) in overrides {
            let Some(ty) = WorkspaceType::from_id(id) else {
                log::warn!("Ignoring override for unknown workspace type '{id}'");
                continue;
            };
            if !(standard.sf.is_finite() && standard.sf > 0.0) {
                return Err(ProgramError::InvalidStandard {
                    id: id.clone(),
                    sf: standard.sf,
                });
            }
            self.entries[ty as usize] = standard.clone();
        }
        Ok(())
    }

    pub fn get(&self, ty: WorkspaceType) -> &WorkspaceStandard {
        &self.entries[ty as usize]
    }

    pub fn sf(&self, ty: WorkspaceType) -> f64 {
        self.get(ty).sf
    }

    pub fn iter(&self) -> impl Iterator<Item = (WorkspaceType, &WorkspaceStandard)> {
        WorkspaceType::all().zip(self.entries.iter())
    }
}

impl Default for StandardsTable {
    fn default() -> Self {
        Self::defaults()
    }
}
