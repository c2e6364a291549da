//! Area calculation — net assignable, usable and rentable square feet.
//!
//! ```text
//! NASF = Σ department seats × size + Σ support rooms × size
//! USF  = NASF + NASF × circulation_factor
//! RSF  = USF / (1 − loss_factor)
//! ```
//!
//! Every call builds its own [`StandardsTable`] and returns a fresh
//! [`CalculationResult`]; the program is only borrowed.

use serde::{Deserialize, Serialize};

use crate::error::ProgramError;
use crate::program::{check_factor, Department, SpaceProgram, SupportSpaces};
use crate::standards::{StandardOverrides, StandardsTable, WorkspaceType};

/// Descriptive fields copied from the program for report headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramHeader {
    pub company_name: String,
    pub location: String,
    pub project_name: String,
    pub prepared_by: String,
    pub date_created: String,
    pub notes: String,
}

/// One populated workspace type within a department or the support list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub kind: WorkspaceType,
    pub name: String,
    pub count: u32,
    pub unit_sf: f64,
    pub area_sf: f64,
}

impl LineItem {
    fn new(kind: WorkspaceType, count: u32, table: &StandardsTable) -> Self {
        let standard = table.get(kind);
        Self {
            kind,
            name: standard.name.clone(),
            count,
            unit_sf: standard.sf,
            area_sf: f64::from(count) * standard.sf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentArea {
    pub name: String,
    pub staff: u64,
    pub items: Vec<LineItem>,
    pub area_sf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportArea {
    pub items: Vec<LineItem>,
    pub area_sf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaTotals {
    pub total_staff: u64,
    pub department_sf: f64,
    pub support_sf: f64,
    pub net_assignable_sf: f64,
    pub circulation_factor: f64,
    pub circulation_sf: f64,
    pub usable_sf: f64,
    pub loss_factor: f64,
    pub loss_sf: f64,
    pub rentable_sf: f64,
}

/// Area per head. `None` when the program has no staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerPersonMetrics {
    pub net_sf: Option<f64>,
    pub usable_sf: Option<f64>,
    pub rentable_sf: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub header: ProgramHeader,
    /// Same order as `SpaceProgram::departments`.
    pub departments: Vec<DepartmentArea>,
    pub support: SupportArea,
    pub totals: AreaTotals,
    pub metrics: PerPersonMetrics,
}

impl CalculationResult {
    /// Usable square feet per person.
    pub fn sf_per_person(&self) -> Result<f64, ProgramError> {
        self.metrics
            .usable_sf
            .ok_or(ProgramError::UndefinedPerPersonMetric {
                metric: "sf_per_person",
            })
    }

    pub fn rsf_per_person(&self) -> Result<f64, ProgramError> {
        self.metrics
            .rentable_sf
            .ok_or(ProgramError::UndefinedPerPersonMetric {
                metric: "rsf_per_person",
            })
    }
}

/// Circulation and building-loss gross-up of a net area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrossArea {
    pub circulation_sf: f64,
    pub usable_sf: f64,
    pub loss_sf: f64,
    pub rentable_sf: f64,
}

/// Apply circulation then loss to a net assignable area.
///
/// Both factors are checked before any arithmetic, so a loss factor of
/// exactly 1.0 fails here instead of producing an infinite RSF.
pub fn gross_up(
    net_assignable_sf: f64,
    circulation_factor: f64,
    loss_factor: f64,
) -> Result<GrossArea, ProgramError> {
    check_factor("circulation_factor", circulation_factor)?;
    check_factor("loss_factor", loss_factor)?;

    let circulation_sf = net_assignable_sf * circulation_factor;
    let usable_sf = net_assignable_sf + circulation_sf;
    let rentable_sf = usable_sf / (1.0 - loss_factor);

    Ok(GrossArea {
        circulation_sf,
        usable_sf,
        loss_sf: rentable_sf - usable_sf,
        rentable_sf,
    })
}

/// Itemized staff area for one department.
pub fn department_area(dept: &Department, table: &StandardsTable) -> DepartmentArea {
    let items: Vec<LineItem> = WorkspaceType::STAFF
        .iter()
        .filter(|&&ty| dept.count(ty) > 0)
        .map(|&ty| LineItem::new(ty, dept.count(ty), table))
        .collect();
    DepartmentArea {
        name: dept.name.clone(),
        staff: dept.total_staff(),
        area_sf: items.iter().map(|i| i.area_sf).sum(),
        items,
    }
}

/// Itemized area for the shared support spaces.
pub fn support_area(support: &SupportSpaces, table: &StandardsTable) -> SupportArea {
    let items: Vec<LineItem> = WorkspaceType::SUPPORT
        .iter()
        .filter(|&&ty| support.count(ty) > 0)
        .map(|&ty| LineItem::new(ty, support.count(ty), table))
        .collect();
    SupportArea {
        area_sf: items.iter().map(|i| i.area_sf).sum(),
        items,
    }
}

fn per_person(area: f64, staff: u64) -> Option<f64> {
    (staff > 0).then(|| area / staff as f64)
}

/// Compute every total for a program.
///
/// Standards are layered defaults → `program.custom_standards` → `overrides`.
pub fn calculate_totals(
    program: &SpaceProgram,
    overrides: Option<&StandardOverrides>,
) -> Result<CalculationResult, ProgramError> {
    check_factor("circulation_factor", program.circulation_factor)?;
    check_factor("loss_factor", program.loss_factor)?;
    let table = StandardsTable::resolve(&program.custom_standards, overrides)?;

    let departments: Vec<DepartmentArea> = program
        .departments
        .iter()
        .map(|d| department_area(d, &table))
        .collect();
    let support = support_area(&program.support_spaces, &table);

    let total_staff: u64 = departments.iter().map(|d| d.staff).sum();
    let department_sf: f64 = departments.iter().map(|d| d.area_sf).sum();
    let net_assignable_sf = department_sf + support.area_sf;
    let gross = gross_up(
        net_assignable_sf,
        program.circulation_factor,
        program.loss_factor,
    )?;

    log::debug!(
        "Calculated '{}': {} staff, {:.0} NASF, {:.0} USF, {:.0} RSF",
        program.project_name,
        total_staff,
        net_assignable_sf,
        gross.usable_sf,
        gross.rentable_sf
    );

    Ok(CalculationResult {
        header: ProgramHeader {
            company_name: program.company_name.clone(),
            location: program.location.clone(),
            project_name: program.project_name.clone(),
            prepared_by: program.prepared_by.clone(),
            date_created: program.date_created.clone(),
            notes: program.notes.clone(),
        },
        totals: AreaTotals {
            total_staff,
            department_sf,
            support_sf: support.area_sf,
            net_assignable_sf,
            circulation_factor: program.circulation_factor,
            circulation_sf: gross.circulation_sf,
            usable_sf: gross.usable_sf,
            loss_factor: program.loss_factor,
            loss_sf: gross.loss_sf,
            rentable_sf: gross.rentable_sf,
        },
        metrics: PerPersonMetrics {
            net_sf: per_person(net_assignable_sf, total_staff),
            usable_sf: per_person(gross.usable_sf, total_staff),
            rentable_sf: per_person(gross.rentable_sf, total_staff),
        },
        departments,
        support,
    })
}
