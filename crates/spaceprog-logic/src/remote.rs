//! Remote work scenarios — how attendance policy shrinks seating demand.
//!
//! Every canonical policy is evaluated for comparison, whatever the program
//! has selected. Policies use a hoteling model: only open-plan workstation
//! counts scale with attendance, rounded up to whole seats. Enclosed offices
//! and all support spaces stay fixed. The scaled net area is grossed up with
//! the same [`gross_up`] the calculator uses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculator::{gross_up, CalculationResult};
use crate::error::ProgramError;
use crate::program::{check_factor, SpaceProgram};

/// Canonical remote work policies, ordered by increasing reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteWorkPolicy {
    FullOnsite,
    HybridLight,
    HybridModerate,
    HybridHeavy,
    RemoteFirst,
    FullyRemote,
}

impl RemoteWorkPolicy {
    pub const ALL: [RemoteWorkPolicy; 6] = [
        Self::FullOnsite,
        Self::HybridLight,
        Self::HybridModerate,
        Self::HybridHeavy,
        Self::RemoteFirst,
        Self::FullyRemote,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::FullOnsite => "full_onsite",
            Self::HybridLight => "hybrid_light",
            Self::HybridModerate => "hybrid_moderate",
            Self::HybridHeavy => "hybrid_heavy",
            Self::RemoteFirst => "remote_first",
            Self::FullyRemote => "fully_remote",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::FullOnsite => "100% on-site, no reduction",
            Self::HybridLight => "1 day remote/week (~15% reduction)",
            Self::HybridModerate => "2 days remote/week (~30% reduction)",
            Self::HybridHeavy => "3 days remote/week (~45% reduction)",
            Self::RemoteFirst => "4 days remote/week (~60% reduction)",
            Self::FullyRemote => "Fully remote, hoteling only (~85% reduction)",
        }
    }

    /// Seating reduction in whole percent.
    pub fn reduction_percent(self) -> u32 {
        match self {
            Self::FullOnsite => 0,
            Self::HybridLight => 15,
            Self::HybridModerate => 30,
            Self::HybridHeavy => 45,
            Self::RemoteFirst => 60,
            Self::FullyRemote => 85,
        }
    }

    pub fn reduction(self) -> f64 {
        f64::from(self.reduction_percent()) / 100.0
    }

    pub fn headcount_factor(self) -> f64 {
        f64::from(100 - self.reduction_percent()) / 100.0
    }

    /// Seats needed for `count` staff: `ceil(count × headcount_factor)`.
    ///
    /// Integer arithmetic, so 100 seats at 55% is exactly 55. The result
    /// never exceeds `count`.
    pub fn scaled_seats(self, count: u64) -> u64 {
        let keep = u128::from(100 - self.reduction_percent());
        let seats = (u128::from(count) * keep).div_ceil(100);
        u64::try_from(seats).unwrap_or(count)
    }
}

impl fmt::Display for RemoteWorkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RemoteWorkPolicy {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| ProgramError::UnknownPolicy {
                policy: s.to_string(),
            })
    }
}

/// The program's selected policy as stored.
///
/// Unrecognized identifiers are kept verbatim so a saved program loads and
/// saves back unchanged; they fail only when the policy is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicySelection {
    Known(RemoteWorkPolicy),
    Unrecognized(String),
}

impl PolicySelection {
    pub fn policy(&self) -> Result<RemoteWorkPolicy, ProgramError> {
        match self {
            Self::Known(policy) => Ok(*policy),
            Self::Unrecognized(id) => Err(ProgramError::UnknownPolicy { policy: id.clone() }),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Known(policy) => policy.id(),
            Self::Unrecognized(id) => id,
        }
    }
}

impl Default for PolicySelection {
    fn default() -> Self {
        Self::Known(RemoteWorkPolicy::FullOnsite)
    }
}

impl From<RemoteWorkPolicy> for PolicySelection {
    fn from(policy: RemoteWorkPolicy) -> Self {
        Self::Known(policy)
    }
}

impl From<&str> for PolicySelection {
    fn from(id: &str) -> Self {
        match id.parse() {
            Ok(policy) => Self::Known(policy),
            Err(_) => Self::Unrecognized(id.to_string()),
        }
    }
}

impl fmt::Display for PolicySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Space requirement under one policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteWorkScenario {
    pub policy: RemoteWorkPolicy,
    pub reduction: f64,
    pub headcount_factor: f64,
    /// Workstations after hoteling.
    pub workstation_seats: u64,
    /// Hoteled workstations plus fixed offices.
    pub effective_headcount: u64,
    pub net_assignable_sf: f64,
    pub usable_sf: f64,
    pub rentable_sf: f64,
    /// Relative to the full on-site scenario.
    pub usable_sf_saved: f64,
    pub rentable_sf_saved: f64,
    /// `usable_sf_saved` as a percentage of full on-site USF.
    pub percent_saved: f64,
}

/// Evaluate every canonical policy against a baseline calculation.
///
/// Workstation line items are scaled per department and per type, so
/// rounding happens where seats are actually built. The result is in
/// [`RemoteWorkPolicy::ALL`] order.
///
/// `baseline` must come from [`calculate_totals`](crate::calculator::calculate_totals)
/// on this program: its factors have to match the program's, otherwise the
/// full on-site scenario would not reproduce the baseline and every saving
/// would be off. A mismatch fails with [`ProgramError::BaselineMismatch`].
pub fn analyze_scenarios(
    program: &SpaceProgram,
    baseline: &CalculationResult,
) -> Result<Vec<RemoteWorkScenario>, ProgramError> {
    check_factor("circulation_factor", program.circulation_factor)?;
    check_factor("loss_factor", program.loss_factor)?;
    for (field, base, own) in [
        (
            "circulation_factor",
            baseline.totals.circulation_factor,
            program.circulation_factor,
        ),
        ("loss_factor", baseline.totals.loss_factor, program.loss_factor),
    ] {
        if base != own {
            return Err(ProgramError::BaselineMismatch {
                field,
                baseline: base,
                program: own,
            });
        }
    }

    let mut scenarios = Vec::with_capacity(RemoteWorkPolicy::ALL.len());

    for policy in RemoteWorkPolicy::ALL {
        let mut seats = 0u64;
        let mut offices = 0u64;
        let mut staff_sf = 0.0;
        for dept in &baseline.departments {
            let mut dept_sf = 0.0;
            for item in &dept.items {
                let count = if item.kind.is_workstation() {
                    let scaled = policy.scaled_seats(u64::from(item.count));
                    seats += scaled;
                    scaled
                } else {
                    offices += u64::from(item.count);
                    u64::from(item.count)
                };
                dept_sf += count as f64 * item.unit_sf;
            }
            staff_sf += dept_sf;
        }

        let net = staff_sf + baseline.support.area_sf;
        let gross = gross_up(net, program.circulation_factor, program.loss_factor)?;

        scenarios.push(RemoteWorkScenario {
            policy,
            reduction: policy.reduction(),
            headcount_factor: policy.headcount_factor(),
            workstation_seats: seats,
            effective_headcount: seats + offices,
            net_assignable_sf: net,
            usable_sf: gross.usable_sf,
            rentable_sf: gross.rentable_sf,
            usable_sf_saved: 0.0,
            rentable_sf_saved: 0.0,
            percent_saved: 0.0,
        });
    }

    let (base_usable, base_rentable) = scenarios
        .first()
        .map(|s| (s.usable_sf, s.rentable_sf))
        .unwrap_or_default();
    for s in &mut scenarios {
        s.usable_sf_saved = base_usable - s.usable_sf;
        s.rentable_sf_saved = base_rentable - s.rentable_sf;
        s.percent_saved = if base_usable > 0.0 {
            s.usable_sf_saved / base_usable * 100.0
        } else {
            0.0
        };
    }

    log::debug!(
        "Analyzed {} remote work scenarios, base {:.0} USF",
        scenarios.len(),
        base_usable
    );

    Ok(scenarios)
}

/// Savings for the program's selected policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecommendation {
    pub policy: RemoteWorkPolicy,
    pub description: String,
    pub usable_sf: f64,
    pub rentable_sf: f64,
    pub usable_sf_saved: f64,
    pub rentable_sf_saved: f64,
    pub percent_saved: f64,
}

/// Look up the selected policy's scenario. No recalculation happens here.
pub fn recommend(
    program: &SpaceProgram,
    scenarios: &[RemoteWorkScenario],
) -> Result<PolicyRecommendation, ProgramError> {
    let policy = program.remote_work_policy.policy()?;
    let s = scenarios
        .iter()
        .find(|s| s.policy == policy)
        .ok_or_else(|| ProgramError::UnknownPolicy {
            policy: policy.id().to_string(),
        })?;
    Ok(PolicyRecommendation {
        policy,
        description: policy.description().to_string(),
        usable_sf: s.usable_sf,
        rentable_sf: s.rentable_sf,
        usable_sf_saved: s.usable_sf_saved,
        rentable_sf_saved: s.rentable_sf_saved,
        percent_saved: s.percent_saved,
    })
}

/// Planning note shown alongside the scenario table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub category: String,
    pub text: String,
}

/// Workplace strategy notes for hybrid planning.
pub fn advisories(total_staff: u64) -> Vec<Advisory> {
    let desks = RemoteWorkPolicy::HybridModerate.scaled_seats(total_staff);
    vec![
        Advisory {
            category: "Hoteling Strategy".to_string(),
            text: format!(
                "For hybrid policies, consider implementing desk hoteling. With {total_staff} \
                 staff and a hybrid-moderate policy (2 days remote), you could reduce dedicated \
                 desks to approximately {desks} stations."
            ),
        },
        Advisory {
            category: "Meeting Space".to_string(),
            text: "With increased remote work, consider reallocating saved space to additional \
                   video-conference enabled meeting rooms and collaboration zones to support \
                   hybrid meetings."
                .to_string(),
        },
        Advisory {
            category: "Amenity Enhancement".to_string(),
            text: "Remote work policies often work best when office amenities are enhanced. \
                   Consider adding focus/phone booths, wellness rooms, and upgraded break areas \
                   to make in-office days more productive."
                .to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::calculate_totals;
    use crate::program::{Department, SupportSpaces};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn small_studio() -> SpaceProgram {
        let mut p = SpaceProgram::default();
        p.add_department(Department {
            open_workstations: 10,
            standard_offices: 2,
            ..Department::named("Studio")
        });
        p
    }

    fn run(p: &SpaceProgram) -> Vec<RemoteWorkScenario> {
        let base = calculate_totals(p, None).unwrap();
        analyze_scenarios(p, &base).unwrap()
    }

    #[test]
    fn test_policy_table() {
        let reductions: Vec<u32> = RemoteWorkPolicy::ALL
            .iter()
            .map(|p| p.reduction_percent())
            .collect();
        assert_eq!(reductions, [0, 15, 30, 45, 60, 85]);
        assert!(approx(RemoteWorkPolicy::HybridModerate.headcount_factor(), 0.70));
        assert_eq!(RemoteWorkPolicy::FullOnsite.headcount_factor(), 1.0);
    }

    #[test]
    fn test_policy_parse() {
        for p in RemoteWorkPolicy::ALL {
            assert_eq!(p.id().parse::<RemoteWorkPolicy>(), Ok(p));
            assert_eq!(p.to_string(), p.id());
        }
        assert_eq!(
            "hybrid".parse::<RemoteWorkPolicy>(),
            Err(ProgramError::UnknownPolicy {
                policy: "hybrid".into()
            })
        );
    }

    #[test]
    fn test_scaled_seats_ceiling() {
        let p = RemoteWorkPolicy::HybridModerate;
        assert_eq!(p.scaled_seats(10), 7);
        assert_eq!(p.scaled_seats(1), 1);
        assert_eq!(p.scaled_seats(0), 0);
        assert_eq!(RemoteWorkPolicy::FullyRemote.scaled_seats(10), 2);
        assert_eq!(RemoteWorkPolicy::HybridHeavy.scaled_seats(100), 55);
        assert_eq!(RemoteWorkPolicy::FullOnsite.scaled_seats(37), 37);
    }

    #[test]
    fn test_scaled_seats_large_counts() {
        let max = u64::from(u32::MAX);
        assert_eq!(RemoteWorkPolicy::FullOnsite.scaled_seats(u64::MAX), u64::MAX);
        assert_eq!(RemoteWorkPolicy::HybridModerate.scaled_seats(max), 3_006_477_107);
        assert!(RemoteWorkPolicy::FullyRemote.scaled_seats(u64::MAX) < u64::MAX);
    }

    #[test]
    fn test_policy_selection() {
        assert_eq!(
            PolicySelection::from("hybrid_heavy"),
            PolicySelection::Known(RemoteWorkPolicy::HybridHeavy)
        );
        let odd = PolicySelection::from("four_day_week");
        assert_eq!(odd, PolicySelection::Unrecognized("four_day_week".into()));
        assert_eq!(odd.to_string(), "four_day_week");
        assert_eq!(
            serde_json::to_string(&odd).unwrap(),
            r#""four_day_week""#
        );
        assert_eq!(
            serde_json::from_str::<PolicySelection>(r#""remote_first""#).unwrap(),
            PolicySelection::Known(RemoteWorkPolicy::RemoteFirst)
        );
        assert_eq!(PolicySelection::default().policy(), Ok(RemoteWorkPolicy::FullOnsite));
    }

    #[test]
    fn test_hybrid_moderate_reference_example() {
        let s = run(&small_studio());
        let hm = &s[2];
        assert_eq!(hm.policy, RemoteWorkPolicy::HybridModerate);
        assert_eq!(hm.workstation_seats, 7);
        assert_eq!(hm.effective_headcount, 9);
        assert_eq!(hm.net_assignable_sf, 636.0);
        assert!(approx(hm.usable_sf, 858.6));
        assert!(approx(hm.usable_sf_saved, 194.4));
    }

    #[test]
    fn test_canonical_order_regardless_of_selection() {
        let mut p = small_studio();
        p.set_remote_work_policy(RemoteWorkPolicy::RemoteFirst);
        let s = run(&p);
        let order: Vec<_> = s.iter().map(|s| s.policy).collect();
        assert_eq!(order, RemoteWorkPolicy::ALL);
    }

    #[test]
    fn test_full_onsite_matches_baseline() {
        let p = small_studio();
        let base = calculate_totals(&p, None).unwrap();
        let s = analyze_scenarios(&p, &base).unwrap();
        assert_eq!(s[0].usable_sf, base.totals.usable_sf);
        assert_eq!(s[0].rentable_sf, base.totals.rentable_sf);
        assert_eq!(s[0].usable_sf_saved, 0.0);
        assert_eq!(s[0].headcount_factor, 1.0);
        assert_eq!(s[0].effective_headcount, 12);
    }

    #[test]
    fn test_savings_monotonic() {
        let mut p = small_studio();
        p.add_department(Department {
            standard_workstations: 7,
            large_workstations: 3,
            ..Department::named("Engineering")
        });
        let s = run(&p);
        for pair in s.windows(2) {
            assert!(
                pair[1].usable_sf_saved >= pair[0].usable_sf_saved,
                "{} saves less than {}",
                pair[1].policy,
                pair[0].policy
            );
            assert!(pair[1].rentable_sf_saved >= pair[0].rentable_sf_saved);
        }
    }

    #[test]
    fn test_offices_and_support_fixed() {
        let mut p = SpaceProgram::default();
        p.add_department(Department {
            small_offices: 4,
            executive_offices: 1,
            ..Department::named("Partners")
        });
        p.set_support_spaces(SupportSpaces {
            large_conference: 1,
            ..SupportSpaces::default()
        });
        let s = run(&p);
        for sc in &s {
            assert_eq!(sc.usable_sf_saved, 0.0, "{}", sc.policy);
            assert_eq!(sc.effective_headcount, 5);
            assert_eq!(sc.workstation_seats, 0);
        }
    }

    #[test]
    fn test_rounding_per_department() {
        // 1 seat in each of three departments never rounds down to zero.
        let mut p = SpaceProgram::default();
        for name in ["A", "B", "C"] {
            p.add_department(Department {
                open_workstations: 1,
                ..Department::named(name)
            });
        }
        let s = run(&p);
        assert_eq!(s[5].workstation_seats, 3);
        assert_eq!(s[5].usable_sf_saved, 0.0);
    }

    #[test]
    fn test_empty_program_no_savings() {
        let s = run(&SpaceProgram::default());
        assert_eq!(s.len(), 6);
        assert!(s.iter().all(|s| s.percent_saved == 0.0));
    }

    #[test]
    fn test_invalid_factor_fails() {
        let p = small_studio();
        let base = calculate_totals(&p, None).unwrap();
        let mut broken = p.clone();
        broken.loss_factor = 1.0;
        assert!(matches!(
            analyze_scenarios(&broken, &base),
            Err(ProgramError::InvalidFactor {
                field: "loss_factor",
                ..
            })
        ));
    }

    #[test]
    fn test_baseline_with_other_factors_rejected() {
        let p = small_studio();
        let base = calculate_totals(&p, None).unwrap();
        let mut changed = p.clone();
        changed.set_factors(0.20, 0.15).unwrap();
        assert_eq!(
            analyze_scenarios(&changed, &base),
            Err(ProgramError::BaselineMismatch {
                field: "circulation_factor",
                baseline: 0.35,
                program: 0.20,
            })
        );

        changed.set_factors(0.35, 0.05).unwrap();
        assert!(matches!(
            analyze_scenarios(&changed, &base),
            Err(ProgramError::BaselineMismatch {
                field: "loss_factor",
                ..
            })
        ));
    }

    #[test]
    fn test_recommend_selected_policy() {
        let mut p = small_studio();
        p.set_remote_work_policy(RemoteWorkPolicy::HybridModerate);
        let s = run(&p);
        let rec = recommend(&p, &s).unwrap();
        assert_eq!(rec.policy, RemoteWorkPolicy::HybridModerate);
        assert!(approx(rec.usable_sf_saved, 194.4));
        assert!(approx(rec.percent_saved, 194.4 / 1053.0 * 100.0));
    }

    #[test]
    fn test_recommend_unknown_policy() {
        let mut p = small_studio();
        p.remote_work_policy = "four_day_week".into();
        let s = run(&p);
        assert_eq!(s.len(), 6, "analysis still runs");
        assert_eq!(
            recommend(&p, &s),
            Err(ProgramError::UnknownPolicy {
                policy: "four_day_week".into()
            })
        );
    }

    #[test]
    fn test_advisories() {
        let a = advisories(100);
        assert_eq!(a.len(), 3);
        assert_eq!(a[0].category, "Hoteling Strategy");
        assert!(a[0].text.contains("approximately 70 stations"));
    }
}
