//! SpaceProg Headless Calculation Harness
//!
//! Loads a space program, runs the calculator and remote work analyzer,
//! and checks the engine's invariants against the live output.
//! Runs entirely in-process — no storage, no networking, no rendering.
//!
//! Usage:
//!   cargo run -p spaceprog-simtest
//!   cargo run -p spaceprog-simtest -- --program data/acme.json --verbose
//!   RUST_LOG=debug cargo run -p spaceprog-simtest -- --json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use spaceprog_logic::calculator::{calculate_totals, gross_up, CalculationResult};
use spaceprog_logic::program::{validate_program, SpaceProgram, SupportSpaces};
use spaceprog_logic::remote::{
    advisories, analyze_scenarios, recommend, Advisory, PolicyRecommendation, RemoteWorkPolicy,
    RemoteWorkScenario,
};
use spaceprog_logic::standards::WorkspaceType;
use spaceprog_logic::ProgramError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ── Demo program (same JSON the logic tests use) ────────────────────────
const DEMO_JSON: &str = include_str!("../../../data/demo_program.json");

const EPSILON: f64 = 1e-6;

#[derive(Parser)]
#[command(name = "spaceprog-simtest", version)]
struct Cli {
    /// Program JSON to check (defaults to the embedded demo program)
    #[arg(long, value_name = "FILE", env = "SPACEPROG_PROGRAM")]
    program: Option<PathBuf>,
    /// Print every check and the full area summary
    #[arg(long)]
    verbose: bool,
    /// Dump totals, scenarios and recommendation as JSON
    #[arg(long)]
    json: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Serialize)]
struct Report<'a> {
    totals: &'a CalculationResult,
    scenarios: &'a [RemoteWorkScenario],
    recommendation: Option<&'a PolicyRecommendation>,
    advisories: &'a [Advisory],
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}

fn load_program(path: Option<&PathBuf>) -> Result<SpaceProgram> {
    let Some(path) = path else {
        return serde_json::from_str(DEMO_JSON).context("parsing embedded demo program");
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading program file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing program {}", path.display()))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let program = load_program(cli.program.as_ref())?;
    info!(
        "Loaded '{}' ({} departments, {} staff)",
        program.project_name,
        program.departments.len(),
        program.total_staff()
    );
    println!("=== SpaceProg Calculation Harness ===\n");

    let mut results = Vec::new();

    // 1. Program validation
    results.extend(validate_inputs(&program));

    let totals = calculate_totals(&program, None).context("calculating totals")?;
    let scenarios = analyze_scenarios(&program, &totals).context("analyzing scenarios")?;

    // 2. Area totals
    results.extend(validate_totals(&program, &totals, verbose));

    // 3. Remote work scenarios
    results.extend(validate_scenarios(&totals, &scenarios, verbose));

    // 4. Recommendation lookup
    let recommendation = match recommend(&program, &scenarios) {
        Ok(rec) => Some(rec),
        Err(e) => {
            warn!("No recommendation: {e}");
            None
        }
    };
    results.extend(validate_recommendation(
        &program,
        recommendation.as_ref(),
        &scenarios,
    ));

    // 5. Boundary checks
    results.extend(validate_boundaries(&program));

    if cli.json {
        let notes = advisories(totals.totals.total_staff);
        let report = Report {
            totals: &totals,
            scenarios: &scenarios,
            recommendation: recommendation.as_ref(),
            advisories: &notes,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ── 1. Program Inputs ───────────────────────────────────────────────────

fn validate_inputs(program: &SpaceProgram) -> Vec<TestResult> {
    println!("--- Program Inputs ---");
    let mut results = Vec::new();

    let errors = validate_program(program);
    results.push(TestResult {
        name: "program_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "factors, policy and custom standards are valid".into()
        } else {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    let unnamed: Vec<usize> = program
        .departments
        .iter()
        .enumerate()
        .filter(|(_, d)| d.name.trim().is_empty())
        .map(|(i, _)| i)
        .collect();
    results.push(TestResult {
        name: "program_departments_named".into(),
        passed: unnamed.is_empty(),
        detail: if unnamed.is_empty() {
            format!("{} departments, all named", program.departments.len())
        } else {
            format!("unnamed departments at positions {:?}", unnamed)
        },
    });

    results
}

// ── 2. Area Totals ──────────────────────────────────────────────────────

fn validate_totals(
    program: &SpaceProgram,
    r: &CalculationResult,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Area Totals ---");
    let mut results = Vec::new();
    let t = &r.totals;

    // Line items multiply out exactly
    let bad_items: Vec<String> = r
        .departments
        .iter()
        .flat_map(|d| d.items.iter().map(move |i| (d.name.as_str(), i)))
        .chain(r.support.items.iter().map(|i| ("support", i)))
        .filter(|(_, i)| i.area_sf != f64::from(i.count) * i.unit_sf)
        .map(|(owner, i)| format!("{owner}/{}", i.kind.id()))
        .collect();
    results.push(TestResult {
        name: "totals_line_items_exact".into(),
        passed: bad_items.is_empty(),
        detail: if bad_items.is_empty() {
            "every line item = count × unit SF".into()
        } else {
            format!("mismatched: {}", bad_items.join(", "))
        },
    });

    // Subtotals roll up
    let dept_sum: f64 = r.departments.iter().map(|d| d.area_sf).sum();
    results.push(TestResult {
        name: "totals_nasf_rollup".into(),
        passed: dept_sum == t.department_sf
            && t.net_assignable_sf == t.department_sf + t.support_sf,
        detail: format!(
            "{:.0} dept + {:.0} support = {:.0} NASF",
            t.department_sf, t.support_sf, t.net_assignable_sf
        ),
    });

    // Department order preserved
    let in_order = r
        .departments
        .iter()
        .zip(&program.departments)
        .all(|(a, d)| a.name == d.name);
    results.push(TestResult {
        name: "totals_department_order".into(),
        passed: in_order && r.departments.len() == program.departments.len(),
        detail: "report sections follow input order".into(),
    });

    // USF and RSF formulas
    let usf = t.net_assignable_sf * (1.0 + t.circulation_factor);
    results.push(TestResult {
        name: "totals_usf_formula".into(),
        passed: (t.usable_sf - usf).abs() < EPSILON,
        detail: format!(
            "{:.1} USF = NASF × {:.2}",
            t.usable_sf,
            1.0 + t.circulation_factor
        ),
    });
    let rsf = t.usable_sf / (1.0 - t.loss_factor);
    results.push(TestResult {
        name: "totals_rsf_formula".into(),
        passed: (t.rentable_sf - rsf).abs() < EPSILON,
        detail: format!(
            "{:.1} RSF = USF / {:.2}",
            t.rentable_sf,
            1.0 - t.loss_factor
        ),
    });

    // Per-person sentinel matches headcount
    let per_person = r.sf_per_person();
    results.push(TestResult {
        name: "totals_per_person_sentinel".into(),
        passed: match (t.total_staff, &per_person) {
            (0, Err(ProgramError::UndefinedPerPersonMetric { .. })) => true,
            (n, Ok(v)) => n > 0 && v.is_finite() && *v > 0.0,
            _ => false,
        },
        detail: match per_person {
            Ok(v) => format!("{:.1} USF per person", v),
            Err(e) => e.to_string(),
        },
    });

    // Idempotence
    let again = calculate_totals(program, None);
    results.push(TestResult {
        name: "totals_idempotent".into(),
        passed: again.as_ref() == Ok(r),
        detail: "second calculation is bit-identical".into(),
    });

    if verbose {
        println!("  Department areas:");
        for d in &r.departments {
            println!("    {:28} {:4} staff {:>10.0} SF", d.name, d.staff, d.area_sf);
        }
        println!("  Support spaces:");
        for i in &r.support.items {
            println!(
                "    {:28} {:4} × {:>5.0} = {:>8.0} SF",
                i.name, i.count, i.unit_sf, i.area_sf
            );
        }
        println!("  NASF {:>10.0}", t.net_assignable_sf);
        println!("  USF  {:>10.0}", t.usable_sf);
        println!("  RSF  {:>10.0}", t.rentable_sf);
    }

    results
}

// ── 3. Remote Work Scenarios ────────────────────────────────────────────

fn validate_scenarios(
    r: &CalculationResult,
    scenarios: &[RemoteWorkScenario],
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Remote Work Scenarios ---");
    let mut results = Vec::new();

    let order: Vec<RemoteWorkPolicy> = scenarios.iter().map(|s| s.policy).collect();
    results.push(TestResult {
        name: "scenarios_canonical_order".into(),
        passed: order == RemoteWorkPolicy::ALL,
        detail: format!("{} scenarios", scenarios.len()),
    });

    let onsite = scenarios.first();
    results.push(TestResult {
        name: "scenarios_full_onsite_baseline".into(),
        passed: onsite.is_some_and(|s| {
            s.usable_sf_saved == 0.0
                && s.headcount_factor == 1.0
                && s.usable_sf == r.totals.usable_sf
        }),
        detail: "full_onsite saves nothing and equals baseline USF".into(),
    });

    let monotonic = scenarios
        .windows(2)
        .all(|w| w[1].usable_sf_saved >= w[0].usable_sf_saved);
    results.push(TestResult {
        name: "scenarios_monotonic_savings".into(),
        passed: monotonic,
        detail: "savings never drop as reduction grows".into(),
    });

    // Offices and support never scale
    let baseline_offices: u64 = r
        .departments
        .iter()
        .flat_map(|d| &d.items)
        .filter(|i| i.kind.is_office())
        .map(|i| u64::from(i.count))
        .sum();
    let offices_fixed = scenarios
        .iter()
        .all(|s| s.effective_headcount - s.workstation_seats == baseline_offices);
    results.push(TestResult {
        name: "scenarios_offices_fixed".into(),
        passed: offices_fixed,
        detail: format!("{} enclosed offices held in every scenario", baseline_offices),
    });

    // Regrossing the scenario net gives the scenario USF
    let regross_ok = scenarios.iter().all(|s| {
        gross_up(
            s.net_assignable_sf,
            r.totals.circulation_factor,
            r.totals.loss_factor,
        )
        .is_ok_and(|g| g.usable_sf == s.usable_sf && g.rentable_sf == s.rentable_sf)
    });
    results.push(TestResult {
        name: "scenarios_shared_formula".into(),
        passed: regross_ok,
        detail: "scenario USF/RSF use the calculator gross-up".into(),
    });

    if verbose {
        println!(
            "  {:16} {:>6} {:>6} {:>10} {:>10} {:>10}",
            "policy", "cut", "seats", "USF", "RSF", "saved"
        );
        for s in scenarios {
            println!(
                "  {:16} {:>5.0}% {:>6} {:>10.0} {:>10.0} {:>10.0}",
                s.policy.id(),
                s.reduction * 100.0,
                s.workstation_seats,
                s.usable_sf,
                s.rentable_sf,
                s.usable_sf_saved
            );
        }
        let workstations: u64 = r
            .departments
            .iter()
            .flat_map(|d| &d.items)
            .filter(|i| i.kind.is_workstation())
            .map(|i| u64::from(i.count))
            .sum();
        println!(
            "  {} baseline workstations across {} types",
            workstations,
            WorkspaceType::STAFF.iter().filter(|t| t.is_workstation()).count()
        );
    }

    results
}

// ── 4. Recommendation ───────────────────────────────────────────────────

fn validate_recommendation(
    program: &SpaceProgram,
    rec: Option<&PolicyRecommendation>,
    scenarios: &[RemoteWorkScenario],
) -> Vec<TestResult> {
    println!("--- Recommendation ---");
    let mut results = Vec::new();

    let selected = program.policy();
    results.push(TestResult {
        name: "recommend_matches_selection".into(),
        passed: match (&selected, rec) {
            (Ok(policy), Some(rec)) => {
                rec.policy == *policy
                    && scenarios
                        .iter()
                        .any(|s| s.policy == rec.policy && s.usable_sf == rec.usable_sf)
            }
            (Err(ProgramError::UnknownPolicy { .. }), None) => true,
            _ => false,
        },
        detail: match rec {
            Some(rec) => format!(
                "{}: saves {:.0} USF ({:.1}%)",
                rec.description, rec.usable_sf_saved, rec.percent_saved
            ),
            None => format!("'{}' is not a known policy", program.remote_work_policy),
        },
    });

    results
}

// ── 5. Boundary Checks ──────────────────────────────────────────────────

fn validate_boundaries(program: &SpaceProgram) -> Vec<TestResult> {
    println!("--- Boundary Checks ---");
    let mut results = Vec::new();

    // Loss factor of exactly 1 fails before dividing
    let mut full_loss = program.clone();
    full_loss.loss_factor = 1.0;
    results.push(TestResult {
        name: "boundary_loss_factor_one".into(),
        passed: matches!(
            calculate_totals(&full_loss, None),
            Err(ProgramError::InvalidFactor {
                field: "loss_factor",
                ..
            })
        ),
        detail: "loss_factor = 1.0 → InvalidFactor".into(),
    });

    // Support-only copy has no per-person metric
    let support_only = SpaceProgram {
        departments: Vec::new(),
        support_spaces: if program.support_spaces.total_rooms() > 0 {
            program.support_spaces.clone()
        } else {
            SupportSpaces {
                reception_areas: 1,
                ..SupportSpaces::default()
            }
        },
        ..program.clone()
    };
    let undefined = calculate_totals(&support_only, None)
        .map(|r| r.metrics.usable_sf.is_none())
        .unwrap_or(false);
    results.push(TestResult {
        name: "boundary_zero_staff".into(),
        passed: undefined,
        detail: "support-only program → per-person undefined".into(),
    });

    results
}
