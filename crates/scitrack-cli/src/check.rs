//! Reference data self-check.
//!
//! Loads the tables, generates the possibility space with the default
//! restrictions and verifies the properties the tracker relies on. Runs
//! entirely in-process and prints a ✓/✗ line per check.

use std::collections::{BTreeSet, HashSet};

use scitrack_logic::estimate::BaseValueTable;
use scitrack_logic::generator::{generate_with, BodyRestrictions, PossibilitySet};
use scitrack_logic::identifier::ExperimentId;
use scitrack_logic::reference::ReferenceTables;

use crate::data::Sources;

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn list_or(items: &[String], ok: &str) -> String {
    if items.is_empty() {
        ok.to_string()
    } else {
        items.join(", ")
    }
}

/// Run every check and print the summary. Returns `true` if all passed.
pub fn run(sources: &Sources, verbose: bool) -> bool {
    println!("=== Science Tracker Reference Check ({}) ===\n", sources.origin);

    let mut results = Vec::new();
    let restrictions = BodyRestrictions::default();

    // 1. Table loading
    let tables = validate_tables(sources, &mut results);

    if let Some(tables) = &tables {
        let possible = generate_with(tables, &restrictions);

        // 2. Possibility space
        results.extend(validate_possibilities(tables, &restrictions, &possible));

        // 3. Identifier codec
        results.extend(validate_round_trip(&possible));

        // 4. Restrictions and base values
        results.extend(validate_restrictions(tables, &restrictions, &possible));
        results.extend(validate_base_values(tables));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );
    failed == 0
}

// ── 1. Tables ───────────────────────────────────────────────────────────

fn validate_tables(sources: &Sources, results: &mut Vec<TestResult>) -> Option<ReferenceTables> {
    println!("--- Reference Tables ---");
    let tables = match ReferenceTables::from_json(&sources.experiments, &sources.bodies) {
        Ok(t) => t,
        Err(e) => {
            results.push(TestResult {
                name: "tables_load".into(),
                passed: false,
                detail: e.to_string(),
            });
            return None;
        }
    };

    let experiments = tables.experiments().count();
    let bodies = tables.bodies().count();
    results.push(TestResult {
        name: "tables_load".into(),
        passed: experiments > 0 && bodies > 0,
        detail: format!("{} experiment types, {} bodies", experiments, bodies),
    });

    let no_situations: Vec<String> = tables
        .experiments()
        .filter(|e| e.situations.is_empty())
        .map(|e| e.id.clone())
        .chain(
            tables
                .bodies()
                .filter(|b| b.situations.is_empty())
                .map(|b| b.name.clone()),
        )
        .collect();
    results.push(TestResult {
        name: "tables_have_situations".into(),
        passed: no_situations.is_empty(),
        detail: list_or(&no_situations, "every experiment and body lists situations"),
    });

    let mut names = HashSet::new();
    let duplicate_names: Vec<String> = tables
        .experiments()
        .filter(|e| !names.insert(e.name.clone()))
        .map(|e| e.name.clone())
        .collect();
    results.push(TestResult {
        name: "experiment_names_unique".into(),
        passed: duplicate_names.is_empty(),
        detail: list_or(&duplicate_names, "display names map back to one type"),
    });

    Some(tables)
}

// ── 2. Possibility space ────────────────────────────────────────────────

fn validate_possibilities(
    tables: &ReferenceTables,
    restrictions: &BodyRestrictions,
    possible: &PossibilitySet,
) -> Vec<TestResult> {
    println!("--- Possibility Space ---");
    let mut results = Vec::new();

    let mut seen = HashSet::new();
    let duplicates: Vec<String> = possible
        .iter()
        .filter(|p| !seen.insert(p.id.encode().to_string()))
        .map(|p| p.id.to_string())
        .collect();
    results.push(TestResult {
        name: "possibilities_unique".into(),
        passed: duplicates.is_empty(),
        detail: if duplicates.is_empty() {
            format!("{} unique identifiers", possible.len())
        } else {
            format!("{} duplicates: {}", duplicates.len(), duplicates.join(", "))
        },
    });

    // Count independently from the table shapes.
    let mut expected = 0usize;
    for exp in tables.experiments() {
        for body in tables.bodies() {
            if !restrictions.allows(&exp.id, &body.name) {
                continue;
            }
            let situations = exp.situations.intersection(&body.situations).count();
            let per_situation = if exp.requires_biome && !body.biomes.is_empty() {
                body.biomes.len()
            } else {
                1
            };
            expected += situations * per_situation;
        }
    }
    results.push(TestResult {
        name: "possibilities_count".into(),
        passed: expected == possible.len(),
        detail: format!("expected {}, generated {}", expected, possible.len()),
    });

    let unreachable: Vec<String> = tables
        .experiments()
        .filter(|e| possible.for_type(&e.id).next().is_none())
        .map(|e| e.id.clone())
        .collect();
    results.push(TestResult {
        name: "experiments_reachable".into(),
        passed: unreachable.is_empty(),
        detail: list_or(&unreachable, "every experiment type has a possibility"),
    });

    results
}

// ── 3. Identifier codec ─────────────────────────────────────────────────

fn validate_round_trip(possible: &PossibilitySet) -> Vec<TestResult> {
    println!("--- Identifier Round Trip ---");
    let failures: Vec<String> = possible
        .iter()
        .filter(|p| ExperimentId::decode(p.id.encode()).ok().as_ref() != Some(&p.id))
        .map(|p| p.id.to_string())
        .collect();
    let mismatched_fields = possible
        .iter()
        .filter_map(|p| ExperimentId::decode(p.id.encode()).ok().map(|d| (p, d)))
        .filter(|(p, d)| {
            d.experiment_type() != p.id.experiment_type()
                || d.body() != p.id.body()
                || d.situation() != p.id.situation()
                || d.biome() != p.id.biome()
        })
        .count();
    vec![
        TestResult {
            name: "identifiers_decode".into(),
            passed: failures.is_empty(),
            detail: if failures.is_empty() {
                format!("{} identifiers decode to themselves", possible.len())
            } else {
                format!("{} failed: {}", failures.len(), failures.join(", "))
            },
        },
        TestResult {
            name: "identifier_fields_preserved".into(),
            passed: mismatched_fields == 0,
            detail: format!("{} field mismatches", mismatched_fields),
        },
    ]
}

// ── 4. Restrictions and values ──────────────────────────────────────────

fn validate_restrictions(
    tables: &ReferenceTables,
    restrictions: &BodyRestrictions,
    possible: &PossibilitySet,
) -> Vec<TestResult> {
    println!("--- Body Restrictions ---");
    let mut results = Vec::new();

    let unknown: Vec<String> = restrictions
        .iter()
        .filter(|r| {
            tables.experiment(&r.experiment_type).is_none()
                || tables.body(&r.only_body).is_none()
        })
        .map(|r| format!("{}→{}", r.experiment_type, r.only_body))
        .collect();
    results.push(TestResult {
        name: "restrictions_known".into(),
        passed: unknown.is_empty(),
        detail: list_or(&unknown, "restrictions name known types and bodies"),
    });

    let restricted: BTreeSet<&str> = restrictions
        .iter()
        .map(|r| r.experiment_type.as_str())
        .collect();
    let leaked: Vec<String> = possible
        .iter()
        .filter(|p| restricted.contains(p.id.experiment_type()))
        .filter(|p| !restrictions.allows(p.id.experiment_type(), p.id.body()))
        .map(|p| p.id.to_string())
        .collect();
    results.push(TestResult {
        name: "restrictions_respected".into(),
        passed: leaked.is_empty(),
        detail: list_or(&leaked, "no restricted type generated elsewhere"),
    });

    let empty: Vec<String> = restricted
        .iter()
        .filter(|t| possible.for_type(t).next().is_none())
        .map(|t| t.to_string())
        .collect();
    results.push(TestResult {
        name: "restrictions_reachable".into(),
        passed: empty.is_empty(),
        detail: list_or(&empty, "every restricted type still has a possibility"),
    });

    results
}

fn validate_base_values(tables: &ReferenceTables) -> Vec<TestResult> {
    println!("--- Base Values ---");
    let values = BaseValueTable::default();
    let missing: Vec<String> = tables
        .experiments()
        .filter(|e| !values.values.contains_key(&e.id))
        .map(|e| e.id.clone())
        .collect();
    let non_positive: Vec<String> = values
        .values
        .iter()
        .filter(|(_, v)| **v <= 0.0)
        .map(|(k, _)| k.clone())
        .collect();
    vec![
        TestResult {
            name: "base_values_cover_types".into(),
            passed: missing.is_empty(),
            detail: list_or(&missing, "every type has a base value"),
        },
        TestResult {
            name: "base_values_positive".into(),
            passed: non_positive.is_empty(),
            detail: list_or(&non_positive, "all base values positive"),
        },
    ]
}
