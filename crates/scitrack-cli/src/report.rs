//! Text and JSON rendering of one reconciliation pass.

use anyhow::Result;
use scitrack_logic::extract::Extraction;
use scitrack_logic::pass::PassResult;
use scitrack_logic::reconcile::AvailableEntry;
use scitrack_logic::stats::Statistics;
use scitrack_logic::view::{group, Filter, Group, GroupBy};
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    title: &'a str,
    statistics: &'a Statistics,
    available: Vec<&'a AvailableEntry>,
    rejected: Vec<String>,
}

pub fn print_json(extraction: &Extraction, result: &PassResult, filter: &Filter) -> Result<()> {
    let report = JsonReport {
        title: &extraction.title,
        statistics: &result.statistics,
        available: filter.apply(&result.available),
        rejected: extraction.rejected.iter().map(|e| e.to_string()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn print_text(extraction: &Extraction, result: &PassResult, filter: &Filter, by: GroupBy) {
    let stats = &result.statistics;
    println!("=== {} ===\n", extraction.title);
    println!("  Science earned:    {:.1}", stats.total_earned_value);
    println!("  Science available: {:.1}", stats.total_available_value);
    println!(
        "  Completed:         {}/{} ({:.1}%)",
        stats.total_completed, stats.total_possible, stats.completion_percentage
    );
    println!("  Still available:   {}", stats.total_available);
    if !extraction.rejected.is_empty() {
        println!("  Skipped entries:   {}", extraction.rejected.len());
    }
    println!();

    let groups = group(filter.apply(&result.available), by);
    if groups.is_empty() {
        println!("Nothing left to collect.");
        return;
    }
    for g in &groups {
        print_group(g, by, 0);
    }
}

fn print_group(g: &Group<'_>, by: GroupBy, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{}{} {} ({} left, {:.1})",
        indent,
        g.status().symbol(),
        g.label,
        g.tally.members - g.tally.complete,
        g.tally.remaining_value
    );
    for child in &g.children {
        print_group(child, by, depth + 1);
    }
    for entry in &g.entries {
        println!(
            "{}  {} {:<28} {:>7.1}",
            indent,
            entry.status().symbol(),
            leaf_label(entry, by),
            entry.remaining_value
        );
    }
}

/// Experiment groupings already name the experiment; show where instead.
fn leaf_label(entry: &AvailableEntry, by: GroupBy) -> &str {
    match by {
        GroupBy::Experiment => entry.id.biome().unwrap_or("Global"),
        GroupBy::Body | GroupBy::Situation => &entry.display_name,
    }
}
