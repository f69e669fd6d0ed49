use crate::keys::SynthesisSummary;
use crate::report::Report;
use crate::scanner::{ArtifactKind, ArtifactSet, TagDirectory};
use colored::*;
use std::path::Path;

pub fn print_scan(entries: &[(TagDirectory, ArtifactSet)]) {
    for (dir, artifacts) in entries {
        let kinds: Vec<String> = artifacts.kinds().iter().map(ArtifactKind::to_string).collect();
        let marker = if artifacts.needs_key_synthesis() {
            "needs key".yellow()
        } else {
            "".normal()
        };
        println!("{}  [{}] {}", dir.path.display(), kinds.join(", "), marker);
    }
    println!("\n{} tag directories", entries.len().to_string().bold());
}

pub fn print_synthesis_summary(summary: &SynthesisSummary) {
    if !summary.planned.is_empty() {
        println!("{}", "Dry run, nothing written:".bold().blue());
        for (dir, json) in &summary.planned {
            println!("  {} {} ({})", "•".blue(), dir.display(), json);
        }
        println!();
    }

    for done in &summary.succeeded {
        println!("  {} {} ({} bytes)", "✓".green(), done.path.display(), done.bytes);
    }

    println!("\n{}", "Key generation complete".bold());
    println!("Directories processed: {}", summary.attempted());
    println!("Generated:             {}", summary.succeeded.len().to_string().green());
    println!("Failed:                {}", failed_count(summary.failed.len()));

    if !summary.failed.is_empty() {
        println!("\n{}", "Failed directories:".red().bold());
        for (dir, err) in &summary.failed {
            println!("  - {}: {}", dir.display(), err);
        }
    }
}

pub fn print_report_summary(report: &Report, output: &Path) {
    println!("\n{}", "Report complete".bold());
    println!("Dumps processed: {}", report.rows.len());
    println!("Parsed:          {}", report.parsed_count().to_string().green());
    println!("Parse failures:  {}", failed_count(report.failed_count()));
    println!("Saved to:        {}", output.display());

    let counts = report.material_type_counts();
    if !counts.is_empty() {
        println!("\n{}", "Material types:".bold());
        for (material, count) in counts {
            println!("  {material}: {count}");
        }
    }
}

fn failed_count(count: usize) -> ColoredString {
    if count == 0 {
        count.to_string().normal()
    } else {
        count.to_string().red()
    }
}
