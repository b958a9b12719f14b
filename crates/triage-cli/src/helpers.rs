//! Shared CLI helpers — banner and report rendering.

use colored::{ColoredString, Colorize};

use triage_core::{AnalysisResult, Severity};

/// Print the version banner.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🔎 Triage".cyan().bold(), version.dimmed());
    println!();
}

/// Severity rendered with its conventional color.
pub fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical => "critical".red().bold(),
        Severity::High => "high".red(),
        Severity::Medium => "medium".yellow(),
        Severity::Low => "low".green(),
    }
}

/// Print a human-readable diagnostic report.
pub fn print_result(result: &AnalysisResult) {
    println!();
    println!(
        "  {:<14} {}",
        "Severity:".bold(),
        severity_label(result.severity)
    );
    println!("  {:<14} {}", "Category:".bold(), result.category);
    println!(
        "  {:<14} {:.0}%",
        "Confidence:".bold(),
        result.confidence_score * 100.0
    );
    println!();
    println!("  {}", "Root cause:".bold());
    println!("    {}", result.root_cause);
    println!();
    println!("  {}", "Recommendations:".bold());
    for (i, recommendation) in result.recommendations.iter().enumerate() {
        println!("    {}. {}", i + 1, recommendation);
    }
    if !result.related_errors.is_empty() {
        println!();
        println!(
            "  {:<14} {}",
            "Related:".bold(),
            result.related_errors.join(", ").dimmed()
        );
    }
    if let Some(snippet) = &result.code_snippet {
        println!();
        println!("  {}", "Code snippet:".bold());
        for line in snippet.lines() {
            println!("    {}", line.dimmed());
        }
    }
    println!();
    println!(
        "  {}",
        format!(
            "{} | {:.0} ms",
            result.analysis_metadata.model, result.analysis_metadata.processing_time_ms
        )
        .dimmed()
    );
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
