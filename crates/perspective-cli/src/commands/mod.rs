//! Command implementations for perspective-cli
//!
//! Remote commands are generic over [`perspective_client::PerspectiveApi`]
//! so they run the same against the HTTP client and the in-memory one.

pub mod apply;
pub mod destroy;
pub mod diff;
pub mod import;
pub mod list;
pub mod plan;
pub mod show;

pub use apply::run_apply;
pub use destroy::run_destroy;
pub use diff::run_diff;
pub use import::run_import;
pub use list::run_list;
pub use plan::run_plan;
pub use show::run_show;

use colored::Colorize;
use perspective_core::{DriftReport, DriftType};
use perspective_schema::Group;

/// Print groups as `ref_id  name  (type, n rules)`
pub(crate) fn print_groups(groups: &[Group]) {
    if groups.is_empty() {
        println!("  {}", "No groups".dimmed());
        return;
    }
    for group in groups {
        let ref_id = if group.ref_id.is_empty() {
            "-"
        } else {
            group.ref_id.as_str()
        };
        println!(
            "  {:>4}  {} ({}, {} rule(s))",
            ref_id.dimmed(),
            group.name.cyan(),
            group.kind,
            group.rules.len()
        );
    }
}

/// Print a drift report, one line per item
pub(crate) fn print_drift(report: &DriftReport) {
    if report.is_clean() {
        println!("{} No changes. Perspective is up to date.", "OK".green().bold());
        return;
    }
    for item in &report.items {
        let marker = match item.drift_type {
            DriftType::Added => "+".green(),
            DriftType::Removed => "-".red(),
            DriftType::Changed => "~".yellow(),
        };
        println!("  {} {}: {}", marker, item.subject.bold(), item.description);
    }
}
