//! List command implementation

use colored::Colorize;
use perspective_client::PerspectiveApi;

use crate::error::Result;

/// Run the list command
pub fn run_list<A: PerspectiveApi>(api: A, all: bool) -> Result<()> {
    let perspectives = api.list()?;

    let shown: Vec<_> = perspectives
        .iter()
        .filter(|(_, status)| all || status.active)
        .collect();

    if shown.is_empty() {
        println!("{}", "No perspectives".dimmed());
        return Ok(());
    }

    for (id, status) in shown {
        let marker = if status.active {
            "active".green()
        } else {
            "archived".dimmed()
        };
        println!("  {:>8}  {} ({})", id, status.name.cyan(), marker);
    }

    Ok(())
}
