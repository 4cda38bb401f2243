//! Show command implementation

use colored::Colorize;
use perspective_client::PerspectiveApi;
use perspective_core::{PerspectiveEngine, StateFile};

use super::print_groups;
use crate::context::Context;
use crate::error::Result;

/// Run the show command
///
/// Refreshes the state from the remote. A perspective that no longer exists
/// is dropped from the state.
pub fn run_show<A: PerspectiveApi>(ctx: &Context, api: A, json: bool) -> Result<()> {
    let mut state = match ctx.load_state() {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(path = ?ctx.state_path, "Ignoring unreadable state file: {}", e);
            StateFile::new()
        }
    };
    let id = ctx.require_id(&state)?;
    let engine = PerspectiveEngine::new(api);

    let Some(observed) = engine.read(&id)? else {
        state.clear();
        ctx.save_state(&state)?;
        println!(
            "{} Perspective {} no longer exists; removed it from the state.",
            "!".yellow().bold(),
            id
        );
        return Ok(());
    };

    state.record(&observed);
    ctx.save_state(&state)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&observed)?);
        return Ok(());
    }

    println!("{}:   {}", "Name".dimmed(), observed.name.yellow());
    println!("{}:     {}", "Id".dimmed(), observed.id);
    println!(
        "{}: {}",
        "Reports".dimmed(),
        if observed.include_in_reports {
            "included".green()
        } else {
            "excluded".dimmed()
        }
    );
    println!();
    println!("{}:", "Groups".bold());
    print_groups(&observed.groups);

    Ok(())
}
