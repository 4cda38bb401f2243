//! Import command implementation

use colored::Colorize;
use perspective_client::PerspectiveApi;
use perspective_core::PerspectiveEngine;

use super::print_groups;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the import command
pub fn run_import<A: PerspectiveApi>(ctx: &Context, api: A, id: &str) -> Result<()> {
    let mut state = ctx.load_state()?;
    if let Some(current) = &state.perspective_id
        && current != id
    {
        return Err(CliError::user(format!(
            "State already tracks perspective {}. Run 'perspective destroy' or remove {} first.",
            current,
            ctx.state_path.display()
        )));
    }

    let observed = PerspectiveEngine::new(api).fetch(id)?;
    state.record(&observed);
    ctx.save_state(&state)?;

    println!(
        "{} Imported perspective {} ({})",
        "OK".green().bold(),
        observed.name.yellow(),
        observed.id
    );
    print_groups(&observed.groups);

    Ok(())
}
