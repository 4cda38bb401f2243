//! Destroy command implementation

use colored::Colorize;
use perspective_client::PerspectiveApi;
use perspective_core::PerspectiveEngine;

use crate::context::Context;
use crate::error::Result;

/// Run the destroy command
///
/// A perspective that is already gone remotely only clears the state.
pub fn run_destroy<A: PerspectiveApi>(ctx: &Context, api: A, archive: bool) -> Result<()> {
    let mut state = ctx.load_state()?;
    let id = ctx.require_id(&state)?;
    let engine = PerspectiveEngine::new(api);

    let result = if archive {
        engine.archive(&id)
    } else {
        engine.delete(&id)
    };
    match result {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            tracing::warn!(%id, "Perspective already gone");
        }
        Err(e) => return Err(e.into()),
    }

    state.clear();
    ctx.save_state(&state)?;

    let verb = if archive { "Archived" } else { "Deleted" };
    println!("{} {} perspective {}", "OK".green().bold(), verb, id);
    Ok(())
}
