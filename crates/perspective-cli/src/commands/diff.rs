//! Diff command implementation
//!
//! Compares the declared perspective with what the remote holds.

use colored::Colorize;
use perspective_client::PerspectiveApi;
use perspective_core::{PerspectiveEngine, diff};
use serde_json::json;

use super::print_drift;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the diff command
pub fn run_diff<A: PerspectiveApi>(ctx: &Context, api: A, json: bool) -> Result<()> {
    let state = ctx.load_state()?;
    let declared = ctx.load_declared(&state)?;
    let id = ctx.require_id(&state)?;

    let engine = PerspectiveEngine::new(api);
    let observed = engine.read(&id)?.ok_or_else(|| {
        CliError::user(format!(
            "Perspective {} no longer exists. Run 'perspective apply' to create it.",
            id
        ))
    })?;

    let report = diff(&declared, &observed.config());

    if json {
        let output = json!({
            "id": id,
            "has_changes": !report.is_clean(),
            "changes": report.items,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {} ({})", "Diff".blue().bold(), observed.name.yellow(), id);
        println!();
        print_drift(&report);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::context;
    use perspective_test_utils::fixtures::OWNER_TOML;
    use perspective_test_utils::{MemoryApi, TestWorkspace};

    #[test]
    fn diff_after_apply() {
        let workspace = TestWorkspace::new();
        workspace.write_config(OWNER_TOML);
        let api = MemoryApi::new();
        let ctx = context(&workspace);
        super::super::run_apply(&ctx, &api).unwrap();

        workspace.write_config(&OWNER_TOML.replace("owner", "team"));
        run_diff(&ctx, &api, false).unwrap();
        run_diff(&ctx, &api, true).unwrap();
    }

    #[test]
    fn diff_against_missing_perspective() {
        let workspace = TestWorkspace::new();
        workspace.write_config(OWNER_TOML);
        let api = MemoryApi::new();
        let ctx = context(&workspace);
        super::super::run_apply(&ctx, &api).unwrap();
        api.delete("1000").unwrap();

        let err = run_diff(&ctx, &api, false).unwrap_err();
        assert!(err.to_string().contains("no longer exists"));
    }
}
