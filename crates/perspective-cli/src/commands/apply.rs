//! Apply command implementation

use colored::Colorize;
use perspective_client::PerspectiveApi;
use perspective_core::PerspectiveEngine;

use super::print_groups;
use crate::context::Context;
use crate::error::Result;

/// Run the apply command
///
/// Creates the perspective when the state has no id, or when the recorded
/// one no longer exists remotely; updates it otherwise. The read-back
/// observation is saved to the state file.
pub fn run_apply<A: PerspectiveApi>(ctx: &Context, api: A) -> Result<()> {
    let mut state = ctx.load_state()?;
    let declared = ctx.load_declared(&state)?;
    let engine = PerspectiveEngine::new(api);

    let existing = match &state.perspective_id {
        Some(id) => {
            let found = engine.read(id)?;
            if found.is_none() {
                tracing::warn!(%id, "Recorded perspective no longer exists, creating a new one");
                println!(
                    "{} Perspective {} no longer exists remotely; creating it again.",
                    "!".yellow().bold(),
                    id
                );
            }
            found
        }
        None => None,
    };

    let (observed, verb) = match existing {
        Some(current) => (
            engine.update(&current.id, &declared, &current.constants)?,
            "Updated",
        ),
        None => (engine.create(&declared, &state.constants)?, "Created"),
    };

    state.record(&observed);
    ctx.save_state(&state)?;

    println!(
        "{} {} perspective {} ({})",
        "OK".green().bold(),
        verb,
        observed.name.yellow(),
        observed.id
    );
    print_groups(&observed.groups);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::context;
    use perspective_core::StateFile;
    use perspective_test_utils::fixtures::{ENVIRONMENTS_TOML, OWNER_TOML};
    use perspective_test_utils::{MemoryApi, Request, TestWorkspace};
    use pretty_assertions::assert_eq;

    #[test]
    fn first_apply_creates_and_records() {
        let workspace = TestWorkspace::new();
        workspace.write_config(OWNER_TOML);
        let api = MemoryApi::new();

        run_apply(&context(&workspace), &api).unwrap();

        let state = StateFile::load(&workspace.state_path()).unwrap();
        assert_eq!(state.perspective_id.as_deref(), Some("1000"));
        assert_eq!(state.groups[0].ref_id, "0");
        assert_eq!(api.requests()[0], Request::Create);
    }

    #[test]
    fn second_apply_updates() {
        let workspace = TestWorkspace::new();
        workspace.write_config(OWNER_TOML);
        let api = MemoryApi::new();
        let ctx = context(&workspace);

        run_apply(&ctx, &api).unwrap();
        run_apply(&ctx, &api).unwrap();

        assert!(api.requests().contains(&Request::Update("1000".to_string())));
        assert_eq!(api.list().unwrap().len(), 1);
    }

    #[test]
    fn rename_in_place_keeps_ref_id() {
        let workspace = TestWorkspace::new();
        workspace.write_config(ENVIRONMENTS_TOML);
        let api = MemoryApi::new();
        let ctx = context(&workspace);
        run_apply(&ctx, &api).unwrap();

        workspace.write_config(&ENVIRONMENTS_TOML.replace("Development", "Dev"));
        run_apply(&ctx, &api).unwrap();

        let state = StateFile::load(&workspace.state_path()).unwrap();
        let dev = state.groups.iter().find(|g| g.name == "Dev").unwrap();
        assert_eq!(dev.ref_id, "1");
    }

    #[test]
    fn vanished_perspective_is_recreated() {
        let workspace = TestWorkspace::new();
        workspace.write_config(OWNER_TOML);
        let api = MemoryApi::new();
        let ctx = context(&workspace);
        run_apply(&ctx, &api).unwrap();

        api.delete("1000").unwrap();
        run_apply(&ctx, &api).unwrap();

        let state = StateFile::load(&workspace.state_path()).unwrap();
        assert_eq!(state.perspective_id.as_deref(), Some("1001"));
    }
}
