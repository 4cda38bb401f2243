//! Plan command implementation
//!
//! Offline: reconciles the declared perspective against the recorded state
//! and prints what apply would send.

use colored::Colorize;
use perspective_core::{diff, plan};
use perspective_schema::PerspectiveConfig;

use super::{print_drift, print_groups};
use crate::context::Context;
use crate::error::Result;

/// Run the plan command
pub fn run_plan(ctx: &Context, json: bool) -> Result<()> {
    let state = ctx.load_state()?;
    let declared = ctx.load_declared(&state)?;
    let planned = plan(&declared, &state.constants)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&planned.perspective)?);
        return Ok(());
    }

    let action = match &state.perspective_id {
        Some(id) => format!("update perspective {}", id),
        None => "create a new perspective".to_string(),
    };
    println!(
        "{} {} would {}",
        "=>".blue().bold(),
        planned.config.name.yellow(),
        action
    );
    println!();

    println!("{}:", "Groups".bold());
    print_groups(&planned.config.groups);
    println!();

    if state.perspective_id.is_some() {
        // Compare groups only; the state keeps no perspective-level fields.
        let recorded = PerspectiveConfig {
            groups: state.groups.clone(),
            ..planned.config.clone()
        };
        println!("{}:", "Changes since last apply".bold());
        print_drift(&diff(&planned.config, &recorded));
    }

    Ok(())
}
