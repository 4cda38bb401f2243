//! A perspective edited over several applies, the way a user would.
//!
//! Each step loads the declaration from disk, seeds ref ids from the saved
//! state, applies through the engine and saves the read-back observation.

use perspective_core::{PerspectiveEngine, StateFile, diff};
use perspective_schema::PerspectiveConfig;
use perspective_test_utils::fixtures::ENVIRONMENTS_TOML;
use perspective_test_utils::{MemoryApi, TestWorkspace};
use pretty_assertions::assert_eq;

struct Session {
    workspace: TestWorkspace,
    engine: PerspectiveEngine<MemoryApi>,
}

impl Session {
    fn new() -> Self {
        Self {
            workspace: TestWorkspace::new(),
            engine: PerspectiveEngine::new(MemoryApi::new().with_other_catch_all()),
        }
    }

    fn apply(&self, toml: &str) -> Vec<(String, String)> {
        self.workspace.write_config(toml);
        let mut state = StateFile::load_or_default(&self.workspace.state_path()).unwrap();
        let mut declared = PerspectiveConfig::load(&self.workspace.config_path()).unwrap();
        state.seed_ref_ids(&mut declared.groups);

        let observed = match &state.perspective_id {
            Some(id) => self.engine.update(id, &declared, &state.constants).unwrap(),
            None => self.engine.create(&declared, &state.constants).unwrap(),
        };
        assert!(diff(&declared, &observed.config()).is_clean());

        state.record(&observed);
        state.save(&self.workspace.state_path()).unwrap();

        observed
            .groups
            .iter()
            .map(|g| (g.name.clone(), g.ref_id.clone()))
            .collect()
    }
}

fn ids(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(n, r)| (n.to_string(), r.to_string()))
        .collect()
}

const STAGING: &str = r#"
[[group]]
name = "Staging"

[[group.rule]]
asset = "AwsAccount"
field = ["Account Name"]
"#;

#[test]
fn identities_survive_a_sequence_of_edits() {
    let session = Session::new();

    // Production 0, Development 1, Team 2, remote "Other" 3
    assert_eq!(
        session.apply(ENVIRONMENTS_TOML),
        ids(&[("Production", "0"), ("Development", "1"), ("Team", "2")])
    );

    // A new group is allocated above every id seen so far.
    let grown = format!("{ENVIRONMENTS_TOML}{STAGING}");
    assert_eq!(
        session.apply(&grown),
        ids(&[
            ("Production", "0"),
            ("Development", "1"),
            ("Team", "2"),
            ("Staging", "4"),
        ])
    );

    // Renamed in place keeps its id.
    let renamed = grown.replace("Development", "Dev");
    assert_eq!(
        session.apply(&renamed),
        ids(&[
            ("Production", "0"),
            ("Dev", "1"),
            ("Team", "2"),
            ("Staging", "4"),
        ])
    );

    // Reapplying the same declaration changes nothing.
    assert_eq!(
        session.apply(&renamed),
        ids(&[
            ("Production", "0"),
            ("Dev", "1"),
            ("Team", "2"),
            ("Staging", "4"),
        ])
    );
}

#[test]
fn removed_group_drops_its_constants() {
    let session = Session::new();
    let grown = format!("{ENVIRONMENTS_TOML}{STAGING}");
    session.apply(&grown);

    session.apply(ENVIRONMENTS_TOML);
    let state = StateFile::load(&session.workspace.state_path()).unwrap();
    assert!(state.constants.iter().all(|c| c.name != "Staging"));
    assert_eq!(state.constants.iter().filter(|c| c.is_other).count(), 1);

    // Fresh ids count up from the last observation only, so the id of a
    // removed group is free again.
    let regrown = format!("{ENVIRONMENTS_TOML}{}", STAGING.replace("Staging", "QA"));
    assert_eq!(
        session.apply(&regrown),
        ids(&[
            ("Production", "0"),
            ("Development", "1"),
            ("Team", "2"),
            ("QA", "4"),
        ])
    );
}
