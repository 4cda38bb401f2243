//! Sample declarations and a temporary working directory

use std::fs;
use std::path::{Path, PathBuf};

use perspective_schema::{
    Clause, CombineWith, Condition, Group, PerspectiveConfig, Rule,
};
use tempfile::TempDir;

/// Single categorize group bucketing assets by their `owner` tag
pub const OWNER_TOML: &str = r#"
name = "Acc Test"
include_in_reports = false

[[group]]
name = "OwnerAccTest"
type = "categorize"

[[group.rule]]
asset = "AwsAsset"
tag_field = ["owner"]
"#;

/// Two filter groups with conditions and one categorize group
pub const ENVIRONMENTS_TOML: &str = r#"
name = "Environments"
include_in_reports = true

[[group]]
name = "Production"

[[group.rule]]
asset = "AwsAccount"

[group.rule.condition]
combine_with = "or"

[[group.rule.condition.clause]]
field = ["Account Name"]
op = "Contains"
val = "prod"

[[group.rule.condition.clause]]
tag_field = ["env"]
val = "production"

[[group]]
name = "Development"

[[group.rule]]
asset = "AwsAccount"

[group.rule.condition]

[[group.rule.condition.clause]]
field = ["Account Name"]
op = "Contains"
val = "dev"

[[group]]
name = "Team"
type = "categorize"

[[group.rule]]
asset = "AwsAsset"
tag_field = ["team"]
"#;

/// [`OWNER_TOML`] as a value
pub fn owner_config() -> PerspectiveConfig {
    PerspectiveConfig::new("Acc Test", false).with_group(
        Group::categorize("OwnerAccTest")
            .with_rule(Rule::new("AwsAsset").with_tag_fields(["owner"])),
    )
}

/// [`ENVIRONMENTS_TOML`] as a value
pub fn environments_config() -> PerspectiveConfig {
    PerspectiveConfig::new("Environments", true)
        .with_group(
            Group::filter("Production").with_rule(Rule::new("AwsAccount").with_condition(
                Condition::new(
                    Some(CombineWith::Or),
                    vec![
                        Clause::field("Account Name", "Contains", "prod"),
                        Clause::tag("env", "=", "production"),
                    ],
                ),
            )),
        )
        .with_group(
            Group::filter("Development").with_rule(Rule::new("AwsAccount").with_condition(
                Condition::new(None, vec![Clause::field("Account Name", "Contains", "dev")]),
            )),
        )
        .with_group(
            Group::categorize("Team").with_rule(Rule::new("AwsAsset").with_tag_fields(["team"])),
        )
}

/// A temporary directory holding a config file and a state file.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("perspective.toml")
    }

    pub fn state_path(&self) -> PathBuf {
        self.root().join(".perspective").join("state.toml")
    }

    /// Write `perspective.toml` and return its path
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.config_path();
        fs::write(&path, content).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_match_their_toml() {
        assert_eq!(PerspectiveConfig::parse(OWNER_TOML).unwrap(), owner_config());
        assert_eq!(
            PerspectiveConfig::parse(ENVIRONMENTS_TOML).unwrap(),
            environments_config()
        );
    }
}
