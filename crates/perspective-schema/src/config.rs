//! Declared perspective configuration
//!
//! The user-authored, hierarchical view: a perspective owns an ordered list
//! of groups, each group owns an ordered list of rules.
//!
//! # Example TOML
//!
//! ```toml
//! name = "Cost Centers"
//! include_in_reports = true
//!
//! [[group]]
//! name = "Owner"
//! type = "categorize"
//!
//! [[group.rule]]
//! asset = "AwsAsset"
//! tag_field = ["owner"]
//!
//! [[group]]
//! name = "Production"
//!
//! [[group.rule]]
//! asset = "AwsAccount"
//!
//! [group.rule.condition]
//! combine_with = "or"
//!
//! [[group.rule.condition.clause]]
//! field = ["Name"]
//! op = "Contains"
//! val = "prod"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum accepted size of a perspective config file
pub const MAX_CONFIG_SIZE: u64 = 1024 * 1024;

/// How a group's assets are selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GroupType {
    /// Matching assets are assigned directly to the group
    #[default]
    Filter,
    /// Assets are bucketed by the value of a field or tag
    Categorize,
}

impl GroupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupType::Filter => "filter",
            GroupType::Categorize => "categorize",
        }
    }
}

impl FromStr for GroupType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "filter" => Ok(GroupType::Filter),
            "categorize" => Ok(GroupType::Categorize),
            _ => Err(Error::UnknownGroupType {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for GroupType {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GroupType> for String {
    fn from(kind: GroupType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the clauses of a condition are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CombineWith {
    And,
    Or,
}

impl CombineWith {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombineWith::And => "and",
            CombineWith::Or => "or",
        }
    }
}

impl FromStr for CombineWith {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(CombineWith::And),
            "or" => Ok(CombineWith::Or),
            _ => Err(Error::UnknownCombineWith {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for CombineWith {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CombineWith> for String {
    fn from(combine: CombineWith) -> Self {
        combine.as_str().to_string()
    }
}

impl fmt::Display for CombineWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_op() -> String {
    "=".to_string()
}

/// A single field or tag comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    #[serde(rename = "field", default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(rename = "tag_field", default, skip_serializing_if = "Vec::is_empty")]
    pub tag_fields: Vec<String>,
    #[serde(default = "default_op")]
    pub op: String,
    #[serde(default)]
    pub val: String,
}

impl Clause {
    /// Compare an asset field
    pub fn field(field: impl Into<String>, op: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            fields: vec![field.into()],
            tag_fields: Vec::new(),
            op: op.into(),
            val: val.into(),
        }
    }

    /// Compare an asset tag
    pub fn tag(tag: impl Into<String>, op: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            tag_fields: vec![tag.into()],
            op: op.into(),
            val: val.into(),
        }
    }
}

/// Predicate selecting the assets a rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combine_with: Option<CombineWith>,
    #[serde(rename = "clause", default)]
    pub clauses: Vec<Clause>,
}

impl Condition {
    pub fn new(combine_with: Option<CombineWith>, clauses: Vec<Clause>) -> Self {
        Self {
            combine_with,
            clauses,
        }
    }
}

/// One rule of a group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rule {
    /// Asset kind the rule matches (e.g. `AwsAsset`)
    pub asset: String,
    #[serde(rename = "field", default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(rename = "tag_field", default, skip_serializing_if = "Vec::is_empty")]
    pub tag_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Rule {
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            ..Self::default()
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tag_fields<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_fields = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// A named, independently identified bucket of assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    /// Stable identifier; empty until reconciled
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref_id: String,
    #[serde(rename = "type", default)]
    pub kind: GroupType,
    #[serde(rename = "rule", default)]
    pub rules: Vec<Rule>,
}

impl Group {
    pub fn new(name: impl Into<String>, kind: GroupType) -> Self {
        Self {
            name: name.into(),
            ref_id: String::new(),
            kind,
            rules: Vec::new(),
        }
    }

    pub fn filter(name: impl Into<String>) -> Self {
        Self::new(name, GroupType::Filter)
    }

    pub fn categorize(name: impl Into<String>) -> Self {
        Self::new(name, GroupType::Categorize)
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = ref_id.into();
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// A complete declared perspective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveConfig {
    #[serde(default)]
    pub name: String,
    pub include_in_reports: bool,
    #[serde(rename = "group", default)]
    pub groups: Vec<Group>,
}

impl PerspectiveConfig {
    pub fn new(name: impl Into<String>, include_in_reports: bool) -> Self {
        Self {
            name: name.into(),
            include_in_reports,
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Parse and validate a perspective from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: PerspectiveConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a perspective from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, larger than
    /// [`MAX_CONFIG_SIZE`], not valid TOML, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let size = std::fs::metadata(path)
            .map_err(|e| Error::io(path, e))?
            .len();
        if size > MAX_CONFIG_SIZE {
            return Err(Error::ConfigTooLarge {
                path: path.to_path_buf(),
                size,
                max: MAX_CONFIG_SIZE,
            });
        }

        tracing::debug!(?path, "Loading perspective config");
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: PerspectiveConfig =
            toml::from_str(&content).map_err(|e| Error::InvalidConfig {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the structural requirements the translators rely on
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::MissingName);
        }
        let mut names = HashSet::new();
        for (index, group) in self.groups.iter().enumerate() {
            if group.name.trim().is_empty() {
                return Err(Error::MissingGroupName { index });
            }
            if !names.insert(group.name.as_str()) {
                return Err(Error::DuplicateGroupName {
                    name: group.name.clone(),
                });
            }
            if let Some(rule) = group.rules.iter().position(|r| r.asset.trim().is_empty()) {
                return Err(Error::MissingAsset {
                    group: group.name.clone(),
                    rule,
                });
            }
        }
        Ok(())
    }
}
