//! Wire schema of the perspective API
//!
//! The remote service flattens a perspective into two parallel lists joined
//! by small integer ref ids: `rules` and `constants`. Field names here are
//! part of the wire contract and must not change.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constant::{ConstantItem, ConstantKind};

/// Request/response envelope: `{"schema": {...}}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Perspective {
    pub schema: Schema,
}

impl Perspective {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }
}

/// The flat perspective definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub name: String,
    /// Boolean encoded as `"true"` / `"false"`
    #[serde(default)]
    pub include_in_reports: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub rules: Vec<WireRule>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub constants: Vec<WireConstant>,
    /// Merges are not supported and always sent empty
    #[serde(default, deserialize_with = "nullable_vec")]
    pub merges: Vec<serde_json::Value>,
}

/// Name of the placeholder schema returned for unknown ids
pub const EMPTY_SCHEMA_NAME: &str = "Empty";

impl Schema {
    pub fn new(name: impl Into<String>, include_in_reports: bool) -> Self {
        Self {
            name: name.into(),
            include_in_reports: include_in_reports.to_string(),
            ..Self::default()
        }
    }

    /// The remote answers a lookup of a missing perspective with this
    /// well-formed empty schema instead of a 404.
    pub fn is_empty_sentinel(&self) -> bool {
        self.name == EMPTY_SCHEMA_NAME
            && self.include_in_reports == "false"
            && self.rules.is_empty()
            && self.constants.is_empty()
            && self.merges.is_empty()
    }

    /// Bucket of the given kind, if present
    pub fn constant(&self, kind: ConstantKind) -> Option<&WireConstant> {
        self.constants.iter().find(|c| c.kind == kind)
    }
}

/// One entry of the flat rule list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireRule {
    /// `filter` or `categorize`
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub asset: String,
    /// Target group of a `filter` rule
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to: String,
    /// Self-identifier of a `categorize` rule
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref_id: String,
    /// Self-identifier of a `categorize` rule
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable_vec")]
    pub field: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable_vec")]
    pub tag_field: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<WireCondition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireCondition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub combine_with: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable_vec")]
    pub clauses: Vec<WireClause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireClause {
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable_vec")]
    pub field: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable_vec")]
    pub tag_field: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub op: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub val: String,
}

/// One typed constant bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireConstant {
    #[serde(rename = "type")]
    pub kind: ConstantKind,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub list: Vec<ConstantItem>,
}

impl WireConstant {
    pub fn new(kind: ConstantKind) -> Self {
        Self {
            kind,
            list: Vec::new(),
        }
    }
}

/// Entry of `GET perspective_schemas`, keyed by perspective id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveStatus {
    pub name: String,
    /// False once the perspective has been archived
    pub active: bool,
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn sentinel_is_recognised() {
        let perspective: Perspective = serde_json::from_value(json!({
            "schema": {
                "name": "Empty",
                "include_in_reports": "false",
                "rules": [],
                "constants": [],
                "merges": []
            }
        }))
        .unwrap();
        assert!(perspective.schema.is_empty_sentinel());
    }

    #[test]
    fn sentinel_requires_every_field() {
        let mut schema = Schema::new("Empty", false);
        assert!(schema.is_empty_sentinel());

        schema.include_in_reports = "true".into();
        assert!(!schema.is_empty_sentinel());

        let mut schema = Schema::new("Empty", false);
        schema.rules.push(WireRule::default());
        assert!(!schema.is_empty_sentinel());

        let mut schema = Schema::new("Empty", false);
        schema.constants.push(WireConstant::new(ConstantKind::StaticGroup));
        assert!(!schema.is_empty_sentinel());

        assert!(!Schema::new("Costs", false).is_empty_sentinel());
    }

    #[test]
    fn null_lists_deserialize_as_empty() {
        let schema: Schema = serde_json::from_value(json!({
            "name": "Costs",
            "include_in_reports": "true",
            "rules": null,
            "constants": null,
            "merges": null
        }))
        .unwrap();
        assert!(schema.rules.is_empty());
        assert!(schema.constants.is_empty());
        assert!(schema.merges.is_empty());
    }

    #[test]
    fn empty_lists_are_always_emitted() {
        let value = serde_json::to_value(Schema::new("Costs", true)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Costs",
                "include_in_reports": "true",
                "rules": [],
                "constants": [],
                "merges": []
            })
        );
    }

    #[test]
    fn rule_omits_unset_fields() {
        let rule = WireRule {
            kind: "filter".into(),
            asset: "AwsAsset".into(),
            to: "2".into(),
            ..WireRule::default()
        };
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({"type": "filter", "asset": "AwsAsset", "to": "2"})
        );
    }

    #[test]
    fn constant_bucket_type_names() {
        let bucket: WireConstant = serde_json::from_value(json!({
            "type": "Dynamic Group Block",
            "list": [{"ref_id": "0", "name": "Owner"}]
        }))
        .unwrap();
        assert_eq!(bucket.kind, ConstantKind::DynamicGroupBlock);
        assert_eq!(bucket.list, vec![ConstantItem::group("0", "Owner")]);
    }
}
