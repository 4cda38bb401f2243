//! Constant buckets
//!
//! The remote service enumerates group identities outside the rule list in
//! three typed buckets. A bucket is selected by [`ConstantKind`]; each holds
//! an ordered list of [`ConstantItem`]s.
//!
//! [`ConstantRecord`] is the flattened form (kind + item) that is read back
//! after an apply and threaded into the next reconciliation pass.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The three constant buckets known to the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConstantKind {
    /// Identifies `filter` groups
    #[serde(rename = "Static Group")]
    StaticGroup,
    /// Identifies the member values inside a `categorize` group
    #[serde(rename = "Dynamic Group")]
    DynamicGroup,
    /// Identifies `categorize` groups themselves
    #[serde(rename = "Dynamic Group Block")]
    DynamicGroupBlock,
}

impl ConstantKind {
    /// Bucket emission order on the wire
    pub const ALL: [ConstantKind; 3] = [
        ConstantKind::StaticGroup,
        ConstantKind::DynamicGroup,
        ConstantKind::DynamicGroupBlock,
    ];

    /// Whether items of this bucket name a group (as opposed to a member value)
    pub fn is_group_level(&self) -> bool {
        matches!(self, ConstantKind::StaticGroup | ConstantKind::DynamicGroupBlock)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstantKind::StaticGroup => "Static Group",
            ConstantKind::DynamicGroup => "Dynamic Group",
            ConstantKind::DynamicGroupBlock => "Dynamic Group Block",
        }
    }
}

impl fmt::Display for ConstantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstantKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ConstantKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownConstantType {
                value: s.to_string(),
            })
    }
}

/// One entry of a constant bucket, in wire encoding
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstantItem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref_id: String,
    /// Owning `categorize` group, only meaningful for `Dynamic Group` members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blk_id: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub val: String,
    /// Marks the synthesized "everything else" member
    #[serde(default, skip_serializing_if = "is_false", with = "string_flag")]
    pub is_other: bool,
}

impl ConstantItem {
    /// Group-level item: just a name and its ref id
    pub fn group(ref_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether this item carries a non-empty block id
    pub fn has_block(&self) -> bool {
        self.blk_id.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// A constant item together with the bucket it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantRecord {
    #[serde(rename = "constant_type")]
    pub kind: ConstantKind,
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blk_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub val: String,
    #[serde(default)]
    pub is_other: bool,
}

impl ConstantRecord {
    pub fn new(kind: ConstantKind, item: &ConstantItem) -> Self {
        Self {
            kind,
            ref_id: item.ref_id.clone(),
            blk_id: item.blk_id.clone(),
            name: item.name.clone(),
            val: item.val.clone(),
            is_other: item.is_other,
        }
    }

    /// Group-level record (`Static Group` or `Dynamic Group Block`)
    pub fn group(kind: ConstantKind, ref_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(kind, &ConstantItem::group(ref_id, name))
    }

    /// Member value of a `categorize` group
    pub fn member(
        ref_id: impl Into<String>,
        blk_id: impl Into<String>,
        name: impl Into<String>,
        val: impl Into<String>,
    ) -> Self {
        Self {
            kind: ConstantKind::DynamicGroup,
            ref_id: ref_id.into(),
            blk_id: Some(blk_id.into()),
            name: name.into(),
            val: val.into(),
            is_other: false,
        }
    }

    /// Mark this record as the "other" catch-all
    pub fn other(mut self) -> Self {
        self.is_other = true;
        self
    }

    pub fn to_item(&self) -> ConstantItem {
        ConstantItem {
            ref_id: self.ref_id.clone(),
            blk_id: self.blk_id.clone(),
            name: self.name.clone(),
            val: self.val.clone(),
            is_other: self.is_other,
        }
    }

    pub fn has_block(&self) -> bool {
        self.blk_id.as_deref().is_some_and(|b| !b.is_empty())
    }

    /// "Other" records are passed through untouched rather than owned by a
    /// declared group: anything flagged `is_other`, and `Dynamic Group`
    /// members whose block id is empty.
    pub fn is_passthrough(&self) -> bool {
        self.is_other || (self.kind == ConstantKind::DynamicGroup && !self.has_block())
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// The remote service encodes flags as the strings `"true"` / `"false"`.
pub(crate) mod string_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    pub fn serialize<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *flag { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Option::<Flag>::deserialize(deserializer)? {
            Some(Flag::Bool(b)) => b,
            Some(Flag::Text(s)) => s.eq_ignore_ascii_case("true"),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn kind_round_trips_through_display() {
        for kind in ConstantKind::ALL {
            assert_eq!(kind.to_string().parse::<ConstantKind>().unwrap(), kind);
        }
        assert!("Static".parse::<ConstantKind>().is_err());
    }

    #[test]
    fn group_level_buckets() {
        assert!(ConstantKind::StaticGroup.is_group_level());
        assert!(ConstantKind::DynamicGroupBlock.is_group_level());
        assert!(!ConstantKind::DynamicGroup.is_group_level());
    }

    #[test]
    fn item_omits_empty_fields_on_the_wire() {
        let item = ConstantItem::group("0", "Owner");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"ref_id": "0", "name": "Owner"})
        );
    }

    #[test]
    fn item_is_other_is_a_string_flag() {
        let item = ConstantItem {
            is_other: true,
            ..ConstantItem::group("3", "Other")
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["is_other"], "true");

        let parsed: ConstantItem =
            serde_json::from_value(json!({"ref_id": "3", "is_other": "true"})).unwrap();
        assert!(parsed.is_other);
        let parsed: ConstantItem =
            serde_json::from_value(json!({"ref_id": "3", "is_other": false})).unwrap();
        assert!(!parsed.is_other);
        let parsed: ConstantItem = serde_json::from_value(json!({"ref_id": "3"})).unwrap();
        assert!(!parsed.is_other);
    }

    #[test]
    fn passthrough_records() {
        assert!(ConstantRecord::group(ConstantKind::StaticGroup, "9", "Other").other().is_passthrough());
        assert!(ConstantRecord::member("7", "", "x", "x").is_passthrough());
        assert!(!ConstantRecord::member("7", "1", "x", "x").is_passthrough());
        assert!(!ConstantRecord::group(ConstantKind::DynamicGroupBlock, "1", "Owner").is_passthrough());
    }

    #[test]
    fn record_round_trips_item() {
        let record = ConstantRecord::member("12", "1", "alice", "alice");
        let item = record.to_item();
        assert_eq!(ConstantRecord::new(ConstantKind::DynamicGroup, &item), record);
    }
}
