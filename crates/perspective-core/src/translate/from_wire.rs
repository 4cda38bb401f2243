//! Wire schema to declared groups

use std::collections::HashMap;

use perspective_schema::{
    Clause, CombineWith, Condition, ConstantKind, ConstantRecord, Group, GroupType,
    PerspectiveConfig, Rule, Schema, WireCondition, WireRule,
};

use crate::error::{Error, Result};

/// A wire schema read back into its declared form
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Groups in order of first rule occurrence
    pub config: PerspectiveConfig,
    /// Every constant bucket, flattened for the next reconciliation
    pub constants: Vec<ConstantRecord>,
}

/// Rebuild the declared view of a wire schema.
///
/// Only groups referenced by at least one rule appear in the output, in the
/// order their first rule appears. A group that exists solely as a constant
/// is dropped from the declared view but its record is kept in
/// [`Decoded::constants`].
///
/// # Errors
///
/// - [`Error::InvalidBoolean`] if `include_in_reports` is not a boolean.
/// - [`Error::RuleWithoutTarget`] if a rule names no group.
/// - [`Error::UnresolvedGroupReference`] if a rule names a missing group.
/// - [`Error::UnknownRuleType`] / [`Error::RuleTypeMismatch`] if a rule's
///   type is unknown or disagrees with its group.
pub fn from_wire(schema: &Schema) -> Result<Decoded> {
    let include_in_reports = parse_bool(&schema.include_in_reports)?;

    let mut skeletons: HashMap<&str, Group> = HashMap::new();
    for (bucket, kind) in [
        (ConstantKind::StaticGroup, GroupType::Filter),
        (ConstantKind::DynamicGroupBlock, GroupType::Categorize),
    ] {
        let Some(constant) = schema.constant(bucket) else {
            continue;
        };
        for item in constant.list.iter().filter(|i| !i.is_other) {
            skeletons
                .entry(item.ref_id.as_str())
                .or_insert_with(|| Group::new(&item.name, kind).with_ref_id(&item.ref_id));
        }
    }

    let mut order: Vec<&str> = Vec::new();
    for wire in &schema.rules {
        let target = if !wire.to.is_empty() {
            wire.to.as_str()
        } else if !wire.ref_id.is_empty() {
            wire.ref_id.as_str()
        } else {
            return Err(Error::RuleWithoutTarget {
                asset: wire.asset.clone(),
            });
        };

        let group = skeletons
            .get_mut(target)
            .ok_or_else(|| Error::UnresolvedGroupReference {
                ref_id: target.to_string(),
            })?;

        let rule_type: GroupType = wire.kind.parse().map_err(|_| Error::UnknownRuleType {
            value: wire.kind.clone(),
        })?;
        if rule_type != group.kind {
            return Err(Error::RuleTypeMismatch {
                ref_id: target.to_string(),
                rule_type,
                group_type: group.kind,
            });
        }

        if group.rules.is_empty() {
            order.push(target);
        }
        group.rules.push(declared_rule(wire)?);
    }

    let mut config = PerspectiveConfig::new(&schema.name, include_in_reports);
    for ref_id in order {
        if let Some(group) = skeletons.remove(ref_id) {
            config.groups.push(group);
        }
    }

    let constants = schema
        .constants
        .iter()
        .flat_map(|bucket| {
            bucket
                .list
                .iter()
                .map(move |item| ConstantRecord::new(bucket.kind, item))
        })
        .collect();

    tracing::debug!(
        name = %config.name,
        groups = config.groups.len(),
        "Decoded wire schema"
    );

    Ok(Decoded { config, constants })
}

fn declared_rule(wire: &WireRule) -> Result<Rule> {
    let mut rule = Rule::new(&wire.asset)
        .with_fields(wire.field.iter().cloned())
        .with_tag_fields(wire.tag_field.iter().cloned());
    if let Some(condition) = wire.condition.as_ref().filter(|c| !c.clauses.is_empty()) {
        rule = rule.with_condition(declared_condition(condition)?);
    }
    Ok(rule)
}

fn declared_condition(wire: &WireCondition) -> Result<Condition> {
    let combine_with = match wire.combine_with.trim() {
        "" => None,
        value => Some(value.parse::<CombineWith>()?),
    };
    let clauses = wire
        .clauses
        .iter()
        .map(|c| Clause {
            fields: c.field.clone(),
            tag_fields: c.tag_field.clone(),
            op: if c.op.is_empty() {
                "=".to_string()
            } else {
                c.op.clone()
            },
            val: c.val.clone(),
        })
        .collect();
    Ok(Condition::new(combine_with, clauses))
}

/// Accepts the same spellings as the remote service's boolean strings
fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(Error::InvalidBoolean {
            value: value.to_string(),
        }),
    }
}
