//! Declared groups to wire schema

use perspective_schema::{
    ConstantKind, ConstantRecord, Group, GroupType, Perspective, PerspectiveConfig, Rule, Schema,
    WireClause, WireCondition, WireConstant, WireRule,
};

use crate::error::{Error, Result};

/// Constant buckets in emission order
#[derive(Debug)]
struct Buckets {
    static_group: WireConstant,
    dynamic_group: WireConstant,
    dynamic_group_block: WireConstant,
}

impl Buckets {
    fn new() -> Self {
        Self {
            static_group: WireConstant::new(ConstantKind::StaticGroup),
            dynamic_group: WireConstant::new(ConstantKind::DynamicGroup),
            dynamic_group_block: WireConstant::new(ConstantKind::DynamicGroupBlock),
        }
    }

    fn bucket_mut(&mut self, kind: ConstantKind) -> &mut WireConstant {
        match kind {
            ConstantKind::StaticGroup => &mut self.static_group,
            ConstantKind::DynamicGroup => &mut self.dynamic_group,
            ConstantKind::DynamicGroupBlock => &mut self.dynamic_group_block,
        }
    }

    fn push(&mut self, record: &ConstantRecord) {
        self.bucket_mut(record.kind).list.push(record.to_item());
    }

    /// Non-empty buckets only
    fn into_constants(self) -> Vec<WireConstant> {
        [self.static_group, self.dynamic_group, self.dynamic_group_block]
            .into_iter()
            .filter(|c| !c.list.is_empty())
            .collect()
    }
}

/// Flatten a reconciled configuration into the wire schema.
///
/// `constants` are the records observed on the previous read. Member values
/// of each `categorize` group and every pass-through record survive the
/// write; constants of groups that are no longer declared are dropped.
///
/// # Errors
///
/// - [`Error::Schema`] if the configuration fails validation.
/// - [`Error::UnreconciledGroup`] if a group carries no ref id.
pub fn to_wire(config: &PerspectiveConfig, constants: &[ConstantRecord]) -> Result<Perspective> {
    config.validate()?;

    let mut schema = Schema::new(&config.name, config.include_in_reports);
    let mut buckets = Buckets::new();

    for group in &config.groups {
        if group.ref_id.is_empty() {
            return Err(Error::UnreconciledGroup {
                name: group.name.clone(),
            });
        }

        schema
            .rules
            .extend(group.rules.iter().map(|rule| wire_rule(group, rule)));

        match group.kind {
            GroupType::Filter => {
                buckets.push(&ConstantRecord::group(
                    ConstantKind::StaticGroup,
                    &group.ref_id,
                    &group.name,
                ));
            }
            GroupType::Categorize => {
                constants
                    .iter()
                    .filter(|c| {
                        c.kind == ConstantKind::DynamicGroup
                            && !c.is_other
                            && c.blk_id.as_deref() == Some(group.ref_id.as_str())
                    })
                    .for_each(|member| buckets.push(member));
                buckets.push(&ConstantRecord::group(
                    ConstantKind::DynamicGroupBlock,
                    &group.ref_id,
                    &group.name,
                ));
            }
        }
    }

    for record in constants.iter().filter(|c| c.is_passthrough()) {
        buckets.push(record);
    }

    schema.constants = buckets.into_constants();

    tracing::debug!(
        name = %schema.name,
        rules = schema.rules.len(),
        constants = schema.constants.len(),
        "Built wire schema"
    );

    Ok(Perspective::new(schema))
}

fn wire_rule(group: &Group, rule: &Rule) -> WireRule {
    let mut wire = WireRule {
        kind: group.kind.as_str().to_string(),
        asset: rule.asset.clone(),
        field: rule.fields.clone(),
        tag_field: rule.tag_fields.clone(),
        condition: rule
            .condition
            .as_ref()
            .filter(|c| !c.clauses.is_empty())
            .map(|c| WireCondition {
                combine_with: c
                    .combine_with
                    .map(|cw| cw.as_str().to_string())
                    .unwrap_or_default(),
                clauses: c
                    .clauses
                    .iter()
                    .map(|clause| WireClause {
                        field: clause.fields.clone(),
                        tag_field: clause.tag_fields.clone(),
                        op: clause.op.clone(),
                        val: clause.val.clone(),
                    })
                    .collect(),
            }),
        ..WireRule::default()
    };

    match group.kind {
        GroupType::Categorize => {
            wire.ref_id = group.ref_id.clone();
            wire.name = group.name.clone();
        }
        GroupType::Filter => wire.to = group.ref_id.clone(),
    }

    wire
}
