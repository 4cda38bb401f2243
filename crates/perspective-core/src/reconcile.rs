//! Ref id reconciliation
//!
//! Groups are an ordered list and yet also identified by their ref id. The
//! host configuration has no ordered-map construct, so ref ids carried on
//! the declared groups stay at their list position when groups are
//! reordered; they do not follow the rest of the group's contents.
//!
//! The previously observed constant buckets are the source of truth for
//! "which name had which id":
//!
//! - A declared group whose name appears in the previous constants takes
//!   that ref id (reordered groups find their identity again).
//! - A declared group whose name is unknown keeps the ref id it carries,
//!   provided nothing else claimed it (renamed in place).
//! - Anything else is new and gets a fresh id above every id seen before.
//!
//! Renaming *and* reordering the same group in one pass cannot be told
//! apart from deleting one group and creating another: that group gets a
//! fresh id. No heuristics beyond name matching are applied.

use std::collections::{HashMap, HashSet};

use perspective_schema::{ConstantRecord, Group};

use crate::error::{Error, Result};

/// Assign a stable ref id to every declared group.
///
/// # Errors
///
/// - [`Error::MalformedRefId`] if a previously observed or declared ref id
///   is not a non-negative integer string.
/// - [`Error::MalformedRefId`] carrying `u64::MAX` if a new group needs an
///   id and the previous ids already reach the largest one.
/// - [`Error::DuplicateName`] if two declared groups map to the same
///   previously observed ref id.
pub fn reconcile(previous: &[ConstantRecord], groups: &mut [Group]) -> Result<()> {
    let mut ref_id_by_name: HashMap<&str, &str> = HashMap::new();
    // `None` once the largest previous id is `u64::MAX`.
    let mut next_id: Option<u64> = Some(0);

    for record in previous {
        let id = parse_ref_id(&record.ref_id)?;
        next_id = next_id.zip(id.checked_add(1)).map(|(n, after)| n.max(after));
        if record.kind.is_group_level() && !record.is_other {
            ref_id_by_name.insert(record.name.as_str(), record.ref_id.as_str());
        }
    }

    let mut used: HashSet<String> = HashSet::new();

    // Known names take the id they had last time.
    for group in groups.iter_mut() {
        let Some(&ref_id) = ref_id_by_name.get(group.name.as_str()) else {
            continue;
        };
        if !used.insert(ref_id.to_string()) {
            return Err(Error::DuplicateName {
                name: group.name.clone(),
            });
        }
        if group.ref_id != ref_id {
            tracing::debug!(group = %group.name, from = %group.ref_id, to = %ref_id, "Restoring ref_id by name");
        }
        group.ref_id = ref_id.to_string();
    }

    // Unknown names keep an unclaimed carried id, otherwise get a fresh one.
    for group in groups
        .iter_mut()
        .filter(|g| !ref_id_by_name.contains_key(g.name.as_str()))
    {
        if !group.ref_id.is_empty() {
            parse_ref_id(&group.ref_id)?;
            if used.insert(group.ref_id.clone()) {
                tracing::debug!(group = %group.name, ref_id = %group.ref_id, "Keeping ref_id of renamed group");
                continue;
            }
        }

        let fresh = loop {
            let id = next_id.ok_or_else(|| Error::MalformedRefId {
                ref_id: u64::MAX.to_string(),
            })?;
            next_id = id.checked_add(1);
            if used.insert(id.to_string()) {
                break id;
            }
        };
        group.ref_id = fresh.to_string();
        tracing::debug!(group = %group.name, ref_id = %group.ref_id, "Assigned new ref_id");
    }

    Ok(())
}

fn parse_ref_id(ref_id: &str) -> Result<u64> {
    ref_id.parse::<u64>().map_err(|_| Error::MalformedRefId {
        ref_id: ref_id.to_string(),
    })
}
