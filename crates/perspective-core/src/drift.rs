//! Drift between a declared perspective and its remote observation
//!
//! Groups are matched by name, since ref ids on the declared side are only
//! known after reconciliation.

use std::collections::HashMap;
use std::fmt;

use perspective_schema::{Group, PerspectiveConfig};
use serde::{Deserialize, Serialize};

/// How a subject differs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftType {
    /// Declared but not present remotely
    Added,
    /// Present remotely but no longer declared
    Removed,
    /// Present on both sides with different contents
    Changed,
}

impl fmt::Display for DriftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Changed => write!(f, "changed"),
        }
    }
}

/// A single difference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftItem {
    /// `perspective` or the group name
    pub subject: String,
    pub drift_type: DriftType,
    /// Human-readable details
    pub description: String,
}

/// All differences between declared and observed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftReport {
    pub items: Vec<DriftItem>,
}

impl DriftReport {
    pub fn is_clean(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, subject: &str, drift_type: DriftType, description: impl Into<String>) {
        self.items.push(DriftItem {
            subject: subject.to_string(),
            drift_type,
            description: description.into(),
        });
    }
}

const PERSPECTIVE_SUBJECT: &str = "perspective";

/// Compare a declared configuration with an observed one
pub fn diff(desired: &PerspectiveConfig, observed: &PerspectiveConfig) -> DriftReport {
    let mut report = DriftReport::default();

    if desired.name != observed.name {
        report.push(
            PERSPECTIVE_SUBJECT,
            DriftType::Changed,
            format!("name '{}' -> '{}'", observed.name, desired.name),
        );
    }
    if desired.include_in_reports != observed.include_in_reports {
        report.push(
            PERSPECTIVE_SUBJECT,
            DriftType::Changed,
            format!(
                "include_in_reports {} -> {}",
                observed.include_in_reports, desired.include_in_reports
            ),
        );
    }

    let remote: HashMap<&str, &Group> = observed
        .groups
        .iter()
        .map(|g| (g.name.as_str(), g))
        .collect();
    let local: HashMap<&str, &Group> = desired
        .groups
        .iter()
        .map(|g| (g.name.as_str(), g))
        .collect();

    // Relative order of the groups both sides share
    let local_order: Vec<&str> = desired
        .groups
        .iter()
        .map(|g| g.name.as_str())
        .filter(|n| remote.contains_key(n))
        .collect();
    let remote_order: Vec<&str> = observed
        .groups
        .iter()
        .map(|g| g.name.as_str())
        .filter(|n| local.contains_key(n))
        .collect();

    for group in &desired.groups {
        let Some(existing) = remote.get(group.name.as_str()) else {
            report.push(
                &group.name,
                DriftType::Added,
                format!("{} group with {} rule(s)", group.kind, group.rules.len()),
            );
            continue;
        };

        let mut changes = Vec::new();
        if existing.kind != group.kind {
            changes.push(format!("type {} -> {}", existing.kind, group.kind));
        }
        if existing.rules != group.rules {
            changes.push(format!(
                "rules differ ({} remote, {} declared)",
                existing.rules.len(),
                group.rules.len()
            ));
        }
        let local_pos = local_order.iter().position(|n| *n == group.name);
        let remote_pos = remote_order.iter().position(|n| *n == group.name);
        if local_pos != remote_pos {
            changes.push("position changed".to_string());
        }

        if !changes.is_empty() {
            report.push(&group.name, DriftType::Changed, changes.join(", "));
        }
    }

    for group in &observed.groups {
        if !local.contains_key(group.name.as_str()) {
            report.push(&group.name, DriftType::Removed, "no longer declared");
        }
    }

    tracing::debug!(items = report.items.len(), "Computed drift");
    report
}
