//! Data model for cost-allocation perspectives.
//!
//! Two views of the same perspective live here:
//!
//! - [`config`]: the hierarchical, user-authored view (groups that own
//!   rules), loaded from TOML and validated once at the boundary.
//! - [`wire`]: the remote service's flat view (a rule list and typed
//!   constant buckets joined by ref ids), encoded as JSON.
//!
//! Translating between the two lives in `perspective-core`.

pub mod config;
pub mod constant;
pub mod error;
pub mod wire;

pub use config::{Clause, CombineWith, Condition, Group, GroupType, PerspectiveConfig, Rule};
pub use constant::{ConstantItem, ConstantKind, ConstantRecord};
pub use error::{Error, Result};
pub use wire::{Perspective, PerspectiveStatus, Schema, WireClause, WireCondition, WireConstant, WireRule};
