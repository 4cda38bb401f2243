//! Reconciliation engine for cost-allocation perspectives
//!
//! A perspective is declared as an ordered list of named groups, each with
//! its own rules. The remote service stores it as a flat list of rules plus
//! three typed constant buckets, tied together by small integer ref ids.
//! This crate keeps those ids stable across edits and translates in both
//! directions:
//!
//! - [`reconcile`]: assign ref ids from the previous observation
//! - [`to_wire`] / [`from_wire`]: declared form to wire schema and back
//! - [`PerspectiveEngine`]: create, read, update and delete through a
//!   [`perspective_client::PerspectiveApi`]
//! - [`StateFile`]: the caller-side record of the last observation
//! - [`diff`]: drift between declared and observed
//!
//! ```text
//!                 perspective-cli
//!                        |
//!                 perspective-core
//!                   |          |
//!     perspective-schema   perspective-client
//! ```
//!
//! # Example
//!
//! ```
//! use perspective_core::plan;
//! use perspective_schema::{Group, PerspectiveConfig, Rule};
//!
//! let desired = PerspectiveConfig::new("Acc Test", false).with_group(
//!     Group::categorize("Owner").with_rule(Rule::new("AwsAsset").with_tag_fields(["owner"])),
//! );
//! let planned = plan(&desired, &[]).unwrap();
//! assert_eq!(planned.perspective.schema.rules[0].ref_id, "0");
//! ```

pub mod drift;
pub mod engine;
pub mod error;
pub mod reconcile;
pub mod state;
pub mod translate;

pub use drift::{DriftItem, DriftReport, DriftType, diff};
pub use engine::{Observed, PerspectiveEngine, Planned, plan};
pub use error::{Error, ErrorKind, Result};
pub use reconcile::reconcile;
pub use state::StateFile;
pub use translate::{Decoded, from_wire, to_wire};
