//! Translation between declared perspectives and the wire schema
//!
//! - [`to_wire`] flattens reconciled groups into the `rules` list and the
//!   three typed constant buckets, carrying along constants the user does
//!   not own (categorize members, "Other" items).
//! - [`from_wire`] rebuilds the declared view from a wire schema and hands
//!   back the flat constant records for the next reconciliation.

mod from_wire;
mod to_wire;

pub use from_wire::{Decoded, from_wire};
pub use to_wire::to_wire;
