//! Perspective lifecycle against a [`PerspectiveApi`]
//!
//! The engine owns no state between calls. Callers pass in the constants
//! observed on the previous read and persist whatever [`Observed`] comes
//! back (see [`crate::StateFile`]).

use perspective_client::PerspectiveApi;
use perspective_schema::{ConstantRecord, Group, Perspective, PerspectiveConfig};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reconcile::reconcile;
use crate::translate::{from_wire, to_wire};

/// Result of planning a write: the reconciled declaration and its wire form
#[derive(Debug, Clone, PartialEq)]
pub struct Planned {
    /// Declared configuration with every group's ref id assigned
    pub config: PerspectiveConfig,
    pub perspective: Perspective,
}

/// Reconcile ref ids and translate to the wire schema. Performs no I/O.
pub fn plan(desired: &PerspectiveConfig, previous: &[ConstantRecord]) -> Result<Planned> {
    desired.validate()?;
    let mut config = desired.clone();
    reconcile(previous, &mut config.groups)?;
    let perspective = to_wire(&config, previous)?;
    Ok(Planned {
        config,
        perspective,
    })
}

/// A remote perspective as last read back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observed {
    pub id: String,
    pub name: String,
    pub include_in_reports: bool,
    pub groups: Vec<Group>,
    pub constants: Vec<ConstantRecord>,
}

impl Observed {
    /// Declared view of the observation
    pub fn config(&self) -> PerspectiveConfig {
        PerspectiveConfig {
            name: self.name.clone(),
            include_in_reports: self.include_in_reports,
            groups: self.groups.clone(),
        }
    }
}

/// Drives create, read, update and delete through an API client
#[derive(Debug)]
pub struct PerspectiveEngine<A> {
    api: A,
}

impl<A: PerspectiveApi> PerspectiveEngine<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Create the perspective and read it back.
    ///
    /// Constants assigned by the remote only become known on the read.
    pub fn create(
        &self,
        desired: &PerspectiveConfig,
        previous: &[ConstantRecord],
    ) -> Result<Observed> {
        let planned = plan(desired, previous)?;
        let id = self.api.create(&planned.perspective)?;
        tracing::info!(%id, name = %desired.name, "Created perspective");
        self.fetch(&id)
    }

    /// Read a perspective, `None` if the remote no longer has it
    pub fn read(&self, id: &str) -> Result<Option<Observed>> {
        match self.fetch(id) {
            Ok(observed) => Ok(Some(observed)),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%id, "Perspective not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Read a perspective that must exist
    pub fn fetch(&self, id: &str) -> Result<Observed> {
        let perspective = self.api.get(id)?;
        let decoded = from_wire(&perspective.schema)?;
        Ok(Observed {
            id: id.to_string(),
            name: decoded.config.name,
            include_in_reports: decoded.config.include_in_reports,
            groups: decoded.config.groups,
            constants: decoded.constants,
        })
    }

    /// Replace the remote definition and read it back.
    ///
    /// A failed update leaves the remote as it was; nothing is rolled back.
    pub fn update(
        &self,
        id: &str,
        desired: &PerspectiveConfig,
        previous: &[ConstantRecord],
    ) -> Result<Observed> {
        let planned = plan(desired, previous)?;
        self.api.update(id, &planned.perspective)?;
        tracing::info!(%id, name = %desired.name, "Updated perspective");
        self.fetch(id)
    }

    /// Hard delete
    pub fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(id)?;
        tracing::info!(%id, "Deleted perspective");
        Ok(())
    }

    /// Soft delete; the perspective stays listed as inactive
    pub fn archive(&self, id: &str) -> Result<()> {
        self.api.archive(id)?;
        tracing::info!(%id, "Archived perspective");
        Ok(())
    }
}
