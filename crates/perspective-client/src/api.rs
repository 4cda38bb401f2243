//! The remote operations the reconciliation core depends on

use std::collections::BTreeMap;

use perspective_schema::{Perspective, PerspectiveStatus};

use crate::Result;

/// Remote perspective store
///
/// Implementations must translate the remote's "Empty" placeholder schema
/// into [`crate::Error::NotFound`] so that `get` never returns it.
pub trait PerspectiveApi {
    /// Create a perspective and return its remote id
    fn create(&self, perspective: &Perspective) -> Result<String>;

    /// Fetch a perspective by id
    fn get(&self, id: &str) -> Result<Perspective>;

    /// Replace a perspective and return what the remote stored
    fn update(&self, id: &str, perspective: &Perspective) -> Result<Perspective>;

    /// Permanently delete a perspective
    fn delete(&self, id: &str) -> Result<()>;

    /// Archive a perspective without deleting it
    fn archive(&self, id: &str) -> Result<()>;

    /// All perspectives visible to the caller, keyed by id
    fn list(&self) -> Result<BTreeMap<String, PerspectiveStatus>>;
}

impl<T: PerspectiveApi + ?Sized> PerspectiveApi for &T {
    fn create(&self, perspective: &Perspective) -> Result<String> {
        (**self).create(perspective)
    }

    fn get(&self, id: &str) -> Result<Perspective> {
        (**self).get(id)
    }

    fn update(&self, id: &str, perspective: &Perspective) -> Result<Perspective> {
        (**self).update(id, perspective)
    }

    fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id)
    }

    fn archive(&self, id: &str) -> Result<()> {
        (**self).archive(id)
    }

    fn list(&self) -> Result<BTreeMap<String, PerspectiveStatus>> {
        (**self).list()
    }
}
