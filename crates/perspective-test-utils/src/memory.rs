//! [`MemoryApi`]: an in-memory [`PerspectiveApi`] that behaves like the
//! remote service closely enough for lifecycle tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use perspective_client::{Error, PerspectiveApi, Result};
use perspective_schema::{
    ConstantItem, ConstantKind, Perspective, PerspectiveStatus, WireConstant,
};

/// A call received by [`MemoryApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Create,
    Get(String),
    Update(String),
    Delete(String),
    Archive(String),
    List,
}

#[derive(Debug, Clone)]
struct Stored {
    perspective: Perspective,
    active: bool,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    perspectives: BTreeMap<String, Stored>,
    requests: Vec<Request>,
}

/// In-memory remote.
///
/// - Ids are assigned from 1000 upwards, like the remote's numeric ids.
/// - `create` and `update` reject a name already used by another active
///   perspective with [`Error::AlreadyExists`].
/// - Unknown ids are [`Error::NotFound`].
/// - With [`MemoryApi::with_other_catch_all`], every stored perspective that
///   has static groups gains a synthesized "Other" item, as the real service
///   does.
#[derive(Debug)]
pub struct MemoryApi {
    inner: Mutex<Inner>,
    other_catch_all: bool,
}

impl Default for MemoryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryApi {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1000,
                ..Inner::default()
            }),
            other_catch_all: false,
        }
    }

    pub fn with_other_catch_all(mut self) -> Self {
        self.other_catch_all = true;
        self
    }

    /// Seed a perspective under a fixed id
    pub fn insert(&self, id: &str, perspective: Perspective) {
        self.lock().perspectives.insert(
            id.to_string(),
            Stored {
                perspective,
                active: true,
            },
        );
    }

    /// Stored wire form, bypassing the request log
    pub fn stored(&self, id: &str) -> Option<Perspective> {
        self.lock()
            .perspectives
            .get(id)
            .map(|s| s.perspective.clone())
    }

    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    fn canonical(&self, perspective: &Perspective) -> Perspective {
        let mut perspective = perspective.clone();
        if !self.other_catch_all {
            return perspective;
        }

        let schema = &mut perspective.schema;
        let next = schema
            .constants
            .iter()
            .flat_map(|c| c.list.iter())
            .filter_map(|i| i.ref_id.parse::<u64>().ok())
            .max()
            .map_or(0, |m| m + 1);

        if let Some(bucket) = schema
            .constants
            .iter_mut()
            .find(|c| c.kind == ConstantKind::StaticGroup)
            && !bucket.list.iter().any(|i| i.is_other)
        {
            bucket.list.push(ConstantItem {
                is_other: true,
                ..ConstantItem::group(next.to_string(), "Other")
            });
        }
        perspective
    }
}

fn name_taken(inner: &Inner, name: &str, except: Option<&str>) -> bool {
    inner.perspectives.iter().any(|(id, stored)| {
        stored.active && stored.perspective.schema.name == name && Some(id.as_str()) != except
    })
}

impl PerspectiveApi for MemoryApi {
    fn create(&self, perspective: &Perspective) -> Result<String> {
        let canonical = self.canonical(perspective);
        let mut inner = self.lock();
        inner.requests.push(Request::Create);

        let name = &perspective.schema.name;
        if name_taken(&inner, name, None) {
            return Err(Error::AlreadyExists { name: name.clone() });
        }

        let id = inner.next_id.to_string();
        inner.next_id += 1;
        inner.perspectives.insert(
            id.clone(),
            Stored {
                perspective: canonical,
                active: true,
            },
        );
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Perspective> {
        let mut inner = self.lock();
        inner.requests.push(Request::Get(id.to_string()));
        inner
            .perspectives
            .get(id)
            .map(|s| s.perspective.clone())
            .ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    fn update(&self, id: &str, perspective: &Perspective) -> Result<Perspective> {
        let canonical = self.canonical(perspective);
        let mut inner = self.lock();
        inner.requests.push(Request::Update(id.to_string()));

        if !inner.perspectives.contains_key(id) {
            return Err(Error::NotFound { id: id.to_string() });
        }
        let name = &perspective.schema.name;
        if name_taken(&inner, name, Some(id)) {
            return Err(Error::AlreadyExists { name: name.clone() });
        }

        if let Some(stored) = inner.perspectives.get_mut(id) {
            stored.perspective = canonical.clone();
        }
        Ok(canonical)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.requests.push(Request::Delete(id.to_string()));
        inner
            .perspectives
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    fn archive(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.requests.push(Request::Archive(id.to_string()));
        let stored = inner
            .perspectives
            .get_mut(id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        stored.active = false;
        Ok(())
    }

    fn list(&self) -> Result<BTreeMap<String, PerspectiveStatus>> {
        let mut inner = self.lock();
        inner.requests.push(Request::List);
        Ok(inner
            .perspectives
            .iter()
            .map(|(id, stored)| {
                (
                    id.clone(),
                    PerspectiveStatus {
                        name: stored.perspective.schema.name.clone(),
                        active: stored.active,
                    },
                )
            })
            .collect())
    }
}

/// A `Dynamic Group` bucket holding member values of a categorize group
pub fn members(blk_id: &str, first_ref_id: u64, values: &[&str]) -> WireConstant {
    WireConstant {
        kind: ConstantKind::DynamicGroup,
        list: values
            .iter()
            .enumerate()
            .map(|(i, value)| ConstantItem {
                ref_id: (first_ref_id + i as u64).to_string(),
                blk_id: Some(blk_id.to_string()),
                name: value.to_string(),
                val: value.to_string(),
                is_other: false,
            })
            .collect(),
    }
}
