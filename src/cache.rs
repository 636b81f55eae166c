use alloc::{boxed::Box, collections::BTreeMap};

use crate::any::Instance;

#[derive(Clone)]
pub(crate) struct Cached {
    pub(crate) instance: Instance,
    /// Whether the instance was registered by hand instead of constructed
    pub(crate) registered: bool,
}

/// Shared instances keyed by the identifier they were requested with
#[derive(Default, Clone)]
pub(crate) struct Cache {
    map: BTreeMap<Box<str>, Cached>,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, ident: &str) -> Option<&Cached> {
        self.map.get(ident)
    }

    #[inline]
    pub(crate) fn insert(&mut self, ident: &str, instance: Instance, registered: bool) -> Option<Cached> {
        self.map.insert(ident.into(), Cached { instance, registered })
    }

    #[inline]
    pub(crate) fn remove(&mut self, ident: &str) -> Option<Cached> {
        self.map.remove(ident)
    }
}
