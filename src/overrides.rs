use alloc::{boxed::Box, collections::BTreeMap, sync::Arc};

use crate::any::Instance;

/// Call-scoped values of constructor parameters, keyed by parameter name.
///
/// A value is passed to the constructor verbatim and wins over the dependency spec
/// and over the declared type of the parameter.
/// It applies only to the type requested from [`crate::Container::make_with`], not to its dependencies.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    map: BTreeMap<Box<str>, Instance>,
}

impl Overrides {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    #[inline]
    pub fn insert<T: Send + Sync + 'static>(&mut self, name: impl Into<Box<str>>, value: T) -> Option<Instance> {
        self.insert_instance(name, Instance::from_value(value))
    }

    /// Inserts an already shared value, e.g. a trait object
    #[inline]
    pub fn insert_rc<T: ?Sized + Send + Sync + 'static>(&mut self, name: impl Into<Box<str>>, value: Arc<T>) -> Option<Instance> {
        self.insert_instance(name, Instance::new(value))
    }

    #[inline]
    pub fn insert_instance(&mut self, name: impl Into<Box<str>>, instance: Instance) -> Option<Instance> {
        self.map.insert(name.into(), instance)
    }

    #[inline]
    #[must_use]
    pub fn with<T: Send + Sync + 'static>(mut self, name: impl Into<Box<str>>, value: T) -> Self {
        self.insert(name, value);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_rc<T: ?Sized + Send + Sync + 'static>(mut self, name: impl Into<Box<str>>, value: Arc<T>) -> Self {
        self.insert_rc(name, value);
        self
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.map.get(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
