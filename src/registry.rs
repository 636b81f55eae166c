use alloc::{boxed::Box, collections::BTreeMap, sync::Arc, vec::Vec};
use core::any::TypeId;

use crate::{
    any::{Instance, TypeInfo},
    config::Config,
    errors::InstantiateErrorKind,
    instantiator::{boxed_instantiator, Arguments, BoxedCloneInstantiator, Instantiator},
    parameter::Parameter,
};

/// Identifier under which every registry provides the container itself
pub const CONTAINER_IDENT: &str = "dotwire.Container";

pub(crate) type Caster = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

#[must_use]
fn caster<C, I, F>(cast: F) -> Caster
where
    C: Send + Sync + 'static,
    I: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<C>) -> Arc<I> + Send + Sync + 'static,
{
    Arc::new(move |instance: &Instance| instance.downcast::<C>().map(|value| Instance::new(cast(value))))
}

#[derive(Clone)]
pub(crate) enum EntryKind {
    Concrete {
        instantiator: BoxedCloneInstantiator,
        parameters: Option<Box<[Parameter]>>,
        config: Config,
    },
    Interface {
        implementations: BTreeMap<TypeId, (TypeInfo, Caster)>,
    },
}

/// Registered type: its Rust type and how to get an instance of it
#[derive(Clone)]
pub struct TypeEntry {
    pub(crate) type_info: TypeInfo,
    pub(crate) kind: EntryKind,
}

impl TypeEntry {
    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, EntryKind::Interface { .. })
    }

    /// Constructor parameters registered with the factory, if any
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> Option<&[Parameter]> {
        match &self.kind {
            EntryKind::Concrete { parameters, .. } => parameters.as_deref(),
            EntryKind::Interface { .. } => None,
        }
    }

    /// Concrete types registered as implementations of this interface
    pub fn implementations(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        let implementations = match &self.kind {
            EntryKind::Interface { implementations } => Some(implementations.values().map(|(type_info, _)| *type_info)),
            EntryKind::Concrete { .. } => None,
        };
        implementations.into_iter().flatten()
    }
}

/// Table of types the container is able to construct, keyed by dot-notation identifiers
#[derive(Clone)]
pub struct Registry {
    pub(crate) entries: BTreeMap<Box<str>, TypeEntry>,
    pub(crate) implementations: Vec<(Box<str>, TypeInfo, Caster)>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            entries: BTreeMap::new(),
            implementations: Vec::new(),
        };
        registry.add_concrete(
            CONTAINER_IDENT,
            boxed_instantiator(|arguments: Arguments| Ok::<_, InstantiateErrorKind>(arguments.container().clone())),
            None,
            Config { cache_provides: false },
        );
        registry
    }

    /// Registers a factory without constructor metadata.
    /// The container calls it with empty arguments.
    #[inline]
    #[must_use]
    pub fn provide<Inst, Args>(mut self, ident: &str, instantiator: Inst) -> Self
    where
        Inst: Instantiator<Args, Error = InstantiateErrorKind>,
        Args: 'static,
    {
        self.add_concrete(ident, boxed_instantiator(instantiator), None, Config::default());
        self
    }

    /// Registers a factory with its ordered constructor parameters.
    /// The container resolves every parameter and passes them to the factory as [`Arguments`].
    #[inline]
    #[must_use]
    pub fn provide_with_params<Inst, Args>(mut self, ident: &str, parameters: impl IntoIterator<Item = Parameter>, instantiator: Inst) -> Self
    where
        Inst: Instantiator<Args, Error = InstantiateErrorKind>,
        Args: 'static,
    {
        self.add_concrete(
            ident,
            boxed_instantiator(instantiator),
            Some(parameters.into_iter().collect()),
            Config::default(),
        );
        self
    }

    #[inline]
    #[must_use]
    pub fn provide_with_config<Inst, Args>(
        mut self,
        ident: &str,
        parameters: impl IntoIterator<Item = Parameter>,
        instantiator: Inst,
        config: Config,
    ) -> Self
    where
        Inst: Instantiator<Args, Error = InstantiateErrorKind>,
        Args: 'static,
    {
        self.add_concrete(ident, boxed_instantiator(instantiator), Some(parameters.into_iter().collect()), config);
        self
    }

    #[inline]
    #[must_use]
    pub fn provide_default<T: Default + Send + Sync + 'static>(self, ident: &str) -> Self {
        self.provide_with_params(ident, [], || Ok(T::default()))
    }

    /// Registers an abstract type, usually a trait object like `dyn Logger`.
    /// It can't be instantiated, parameters declared with it are satisfied by spec overrides
    /// pointing at one of its implementations, see [`Self::implement`].
    #[inline]
    #[must_use]
    pub fn provide_interface<I: ?Sized + Send + Sync + 'static>(mut self, ident: &str) -> Self {
        self.entries.insert(
            ident.into(),
            TypeEntry {
                type_info: TypeInfo::of::<I>(),
                kind: EntryKind::Interface {
                    implementations: BTreeMap::new(),
                },
            },
        );
        self
    }

    /// Declares that `C` implements the interface registered under `ident`.
    ///
    /// # Examples
    /// ```rust
    /// use dotwire::Registry;
    /// use std::sync::Arc;
    ///
    /// trait Logger: Send + Sync {}
    ///
    /// struct FileLogger;
    ///
    /// impl Logger for FileLogger {}
    ///
    /// let registry = Registry::new()
    ///     .provide_interface::<dyn Logger>("app.Logger")
    ///     .implement("app.Logger", |logger: Arc<FileLogger>| logger as Arc<dyn Logger>);
    /// ```
    #[inline]
    #[must_use]
    pub fn implement<C, I, F>(mut self, ident: &str, cast: F) -> Self
    where
        C: Send + Sync + 'static,
        I: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<C>) -> Arc<I> + Send + Sync + 'static,
    {
        self.implementations.push((ident.into(), TypeInfo::of::<C>(), caster(cast)));
        self
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, ident: &str) -> bool {
        self.entries.contains_key(ident)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Registry {
    pub(crate) fn add_concrete(
        &mut self,
        ident: &str,
        instantiator: BoxedCloneInstantiator,
        parameters: Option<Box<[Parameter]>>,
        config: Config,
    ) -> Option<TypeEntry> {
        self.entries.insert(
            ident.into(),
            TypeEntry {
                type_info: instantiator.provides(),
                kind: EntryKind::Concrete {
                    instantiator,
                    parameters,
                    config,
                },
            },
        )
    }
}
