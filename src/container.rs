use alloc::{boxed::Box, collections::BTreeSet, sync::Arc, vec::Vec};
use core::{any::type_name, cell::RefCell, iter};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tracing::{debug, error, info_span};

use crate::{
    any::{Instance, TypeInfo},
    cache::{Cache, Cached},
    config::Config,
    errors::ResolveErrorKind,
    instantiator::Arguments,
    introspector::{Introspector, RegistryIntrospector},
    overrides::Overrides,
    parameter::{DeclaredType, Parameter},
    registry::{EntryKind, Registry},
    resolver::TypeResolver,
    spec::{DependencySpec, SpecStore},
};

type ResolutionStack = Vec<Box<str>>;

/// Dependency-injection container.
///
/// Cheap to clone, all clones share the same registry, specs and shared instances.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    resolver: TypeResolver,
    introspector: Box<dyn Introspector>,
    specs: RwLock<SpecStore>,
    cache: Mutex<Cache>,
    /// Identifiers being constructed by the thread holding the lock.
    /// The lock is held for a whole top-level `make`, so check-then-insert on the cache is atomic.
    resolving: ReentrantMutex<RefCell<ResolutionStack>>,
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new(registry: Registry, specs: SpecStore) -> Self {
        Self::with_introspector(registry, specs, RegistryIntrospector)
    }

    /// Creates container reading constructor metadata from the passed introspector
    /// instead of the parameters registered in the registry
    #[must_use]
    pub fn with_introspector(registry: Registry, specs: SpecStore, introspector: impl Introspector + 'static) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                resolver: TypeResolver::new(registry),
                introspector: Box::new(introspector),
                specs: RwLock::new(specs),
                cache: Mutex::new(Cache::new()),
                resolving: ReentrantMutex::new(RefCell::new(Vec::new())),
            }),
        }
    }

    /// Gets an instance of the type registered under `ident`
    ///
    /// # Errors
    /// See [`Self::make_with`]
    #[inline]
    pub fn make<T: ?Sized + 'static>(&self, ident: &str) -> Result<Arc<T>, ResolveErrorKind> {
        self.make_with(ident, &Overrides::new())
    }

    /// Gets an instance of the type registered under `ident`.
    ///
    /// If the type is shared and its instance is cached, or the instance was registered with [`Self::register_shared`],
    /// the cached instance is returned and `overrides` are ignored.
    /// Otherwise a new instance is constructed, resolving every constructor parameter
    /// from `overrides`, then from the dependency spec, then from the declared type of the parameter.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the instance is neither a `T`,
    ///   nor an implementation of the interface registered for `T`
    /// - Returns any other [`ResolveErrorKind`] the resolution of the type or of its dependencies fails with
    pub fn make_with<T: ?Sized + 'static>(&self, ident: &str, overrides: &Overrides) -> Result<Arc<T>, ResolveErrorKind> {
        let span = info_span!("make", ident, dependency = type_name::<T>());
        let _guard = span.enter();

        let instance = self.make_locked(ident, overrides).inspect_err(|err| error!("{}", err))?;
        match self.inner.resolver.downcast::<T>(&instance) {
            Some(dependency) => Ok(dependency),
            None => {
                let err = ResolveErrorKind::IncorrectType {
                    expected: TypeInfo::of::<T>(),
                    actual: instance.type_info(),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Same as [`Self::make_with`], but returns the type-erased instance
    ///
    /// # Errors
    /// See [`Self::make_with`]
    pub fn make_instance(&self, ident: &str, overrides: &Overrides) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("make", ident);
        let _guard = span.enter();

        self.make_locked(ident, overrides).inspect_err(|err| error!("{}", err))
    }

    /// Registers the instance as the shared instance of `ident`, replacing the cached one.
    /// An instance of a concrete type is coerced if `ident` is an interface it implements.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::Malformed`] or [`ResolveErrorKind::NotFound`] if `ident` can't be resolved
    /// - Returns [`ResolveErrorKind::TypeMismatch`] if the instance doesn't satisfy the type of `ident`
    #[inline]
    pub fn register_shared<T: ?Sized + Send + Sync + 'static>(&self, ident: &str, instance: Arc<T>) -> Result<&Self, ResolveErrorKind> {
        self.register_instance(ident, Instance::new(instance))
    }

    /// Same as [`Self::register_shared`] for a type-erased instance
    ///
    /// # Errors
    /// See [`Self::register_shared`]
    pub fn register_instance(&self, ident: &str, instance: Instance) -> Result<&Self, ResolveErrorKind> {
        let span = info_span!("register_shared", ident, dependency = instance.type_info().name);
        let _guard = span.enter();

        let instance = self
            .inner
            .resolver
            .resolve(ident)
            .and_then(|entry| self.inner.resolver.satisfy(ident, entry, &instance))
            .inspect_err(|err| error!("{}", err))?;

        let _resolving = self.inner.resolving.lock();
        self.inner.cache.lock().insert(ident, instance, true);
        debug!("Registered");

        Ok(self)
    }

    /// Removes the shared instance of `ident`, so the next [`Self::make`] constructs a new one
    pub fn clear_shared(&self, ident: &str) -> &Self {
        let _resolving = self.inner.resolving.lock();
        if self.inner.cache.lock().remove(ident).is_some() {
            debug!(ident, "Shared instance cleared");
        }
        self
    }

    /// Returns `true` if a shared instance of `ident` is cached
    #[must_use]
    pub fn is_cached(&self, ident: &str) -> bool {
        self.inner.cache.lock().get(ident).is_some()
    }

    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &TypeResolver {
        &self.inner.resolver
    }

    /// Snapshot of the dependency specs
    #[must_use]
    pub fn specs(&self) -> SpecStore {
        self.inner.specs.read().clone()
    }

    #[must_use]
    pub fn spec(&self, ident: &str) -> Option<DependencySpec> {
        self.inner.specs.read().get(ident).cloned()
    }

    pub fn set_spec(&self, ident: &str, spec: DependencySpec) -> &Self {
        self.inner.specs.write().set(ident, spec);
        self
    }

    /// See [`SpecStore::merge_spec`]
    pub fn merge_spec(&self, ident: &str, patch: DependencySpec) -> &Self {
        self.inner.specs.write().merge_spec(ident, patch);
        self
    }

    pub fn remove_spec(&self, ident: &str) -> Option<DependencySpec> {
        self.inner.specs.write().remove(ident)
    }

    #[must_use]
    pub fn is_shared(&self, ident: &str) -> bool {
        self.inner.specs.read().is_shared(ident)
    }

    /// Walks the declared dependencies of every registered type, following spec overrides first,
    /// and reports the first cycle found.
    /// Primitive parameters, unregistered identifiers and identifiers `make` gets from the cache are skipped.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::CyclicDependency`] with the path of the cycle
    pub fn detect_cycles(&self) -> Result<(), ResolveErrorKind> {
        let specs = self.inner.specs.read();
        let mut visited = BTreeSet::new();
        let mut stack = Vec::new();

        for (ident, _) in self.inner.resolver.iter() {
            if self.dfs_visit(ident, &specs, &mut visited, &mut stack) {
                let start = stack
                    .last()
                    .and_then(|last| stack.iter().position(|ident| ident == last))
                    .unwrap_or_default();
                let err = ResolveErrorKind::CyclicDependency {
                    path: stack.split_off(start).into_boxed_slice(),
                };
                error!("{}", err);
                return Err(err);
            }
        }
        Ok(())
    }
}

impl Container {
    fn make_locked(&self, ident: &str, overrides: &Overrides) -> Result<Instance, ResolveErrorKind> {
        let resolving = self.inner.resolving.lock();

        let spec = self.inner.specs.read().get(ident).cloned().unwrap_or_default();
        if let Some(instance) = self.cached(ident, &spec) {
            debug!(ident, "Found in cache");
            return Ok(instance);
        }
        debug!(ident, "Not found in cache");

        let entered = Entered::new(&resolving, ident)?;
        let (instance, config) = self.construct(ident, &spec, overrides)?;
        drop(entered);

        if spec.is_shared() && config.cache_provides {
            self.inner.cache.lock().insert(ident, instance.clone(), false);
            debug!(ident, "Cached");
        }
        Ok(instance)
    }

    /// Cached instance `make` returns instead of constructing a new one
    fn cached(&self, ident: &str, spec: &DependencySpec) -> Option<Instance> {
        self.inner
            .cache
            .lock()
            .get(ident)
            .filter(|Cached { registered, .. }| *registered || spec.is_shared())
            .map(|Cached { instance, .. }| instance.clone())
    }

    fn construct(&self, ident: &str, spec: &DependencySpec, overrides: &Overrides) -> Result<(Instance, Config), ResolveErrorKind> {
        let entry = self.inner.resolver.resolve(ident)?;
        let EntryKind::Concrete { instantiator, config, .. } = &entry.kind else {
            return Err(ResolveErrorKind::NotInstantiable { ident: ident.into() });
        };

        let parameters = match self.inner.introspector.parameters(ident, entry) {
            Ok(parameters) => parameters,
            Err(err) => {
                debug!("{}. Instantiating without arguments", err);
                Vec::new()
            }
        };

        let mut arguments = Arguments::with_capacity(ident, self.clone(), parameters.len());
        for parameter in &parameters {
            if let Some(instance) = self.resolve_argument(ident, spec, overrides, parameter)? {
                arguments.push(&parameter.name, instance);
            }
        }

        let instance = instantiator
            .clone()
            .call(arguments)
            .map_err(|source| ResolveErrorKind::Instantiate {
                ident: ident.into(),
                source,
            })?;
        Ok((instance, *config))
    }

    fn resolve_argument(
        &self,
        ident: &str,
        spec: &DependencySpec,
        overrides: &Overrides,
        parameter: &Parameter,
    ) -> Result<Option<Instance>, ResolveErrorKind> {
        let name = &*parameter.name;

        if let Some(instance) = overrides.get(name) {
            debug!(parameter = name, "Passed in overrides");
            return Ok(Some(instance.clone()));
        }

        if let Some(override_ident) = spec.param(name) {
            debug!(parameter = name, ident = override_ident, "Overridden in spec");
            let instance = self.make_locked(override_ident, &Overrides::new())?;
            return self.coerce(&parameter.declared, &instance).map(Some);
        }

        let result = match &parameter.declared {
            DeclaredType::Type(declared) => self.make_locked(declared, &Overrides::new()),
            DeclaredType::Primitive(kind) => self.inner.resolver.parse(kind.name(), true).and_then(|_| {
                Err(ResolveErrorKind::MissingArgument {
                    ident: ident.into(),
                    parameter: name.into(),
                    declared: parameter.declared.clone(),
                })
            }),
        };

        match result {
            Ok(instance) => Ok(Some(instance)),
            Err(err) if !parameter.required && is_unresolvable(&parameter.declared, &err) => {
                debug!(parameter = name, "{}. Optional parameter left absent", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Coerces an instance built from a spec override to the declared type of the parameter
    fn coerce(&self, declared: &DeclaredType, instance: &Instance) -> Result<Instance, ResolveErrorKind> {
        let DeclaredType::Type(declared) = declared else {
            return Ok(instance.clone());
        };
        match self.inner.resolver.get(declared) {
            Some(entry) => self.inner.resolver.satisfy(declared, entry, instance),
            None => Ok(instance.clone()),
        }
    }

    fn dependencies(&self, ident: &str, specs: &SpecStore) -> Vec<Box<str>> {
        let Some(entry) = self.inner.resolver.get(ident) else {
            return Vec::new();
        };
        if entry.is_interface() {
            return Vec::new();
        }

        let spec = specs.get(ident);
        self.inner
            .introspector
            .parameters(ident, entry)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|Parameter { name, declared, .. }| {
                match (spec.and_then(|spec| spec.param(&name)), declared) {
                    (Some(override_ident), _) => Some(override_ident.into()),
                    (None, DeclaredType::Type(declared)) => Some(declared),
                    (None, DeclaredType::Primitive(_)) => None,
                }
            })
            .collect()
    }

    fn dfs_visit(&self, ident: &str, specs: &SpecStore, visited: &mut BTreeSet<Box<str>>, stack: &mut Vec<Box<str>>) -> bool {
        if visited.contains(ident) {
            return false;
        }
        if self.cached(ident, specs.get(ident).unwrap_or(&DependencySpec::new())).is_some() {
            visited.insert(ident.into());
            return false;
        }
        stack.push(ident.into());
        if stack[..stack.len() - 1].iter().any(|entered| **entered == *ident) {
            return true;
        }

        for dependency in self.dependencies(ident, specs) {
            if self.inner.resolver.contains(&dependency) && self.dfs_visit(&dependency, specs, visited, stack) {
                return true;
            }
        }

        stack.pop();
        visited.insert(ident.into());
        false
    }
}

fn is_unresolvable(declared: &DeclaredType, err: &ResolveErrorKind) -> bool {
    match (declared, err) {
        (
            DeclaredType::Type(declared),
            ResolveErrorKind::NotFound { ident } | ResolveErrorKind::NotInstantiable { ident },
        ) => declared == ident,
        (DeclaredType::Primitive(_), ResolveErrorKind::MissingArgument { .. }) => true,
        _ => false,
    }
}

/// Marks the identifier as being constructed until dropped
struct Entered<'a> {
    stack: &'a RefCell<ResolutionStack>,
}

impl<'a> Entered<'a> {
    fn new(stack: &'a RefCell<ResolutionStack>, ident: &str) -> Result<Self, ResolveErrorKind> {
        let mut entered = stack.borrow_mut();
        if let Some(start) = entered.iter().position(|other| **other == *ident) {
            return Err(ResolveErrorKind::CyclicDependency {
                path: entered[start..].iter().cloned().chain(iter::once(ident.into())).collect(),
            });
        }
        entered.push(ident.into());
        drop(entered);

        Ok(Self { stack })
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}
