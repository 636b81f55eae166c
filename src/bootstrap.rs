use alloc::{boxed::Box, sync::Arc, vec::Vec};
use tracing::{debug, info_span};

use crate::{
    any::Instance,
    errors::BootstrapErrorKind,
    spec::SpecStore,
    utils::Merge as _,
    Container, Registry,
};

/// Entry point of an application: builds the container, registers the shared primitives
/// the container can't construct itself (configuration data and the like),
/// and then gets every other service through [`Container::make`].
///
/// # Examples
/// ```rust
/// use dotwire::{Bootstrap, DependencySpec, Registry, SpecStore};
///
/// struct Logger;
///
/// let registry = Registry::new().provide("app.Logger", || Ok(Logger));
/// let (container, logger) = Bootstrap::new(registry)
///     .with_specs(SpecStore::new().with("app.Logger", DependencySpec::new().with_shared(true)))
///     .run::<Logger>("app.Logger")
///     .unwrap();
///
/// assert!(std::sync::Arc::ptr_eq(&logger, &container.make::<Logger>("app.Logger").unwrap()));
/// ```
pub struct Bootstrap {
    registry: Registry,
    specs: SpecStore,
    shared: Vec<(Box<str>, Instance)>,
    detect_cycles: bool,
}

impl Bootstrap {
    #[inline]
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            specs: SpecStore::new(),
            shared: Vec::new(),
            detect_cycles: true,
        }
    }

    /// Merges the specs into the specs passed before
    #[inline]
    #[must_use]
    pub fn with_specs(mut self, specs: SpecStore) -> Self {
        self.specs = self.specs.merge(specs);
        self
    }

    /// Loads specs with [`SpecStore::from_json`] and merges them into the specs passed before
    ///
    /// # Errors
    /// Returns [`BootstrapErrorKind::Config`] if the specs can't be loaded
    #[cfg(feature = "serde")]
    pub fn with_specs_json(self, json: &str) -> Result<Self, BootstrapErrorKind> {
        let specs = SpecStore::from_json(json).inspect_err(|err| tracing::error!("{}", err))?;
        Ok(self.with_specs(specs))
    }

    /// Registers the value as the shared instance of `ident` once the container is built
    #[inline]
    #[must_use]
    pub fn with_shared<T: ?Sized + Send + Sync + 'static>(mut self, ident: &str, value: Arc<T>) -> Self {
        self.shared.push((ident.into(), Instance::new(value)));
        self
    }

    /// Whether to check the dependency graph for cycles before anything is constructed.
    /// Shared values cut the graph, as nothing is constructed for them.
    /// Enabled by default.
    #[inline]
    #[must_use]
    pub fn detect_cycles(mut self, detect_cycles: bool) -> Self {
        self.detect_cycles = detect_cycles;
        self
    }

    /// # Errors
    /// - Returns [`BootstrapErrorKind::Resolve`] with [`crate::ResolveErrorKind::CyclicDependency`] if a cycle is detected
    /// - Returns [`BootstrapErrorKind::Resolve`] if a shared value can't be registered
    pub fn build(self) -> Result<Container, BootstrapErrorKind> {
        let span = info_span!("bootstrap");
        let _guard = span.enter();

        let Self {
            registry,
            specs,
            shared,
            detect_cycles,
        } = self;

        let container = Container::new(registry, specs);
        for (ident, instance) in shared {
            container.register_instance(&ident, instance)?;
        }
        if detect_cycles {
            container.detect_cycles()?;
            debug!("No cycles detected");
        }

        debug!("Container built");
        Ok(container)
    }

    /// Builds the container and makes the top-level service of the application
    ///
    /// # Errors
    /// - Returns [`BootstrapErrorKind`] if the container can't be built, see [`Self::build`]
    /// - Returns [`BootstrapErrorKind::Resolve`] if the service can't be made
    pub fn run<T: ?Sized + 'static>(self, ident: &str) -> Result<(Container, Arc<T>), BootstrapErrorKind> {
        let container = self.build()?;
        let service = container.make::<T>(ident)?;
        Ok((container, service))
    }
}
