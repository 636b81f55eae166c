use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::marker::PhantomData;
use tracing::debug;

use crate::{
    any::{Instance, TypeInfo},
    errors::InstantiateErrorKind,
    Container,
};

/// Factory of a registered type.
///
/// Implemented for closures taking no arguments and for closures taking [`Arguments`].
/// The first kind has no constructor metadata and is always called with empty arguments.
pub trait Instantiator<Args>: Clone + Send + Sync + 'static {
    type Provides: Send + Sync + 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&mut self, arguments: Arguments) -> Result<Self::Provides, Self::Error>;
}

impl<F, Response, Err> Instantiator<()> for F
where
    F: FnMut() -> Result<Response, Err> + Clone + Send + Sync + 'static,
    Response: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    type Provides = Response;
    type Error = Err;

    #[inline]
    fn instantiate(&mut self, _arguments: Arguments) -> Result<Self::Provides, Self::Error> {
        self()
    }
}

impl<F, Response, Err> Instantiator<(Arguments,)> for F
where
    F: FnMut(Arguments) -> Result<Response, Err> + Clone + Send + Sync + 'static,
    Response: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    type Provides = Response;
    type Error = Err;

    #[inline]
    fn instantiate(&mut self, arguments: Arguments) -> Result<Self::Provides, Self::Error> {
        self(arguments)
    }
}

/// Resolved constructor arguments in declaration order
pub struct Arguments {
    ident: Box<str>,
    values: Vec<(Box<str>, Instance)>,
    container: Container,
}

impl Arguments {
    #[inline]
    #[must_use]
    pub(crate) fn with_capacity(ident: &str, container: Container, capacity: usize) -> Self {
        Self {
            ident: ident.into(),
            values: Vec::with_capacity(capacity),
            container,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, name: &str, instance: Instance) {
        self.values.push((name.into(), instance));
    }

    /// Identifier of the type being constructed
    #[inline]
    #[must_use]
    pub fn ident(&self) -> &str {
        &self.ident
    }

    #[inline]
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    #[inline]
    #[must_use]
    pub fn instance(&self, name: &str) -> Option<&Instance> {
        self.values
            .iter()
            .find_map(|(key, instance)| (**key == *name).then_some(instance))
    }

    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if the argument wasn't resolved
    /// - Returns [`InstantiateErrorKind::IncorrectArgumentType`] if the argument isn't a `T`
    pub fn get<T: ?Sized + 'static>(&self, name: &str) -> Result<Arc<T>, InstantiateErrorKind> {
        self.get_optional(name)?
            .ok_or_else(|| InstantiateErrorKind::MissingArgument { name: name.into() })
    }

    /// Same as [`Self::get`], but an unresolved optional argument is `None`
    ///
    /// # Errors
    /// Returns [`InstantiateErrorKind::IncorrectArgumentType`] if the argument isn't a `T`
    pub fn get_optional<T: ?Sized + 'static>(&self, name: &str) -> Result<Option<Arc<T>>, InstantiateErrorKind> {
        let Some(instance) = self.instance(name) else {
            return Ok(None);
        };
        match instance.downcast::<T>() {
            Some(value) => Ok(Some(value)),
            None => Err(InstantiateErrorKind::IncorrectArgumentType {
                name: name.into(),
                expected: TypeInfo::of::<T>(),
                actual: instance.type_info(),
            }),
        }
    }

    /// Clones the argument out of its `Arc`. Handy for primitives passed in overrides.
    ///
    /// # Errors
    /// See [`Self::get`]
    pub fn get_cloned<T: Clone + 'static>(&self, name: &str) -> Result<T, InstantiateErrorKind> {
        self.get::<T>(name).map(|value| (*value).clone())
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.values.iter().map(|(name, instance)| (&**name, instance))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub(crate) trait CloneInstantiator: Send + Sync {
    fn call(&mut self, arguments: Arguments) -> Result<Instance, InstantiateErrorKind>;

    #[must_use]
    fn clone_box(&self) -> Box<dyn CloneInstantiator>;
}

struct ErasedInstantiator<Inst, Args> {
    instantiator: Inst,
    _args: PhantomData<fn(Args)>,
}

impl<Inst: Clone, Args> Clone for ErasedInstantiator<Inst, Args> {
    fn clone(&self) -> Self {
        Self {
            instantiator: self.instantiator.clone(),
            _args: PhantomData,
        }
    }
}

impl<Inst, Args> CloneInstantiator for ErasedInstantiator<Inst, Args>
where
    Inst: Instantiator<Args>,
    Args: 'static,
{
    fn call(&mut self, arguments: Arguments) -> Result<Instance, InstantiateErrorKind> {
        let dependency = self.instantiator.instantiate(arguments).map_err(Into::into)?;

        debug!("Instantiated");

        Ok(Instance::from_value(dependency))
    }

    #[inline]
    fn clone_box(&self) -> Box<dyn CloneInstantiator> {
        Box::new(self.clone())
    }
}

pub(crate) struct BoxedCloneInstantiator {
    inner: Box<dyn CloneInstantiator>,
    provides: TypeInfo,
}

impl BoxedCloneInstantiator {
    #[inline]
    #[must_use]
    pub(crate) const fn provides(&self) -> TypeInfo {
        self.provides
    }

    #[inline]
    pub(crate) fn call(&mut self, arguments: Arguments) -> Result<Instance, InstantiateErrorKind> {
        self.inner.call(arguments)
    }
}

impl Clone for BoxedCloneInstantiator {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
            provides: self.provides,
        }
    }
}

#[must_use]
pub(crate) fn boxed_instantiator<Inst, Args>(instantiator: Inst) -> BoxedCloneInstantiator
where
    Inst: Instantiator<Args>,
    Args: 'static,
{
    BoxedCloneInstantiator {
        inner: Box::new(ErasedInstantiator {
            instantiator,
            _args: PhantomData::<fn(Args)>,
        }),
        provides: TypeInfo::of::<Inst::Provides>(),
    }
}
