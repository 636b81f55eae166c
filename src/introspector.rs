use alloc::vec::Vec;

use crate::{errors::InstantiateErrorKind, parameter::Parameter, registry::TypeEntry};

/// Source of constructor metadata: the ordered parameter list of a registered type.
///
/// The container asks it on every construction. A failure isn't fatal,
/// the type is instantiated without arguments instead.
pub trait Introspector: Send + Sync {
    /// # Errors
    /// Returns [`InstantiateErrorKind`] if the metadata isn't available for the type
    fn parameters(&self, ident: &str, entry: &TypeEntry) -> Result<Vec<Parameter>, InstantiateErrorKind>;
}

impl<F> Introspector for F
where
    F: Fn(&str, &TypeEntry) -> Result<Vec<Parameter>, InstantiateErrorKind> + Send + Sync,
{
    #[inline]
    fn parameters(&self, ident: &str, entry: &TypeEntry) -> Result<Vec<Parameter>, InstantiateErrorKind> {
        self(ident, entry)
    }
}

/// Reads the parameters registered with [`crate::Registry::provide_with_params`]
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryIntrospector;

impl Introspector for RegistryIntrospector {
    fn parameters(&self, ident: &str, entry: &TypeEntry) -> Result<Vec<Parameter>, InstantiateErrorKind> {
        entry
            .parameters()
            .map(<[Parameter]>::to_vec)
            .ok_or_else(|| InstantiateErrorKind::NoMetadata { ident: ident.into() })
    }
}
