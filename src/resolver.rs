use alloc::{boxed::Box, collections::BTreeMap, sync::Arc};
use core::any::TypeId;
use tracing::warn;

use crate::{
    any::Instance,
    dot_notation::{DotNotation, QualifiedName},
    errors::ResolveErrorKind,
    registry::{EntryKind, Registry, TypeEntry},
};

/// Lookup of dot-notation identifiers in a finished registry.
///
/// Besides the lookup it decides whether an instance satisfies a registered type:
/// either the types are equal, or the registered type is an interface with an implementation
/// for the instance's type, and then the instance is coerced to the interface.
pub struct TypeResolver {
    notation: DotNotation,
    entries: BTreeMap<Box<str>, TypeEntry>,
    interfaces: BTreeMap<TypeId, Box<str>>,
}

impl TypeResolver {
    #[must_use]
    pub(crate) fn new(registry: Registry) -> Self {
        let Registry {
            mut entries,
            implementations,
        } = registry;

        for (ident, implementation, caster) in implementations {
            match entries.get_mut(&*ident) {
                Some(TypeEntry {
                    kind: EntryKind::Interface { implementations: casters },
                    ..
                }) => {
                    casters.insert(implementation.id, (implementation, caster));
                }
                Some(_) => warn!(ident = &*ident, implementation = implementation.name, "Type is concrete, implementation ignored"),
                None => warn!(ident = &*ident, implementation = implementation.name, "Interface not registered, implementation ignored"),
            }
        }

        let notation = DotNotation::new();
        let mut interfaces = BTreeMap::new();
        for (ident, entry) in &entries {
            if let Err(err) = notation.parse(ident) {
                warn!("{}. The type can't be resolved", err);
            }
            if entry.is_interface() {
                interfaces.entry(entry.type_info.id).or_insert_with(|| ident.clone());
            }
        }

        Self {
            notation,
            entries,
            interfaces,
        }
    }

    /// Translates the identifier into its qualified name.
    /// Unless `validate_only` is set, the identifier must also be registered.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::Malformed`] if the identifier is malformed
    /// - Returns [`ResolveErrorKind::NotFound`] if the identifier isn't registered and `validate_only` is `false`
    pub fn parse(&self, ident: &str, validate_only: bool) -> Result<QualifiedName, ResolveErrorKind> {
        let name = self.notation.parse(ident)?;
        if !validate_only && !self.entries.contains_key(ident) {
            return Err(ResolveErrorKind::NotFound { ident: ident.into() });
        }
        Ok(name)
    }

    /// # Errors
    /// See [`Self::parse`]
    pub fn resolve(&self, ident: &str) -> Result<&TypeEntry, ResolveErrorKind> {
        self.notation.parse(ident)?;
        self.entries
            .get(ident)
            .ok_or_else(|| ResolveErrorKind::NotFound { ident: ident.into() })
    }

    #[inline]
    #[must_use]
    pub fn get(&self, ident: &str) -> Option<&TypeEntry> {
        self.entries.get(ident)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, ident: &str) -> bool {
        self.entries.contains_key(ident)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeEntry)> {
        self.entries.iter().map(|(ident, entry)| (&**ident, entry))
    }

    /// Checks that the instance satisfies the type registered as `entry` under `ident`,
    /// coercing it to the interface if needed
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::TypeMismatch`] if the instance doesn't satisfy the type
    pub(crate) fn satisfy(&self, ident: &str, entry: &TypeEntry, instance: &Instance) -> Result<Instance, ResolveErrorKind> {
        if instance.type_info() == entry.type_info {
            return Ok(instance.clone());
        }
        if let EntryKind::Interface { implementations } = &entry.kind {
            if let Some(coerced) = implementations
                .get(&instance.type_info().id)
                .and_then(|(_, caster)| caster(instance))
            {
                return Ok(coerced);
            }
        }
        Err(ResolveErrorKind::TypeMismatch {
            ident: ident.into(),
            expected: entry.type_info,
            actual: instance.type_info(),
        })
    }

    /// Downcasts the instance to `T`, going through the interface registered for `T` if there is one
    #[must_use]
    pub(crate) fn downcast<T: ?Sized + 'static>(&self, instance: &Instance) -> Option<Arc<T>> {
        if let Some(value) = instance.downcast::<T>() {
            return Some(value);
        }

        let ident = self.interfaces.get(&TypeId::of::<T>())?;
        let entry = self.entries.get(ident)?;
        self.satisfy(ident, entry, instance).ok()?.downcast::<T>()
    }
}
