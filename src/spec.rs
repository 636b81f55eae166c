use alloc::{boxed::Box, collections::BTreeMap};
use core::ops::{Deref, DerefMut};

use crate::{bucket::Bucket, utils::Merge as _};

/// Dependency spec of a type: overrides of its constructor parameters and the shared flag
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Parameter name to the identifier of the type constructed for it
    pub params: BTreeMap<Box<str>, Box<str>>,
    /// `None` if not set, which behaves like `false` but doesn't replace the flag on merge
    pub shared: Option<bool>,
}

impl DependencySpec {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: BTreeMap::new(),
            shared: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_param(mut self, name: impl Into<Box<str>>, ident: impl Into<Box<str>>) -> Self {
        self.params.insert(name.into(), ident.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = Some(shared);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.shared == Some(true)
    }

    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|ident| &**ident)
    }
}

/// Dependency specs keyed by type identifiers
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpecStore(Bucket<DependencySpec>);

impl SpecStore {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(Bucket::new())
    }

    #[inline]
    #[must_use]
    pub fn with(mut self, ident: impl Into<Box<str>>, spec: DependencySpec) -> Self {
        self.0.set(ident, spec);
        self
    }

    /// Partially overrides the spec of `ident`: the parameter map is extended by the patch,
    /// the shared flag is replaced only if the patch sets it.
    /// Without a spec for `ident` the patch is stored as is.
    pub fn merge_spec(&mut self, ident: impl Into<Box<str>>, patch: DependencySpec) {
        let spec = self.0.entry(ident).or_default();
        *spec = core::mem::take(spec).merge(patch);
    }

    /// Absent spec isn't shared
    #[inline]
    #[must_use]
    pub fn is_shared(&self, ident: &str) -> bool {
        self.0.get(ident).is_some_and(DependencySpec::is_shared)
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Bucket<DependencySpec> {
        self.0
    }
}

impl Deref for SpecStore {
    type Target = Bucket<DependencySpec>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SpecStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Bucket<DependencySpec>> for SpecStore {
    fn from(bucket: Bucket<DependencySpec>) -> Self {
        Self(bucket)
    }
}

impl<K: Into<Box<str>>> FromIterator<(K, DependencySpec)> for SpecStore {
    fn from_iter<I: IntoIterator<Item = (K, DependencySpec)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use alloc::{collections::BTreeMap, string::String};
    use serde::{
        de,
        ser::{SerializeMap as _, Serializer},
        Deserialize, Deserializer, Serialize,
    };
    use serde_json::Value;

    use super::{DependencySpec, SpecStore};
    use crate::errors::ConfigErrorKind;

    const SHARED_KEY: &str = "_shared";

    type RawSpecs = BTreeMap<String, BTreeMap<String, Value>>;

    impl SpecStore {
        /// Loads specs with the schema `{ "<ident>": { "<parameter>": "<override ident>", "_shared": <bool> } }`
        ///
        /// # Errors
        /// - Returns [`ConfigErrorKind::Json`] if the input isn't a JSON object of objects
        /// - Returns [`ConfigErrorKind::InvalidShared`] if `_shared` isn't a boolean
        /// - Returns [`ConfigErrorKind::InvalidOverride`] if a parameter override isn't a string
        pub fn from_json(json: &str) -> Result<Self, ConfigErrorKind> {
            let raw: RawSpecs = serde_json::from_str(json)?;
            Self::from_raw(raw)
        }

        fn from_raw(raw: RawSpecs) -> Result<Self, ConfigErrorKind> {
            let mut store = Self::new();
            for (ident, fields) in raw {
                let mut spec = DependencySpec::new();
                for (name, value) in fields {
                    if name == SHARED_KEY {
                        let Value::Bool(shared) = value else {
                            return Err(ConfigErrorKind::InvalidShared { ident: ident.into() });
                        };
                        spec.shared = Some(shared);
                    } else {
                        let Value::String(override_ident) = value else {
                            return Err(ConfigErrorKind::InvalidOverride {
                                ident: ident.into(),
                                parameter: name.into(),
                            });
                        };
                        spec.params.insert(name.into(), override_ident.into());
                    }
                }
                store.set(ident, spec);
            }
            Ok(store)
        }
    }

    impl<'de> Deserialize<'de> for SpecStore {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let raw = RawSpecs::deserialize(deserializer)?;
            Self::from_raw(raw).map_err(de::Error::custom)
        }
    }

    impl Serialize for DependencySpec {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.params.len() + usize::from(self.shared.is_some())))?;
            for (name, ident) in &self.params {
                map.serialize_entry(&**name, &**ident)?;
            }
            if let Some(shared) = self.shared {
                map.serialize_entry(SHARED_KEY, &shared)?;
            }
            map.end()
        }
    }

    impl Serialize for SpecStore {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(self.iter())
        }
    }
}
