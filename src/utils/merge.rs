use crate::{
    spec::{DependencySpec, SpecStore},
    Registry,
};

pub trait Merge<T> {
    type Output;

    #[must_use]
    fn merge(self, other: T) -> Self::Output;
}

/// Entries of `other` replace entries with equal identifiers
impl Merge<Registry> for Registry {
    type Output = Registry;

    #[inline]
    fn merge(mut self, other: Registry) -> Self::Output {
        self.entries.extend(other.entries);
        self.implementations.extend(other.implementations);
        self
    }
}

impl Merge<DependencySpec> for DependencySpec {
    type Output = DependencySpec;

    #[inline]
    fn merge(mut self, other: DependencySpec) -> Self::Output {
        self.params.extend(other.params);
        self.shared = other.shared.or(self.shared);
        self
    }
}

impl Merge<SpecStore> for SpecStore {
    type Output = SpecStore;

    #[inline]
    fn merge(mut self, other: SpecStore) -> Self::Output {
        for (ident, spec) in other.into_inner() {
            self.merge_spec(ident, spec);
        }
        self
    }
}

impl Merge<(&str, DependencySpec)> for SpecStore {
    type Output = SpecStore;

    #[inline]
    fn merge(mut self, (ident, spec): (&str, DependencySpec)) -> Self::Output {
        self.merge_spec(ident, spec);
        self
    }
}
