#[cfg(feature = "serde")]
use super::config::ConfigErrorKind;
use super::dependency_resolver::ResolveErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum BootstrapErrorKind {
    #[cfg(feature = "serde")]
    #[error("Failed to load dependency specs: {0}")]
    Config(#[from] ConfigErrorKind),
    #[error(transparent)]
    Resolve(#[from] ResolveErrorKind),
}
