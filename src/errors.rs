mod bootstrap;
#[cfg(feature = "serde")]
mod config;
mod dependency_resolver;
mod instantiate;

pub use bootstrap::BootstrapErrorKind;
#[cfg(feature = "serde")]
pub use config::ConfigErrorKind;
pub use dependency_resolver::ResolveErrorKind;
pub use instantiate::InstantiateErrorKind;

pub type InstantiatorResult<T> = Result<T, InstantiateErrorKind>;
