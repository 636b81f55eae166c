#![no_std]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod bootstrap;
pub(crate) mod bucket;
pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod dot_notation;
pub(crate) mod errors;
pub(crate) mod instantiator;
pub(crate) mod introspector;
pub(crate) mod overrides;
pub(crate) mod parameter;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod spec;

pub mod utils;

pub use any::{Instance, TypeInfo};
pub use bootstrap::Bootstrap;
pub use bucket::Bucket;
pub use config::Config;
pub use container::Container;
pub use dot_notation::{DotNotation, QualifiedName};
#[cfg(feature = "serde")]
pub use errors::ConfigErrorKind;
pub use errors::{BootstrapErrorKind, InstantiateErrorKind, InstantiatorResult, ResolveErrorKind};
pub use instantiator::{Arguments, Instantiator};
pub use introspector::{Introspector, RegistryIntrospector};
pub use overrides::Overrides;
pub use parameter::{DeclaredType, Parameter, PrimitiveKind};
pub use registry::{Registry, TypeEntry, CONTAINER_IDENT};
pub use resolver::TypeResolver;
pub use spec::{DependencySpec, SpecStore};
