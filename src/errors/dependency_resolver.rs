use alloc::boxed::Box;

use super::instantiate::InstantiateErrorKind;
use crate::{any::TypeInfo, parameter::DeclaredType};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Malformed type identifier `{ident}`: {reason}")]
    Malformed { ident: Box<str>, reason: &'static str },
    #[error("Type `{ident}` not found in registry")]
    NotFound { ident: Box<str> },
    #[error(
        "\
        Type `{ident}` is abstract and can't be instantiated. \
        Specify a concrete type for it in the dependency spec of the dependent type\
        "
    )]
    NotInstantiable { ident: Box<str> },
    #[error("No value for parameter `{parameter}` ({declared}) of `{ident}`. Values of such parameters must be passed in overrides")]
    MissingArgument {
        ident: Box<str>,
        parameter: Box<str>,
        declared: DeclaredType,
    },
    #[error("Instance of `{actual}` doesn't satisfy `{ident}` ({expected})")]
    TypeMismatch {
        ident: Box<str>,
        expected: TypeInfo,
        actual: TypeInfo,
    },
    #[error("Incorrect instance type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: TypeInfo, actual: TypeInfo },
    #[error("Cyclic dependency detected: {}", .path.join(" -> "))]
    CyclicDependency { path: Box<[Box<str>]> },
    #[error("Failed to instantiate `{ident}`: {source}")]
    Instantiate {
        ident: Box<str>,
        #[source]
        source: InstantiateErrorKind,
    },
}

impl ResolveErrorKind {
    /// Identifier the error is about. For a cycle it's the identifier that closes it
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        match self {
            Self::Malformed { ident, .. }
            | Self::NotFound { ident }
            | Self::NotInstantiable { ident }
            | Self::MissingArgument { ident, .. }
            | Self::TypeMismatch { ident, .. }
            | Self::Instantiate { ident, .. } => Some(&**ident),
            Self::CyclicDependency { path } => path.last().map(|ident| &**ident),
            Self::IncorrectType { .. } => None,
        }
    }
}
