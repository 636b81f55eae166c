use alloc::boxed::Box;

use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Constructor metadata not available for `{ident}`")]
    NoMetadata { ident: Box<str> },
    #[error("Argument `{name}` not passed")]
    MissingArgument { name: Box<str> },
    #[error("Argument `{name}` has incorrect type. Actual: {actual}, expected: {expected}")]
    IncorrectArgumentType {
        name: Box<str>,
        expected: TypeInfo,
        actual: TypeInfo,
    },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
