use alloc::boxed::Box;

#[derive(thiserror::Error, Debug)]
pub enum ConfigErrorKind {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("`_shared` of `{ident}` must be a boolean")]
    InvalidShared { ident: Box<str> },
    #[error("Override of parameter `{parameter}` of `{ident}` must be a type identifier string")]
    InvalidOverride { ident: Box<str>, parameter: Box<str> },
}
