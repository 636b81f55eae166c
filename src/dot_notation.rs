use alloc::{boxed::Box, string::String};
use core::fmt::{self, Display, Formatter};

use crate::errors::ResolveErrorKind;

const SEPARATOR: char = '.';
const PATH_SEPARATOR: &str = "::";

/// Fully qualified form of a dot-notation identifier, e.g. `app::services::Logger` for `app.services.Logger`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName(Box<str>);

impl QualifiedName {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, the type name without its namespace
    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.0.rsplit_once(PATH_SEPARATOR).map_or(self.as_str(), |(_, name)| name)
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QualifiedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Translator of dot-notation identifiers into qualified names.
///
/// The translation is purely syntactic: whether the identifier names a registered type
/// is decided by [`crate::TypeResolver`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DotNotation;

impl DotNotation {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// # Errors
    /// Returns [`ResolveErrorKind::Malformed`] if the identifier is empty or
    /// one of its segments is not a valid identifier
    pub fn parse(&self, ident: &str) -> Result<QualifiedName, ResolveErrorKind> {
        if ident.is_empty() {
            return Err(malformed(ident, "identifier is empty"));
        }

        let mut qualified = String::with_capacity(ident.len() + ident.matches(SEPARATOR).count());
        for (index, segment) in ident.split(SEPARATOR).enumerate() {
            validate_segment(ident, segment)?;
            if index > 0 {
                qualified.push_str(PATH_SEPARATOR);
            }
            qualified.push_str(segment);
        }

        Ok(QualifiedName(qualified.into_boxed_str()))
    }
}

fn validate_segment(ident: &str, segment: &str) -> Result<(), ResolveErrorKind> {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return Err(malformed(ident, "empty segment"));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(malformed(ident, "segment must start with a letter or an underscore"));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(malformed(ident, "segment may contain only letters, digits and underscores"));
    }
    Ok(())
}

#[inline]
fn malformed(ident: &str, reason: &'static str) -> ResolveErrorKind {
    ResolveErrorKind::Malformed {
        ident: ident.into(),
        reason,
    }
}
