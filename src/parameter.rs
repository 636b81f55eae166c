use alloc::boxed::Box;
use core::fmt::{self, Display, Formatter};

/// Built-in kinds a constructor parameter can be declared with.
/// Values of such parameters can't be constructed by the container and come from overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
    String,
    Array,
    Callable,
    Mixed,
}

impl PrimitiveKind {
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::String => "string",
            PrimitiveKind::Array => "array",
            PrimitiveKind::Callable => "callable",
            PrimitiveKind::Mixed => "mixed",
        }
    }
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// Dot-notation identifier of a registered type
    Type(Box<str>),
    Primitive(PrimitiveKind),
}

impl DeclaredType {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            DeclaredType::Type(ident) => ident,
            DeclaredType::Primitive(kind) => kind.name(),
        }
    }
}

impl Display for DeclaredType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<PrimitiveKind> for DeclaredType {
    fn from(kind: PrimitiveKind) -> Self {
        DeclaredType::Primitive(kind)
    }
}

impl From<&str> for DeclaredType {
    fn from(ident: &str) -> Self {
        DeclaredType::Type(ident.into())
    }
}

/// Constructor parameter: name, declared type and whether it must be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Box<str>,
    pub declared: DeclaredType,
    pub required: bool,
}

impl Parameter {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<Box<str>>, declared: impl Into<DeclaredType>) -> Self {
        Self {
            name: name.into(),
            declared: declared.into(),
            required: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn typed(name: impl Into<Box<str>>, ident: &str) -> Self {
        Self::new(name, DeclaredType::Type(ident.into()))
    }

    #[inline]
    #[must_use]
    pub fn primitive(name: impl Into<Box<str>>, kind: PrimitiveKind) -> Self {
        Self::new(name, kind)
    }

    /// Marks the parameter as optional.
    /// An optional parameter that can be resolved neither from overrides, nor from the dependency spec, nor by its declared type
    /// is left absent instead of failing the resolution.
    #[inline]
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}
