use alloc::sync::Arc;
use core::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
};

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

/// Type-erased, reference-counted value produced by the container.
///
/// Holds an `Arc<T>` for any `T`, including trait objects, so an interface
/// instance (`Arc<dyn Trait>`) and a concrete one (`Arc<Struct>`) travel
/// through the same cache and argument lists.
#[derive(Clone)]
pub struct Instance {
    type_info: TypeInfo,
    addr: usize,
    value: Arc<dyn Any + Send + Sync>,
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_info.name)
            .field("addr", &format_args!("{:#x}", self.addr))
            .finish()
    }
}

impl Instance {
    #[inline]
    #[must_use]
    pub fn new<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            type_info: TypeInfo::of::<T>(),
            addr: Arc::as_ptr(&value).cast::<()>() as usize,
            value: Arc::new(value),
        }
    }

    #[inline]
    #[must_use]
    pub fn from_value<T: Send + Sync + 'static>(value: T) -> Self {
        Self::new(Arc::new(value))
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_info.id == TypeId::of::<T>()
    }

    #[inline]
    #[must_use]
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// Returns `true` if both instances share one allocation.
    /// An interface instance coerced from a concrete one is identical to it.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr == other.addr
    }
}
