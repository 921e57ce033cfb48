//! Object metadata - layout primitives for runtime objects
//!
//! Design: every object starts with an `ObjectHeader` whose first word is
//! the operation table pointer, so callers can resolve the table without
//! knowing anything else about the layout.
//! All structures are C-compatible for FFI.

use core::ptr::NonNull;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::abi::{BaseVTable, InterfaceId, RawObject};

/// Object header - the prefix of every heap object
///
/// Layout:
/// - operation table pointer at offset 0 (part of the ABI)
/// - immutable type metadata
/// - thread-safe atomic refcount
#[repr(C)]
pub struct ObjectHeader {
    pub vtable: NonNull<BaseVTable>,
    pub type_info: &'static TypeInfo,
    pub refcount: AtomicU32,
    pub flags: u32,
}

impl ObjectHeader {
    /// Create header for a new object (refcount starts at one)
    #[inline]
    pub const fn new(vtable: NonNull<BaseVTable>, type_info: &'static TypeInfo) -> Self {
        Self {
            vtable,
            type_info,
            refcount: AtomicU32::new(1),
            flags: 0,
        }
    }

    /// Get header from object pointer (the header is the object's prefix)
    ///
    /// # Safety
    /// - `obj` must point to a live object produced by this runtime
    #[inline]
    pub unsafe fn from_object<'a>(obj: *mut RawObject) -> &'a Self {
        &*(obj as *const Self)
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.refcount.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn core_type(&self) -> u32 {
        self.type_info.core_type
    }
}

/// Type metadata - immutable per-type information
///
/// Shared across all instances of a type for minimal memory overhead.
pub struct TypeInfo {
    pub name: &'static str,
    pub core_type: u32,
    /// Capability sets answered positively by `query_interface`
    pub interfaces: &'static [InterfaceId],
    /// Frees the object (payload destructor + memory)
    pub drop: unsafe fn(*mut RawObject),
    pub hash: unsafe fn(*mut RawObject) -> u64,
    pub equals: unsafe fn(*mut RawObject, *mut RawObject) -> bool,
    pub display: unsafe fn(*mut RawObject) -> String,
}

impl TypeInfo {
    #[inline]
    pub fn implements(&self, iid: InterfaceId) -> bool {
        self.interfaces.contains(&iid)
    }
}

impl core::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("core_type", &self.core_type)
            .field("interfaces", &self.interfaces)
            .finish()
    }
}
