//! Reference counted object pointer used inside the runtime
//!
//! Containers, structs and callables hold their children through `ObjRef`:
//! cloning adds a reference, dropping releases it.

use core::ptr::NonNull;

use crate::abi::RawObject;
use crate::ffi::{ct_add_ref, ct_release, Payload};
use crate::header::ObjectHeader;

/// Owned reference to a runtime object
///
/// Design: Minimal overhead smart pointer with:
/// - Cloning only bumps the refcount
/// - Deterministic release on drop
pub struct ObjRef {
    ptr: NonNull<RawObject>,
}

impl ObjRef {
    /// Adopt a reference the caller already owns
    ///
    /// # Safety
    /// - `ptr` must be null or a live runtime object with a reference to give away
    #[inline]
    pub unsafe fn from_owned(ptr: *mut RawObject) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    /// Take an additional reference to a borrowed object
    ///
    /// # Safety
    /// - `ptr` must be null or a live runtime object
    #[inline]
    pub unsafe fn from_borrowed(ptr: *mut RawObject) -> Option<Self> {
        let obj = Self::from_owned(ptr)?;
        ct_add_ref(ptr);
        Some(obj)
    }

    #[inline]
    pub fn as_raw(&self) -> *mut RawObject {
        self.ptr.as_ptr()
    }

    /// Convert to raw pointer, consuming self without releasing
    #[inline]
    pub fn into_raw(self) -> *mut RawObject {
        let ptr = self.ptr.as_ptr();
        core::mem::forget(self);
        ptr
    }

    #[inline]
    pub fn header(&self) -> &ObjectHeader {
        unsafe { ObjectHeader::from_object(self.ptr.as_ptr()) }
    }

    /// Get current reference count (for debugging)
    #[inline]
    pub fn count(&self) -> u32 {
        self.header().count()
    }

    #[inline]
    pub fn core_type(&self) -> u32 {
        self.header().core_type()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.header().type_info.name
    }

    /// Payload of the object if it is a `T`
    pub fn payload<T: Payload>(&self) -> Option<&T> {
        unsafe { crate::ffi::payload::<T>(self.as_raw()).ok() }
    }

    pub fn hash_code(&self) -> u64 {
        unsafe { (self.header().type_info.hash)(self.as_raw()) }
    }

    /// Value equality as reported through the base `equals` entry
    pub fn value_eq(&self, other: &ObjRef) -> bool {
        if self.ptr == other.ptr {
            return true;
        }

        let type_info = self.header().type_info;
        core::ptr::eq(type_info, other.header().type_info)
            && unsafe { (type_info.equals)(self.as_raw(), other.as_raw()) }
    }

    pub fn display(&self) -> String {
        unsafe { (self.header().type_info.display)(self.as_raw()) }
    }
}

impl Clone for ObjRef {
    #[inline]
    fn clone(&self) -> Self {
        unsafe { ct_add_ref(self.as_raw()) };
        Self { ptr: self.ptr }
    }
}

impl Drop for ObjRef {
    #[inline]
    fn drop(&mut self) {
        unsafe { ct_release(self.as_raw()) };
    }
}

impl core::fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjRef")
            .field("type", &self.type_name())
            .field("ptr", &self.ptr)
            .field("count", &self.count())
            .finish()
    }
}

// ObjRef is thread-safe with atomic refcounting; payloads guard their own mutation
unsafe impl Send for ObjRef {}
unsafe impl Sync for ObjRef {}
