//! Reference counting - C API for refcount operations
//!
//! Hot path operations with minimal overhead.
//! Thread-safe atomic operations; the object frees itself on the last release.

use std::sync::atomic::Ordering;

use crate::abi::RawObject;
use crate::header::ObjectHeader;
use crate::logging::log_release;

use super::object::record_free;

/// Increment reference count, returning the new count
///
/// # Safety
/// - Null-safe (returns 0 for null pointers)
/// - Object must be a live runtime object
/// - Overflow checked in debug builds
#[no_mangle]
pub unsafe extern "C" fn ct_add_ref(obj: *mut RawObject) -> u32 {
    if obj.is_null() {
        return 0;
    }

    let header = ObjectHeader::from_object(obj);
    let old = header.refcount.fetch_add(1, Ordering::Relaxed);

    debug_assert!(old < u32::MAX, "refcount overflow");
    old + 1
}

/// Decrement reference count, free the object when it reaches zero
///
/// Returns the remaining count.
///
/// # Safety
/// - Null-safe (returns 0 for null pointers)
/// - Object must be a live runtime object
/// - Underflow checked in debug builds
#[no_mangle]
pub unsafe extern "C" fn ct_release(obj: *mut RawObject) -> u32 {
    if obj.is_null() {
        return 0;
    }

    let header = ObjectHeader::from_object(obj);
    let old = header.refcount.fetch_sub(1, Ordering::Release);

    debug_assert!(old > 0, "refcount underflow");

    if old == 1 {
        // Synchronize with all previous releases
        std::sync::atomic::fence(Ordering::Acquire);
        destroy_object(obj);
    }
    old - 1
}

/// Get current reference count (for diagnostics/testing)
///
/// # Safety
/// - Returns 0 for null pointers
/// - Object must be a live runtime object
#[no_mangle]
pub unsafe extern "C" fn ct_ref_count(obj: *mut RawObject) -> u32 {
    if obj.is_null() {
        return 0;
    }

    ObjectHeader::from_object(obj).count()
}

/// Destroy object (cold path, separated for better code generation)
#[cold]
#[inline(never)]
unsafe fn destroy_object(obj: *mut RawObject) {
    let type_info = ObjectHeader::from_object(obj).type_info;

    log_release(type_info.name, obj as *const u8);
    (type_info.drop)(obj);
    record_free();
}
