//! C FFI - Stable ABI for object lifetime and the shared base operations
//!
//! Design: Zero-overhead C bindings with:
//! 1. Object lifecycle (alloc, free on last release)
//! 2. Reference counting (add_ref, release)
//! 3. Base operation table shared by every kind
//! 4. Error propagation via status codes

pub(crate) mod object;
mod refcount;

pub use object::{
    alloc_object, ct_free_string, drop_object, payload, stats, Payload, RuntimeStats, BASE_VTABLE,
};
pub use refcount::{ct_add_ref, ct_ref_count, ct_release};

#[cfg(feature = "fault-injection")]
pub use object::fail_next_allocations;

use crate::abi::RawObject;
use crate::errors::{NativeError, NativeResult};
use crate::object_ref::ObjRef;

/// Check an out-parameter before any work that produces an owned result
#[inline]
pub(crate) fn out_param<'a, T>(out: *mut T) -> NativeResult<&'a mut T> {
    unsafe { out.as_mut() }.ok_or_else(|| NativeError::null_argument("out"))
}

/// Take a new reference to an object argument
#[inline]
pub(crate) unsafe fn borrow_arg(ptr: *mut RawObject, name: &'static str) -> NativeResult<ObjRef> {
    ObjRef::from_borrowed(ptr).ok_or_else(|| NativeError::null_argument(name))
}
