//! Object lifecycle - allocation, payload access and the base operation table
//!
//! Every object is a `HeapObject<T>`: the shared header followed by the
//! kind-specific payload. Objects are freed by the last `release`.

use core::ffi::c_char;
use core::ptr::{self, NonNull};
use std::alloc::{alloc, dealloc, Layout};
use std::ffi::CString;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::abi::{BaseVTable, InterfaceId, OperationTable, RawObject};
use crate::errors::{guarded, ErrorCode, NativeError, NativeResult};
use crate::header::{ObjectHeader, TypeInfo};
use crate::logging::{log_allocation, log_query_rejected};

use super::out_param;
use super::refcount::{ct_add_ref, ct_release};

/// Heap layout of every runtime object
#[repr(C)]
pub struct HeapObject<T> {
    pub header: ObjectHeader,
    pub data: T,
}

/// Payload of a concrete object kind
pub trait Payload: Sized + 'static {
    type VTable: OperationTable;

    fn type_info() -> &'static TypeInfo;
    fn vtable() -> &'static Self::VTable;
}

static OBJECTS_ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static OBJECTS_FREED: AtomicUsize = AtomicUsize::new(0);

/// Object counters for monitoring and leak checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeStats {
    pub objects_allocated: usize,
    pub objects_freed: usize,
}

impl RuntimeStats {
    #[inline]
    pub fn live_objects(&self) -> usize {
        self.objects_allocated.saturating_sub(self.objects_freed)
    }
}

pub fn stats() -> RuntimeStats {
    RuntimeStats {
        objects_allocated: OBJECTS_ALLOCATED.load(Ordering::Relaxed),
        objects_freed: OBJECTS_FREED.load(Ordering::Relaxed),
    }
}

pub(crate) fn record_free() {
    OBJECTS_FREED.fetch_add(1, Ordering::Relaxed);
}

#[cfg(feature = "fault-injection")]
thread_local! {
    static FAILING_ALLOCATIONS: core::cell::Cell<u32> = core::cell::Cell::new(0);
}

/// Make the next `count` allocations on this thread report NOMEMORY
#[cfg(feature = "fault-injection")]
pub fn fail_next_allocations(count: u32) {
    FAILING_ALLOCATIONS.with(|c| c.set(count));
}

#[cfg(feature = "fault-injection")]
fn allocation_blocked() -> bool {
    FAILING_ALLOCATIONS.with(|c| {
        let remaining = c.get();
        if remaining > 0 {
            c.set(remaining - 1);
            true
        } else {
            false
        }
    })
}

#[cfg(not(feature = "fault-injection"))]
#[inline(always)]
fn allocation_blocked() -> bool {
    false
}

/// Allocate a new object holding `data`, with a reference count of one
pub fn alloc_object<T: Payload>(data: T) -> NativeResult<*mut RawObject> {
    let type_info = T::type_info();
    let layout = Layout::new::<HeapObject<T>>();

    let ptr = if allocation_blocked() {
        ptr::null_mut()
    } else {
        unsafe { alloc(layout) as *mut HeapObject<T> }
    };

    if ptr.is_null() {
        return Err(NativeError::new(
            ErrorCode::NOMEMORY,
            format!("failed to allocate {} object", type_info.name),
        ));
    }

    let vtable = NonNull::from(T::vtable()).cast::<BaseVTable>();
    unsafe {
        ptr.write(HeapObject {
            header: ObjectHeader::new(vtable, type_info),
            data,
        });
    }

    OBJECTS_ALLOCATED.fetch_add(1, Ordering::Relaxed);
    log_allocation(type_info.name, layout.size(), ptr as *const u8);
    Ok(ptr as *mut RawObject)
}

/// Destructor stored in every `TypeInfo`
///
/// # Safety
/// - `obj` must be a `HeapObject<T>` whose reference count reached zero
pub unsafe fn drop_object<T: Payload>(obj: *mut RawObject) {
    let ptr = obj as *mut HeapObject<T>;
    ptr::drop_in_place(ptr);
    dealloc(ptr as *mut u8, Layout::new::<HeapObject<T>>());
}

/// Access the payload of `this`, checking that it really is a `T`
///
/// # Safety
/// - `this` must be null or a live object produced by this runtime
pub unsafe fn payload<'a, T: Payload>(this: *mut RawObject) -> NativeResult<&'a T> {
    if this.is_null() {
        return Err(NativeError::null_argument("this"));
    }

    let header = ObjectHeader::from_object(this);
    let expected = T::type_info();
    if !ptr::eq(header.type_info, expected) {
        return Err(NativeError::new(
            ErrorCode::INVALIDTYPE,
            format!("expected {} object, found {}", expected.name, header.type_info.name),
        ));
    }

    Ok(&(*(this as *const HeapObject<T>)).data)
}

unsafe fn header_of<'a>(this: *mut RawObject) -> NativeResult<&'a ObjectHeader> {
    if this.is_null() {
        Err(NativeError::null_argument("this"))
    } else {
        Ok(ObjectHeader::from_object(this))
    }
}

unsafe extern "C" fn base_query_interface(
    this: *mut RawObject,
    iid: InterfaceId,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("query_interface", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();

        let header = header_of(this)?;
        let type_info = header.type_info;
        if !type_info.implements(iid) {
            log_query_rejected(type_info.name, iid.0);
            return Err(NativeError::new(
                ErrorCode::NOINTERFACE,
                format!("{} does not implement interface 0x{:04X}", type_info.name, iid.0),
            ));
        }

        ct_add_ref(this);
        *out = this;
        Ok(())
    })
}

unsafe extern "C" fn base_get_core_type(this: *mut RawObject, out: *mut u32) -> ErrorCode {
    guarded("get_core_type", || {
        let out = out_param(out)?;
        *out = header_of(this)?.core_type();
        Ok(())
    })
}

unsafe extern "C" fn base_get_hash_code(this: *mut RawObject, out: *mut u64) -> ErrorCode {
    guarded("get_hash_code", || {
        let out = out_param(out)?;
        let header = header_of(this)?;
        *out = (header.type_info.hash)(this);
        Ok(())
    })
}

unsafe extern "C" fn base_equals(
    this: *mut RawObject,
    other: *mut RawObject,
    out: *mut bool,
) -> ErrorCode {
    guarded("equals", || {
        let out = out_param(out)?;
        let header = header_of(this)?;

        *out = if other.is_null() {
            false
        } else if this == other {
            true
        } else {
            let other_header = ObjectHeader::from_object(other);
            ptr::eq(header.type_info, other_header.type_info)
                && (header.type_info.equals)(this, other)
        };
        Ok(())
    })
}

unsafe extern "C" fn base_to_string(this: *mut RawObject, out: *mut *mut c_char) -> ErrorCode {
    guarded("to_string", || {
        let out = out_param(out)?;
        let header = header_of(this)?;
        let text = (header.type_info.display)(this).replace('\0', "");
        *out = CString::new(text)
            .map_err(|_| NativeError::new(ErrorCode::GENERALERROR, "string contains NUL"))?
            .into_raw();
        Ok(())
    })
}

/// Free a string returned by a `to_string` entry
#[no_mangle]
pub unsafe extern "C" fn ct_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Base entries shared by every operation table
pub const BASE_VTABLE: BaseVTable = BaseVTable {
    add_ref: ct_add_ref,
    release: ct_release,
    query_interface: base_query_interface,
    get_core_type: base_get_core_type,
    get_hash_code: base_get_hash_code,
    equals: base_equals,
    to_string: base_to_string,
};

/// Identity hash for kinds without value semantics
pub(crate) unsafe fn identity_hash(this: *mut RawObject) -> u64 {
    this as usize as u64
}

/// Identity equality for kinds without value semantics
pub(crate) unsafe fn identity_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    this == other
}

/// Mix a value into a running hash (FNV-1a over the bytes)
#[inline]
pub(crate) fn hash_bytes(seed: u64, bytes: &[u8]) -> u64 {
    const PRIME: u64 = 0x0000_0100_0000_01B3;
    bytes.iter().fold(seed, |h, b| (h ^ u64::from(*b)).wrapping_mul(PRIME))
}

pub(crate) const HASH_SEED: u64 = 0xCBF2_9CE4_8422_2325;
