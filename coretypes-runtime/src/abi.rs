//! Binary contract shared with callers
//!
//! Objects are opaque addresses. The first machine word of every object
//! points to its operation table; every table begins with `BaseVTable`
//! followed by the entries of the object's concrete kind.

use core::ffi::{c_char, c_void};

use crate::errors::ErrorCode;

/// Opaque native object
pub type RawObject = c_void;

/// Core type tags as reported by `get_core_type`
pub mod core_type {
    pub const BOOL: u32 = 0;
    pub const INT: u32 = 1;
    pub const FLOAT: u32 = 2;
    pub const STRING: u32 = 3;
    pub const LIST: u32 = 4;
    pub const DICT: u32 = 5;
    pub const RATIO: u32 = 6;
    pub const PROC: u32 = 7;
    pub const OBJECT: u32 = 8;
    pub const BINARY_DATA: u32 = 9;
    pub const FUNC: u32 = 10;
    pub const COMPLEX_NUMBER: u32 = 11;
    pub const STRUCT: u32 = 12;
    pub const ENUMERATION: u32 = 13;
    pub const UNDEFINED: u32 = 65535;
}

/// Capability set identifier used by `query_interface`
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceId(pub u32);

impl InterfaceId {
    pub const BASE_OBJECT: Self = Self(0x0001);
    pub const CORE_TYPE: Self = Self(0x0002);
    pub const BOOLEAN: Self = Self(0x0101);
    pub const INTEGER: Self = Self(0x0102);
    pub const FLOAT: Self = Self(0x0103);
    pub const STRING: Self = Self(0x0104);
    pub const LIST: Self = Self(0x0105);
    pub const DICT: Self = Self(0x0106);
    pub const RATIO: Self = Self(0x0107);
    pub const PROCEDURE: Self = Self(0x0108);
    pub const FUNCTION: Self = Self(0x0109);
    pub const STRUCT: Self = Self(0x010A);
    pub const ENUMERATION: Self = Self(0x010B);
    pub const BINARY_DATA: Self = Self(0x010C);
    pub const COMPLEX_NUMBER: Self = Self(0x010D);
    pub const VERSION_INFO: Self = Self(0x0201);
    pub const ERROR_INFO: Self = Self(0x0202);
}

/// Callback invoked by a procedure object
pub type ProcCallback =
    unsafe extern "C" fn(context: *mut c_void, params: *mut RawObject) -> ErrorCode;

/// Callback invoked by a function object; writes an owned result to `out`
pub type FuncCallback = unsafe extern "C" fn(
    context: *mut c_void,
    params: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode;

/// Destructor for a callback context, run when the callable is freed
pub type ContextDrop = unsafe extern "C" fn(context: *mut c_void);

/// Entries shared by every object
#[repr(C)]
pub struct BaseVTable {
    /// Returns the new reference count
    pub add_ref: unsafe extern "C" fn(this: *mut RawObject) -> u32,
    /// Returns the remaining reference count; frees the object at zero
    pub release: unsafe extern "C" fn(this: *mut RawObject) -> u32,
    pub query_interface: unsafe extern "C" fn(
        this: *mut RawObject,
        iid: InterfaceId,
        out: *mut *mut RawObject,
    ) -> ErrorCode,
    pub get_core_type: unsafe extern "C" fn(this: *mut RawObject, out: *mut u32) -> ErrorCode,
    pub get_hash_code: unsafe extern "C" fn(this: *mut RawObject, out: *mut u64) -> ErrorCode,
    pub equals: unsafe extern "C" fn(
        this: *mut RawObject,
        other: *mut RawObject,
        out: *mut bool,
    ) -> ErrorCode,
    /// Writes a string to be freed with `ct_free_string`
    pub to_string: unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut c_char) -> ErrorCode,
}

#[repr(C)]
pub struct BoolVTable {
    pub base: BaseVTable,
    pub get_value: unsafe extern "C" fn(this: *mut RawObject, out: *mut bool) -> ErrorCode,
    pub equals_value:
        unsafe extern "C" fn(this: *mut RawObject, value: bool, out: *mut bool) -> ErrorCode,
}

#[repr(C)]
pub struct IntegerVTable {
    pub base: BaseVTable,
    pub get_value: unsafe extern "C" fn(this: *mut RawObject, out: *mut i64) -> ErrorCode,
    pub equals_value:
        unsafe extern "C" fn(this: *mut RawObject, value: i64, out: *mut bool) -> ErrorCode,
}

#[repr(C)]
pub struct FloatVTable {
    pub base: BaseVTable,
    pub get_value: unsafe extern "C" fn(this: *mut RawObject, out: *mut f64) -> ErrorCode,
    pub equals_value:
        unsafe extern "C" fn(this: *mut RawObject, value: f64, out: *mut bool) -> ErrorCode,
}

#[repr(C)]
pub struct StringVTable {
    pub base: BaseVTable,
    /// Borrowed view of the UTF-8 bytes, valid while the object is alive
    pub get_bytes: unsafe extern "C" fn(
        this: *mut RawObject,
        data: *mut *const u8,
        len: *mut usize,
    ) -> ErrorCode,
    pub get_length: unsafe extern "C" fn(this: *mut RawObject, out: *mut usize) -> ErrorCode,
    pub equals_value: unsafe extern "C" fn(
        this: *mut RawObject,
        data: *const u8,
        len: usize,
        out: *mut bool,
    ) -> ErrorCode,
}

#[repr(C)]
pub struct RatioVTable {
    pub base: BaseVTable,
    pub get_numerator: unsafe extern "C" fn(this: *mut RawObject, out: *mut i64) -> ErrorCode,
    pub get_denominator: unsafe extern "C" fn(this: *mut RawObject, out: *mut i64) -> ErrorCode,
}

#[repr(C)]
pub struct ListVTable {
    pub base: BaseVTable,
    pub get_count: unsafe extern "C" fn(this: *mut RawObject, out: *mut usize) -> ErrorCode,
    pub get_item_at: unsafe extern "C" fn(
        this: *mut RawObject,
        index: usize,
        out: *mut *mut RawObject,
    ) -> ErrorCode,
    pub set_item_at:
        unsafe extern "C" fn(this: *mut RawObject, index: usize, item: *mut RawObject) -> ErrorCode,
    pub push_back: unsafe extern "C" fn(this: *mut RawObject, item: *mut RawObject) -> ErrorCode,
    pub pop_back: unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode,
    pub insert_at:
        unsafe extern "C" fn(this: *mut RawObject, index: usize, item: *mut RawObject) -> ErrorCode,
    pub remove_at: unsafe extern "C" fn(
        this: *mut RawObject,
        index: usize,
        out: *mut *mut RawObject,
    ) -> ErrorCode,
    pub clear: unsafe extern "C" fn(this: *mut RawObject) -> ErrorCode,
}

#[repr(C)]
pub struct DictVTable {
    pub base: BaseVTable,
    pub get_count: unsafe extern "C" fn(this: *mut RawObject, out: *mut usize) -> ErrorCode,
    pub get: unsafe extern "C" fn(
        this: *mut RawObject,
        key: *mut RawObject,
        out: *mut *mut RawObject,
    ) -> ErrorCode,
    pub set: unsafe extern "C" fn(
        this: *mut RawObject,
        key: *mut RawObject,
        value: *mut RawObject,
    ) -> ErrorCode,
    pub remove: unsafe extern "C" fn(
        this: *mut RawObject,
        key: *mut RawObject,
        out: *mut *mut RawObject,
    ) -> ErrorCode,
    pub has_key:
        unsafe extern "C" fn(this: *mut RawObject, key: *mut RawObject, out: *mut bool) -> ErrorCode,
    pub get_keys: unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode,
    pub get_values:
        unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode,
    pub clear: unsafe extern "C" fn(this: *mut RawObject) -> ErrorCode,
}

#[repr(C)]
pub struct ProcedureVTable {
    pub base: BaseVTable,
    pub dispatch: unsafe extern "C" fn(this: *mut RawObject, params: *mut RawObject) -> ErrorCode,
}

#[repr(C)]
pub struct FunctionVTable {
    pub base: BaseVTable,
    pub call: unsafe extern "C" fn(
        this: *mut RawObject,
        params: *mut RawObject,
        out: *mut *mut RawObject,
    ) -> ErrorCode,
}

#[repr(C)]
pub struct StructVTable {
    pub base: BaseVTable,
    pub get_type_name:
        unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode,
    pub get_field_names:
        unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode,
    pub get_field_values:
        unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode,
    pub get: unsafe extern "C" fn(
        this: *mut RawObject,
        name: *mut RawObject,
        out: *mut *mut RawObject,
    ) -> ErrorCode,
    pub has_field:
        unsafe extern "C" fn(this: *mut RawObject, name: *mut RawObject, out: *mut bool) -> ErrorCode,
    pub get_as_dictionary:
        unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode,
}

#[repr(C)]
pub struct EnumerationVTable {
    pub base: BaseVTable,
    pub get_type_name:
        unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode,
    pub get_value: unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode,
    pub get_int_value: unsafe extern "C" fn(this: *mut RawObject, out: *mut i64) -> ErrorCode,
}

#[repr(C)]
pub struct VersionInfoVTable {
    pub base: BaseVTable,
    pub get_major: unsafe extern "C" fn(this: *mut RawObject, out: *mut usize) -> ErrorCode,
    pub get_minor: unsafe extern "C" fn(this: *mut RawObject, out: *mut usize) -> ErrorCode,
    pub get_patch: unsafe extern "C" fn(this: *mut RawObject, out: *mut usize) -> ErrorCode,
}

#[repr(C)]
pub struct ErrorInfoVTable {
    pub base: BaseVTable,
    pub get_code: unsafe extern "C" fn(this: *mut RawObject, out: *mut ErrorCode) -> ErrorCode,
    pub get_message:
        unsafe extern "C" fn(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode,
}

/// Marker for operation tables whose first field is `BaseVTable`
///
/// # Safety
/// Implementors must be `#[repr(C)]` and start with a `BaseVTable` field.
pub unsafe trait OperationTable: 'static {}

unsafe impl OperationTable for BaseVTable {}
unsafe impl OperationTable for BoolVTable {}
unsafe impl OperationTable for IntegerVTable {}
unsafe impl OperationTable for FloatVTable {}
unsafe impl OperationTable for StringVTable {}
unsafe impl OperationTable for RatioVTable {}
unsafe impl OperationTable for ListVTable {}
unsafe impl OperationTable for DictVTable {}
unsafe impl OperationTable for ProcedureVTable {}
unsafe impl OperationTable for FunctionVTable {}
unsafe impl OperationTable for StructVTable {}
unsafe impl OperationTable for EnumerationVTable {}
unsafe impl OperationTable for VersionInfoVTable {}
unsafe impl OperationTable for ErrorInfoVTable {}

/// Read the operation table pointer stored in the object's first word
///
/// # Safety
/// - `obj` must be a live object produced by this runtime
#[inline]
pub unsafe fn vtable_of(obj: *mut RawObject) -> *const BaseVTable {
    *(obj as *const *const BaseVTable)
}
