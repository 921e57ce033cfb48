//! String type - immutable UTF-8 text
//!
//! Design: the bytes are validated once at construction; readers get a
//! borrowed view that stays valid for the lifetime of the object.

use core::slice;

use crate::abi::{core_type, InterfaceId, RawObject, StringVTable};
use crate::errors::{guarded, ErrorCode, NativeError, NativeResult};
use crate::ffi::object::{hash_bytes, HASH_SEED};
use crate::ffi::{drop_object, out_param, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;

use super::emit_new;

/// Payload of a String object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringData(pub Box<str>);

impl StringData {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

static STRING_TYPE: TypeInfo = TypeInfo {
    name: "String",
    core_type: core_type::STRING,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::STRING],
    drop: drop_object::<StringData>,
    hash: string_hash,
    equals: string_equals,
    display: string_display,
};

static STRING_VTABLE: StringVTable = StringVTable {
    base: BASE_VTABLE,
    get_bytes: string_get_bytes,
    get_length: string_get_length,
    equals_value: string_equals_value,
};

impl Payload for StringData {
    type VTable = StringVTable;

    fn type_info() -> &'static TypeInfo {
        &STRING_TYPE
    }

    fn vtable() -> &'static StringVTable {
        &STRING_VTABLE
    }
}

/// Borrow `len` bytes from a caller buffer; a null buffer is only valid when empty
pub(crate) unsafe fn caller_bytes<'a>(data: *const u8, len: usize) -> NativeResult<&'a [u8]> {
    if len == 0 {
        return Ok(&[]);
    }
    if data.is_null() {
        return Err(NativeError::null_argument("data"));
    }
    Ok(slice::from_raw_parts(data, len))
}

/// Borrow caller bytes and check they are UTF-8
pub(crate) unsafe fn caller_str<'a>(data: *const u8, len: usize) -> NativeResult<&'a str> {
    let bytes = caller_bytes(data, len)?;
    core::str::from_utf8(bytes).map_err(|e| {
        NativeError::new(
            ErrorCode::INVALIDPARAMETER,
            format!("string is not valid UTF-8: {}", e),
        )
    })
}

unsafe fn string_hash(this: *mut RawObject) -> u64 {
    payload::<StringData>(this)
        .map(|d| hash_bytes(HASH_SEED, d.0.as_bytes()))
        .unwrap_or(0)
}

unsafe fn string_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<StringData>(this), payload::<StringData>(other)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

unsafe fn string_display(this: *mut RawObject) -> String {
    payload::<StringData>(this).map(|d| d.0.to_string()).unwrap_or_default()
}

unsafe extern "C" fn string_get_bytes(
    this: *mut RawObject,
    data: *mut *const u8,
    len: *mut usize,
) -> ErrorCode {
    guarded("string_get_bytes", || {
        let data = out_param(data)?;
        let len = out_param(len)?;
        let text = payload::<StringData>(this)?;
        *data = text.0.as_ptr();
        *len = text.0.len();
        Ok(())
    })
}

unsafe extern "C" fn string_get_length(this: *mut RawObject, out: *mut usize) -> ErrorCode {
    guarded("string_get_length", || {
        let out = out_param(out)?;
        *out = payload::<StringData>(this)?.0.len();
        Ok(())
    })
}

unsafe extern "C" fn string_equals_value(
    this: *mut RawObject,
    data: *const u8,
    len: usize,
    out: *mut bool,
) -> ErrorCode {
    guarded("string_equals_value", || {
        let out = out_param(out)?;
        let bytes = caller_bytes(data, len)?;
        *out = payload::<StringData>(this)?.0.as_bytes() == bytes;
        Ok(())
    })
}

/// Create a String object from `len` UTF-8 bytes
#[no_mangle]
pub unsafe extern "C" fn ct_string_create(
    out: *mut *mut RawObject,
    data: *const u8,
    len: usize,
) -> ErrorCode {
    guarded("string_create", || {
        out_param(out)?;
        let text = caller_str(data, len)?;
        emit_new(out, StringData(text.into()))
    })
}
