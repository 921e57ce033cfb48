//! ErrorInfo objects - the detailed failure kept in the last-error slot

use core::ptr;

use crate::abi::{core_type, ErrorInfoVTable, InterfaceId, RawObject};
use crate::errors::{ErrorCode, ErrorRecord, NativeResult};
use crate::ffi::object::identity_equals;
use crate::ffi::{alloc_object, drop_object, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;

use super::string::StringData;
use super::{emit_ref, new_ref};

/// Payload of an ErrorInfo object
#[derive(Debug, Clone)]
pub struct ErrorInfoData {
    pub code: ErrorCode,
    pub message: String,
    pub operation: &'static str,
}

static ERROR_INFO_TYPE: TypeInfo = TypeInfo {
    name: "ErrorInfo",
    core_type: core_type::OBJECT,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::ERROR_INFO],
    drop: drop_object::<ErrorInfoData>,
    hash: error_info_hash,
    equals: identity_equals,
    display: error_info_display,
};

static ERROR_INFO_VTABLE: ErrorInfoVTable = ErrorInfoVTable {
    base: BASE_VTABLE,
    get_code: error_info_get_code,
    get_message: error_info_get_message,
};

impl Payload for ErrorInfoData {
    type VTable = ErrorInfoVTable;

    fn type_info() -> &'static TypeInfo {
        &ERROR_INFO_TYPE
    }

    fn vtable() -> &'static ErrorInfoVTable {
        &ERROR_INFO_VTABLE
    }
}

unsafe fn error_info_hash(this: *mut RawObject) -> u64 {
    payload::<ErrorInfoData>(this).map(|d| u64::from(d.code.0)).unwrap_or(0)
}

unsafe fn error_info_display(this: *mut RawObject) -> String {
    payload::<ErrorInfoData>(this)
        .map(|d| format!("{} failed with {}: {}", d.operation, d.code, d.message))
        .unwrap_or_default()
}

unsafe extern "C" fn error_info_get_code(this: *mut RawObject, out: *mut ErrorCode) -> ErrorCode {
    // Reading the slot's object must not overwrite the slot itself
    let Some(out) = out.as_mut() else {
        return ErrorCode::ARGUMENT_NULL;
    };
    match payload::<ErrorInfoData>(this) {
        Ok(data) => {
            *out = data.code;
            ErrorCode::SUCCESS
        }
        Err(err) => err.code,
    }
}

unsafe extern "C" fn error_info_get_message(
    this: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    let Some(out) = out.as_mut() else {
        return ErrorCode::ARGUMENT_NULL;
    };
    *out = ptr::null_mut();
    let result = payload::<ErrorInfoData>(this)
        .and_then(|data| new_ref(StringData(data.message.as_str().into())));
    match result {
        Ok(message) => {
            emit_ref(out, message);
            ErrorCode::SUCCESS
        }
        Err(err) => err.code,
    }
}

/// Wrap a slot record in a new ErrorInfo object owned by the caller
pub(crate) fn new_error_info(record: ErrorRecord) -> NativeResult<*mut RawObject> {
    alloc_object(ErrorInfoData {
        code: record.code,
        message: record.message,
        operation: record.operation,
    })
}
