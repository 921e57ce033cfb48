//! Boolean and integer objects
//!
//! Immutable scalars; equality and hashing follow the stored value.

use crate::abi::{core_type, BoolVTable, IntegerVTable, InterfaceId, RawObject};
use crate::errors::{guarded, ErrorCode};
use crate::ffi::{drop_object, out_param, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;

use super::emit_new;

/// Payload of a Bool object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolData(pub bool);

/// Payload of an Int object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntData(pub i64);

static BOOL_TYPE: TypeInfo = TypeInfo {
    name: "Bool",
    core_type: core_type::BOOL,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::BOOLEAN],
    drop: drop_object::<BoolData>,
    hash: bool_hash,
    equals: bool_equals,
    display: bool_display,
};

static BOOL_VTABLE: BoolVTable = BoolVTable {
    base: BASE_VTABLE,
    get_value: bool_get_value,
    equals_value: bool_equals_value,
};

impl Payload for BoolData {
    type VTable = BoolVTable;

    fn type_info() -> &'static TypeInfo {
        &BOOL_TYPE
    }

    fn vtable() -> &'static BoolVTable {
        &BOOL_VTABLE
    }
}

unsafe fn bool_hash(this: *mut RawObject) -> u64 {
    payload::<BoolData>(this).map(|d| d.0 as u64).unwrap_or(0)
}

unsafe fn bool_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<BoolData>(this), payload::<BoolData>(other)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

unsafe fn bool_display(this: *mut RawObject) -> String {
    payload::<BoolData>(this).map(|d| d.0.to_string()).unwrap_or_default()
}

unsafe extern "C" fn bool_get_value(this: *mut RawObject, out: *mut bool) -> ErrorCode {
    guarded("bool_get_value", || {
        let out = out_param(out)?;
        *out = payload::<BoolData>(this)?.0;
        Ok(())
    })
}

unsafe extern "C" fn bool_equals_value(this: *mut RawObject, value: bool, out: *mut bool) -> ErrorCode {
    guarded("bool_equals_value", || {
        let out = out_param(out)?;
        *out = payload::<BoolData>(this)?.0 == value;
        Ok(())
    })
}

/// Create a Bool object
#[no_mangle]
pub unsafe extern "C" fn ct_boolean_create(out: *mut *mut RawObject, value: bool) -> ErrorCode {
    guarded("boolean_create", || emit_new(out, BoolData(value)))
}

static INT_TYPE: TypeInfo = TypeInfo {
    name: "Integer",
    core_type: core_type::INT,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::INTEGER],
    drop: drop_object::<IntData>,
    hash: int_hash,
    equals: int_equals,
    display: int_display,
};

static INT_VTABLE: IntegerVTable = IntegerVTable {
    base: BASE_VTABLE,
    get_value: int_get_value,
    equals_value: int_equals_value,
};

impl Payload for IntData {
    type VTable = IntegerVTable;

    fn type_info() -> &'static TypeInfo {
        &INT_TYPE
    }

    fn vtable() -> &'static IntegerVTable {
        &INT_VTABLE
    }
}

unsafe fn int_hash(this: *mut RawObject) -> u64 {
    payload::<IntData>(this).map(|d| d.0 as u64).unwrap_or(0)
}

unsafe fn int_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<IntData>(this), payload::<IntData>(other)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

unsafe fn int_display(this: *mut RawObject) -> String {
    payload::<IntData>(this).map(|d| d.0.to_string()).unwrap_or_default()
}

unsafe extern "C" fn int_get_value(this: *mut RawObject, out: *mut i64) -> ErrorCode {
    guarded("integer_get_value", || {
        let out = out_param(out)?;
        *out = payload::<IntData>(this)?.0;
        Ok(())
    })
}

unsafe extern "C" fn int_equals_value(this: *mut RawObject, value: i64, out: *mut bool) -> ErrorCode {
    guarded("integer_equals_value", || {
        let out = out_param(out)?;
        *out = payload::<IntData>(this)?.0 == value;
        Ok(())
    })
}

/// Create an Int object
#[no_mangle]
pub unsafe extern "C" fn ct_integer_create(out: *mut *mut RawObject, value: i64) -> ErrorCode {
    guarded("integer_create", || emit_new(out, IntData(value)))
}
