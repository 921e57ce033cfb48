//! BinaryData and ComplexNumber objects
//!
//! Both kinds only expose the base operation table; their contents are
//! visible through hashing, equality and `to_string`.

use crate::abi::{core_type, BaseVTable, InterfaceId, RawObject};
use crate::errors::{guarded, ErrorCode};
use crate::ffi::object::{hash_bytes, HASH_SEED};
use crate::ffi::{drop_object, out_param, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;

use super::emit_new;
use super::string::caller_bytes;

/// Payload of a BinaryData object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryData(pub Box<[u8]>);

/// Payload of a ComplexNumber object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexData {
    pub real: f64,
    pub imaginary: f64,
}

static BASE_ONLY_VTABLE: BaseVTable = BASE_VTABLE;

static BINARY_TYPE: TypeInfo = TypeInfo {
    name: "BinaryData",
    core_type: core_type::BINARY_DATA,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::BINARY_DATA],
    drop: drop_object::<BinaryData>,
    hash: binary_hash,
    equals: binary_equals,
    display: binary_display,
};

impl Payload for BinaryData {
    type VTable = BaseVTable;

    fn type_info() -> &'static TypeInfo {
        &BINARY_TYPE
    }

    fn vtable() -> &'static BaseVTable {
        &BASE_ONLY_VTABLE
    }
}

static COMPLEX_TYPE: TypeInfo = TypeInfo {
    name: "ComplexNumber",
    core_type: core_type::COMPLEX_NUMBER,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::COMPLEX_NUMBER],
    drop: drop_object::<ComplexData>,
    hash: complex_hash,
    equals: complex_equals,
    display: complex_display,
};

impl Payload for ComplexData {
    type VTable = BaseVTable;

    fn type_info() -> &'static TypeInfo {
        &COMPLEX_TYPE
    }

    fn vtable() -> &'static BaseVTable {
        &BASE_ONLY_VTABLE
    }
}

unsafe fn binary_hash(this: *mut RawObject) -> u64 {
    payload::<BinaryData>(this).map(|d| hash_bytes(HASH_SEED, &d.0)).unwrap_or(0)
}

unsafe fn binary_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<BinaryData>(this), payload::<BinaryData>(other)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

unsafe fn binary_display(this: *mut RawObject) -> String {
    payload::<BinaryData>(this)
        .map(|d| format!("<{} bytes>", d.0.len()))
        .unwrap_or_default()
}

unsafe fn complex_hash(this: *mut RawObject) -> u64 {
    payload::<ComplexData>(this)
        .map(|d| {
            let bits = |v: f64| if v == 0.0 { 0 } else { v.to_bits() };
            bits(d.real) ^ bits(d.imaginary).rotate_left(32)
        })
        .unwrap_or(0)
}

unsafe fn complex_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<ComplexData>(this), payload::<ComplexData>(other)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

unsafe fn complex_display(this: *mut RawObject) -> String {
    payload::<ComplexData>(this)
        .map(|d| format!("({}{:+}i)", d.real, d.imaginary))
        .unwrap_or_default()
}

/// Create a BinaryData object holding a copy of `len` bytes
#[no_mangle]
pub unsafe extern "C" fn ct_binary_data_create(
    out: *mut *mut RawObject,
    data: *const u8,
    len: usize,
) -> ErrorCode {
    guarded("binary_data_create", || {
        out_param(out)?;
        let bytes = caller_bytes(data, len)?;
        emit_new(out, BinaryData(bytes.into()))
    })
}

/// Create a ComplexNumber object
#[no_mangle]
pub unsafe extern "C" fn ct_complex_number_create(
    out: *mut *mut RawObject,
    real: f64,
    imaginary: f64,
) -> ErrorCode {
    guarded("complex_number_create", || {
        emit_new(out, ComplexData { real, imaginary })
    })
}
