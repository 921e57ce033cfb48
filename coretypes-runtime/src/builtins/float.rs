//! Float type - IEEE 754 64-bit values
//!
//! Equality is numeric (`NaN` never equals anything, `-0.0 == 0.0`), and
//! both zeroes hash alike so dict keys stay consistent with equality.

use crate::abi::{core_type, FloatVTable, InterfaceId, RawObject};
use crate::errors::{guarded, ErrorCode};
use crate::ffi::{drop_object, out_param, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;

use super::emit_new;

/// Payload of a Float object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatData(pub f64);

static FLOAT_TYPE: TypeInfo = TypeInfo {
    name: "Float",
    core_type: core_type::FLOAT,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::FLOAT],
    drop: drop_object::<FloatData>,
    hash: float_hash,
    equals: float_equals,
    display: float_display,
};

static FLOAT_VTABLE: FloatVTable = FloatVTable {
    base: BASE_VTABLE,
    get_value: float_get_value,
    equals_value: float_equals_value,
};

impl Payload for FloatData {
    type VTable = FloatVTable;

    fn type_info() -> &'static TypeInfo {
        &FLOAT_TYPE
    }

    fn vtable() -> &'static FloatVTable {
        &FLOAT_VTABLE
    }
}

#[inline]
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

unsafe fn float_hash(this: *mut RawObject) -> u64 {
    payload::<FloatData>(this).map(|d| canonical_bits(d.0)).unwrap_or(0)
}

unsafe fn float_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<FloatData>(this), payload::<FloatData>(other)) {
        (Ok(a), Ok(b)) => a.0 == b.0,
        _ => false,
    }
}

unsafe fn float_display(this: *mut RawObject) -> String {
    payload::<FloatData>(this).map(|d| d.0.to_string()).unwrap_or_default()
}

unsafe extern "C" fn float_get_value(this: *mut RawObject, out: *mut f64) -> ErrorCode {
    guarded("float_get_value", || {
        let out = out_param(out)?;
        *out = payload::<FloatData>(this)?.0;
        Ok(())
    })
}

unsafe extern "C" fn float_equals_value(this: *mut RawObject, value: f64, out: *mut bool) -> ErrorCode {
    guarded("float_equals_value", || {
        let out = out_param(out)?;
        *out = payload::<FloatData>(this)?.0 == value;
        Ok(())
    })
}

/// Create a Float object
#[no_mangle]
pub unsafe extern "C" fn ct_float_create(out: *mut *mut RawObject, value: f64) -> ErrorCode {
    guarded("float_create", || emit_new(out, FloatData(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_zero_hashes_alike() {
        assert_eq!(canonical_bits(0.0), canonical_bits(-0.0));
        assert_ne!(canonical_bits(1.0), canonical_bits(-1.0));
    }
}
