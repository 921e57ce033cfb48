//! Ratio type - a numerator/denominator pair
//!
//! Values are stored as given (no reduction); `1/2` and `2/4` still compare
//! equal because equality cross-multiplies.

use crate::abi::{core_type, InterfaceId, RatioVTable, RawObject};
use crate::errors::{guarded, ErrorCode, NativeError};
use crate::ffi::{drop_object, out_param, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;

use super::emit_new;

/// Payload of a Ratio object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioData {
    pub numerator: i64,
    pub denominator: i64,
}

impl RatioData {
    /// Reduced form with a positive denominator
    pub fn simplified(&self) -> (i64, i64) {
        let g = gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs()).max(1);
        let sign = if self.denominator < 0 { -1i128 } else { 1 };
        let num = i128::from(self.numerator) / g as i128 * sign;
        let den = i128::from(self.denominator) / g as i128 * sign;
        (num as i64, den as i64)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

static RATIO_TYPE: TypeInfo = TypeInfo {
    name: "Ratio",
    core_type: core_type::RATIO,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::RATIO],
    drop: drop_object::<RatioData>,
    hash: ratio_hash,
    equals: ratio_equals,
    display: ratio_display,
};

static RATIO_VTABLE: RatioVTable = RatioVTable {
    base: BASE_VTABLE,
    get_numerator: ratio_get_numerator,
    get_denominator: ratio_get_denominator,
};

impl Payload for RatioData {
    type VTable = RatioVTable;

    fn type_info() -> &'static TypeInfo {
        &RATIO_TYPE
    }

    fn vtable() -> &'static RatioVTable {
        &RATIO_VTABLE
    }
}

unsafe fn ratio_hash(this: *mut RawObject) -> u64 {
    payload::<RatioData>(this)
        .map(|d| {
            let (num, den) = d.simplified();
            (num as u64).rotate_left(32) ^ den as u64
        })
        .unwrap_or(0)
}

unsafe fn ratio_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<RatioData>(this), payload::<RatioData>(other)) {
        (Ok(a), Ok(b)) => {
            i128::from(a.numerator) * i128::from(b.denominator)
                == i128::from(b.numerator) * i128::from(a.denominator)
        }
        _ => false,
    }
}

unsafe fn ratio_display(this: *mut RawObject) -> String {
    payload::<RatioData>(this)
        .map(|d| format!("{}/{}", d.numerator, d.denominator))
        .unwrap_or_default()
}

unsafe extern "C" fn ratio_get_numerator(this: *mut RawObject, out: *mut i64) -> ErrorCode {
    guarded("ratio_get_numerator", || {
        let out = out_param(out)?;
        *out = payload::<RatioData>(this)?.numerator;
        Ok(())
    })
}

unsafe extern "C" fn ratio_get_denominator(this: *mut RawObject, out: *mut i64) -> ErrorCode {
    guarded("ratio_get_denominator", || {
        let out = out_param(out)?;
        *out = payload::<RatioData>(this)?.denominator;
        Ok(())
    })
}

/// Create a Ratio object; a zero denominator is rejected
#[no_mangle]
pub unsafe extern "C" fn ct_ratio_create(
    out: *mut *mut RawObject,
    numerator: i64,
    denominator: i64,
) -> ErrorCode {
    guarded("ratio_create", || {
        out_param(out)?;
        if denominator == 0 {
            return Err(NativeError::new(
                ErrorCode::INVALIDPARAMETER,
                "ratio denominator must not be zero",
            ));
        }
        emit_new(out, RatioData { numerator, denominator })
    })
}
