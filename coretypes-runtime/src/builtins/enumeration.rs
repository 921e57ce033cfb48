//! Enumeration type - a named value of a named enumeration type

use crate::abi::{core_type, EnumerationVTable, InterfaceId, RawObject};
use crate::errors::{guarded, ErrorCode, NativeError};
use crate::ffi::{borrow_arg, drop_object, out_param, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;
use crate::object_ref::ObjRef;

use super::string::StringData;
use super::{emit_new, emit_ref};

/// Payload of an Enumeration object
#[derive(Debug)]
pub struct EnumerationData {
    type_name: ObjRef,
    value: ObjRef,
    int_value: i64,
}

impl EnumerationData {
    fn text(obj: &ObjRef) -> &str {
        obj.payload::<StringData>().map(StringData::as_str).unwrap_or_default()
    }

    pub fn type_name(&self) -> &str {
        Self::text(&self.type_name)
    }

    pub fn value(&self) -> &str {
        Self::text(&self.value)
    }

    pub fn int_value(&self) -> i64 {
        self.int_value
    }
}

static ENUMERATION_TYPE: TypeInfo = TypeInfo {
    name: "Enumeration",
    core_type: core_type::ENUMERATION,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::ENUMERATION],
    drop: drop_object::<EnumerationData>,
    hash: enumeration_hash,
    equals: enumeration_equals,
    display: enumeration_display,
};

static ENUMERATION_VTABLE: EnumerationVTable = EnumerationVTable {
    base: BASE_VTABLE,
    get_type_name: enumeration_get_type_name,
    get_value: enumeration_get_value,
    get_int_value: enumeration_get_int_value,
};

impl Payload for EnumerationData {
    type VTable = EnumerationVTable;

    fn type_info() -> &'static TypeInfo {
        &ENUMERATION_TYPE
    }

    fn vtable() -> &'static EnumerationVTable {
        &ENUMERATION_VTABLE
    }
}

unsafe fn enumeration_hash(this: *mut RawObject) -> u64 {
    payload::<EnumerationData>(this)
        .map(|d| d.type_name.hash_code() ^ d.int_value as u64)
        .unwrap_or(0)
}

unsafe fn enumeration_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<EnumerationData>(this), payload::<EnumerationData>(other)) {
        (Ok(a), Ok(b)) => a.int_value == b.int_value && a.type_name() == b.type_name(),
        _ => false,
    }
}

unsafe fn enumeration_display(this: *mut RawObject) -> String {
    payload::<EnumerationData>(this)
        .map(|d| format!("{}::{}", d.type_name(), d.value()))
        .unwrap_or_default()
}

unsafe extern "C" fn enumeration_get_type_name(
    this: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("enumeration_get_type_name", || {
        let out = out_param(out)?;
        emit_ref(out, payload::<EnumerationData>(this)?.type_name.clone());
        Ok(())
    })
}

unsafe extern "C" fn enumeration_get_value(
    this: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("enumeration_get_value", || {
        let out = out_param(out)?;
        emit_ref(out, payload::<EnumerationData>(this)?.value.clone());
        Ok(())
    })
}

unsafe extern "C" fn enumeration_get_int_value(this: *mut RawObject, out: *mut i64) -> ErrorCode {
    guarded("enumeration_get_int_value", || {
        let out = out_param(out)?;
        *out = payload::<EnumerationData>(this)?.int_value;
        Ok(())
    })
}

/// Create an Enumeration object; `type_name` and `value` must be Strings
#[no_mangle]
pub unsafe extern "C" fn ct_enumeration_create(
    out: *mut *mut RawObject,
    type_name: *mut RawObject,
    value: *mut RawObject,
    int_value: i64,
) -> ErrorCode {
    guarded("enumeration_create", || {
        out_param(out)?;
        let type_name = borrow_arg(type_name, "type_name")?;
        let value = borrow_arg(value, "value")?;
        for (obj, what) in [(&type_name, "enumeration type name"), (&value, "enumeration value")] {
            if obj.payload::<StringData>().is_none() {
                return Err(NativeError::new(
                    ErrorCode::INVALIDPARAMETER,
                    format!("{} must be a String, found {}", what, obj.type_name()),
                ));
            }
        }
        emit_new(out, EnumerationData { type_name, value, int_value })
    })
}
