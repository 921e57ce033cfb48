//! Struct type - named, immutable record of string-keyed fields
//!
//! Built from a type name and a dict whose keys are all strings; field
//! order follows the dict's insertion order.

use core::ptr;

use crate::abi::{core_type, InterfaceId, RawObject, StructVTable};
use crate::errors::{guarded, ErrorCode, NativeError, NativeResult};
use crate::ffi::{borrow_arg, drop_object, out_param, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;
use crate::object_ref::ObjRef;

use super::dict::{new_dict, DictData};
use super::list::{element_display, new_list};
use super::string::StringData;
use super::{emit_new, emit_ref};

/// Payload of a Struct object
#[derive(Debug)]
pub struct StructData {
    type_name: ObjRef,
    fields: Vec<(ObjRef, ObjRef)>,
}

impl StructData {
    pub fn type_name(&self) -> &str {
        self.type_name.payload::<StringData>().map(StringData::as_str).unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<&ObjRef> {
        self.fields
            .iter()
            .find(|(k, _)| k.payload::<StringData>().map(StringData::as_str) == Some(name))
            .map(|(_, v)| v)
    }

    pub fn field_values(&self) -> impl Iterator<Item = &ObjRef> {
        self.fields.iter().map(|(_, v)| v)
    }
}

static STRUCT_TYPE: TypeInfo = TypeInfo {
    name: "Struct",
    core_type: core_type::STRUCT,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::STRUCT],
    drop: drop_object::<StructData>,
    hash: struct_hash,
    equals: struct_equals,
    display: struct_display,
};

static STRUCT_VTABLE: StructVTable = StructVTable {
    base: BASE_VTABLE,
    get_type_name: struct_get_type_name,
    get_field_names: struct_get_field_names,
    get_field_values: struct_get_field_values,
    get: struct_get,
    has_field: struct_has_field,
    get_as_dictionary: struct_get_as_dictionary,
};

impl Payload for StructData {
    type VTable = StructVTable;

    fn type_info() -> &'static TypeInfo {
        &STRUCT_TYPE
    }

    fn vtable() -> &'static StructVTable {
        &STRUCT_VTABLE
    }
}

unsafe fn struct_hash(this: *mut RawObject) -> u64 {
    payload::<StructData>(this)
        .map(|d| {
            d.fields
                .iter()
                .fold(d.type_name.hash_code(), |h, (k, v)| {
                    h.rotate_left(5) ^ k.hash_code() ^ v.hash_code().rotate_left(29)
                })
        })
        .unwrap_or(0)
}

unsafe fn struct_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<StructData>(this), payload::<StructData>(other)) {
        (Ok(a), Ok(b)) => {
            a.type_name.value_eq(&b.type_name)
                && a.fields.len() == b.fields.len()
                && a.fields
                    .iter()
                    .zip(&b.fields)
                    .all(|((ka, va), (kb, vb))| ka.value_eq(kb) && va.value_eq(vb))
        }
        _ => false,
    }
}

unsafe fn struct_display(this: *mut RawObject) -> String {
    payload::<StructData>(this)
        .map(|d| {
            let parts: Vec<String> = d
                .fields
                .iter()
                .map(|(k, v)| format!("{}: {}", k.display(), element_display(v)))
                .collect();
            format!("{} {{{}}}", d.type_name(), parts.join(", "))
        })
        .unwrap_or_default()
}

fn field_position(data: &StructData, name: &ObjRef) -> Option<usize> {
    data.fields.iter().position(|(k, _)| k.value_eq(name))
}

unsafe extern "C" fn struct_get_type_name(
    this: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("struct_get_type_name", || {
        let out = out_param(out)?;
        emit_ref(out, payload::<StructData>(this)?.type_name.clone());
        Ok(())
    })
}

unsafe extern "C" fn struct_get_field_names(
    this: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("struct_get_field_names", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let names = payload::<StructData>(this)?.fields.iter().map(|(k, _)| k.clone()).collect();
        emit_ref(out, new_list(names)?);
        Ok(())
    })
}

unsafe extern "C" fn struct_get_field_values(
    this: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("struct_get_field_values", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let values = payload::<StructData>(this)?.fields.iter().map(|(_, v)| v.clone()).collect();
        emit_ref(out, new_list(values)?);
        Ok(())
    })
}

unsafe extern "C" fn struct_get(
    this: *mut RawObject,
    name: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("struct_get", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let data = payload::<StructData>(this)?;
        let name = borrow_arg(name, "name")?;
        let index = field_position(data, &name).ok_or_else(|| {
            NativeError::new(
                ErrorCode::NOTFOUND,
                format!("struct {} has no field {}", data.type_name(), name.display()),
            )
        })?;
        emit_ref(out, data.fields[index].1.clone());
        Ok(())
    })
}

unsafe extern "C" fn struct_has_field(
    this: *mut RawObject,
    name: *mut RawObject,
    out: *mut bool,
) -> ErrorCode {
    guarded("struct_has_field", || {
        let out = out_param(out)?;
        let data = payload::<StructData>(this)?;
        let name = borrow_arg(name, "name")?;
        *out = field_position(data, &name).is_some();
        Ok(())
    })
}

unsafe extern "C" fn struct_get_as_dictionary(
    this: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("struct_get_as_dictionary", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let fields = payload::<StructData>(this)?.fields.clone();
        emit_ref(out, new_dict(fields)?);
        Ok(())
    })
}

fn require_string(obj: &ObjRef, what: &str) -> NativeResult<()> {
    if obj.payload::<StringData>().is_none() {
        return Err(NativeError::new(
            ErrorCode::INVALIDPARAMETER,
            format!("{} must be a String, found {}", what, obj.type_name()),
        ));
    }
    Ok(())
}

/// Create a Struct object from a String type name and a Dict of fields
///
/// `fields` may be null for a struct without fields.
#[no_mangle]
pub unsafe extern "C" fn ct_struct_create(
    out: *mut *mut RawObject,
    type_name: *mut RawObject,
    fields: *mut RawObject,
) -> ErrorCode {
    guarded("struct_create", || {
        out_param(out)?;
        let type_name = borrow_arg(type_name, "type_name")?;
        require_string(&type_name, "struct type name")?;

        let fields = if fields.is_null() {
            Vec::new()
        } else {
            let dict = borrow_arg(fields, "fields")?;
            let dict = dict.payload::<DictData>().ok_or_else(|| {
                NativeError::new(
                    ErrorCode::INVALIDPARAMETER,
                    format!("struct fields must be a Dict, found {}", dict.type_name()),
                )
            })?;
            dict.snapshot()
        };
        for (key, _) in &fields {
            require_string(key, "struct field name")?;
        }

        emit_new(out, StructData { type_name, fields })
    })
}
