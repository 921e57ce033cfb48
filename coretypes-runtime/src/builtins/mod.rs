//! Built-in object kinds - the core types the runtime can construct
//!
//! Design: one focused module per kind. Each module owns its payload type,
//! its `TypeInfo`, its operation table and its `ct_*_create` factory.

pub mod scalar;
pub mod float;
pub mod string;
pub mod ratio;
pub mod list;
pub mod dict;
pub mod callable;
pub mod structs;
pub mod enumeration;
pub mod binary;
pub mod version;
pub mod error_info;

#[cfg(test)]
mod tests;

pub use scalar::{ct_boolean_create, ct_integer_create, BoolData, IntData};
pub use float::{ct_float_create, FloatData};
pub use string::{ct_string_create, StringData};
pub use ratio::{ct_ratio_create, RatioData};
pub use list::{ct_list_create, ListData};
pub use dict::{ct_dict_create, DictData};
pub use callable::{ct_function_create, ct_procedure_create, FunctionData, ProcedureData};
pub use structs::{ct_struct_create, StructData};
pub use enumeration::{ct_enumeration_create, EnumerationData};
pub use binary::{ct_binary_data_create, ct_complex_number_create, BinaryData, ComplexData};
pub use version::{ct_core_types_get_version, ct_version_info_create, VersionInfoData};
pub use error_info::ErrorInfoData;

use core::ptr;
use std::collections::HashSet;

use crate::abi::RawObject;
use crate::errors::{ErrorCode, NativeError, NativeResult};
use crate::ffi::{alloc_object, out_param, Payload};
use crate::object_ref::ObjRef;

/// Allocate `data` and hand the new object to the caller through `out`
pub(crate) fn emit_new<T: Payload>(out: *mut *mut RawObject, data: T) -> NativeResult<()> {
    let out = out_param(out)?;
    *out = ptr::null_mut();
    *out = alloc_object(data)?;
    Ok(())
}

/// Hand an existing reference to the caller through `out`
pub(crate) fn emit_ref(out: &mut *mut RawObject, obj: ObjRef) {
    *out = obj.into_raw();
}

/// Allocate `data` and keep the new object as an `ObjRef`
pub(crate) fn new_ref<T: Payload>(data: T) -> NativeResult<ObjRef> {
    let raw = alloc_object(data)?;
    unsafe { ObjRef::from_owned(raw) }
        .ok_or_else(|| NativeError::new(ErrorCode::NOMEMORY, "allocation returned null"))
}

/// Whether `target` is `root` or can be reached through List, Dict and
/// Struct children of `root`
pub(crate) fn reaches(root: &ObjRef, target: *mut RawObject) -> bool {
    let mut seen = HashSet::new();
    let mut pending = vec![root.clone()];
    while let Some(obj) = pending.pop() {
        if obj.as_raw() == target {
            return true;
        }
        if !seen.insert(obj.as_raw() as usize) {
            continue;
        }

        if let Some(list) = obj.payload::<ListData>() {
            pending.extend(list.snapshot());
        } else if let Some(dict) = obj.payload::<DictData>() {
            for (key, value) in dict.snapshot() {
                pending.push(key);
                pending.push(value);
            }
        } else if let Some(record) = obj.payload::<StructData>() {
            pending.extend(record.field_values().cloned());
        }
    }
    false
}

/// Refuse an element that would make `container` contain itself
pub(crate) fn reject_cycle(container: *mut RawObject, item: &ObjRef, kind: &str) -> NativeResult<()> {
    if reaches(item, container) {
        return Err(NativeError::new(
            ErrorCode::INVALIDPARAMETER,
            format!("a {} cannot contain itself", kind),
        ));
    }
    Ok(())
}
