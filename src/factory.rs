//! Factories for the constructible core types
//!
//! Every factory returns a fresh handle with a reference count of one.
//! The strict form returns `CoreResult<Handle>`; call
//! [`StatusExt::into_status`](crate::error::StatusExt::into_status) for the
//! status-returning form.

use std::ptr;

use coretypes_runtime::abi::RawObject;
use coretypes_runtime::{
    ct_binary_data_create, ct_boolean_create, ct_complex_number_create, ct_dict_create,
    ct_enumeration_create, ct_float_create, ct_integer_create, ct_list_create, ct_ratio_create,
    ct_string_create, ct_struct_create, ct_version_info_create, ErrorCode,
};
use tracing::trace;

use crate::core_type::CoreType;
use crate::error::{check_create, CoreError, CoreResult};
use crate::handle::Handle;
use crate::version::VersionTriple;
use crate::view::owned_result;
use crate::views::{new_function, new_procedure};

/// Raw value for `create_primitive`, one variant per constructible kind
#[derive(Debug, Clone, Copy)]
pub enum Primitive<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// UTF-8 text
    String(&'a str),
    Ratio { numerator: i64, denominator: i64 },
    /// Items in order
    List(&'a [Handle]),
    /// Key/value pairs; a later duplicate key overwrites an earlier one
    Dict(&'a [(Handle, Handle)]),
    Struct {
        type_name: &'a str,
        fields: &'a [(&'a str, Handle)],
    },
    Enumeration {
        type_name: &'a str,
        value: &'a str,
        int_value: i64,
    },
}

impl Primitive<'_> {
    pub fn kind(&self) -> CoreType {
        match self {
            Primitive::Bool(_) => CoreType::Bool,
            Primitive::Int(_) => CoreType::Int,
            Primitive::Float(_) => CoreType::Float,
            Primitive::String(_) => CoreType::String,
            Primitive::Ratio { .. } => CoreType::Ratio,
            Primitive::List(_) => CoreType::List,
            Primitive::Dict(_) => CoreType::Dict,
            Primitive::Struct { .. } => CoreType::Struct,
            Primitive::Enumeration { .. } => CoreType::Enumeration,
        }
    }
}

/// Create an object of `primitive`'s kind holding its value
pub fn create_primitive(primitive: Primitive<'_>) -> CoreResult<Handle> {
    match primitive {
        Primitive::Bool(value) => create_bool(value),
        Primitive::Int(value) => create_int(value),
        Primitive::Float(value) => create_float(value),
        Primitive::String(value) => create_string(value),
        Primitive::Ratio { numerator, denominator } => create_ratio(numerator, denominator),
        Primitive::List(items) => create_list(items),
        Primitive::Dict(pairs) => create_dict(pairs),
        Primitive::Struct { type_name, fields } => create_struct(type_name, fields),
        Primitive::Enumeration { type_name, value, int_value } => {
            create_enumeration(type_name, value, int_value)
        }
    }
}

fn finish(code: ErrorCode, out: *mut RawObject, kind: CoreType, operation: &'static str) -> CoreResult<Handle> {
    check_create(code, kind, operation)?;
    trace!(kind = %kind, "object created");
    owned_result(out, operation)
}

pub fn create_bool(value: bool) -> CoreResult<Handle> {
    let mut out = ptr::null_mut();
    let code = unsafe { ct_boolean_create(&mut out, value) };
    finish(code, out, CoreType::Bool, "boolean_create")
}

pub fn create_int(value: i64) -> CoreResult<Handle> {
    let mut out = ptr::null_mut();
    let code = unsafe { ct_integer_create(&mut out, value) };
    finish(code, out, CoreType::Int, "integer_create")
}

pub fn create_float(value: f64) -> CoreResult<Handle> {
    let mut out = ptr::null_mut();
    let code = unsafe { ct_float_create(&mut out, value) };
    finish(code, out, CoreType::Float, "float_create")
}

pub fn create_string(value: &str) -> CoreResult<Handle> {
    create_string_from_bytes(value.as_bytes())
}

/// Create a String from raw bytes; the native core rejects invalid UTF-8
pub fn create_string_from_bytes(bytes: &[u8]) -> CoreResult<Handle> {
    let mut out = ptr::null_mut();
    let code = unsafe { ct_string_create(&mut out, bytes.as_ptr(), bytes.len()) };
    finish(code, out, CoreType::String, "string_create")
}

/// Create a Ratio; a zero denominator is an invalid argument
pub fn create_ratio(numerator: i64, denominator: i64) -> CoreResult<Handle> {
    let mut out = ptr::null_mut();
    let code = unsafe { ct_ratio_create(&mut out, numerator, denominator) };
    finish(code, out, CoreType::Ratio, "ratio_create")
}

/// Native addresses of argument handles; a Null handle is an invalid argument
fn argument_ptrs<'a>(
    handles: impl IntoIterator<Item = &'a Handle>,
    what: &'static str,
) -> CoreResult<Vec<*mut RawObject>> {
    handles
        .into_iter()
        .enumerate()
        .map(|(i, handle)| match handle.raw() {
            Err(CoreError::NullHandle) => {
                Err(CoreError::invalid_argument(format!("{} {} is null", what, i)))
            }
            other => other,
        })
        .collect()
}

/// Create a List holding `items` in order (each gains a reference)
pub fn create_list(items: &[Handle]) -> CoreResult<Handle> {
    let ptrs = argument_ptrs(items, "list item")?;
    let mut out = ptr::null_mut();
    let code = unsafe { ct_list_create(&mut out, ptrs.as_ptr(), ptrs.len()) };
    finish(code, out, CoreType::List, "list_create")
}

/// Create a Dict from pairs; the last value wins for duplicate keys
pub fn create_dict(pairs: &[(Handle, Handle)]) -> CoreResult<Handle> {
    let keys = argument_ptrs(pairs.iter().map(|(k, _)| k), "dict key")?;
    let values = argument_ptrs(pairs.iter().map(|(_, v)| v), "dict value")?;
    let mut out = ptr::null_mut();
    let code = unsafe { ct_dict_create(&mut out, keys.as_ptr(), values.as_ptr(), keys.len()) };
    finish(code, out, CoreType::Dict, "dict_create")
}

/// Create a Struct named `type_name` with the given fields
///
/// Unlike the scalar factories this makes several native allocations: a
/// String for the type name, one String per field name and a temporary
/// Dict, all before the Struct itself. The temporaries are released before
/// returning, and a failure in any of them is reported as a Struct
/// allocation failure.
pub fn create_struct(type_name: &str, fields: &[(&str, Handle)]) -> CoreResult<Handle> {
    let as_struct = |err: CoreError| match err {
        CoreError::AllocationFailed { code, .. } => {
            CoreError::AllocationFailed { code, kind: CoreType::Struct }
        }
        other => other,
    };

    let name = create_string(type_name).map_err(as_struct)?;
    let pairs = fields
        .iter()
        .map(|(field, value)| -> CoreResult<(Handle, Handle)> {
            Ok((create_string(field)?, value.clone()))
        })
        .collect::<CoreResult<Vec<_>>>()
        .map_err(as_struct)?;
    let dict = create_dict(&pairs).map_err(as_struct)?;

    let mut out = ptr::null_mut();
    let code = unsafe { ct_struct_create(&mut out, name.raw()?, dict.raw()?) };
    finish(code, out, CoreType::Struct, "struct_create")
}

/// Create an Enumeration value
///
/// The type name and the value name are passed to the native core as
/// String objects, so this makes three native allocations, not one.
pub fn create_enumeration(type_name: &str, value: &str, int_value: i64) -> CoreResult<Handle> {
    let type_name = create_string(type_name)?;
    let value = create_string(value)?;
    let mut out = ptr::null_mut();
    let code = unsafe { ct_enumeration_create(&mut out, type_name.raw()?, value.raw()?, int_value) };
    finish(code, out, CoreType::Enumeration, "enumeration_create")
}

/// Create a BinaryData object holding a copy of `bytes`
pub fn create_binary_data(bytes: &[u8]) -> CoreResult<Handle> {
    let mut out = ptr::null_mut();
    let code = unsafe { ct_binary_data_create(&mut out, bytes.as_ptr(), bytes.len()) };
    finish(code, out, CoreType::BinaryData, "binary_data_create")
}

pub fn create_complex_number(real: f64, imaginary: f64) -> CoreResult<Handle> {
    let mut out = ptr::null_mut();
    let code = unsafe { ct_complex_number_create(&mut out, real, imaginary) };
    finish(code, out, CoreType::ComplexNumber, "complex_number_create")
}

pub fn create_version_info(version: VersionTriple) -> CoreResult<Handle> {
    let mut out = ptr::null_mut();
    let code = unsafe {
        ct_version_info_create(
            &mut out,
            version.major as usize,
            version.minor as usize,
            version.patch as usize,
        )
    };
    finish(code, out, CoreType::Object, "version_info_create")
}

/// Wrap `f` as a native Procedure
///
/// Errors returned by `f` reach the caller of `dispatch` with their code.
pub fn create_procedure<F>(f: F) -> CoreResult<Handle>
where
    F: Fn(Option<Handle>) -> CoreResult<()> + Send + Sync + 'static,
{
    new_procedure(f)
}

/// Wrap `f` as a native Function
pub fn create_function<F>(f: F) -> CoreResult<Handle>
where
    F: Fn(Option<Handle>) -> CoreResult<Handle> + Send + Sync + 'static,
{
    new_function(f)
}
