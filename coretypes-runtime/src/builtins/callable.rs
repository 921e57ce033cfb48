//! Procedure and Function objects - callbacks owned by the runtime
//!
//! A callable stores a caller-supplied entry point plus an opaque context.
//! The context belongs to the callable from the moment `ct_*_create` is
//! called (even when creation fails) and is handed to `context_drop` when
//! the callable is freed.

use core::ffi::c_void;
use core::ptr;

use crate::abi::{
    core_type, ContextDrop, FuncCallback, FunctionVTable, InterfaceId, ProcCallback,
    ProcedureVTable, RawObject,
};
use crate::errors::{guarded, ErrorCode, NativeError};
use crate::ffi::object::{identity_equals, identity_hash};
use crate::ffi::{drop_object, out_param, payload, ct_release, Payload, BASE_VTABLE};
use crate::header::TypeInfo;

use super::emit_new;

/// Caller context with its destructor
#[derive(Debug)]
struct Context {
    ptr: *mut c_void,
    drop: Option<ContextDrop>,
}

impl Drop for Context {
    fn drop(&mut self) {
        if let Some(drop) = self.drop {
            unsafe { drop(self.ptr) };
        }
    }
}

/// Payload of a Procedure object
#[derive(Debug)]
pub struct ProcedureData {
    callback: ProcCallback,
    context: Context,
}

/// Payload of a Function object
#[derive(Debug)]
pub struct FunctionData {
    callback: FuncCallback,
    context: Context,
}

static PROCEDURE_TYPE: TypeInfo = TypeInfo {
    name: "Procedure",
    core_type: core_type::PROC,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::PROCEDURE],
    drop: drop_object::<ProcedureData>,
    hash: identity_hash,
    equals: identity_equals,
    display: procedure_display,
};

static PROCEDURE_VTABLE: ProcedureVTable = ProcedureVTable {
    base: BASE_VTABLE,
    dispatch: procedure_dispatch,
};

impl Payload for ProcedureData {
    type VTable = ProcedureVTable;

    fn type_info() -> &'static TypeInfo {
        &PROCEDURE_TYPE
    }

    fn vtable() -> &'static ProcedureVTable {
        &PROCEDURE_VTABLE
    }
}

static FUNCTION_TYPE: TypeInfo = TypeInfo {
    name: "Function",
    core_type: core_type::FUNC,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::FUNCTION],
    drop: drop_object::<FunctionData>,
    hash: identity_hash,
    equals: identity_equals,
    display: function_display,
};

static FUNCTION_VTABLE: FunctionVTable = FunctionVTable {
    base: BASE_VTABLE,
    call: function_call,
};

impl Payload for FunctionData {
    type VTable = FunctionVTable;

    fn type_info() -> &'static TypeInfo {
        &FUNCTION_TYPE
    }

    fn vtable() -> &'static FunctionVTable {
        &FUNCTION_VTABLE
    }
}

unsafe fn procedure_display(this: *mut RawObject) -> String {
    format!("<procedure at {:p}>", this)
}

unsafe fn function_display(this: *mut RawObject) -> String {
    format!("<function at {:p}>", this)
}

fn callback_failed(kind: &str, code: ErrorCode) -> NativeError {
    NativeError::new(code, format!("{} callback reported {}", kind, code))
}

unsafe extern "C" fn procedure_dispatch(this: *mut RawObject, params: *mut RawObject) -> ErrorCode {
    guarded("procedure_dispatch", || {
        let data = payload::<ProcedureData>(this)?;
        let code = (data.callback)(data.context.ptr, params);
        if code.failed() {
            return Err(callback_failed("procedure", code));
        }
        Ok(())
    })
}

unsafe extern "C" fn function_call(
    this: *mut RawObject,
    params: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("function_call", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let data = payload::<FunctionData>(this)?;

        let code = (data.callback)(data.context.ptr, params, out);
        if code.failed() {
            ct_release(*out);
            *out = ptr::null_mut();
            return Err(callback_failed("function", code));
        }
        Ok(())
    })
}

/// Create a Procedure object around `callback`
///
/// # Safety
/// `context` must stay valid until `context_drop` runs.
#[no_mangle]
pub unsafe extern "C" fn ct_procedure_create(
    out: *mut *mut RawObject,
    callback: Option<ProcCallback>,
    context: *mut c_void,
    context_drop: Option<ContextDrop>,
) -> ErrorCode {
    let context = Context { ptr: context, drop: context_drop };
    guarded("procedure_create", move || {
        out_param(out)?;
        let callback = callback.ok_or_else(|| NativeError::null_argument("callback"))?;
        emit_new(out, ProcedureData { callback, context })
    })
}

/// Create a Function object around `callback`
///
/// # Safety
/// `context` must stay valid until `context_drop` runs.
#[no_mangle]
pub unsafe extern "C" fn ct_function_create(
    out: *mut *mut RawObject,
    callback: Option<FuncCallback>,
    context: *mut c_void,
    context_drop: Option<ContextDrop>,
) -> ErrorCode {
    let context = Context { ptr: context, drop: context_drop };
    guarded("function_create", move || {
        out_param(out)?;
        let callback = callback.ok_or_else(|| NativeError::null_argument("callback"))?;
        emit_new(out, FunctionData { callback, context })
    })
}
