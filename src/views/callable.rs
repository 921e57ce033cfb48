//! Procedure and Function views, and the closures behind them
//!
//! Rust closures become native callables through `extern "C"` trampolines.
//! The boxed closure is the callable's context: the native core owns it and
//! runs `drop_context` when the callable is freed. Panics are caught at the
//! boundary and reported as `CALLBACK_FAILED`.

use std::ffi::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use coretypes_runtime::abi::{FunctionVTable, InterfaceId, ProcedureVTable, RawObject};
use coretypes_runtime::logging::log_callback_panic;
use coretypes_runtime::{ct_function_create, ct_procedure_create, ErrorCode};

use crate::core_type::CoreType;
use crate::error::{check, check_create, CoreResult};
use crate::handle::Handle;
use crate::view::{define_view, owned_result};

define_view!(
    /// View over a callable without a return value
    ProcedureView,
    ProcedureVTable,
    InterfaceId::PROCEDURE
);

define_view!(
    /// View over a callable that returns an object
    FunctionView,
    FunctionVTable,
    InterfaceId::FUNCTION
);

impl ProcedureView {
    /// Invoke the procedure; `params` is passed through as-is
    pub fn dispatch(&self, params: Option<&Handle>) -> CoreResult<()> {
        let raw = self.raw()?;
        let params = params.map(Handle::raw).transpose()?.unwrap_or(ptr::null_mut());
        check(unsafe { (self.table.dispatch)(raw, params) }, "procedure_dispatch")
    }
}

impl FunctionView {
    /// Invoke the function and own its result
    ///
    /// A function may return nothing, which gives a Null handle.
    pub fn call(&self, params: Option<&Handle>) -> CoreResult<Handle> {
        let raw = self.raw()?;
        let params = params.map(Handle::raw).transpose()?.unwrap_or(ptr::null_mut());
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.call)(raw, params, &mut out) }, "function_call")?;
        if out.is_null() {
            return Ok(Handle::null());
        }
        owned_result(out, "function_call")
    }
}

/// Failure code reported back to the native core for a closure error
fn failure_code(code: ErrorCode) -> ErrorCode {
    if code.failed() {
        code
    } else {
        ErrorCode::CALLBACK_FAILED
    }
}

unsafe fn borrowed_params(params: *mut RawObject) -> Option<Handle> {
    (!params.is_null()).then(|| Handle::from_borrowed(params))
}

unsafe extern "C" fn drop_context<F>(context: *mut c_void) {
    drop(Box::from_raw(context as *mut F));
}

unsafe extern "C" fn procedure_trampoline<F>(context: *mut c_void, params: *mut RawObject) -> ErrorCode
where
    F: Fn(Option<Handle>) -> CoreResult<()>,
{
    let f = &*(context as *const F);
    let params = borrowed_params(params);
    match catch_unwind(AssertUnwindSafe(|| f(params))) {
        Ok(Ok(())) => ErrorCode::SUCCESS,
        Ok(Err(err)) => failure_code(err.code()),
        Err(_) => {
            log_callback_panic("procedure_dispatch");
            ErrorCode::CALLBACK_FAILED
        }
    }
}

unsafe extern "C" fn function_trampoline<F>(
    context: *mut c_void,
    params: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode
where
    F: Fn(Option<Handle>) -> CoreResult<Handle>,
{
    let Some(out) = out.as_mut() else {
        return ErrorCode::ARGUMENT_NULL;
    };
    let f = &*(context as *const F);
    let params = borrowed_params(params);
    match catch_unwind(AssertUnwindSafe(|| f(params))) {
        Ok(Ok(result)) => {
            *out = result.into_raw();
            ErrorCode::SUCCESS
        }
        Ok(Err(err)) => failure_code(err.code()),
        Err(_) => {
            log_callback_panic("function_call");
            ErrorCode::CALLBACK_FAILED
        }
    }
}

pub(crate) fn new_procedure<F>(f: F) -> CoreResult<Handle>
where
    F: Fn(Option<Handle>) -> CoreResult<()> + Send + Sync + 'static,
{
    let context = Box::into_raw(Box::new(f)) as *mut c_void;
    let mut out = ptr::null_mut();
    // Ownership of `context` passes to the native core here, success or not
    let code = unsafe {
        ct_procedure_create(
            &mut out,
            Some(procedure_trampoline::<F>),
            context,
            Some(drop_context::<F>),
        )
    };
    check_create(code, CoreType::Proc, "procedure_create")?;
    owned_result(out, "procedure_create")
}

pub(crate) fn new_function<F>(f: F) -> CoreResult<Handle>
where
    F: Fn(Option<Handle>) -> CoreResult<Handle> + Send + Sync + 'static,
{
    let context = Box::into_raw(Box::new(f)) as *mut c_void;
    let mut out = ptr::null_mut();
    let code = unsafe {
        ct_function_create(
            &mut out,
            Some(function_trampoline::<F>),
            context,
            Some(drop_context::<F>),
        )
    };
    check_create(code, CoreType::Func, "function_create")?;
    owned_result(out, "function_create")
}
