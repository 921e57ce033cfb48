//! Explicit access to native diagnostics
//!
//! The native core remembers its most recent described failure in a single
//! process-wide slot. Nothing in this crate reads that slot implicitly;
//! callers that want the detail ask for it here.

use std::fmt;
use std::ptr;

use coretypes_runtime::{ct_clear_error_info, ct_get_error_info, stats, ErrorCode, RuntimeStats};

use crate::core_type::CoreType;
use crate::error::{CoreError, CoreResult};
use crate::handle::Handle;
use crate::views::ErrorInfoView;

/// Detail of the most recent native failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Read the last-error slot, `None` when it is empty
///
/// Fails with `AllocationFailed` when the native core cannot build the
/// ErrorInfo object; the slot keeps its record in that case.
pub fn last_error_info() -> CoreResult<Option<ErrorInfo>> {
    let mut out = ptr::null_mut();
    let code = unsafe { ct_get_error_info(&mut out) };
    if code.failed() {
        return Err(CoreError::AllocationFailed { code, kind: CoreType::Object });
    }
    if out.is_null() {
        return Ok(None);
    }

    let info = unsafe { Handle::from_owned(out) }.query_as::<ErrorInfoView>()?;
    Ok(Some(ErrorInfo {
        code: info.code()?,
        message: info.message()?,
    }))
}

/// Empty the last-error slot
pub fn clear_error_info() {
    ct_clear_error_info();
}

/// Objects allocated by the native core and not yet freed
pub fn live_objects() -> usize {
    stats().live_objects()
}

/// Allocation counters of the native core
pub fn runtime_stats() -> RuntimeStats {
    stats()
}
