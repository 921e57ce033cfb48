//! Status codes and the process-wide last-error-info slot
//!
//! Every entry point returns an `ErrorCode`; zero is success and failures
//! carry the high bit. Failures that can be described are also recorded in
//! a single slot that callers read back with `ct_get_error_info`.

use core::fmt;
use std::borrow::Cow;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::abi::RawObject;
use crate::logging::log_native_error;

/// Native status code (0 = success)
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    pub const SUCCESS: Self = Self(0);
    pub const NOMEMORY: Self = Self(0x8000_0000);
    pub const INVALIDPARAMETER: Self = Self(0x8000_0001);
    pub const OUTOFRANGE: Self = Self(0x8000_0005);
    pub const NOTFOUND: Self = Self(0x8000_0006);
    pub const INVALIDTYPE: Self = Self(0x8000_000A);
    pub const ARGUMENT_NULL: Self = Self(0x8000_0026);
    pub const CALLBACK_FAILED: Self = Self(0x8000_0027);
    pub const NOTIMPLEMENTED: Self = Self(0x8000_4001);
    pub const NOINTERFACE: Self = Self(0x8000_4002);
    pub const GENERALERROR: Self = Self(0x8000_4005);

    #[inline]
    pub const fn succeeded(self) -> bool {
        self.0 & 0x8000_0000 == 0
    }

    #[inline]
    pub const fn failed(self) -> bool {
        !self.succeeded()
    }

    /// Symbolic name, if the code is one of the known ones
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("SUCCESS"),
            0x8000_0000 => Some("NOMEMORY"),
            0x8000_0001 => Some("INVALIDPARAMETER"),
            0x8000_0005 => Some("OUTOFRANGE"),
            0x8000_0006 => Some("NOTFOUND"),
            0x8000_000A => Some("INVALIDTYPE"),
            0x8000_0026 => Some("ARGUMENT_NULL"),
            0x8000_0027 => Some("CALLBACK_FAILED"),
            0x8000_4001 => Some("NOTIMPLEMENTED"),
            0x8000_4002 => Some("NOINTERFACE"),
            0x8000_4005 => Some("GENERALERROR"),
            _ => None,
        }
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}(0x{:08X})", name, self.0),
            None => write!(f, "ErrorCode(0x{:08X})", self.0),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "0x{:08X} ({})", self.0, name),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

/// Failure raised inside an entry point before it is turned into a status
#[derive(Debug, Clone)]
pub struct NativeError {
    pub code: ErrorCode,
    pub message: Cow<'static, str>,
}

impl NativeError {
    pub fn new(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn null_argument(name: &'static str) -> Self {
        Self::new(ErrorCode::ARGUMENT_NULL, format!("argument '{}' is null", name))
    }

    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::new(
            ErrorCode::OUTOFRANGE,
            format!("index {} is out of range for length {}", index, len),
        )
    }
}

impl From<ErrorCode> for NativeError {
    fn from(code: ErrorCode) -> Self {
        Self { code, message: Cow::Borrowed("") }
    }
}

pub type NativeResult<T> = Result<T, NativeError>;

/// What the slot remembers about the most recent failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub code: ErrorCode,
    pub message: String,
    pub operation: &'static str,
}

static LAST_ERROR: Lazy<Mutex<Option<ErrorRecord>>> = Lazy::new(|| Mutex::new(None));

/// Convert an entry point result into its status, recording failures
pub(crate) fn status(operation: &'static str, result: NativeResult<()>) -> ErrorCode {
    match result {
        Ok(()) => ErrorCode::SUCCESS,
        Err(err) => {
            log_native_error(operation, err.code.0, &err.message);
            *LAST_ERROR.lock() = Some(ErrorRecord {
                code: err.code,
                message: err.message.into_owned(),
                operation,
            });
            err.code
        }
    }
}

/// Run an entry point body and turn its result into a status
#[inline]
pub(crate) fn guarded(operation: &'static str, body: impl FnOnce() -> NativeResult<()>) -> ErrorCode {
    status(operation, body())
}

/// Snapshot of the slot without touching it
pub fn last_error() -> Option<ErrorRecord> {
    LAST_ERROR.lock().clone()
}

/// Retrieve the last error as a native ErrorInfo object
///
/// An empty slot succeeds with `*out` set to null. The returned object
/// carries one reference owned by the caller. Failing to build the object
/// returns its status and leaves the slot as it was.
#[no_mangle]
pub unsafe extern "C" fn ct_get_error_info(out: *mut *mut RawObject) -> ErrorCode {
    if out.is_null() {
        return ErrorCode::ARGUMENT_NULL;
    }
    *out = core::ptr::null_mut();

    let Some(record) = LAST_ERROR.lock().clone() else {
        return ErrorCode::SUCCESS;
    };
    match crate::builtins::error_info::new_error_info(record) {
        Ok(info) => {
            *out = info;
            ErrorCode::SUCCESS
        }
        Err(err) => {
            log_native_error("get_error_info", err.code.0, &err.message);
            err.code
        }
    }
}

/// Empty the last-error slot
#[no_mangle]
pub extern "C" fn ct_clear_error_info() {
    *LAST_ERROR.lock() = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_classification() {
        assert!(ErrorCode::SUCCESS.succeeded());
        assert!(ErrorCode::NOINTERFACE.failed());
        assert!(ErrorCode(1).succeeded());
    }

    #[test]
    fn test_get_error_info_status() {
        assert_eq!(unsafe { ct_get_error_info(core::ptr::null_mut()) }, ErrorCode::ARGUMENT_NULL);
    }

    #[test]
    fn test_code_display() {
        assert_eq!(ErrorCode::NOTFOUND.to_string(), "0x80000006 (NOTFOUND)");
        assert_eq!(ErrorCode(0x8000_1234).to_string(), "0x80001234");
        assert_eq!(format!("{:?}", ErrorCode::NOMEMORY), "NOMEMORY(0x80000000)");
    }
}
