//! Error taxonomy of the binding layer
//!
//! Every failure carries an `ErrorCode`: the native status verbatim, or a
//! synthesised code for conditions detected before any native call.

use std::borrow::Cow;
use std::fmt;

use coretypes_runtime::ErrorCode;

use crate::core_type::CoreType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The handle is empty; detected before any native call
    NullHandle,
    /// The object does not implement the requested view's capability set
    CastFailed {
        code: ErrorCode,
        requested: &'static str,
        actual: CoreType,
    },
    /// The native core reported a failure for a well-formed request
    OperationFailed {
        code: ErrorCode,
        operation: &'static str,
    },
    /// The native core could not allocate the new object
    AllocationFailed { code: ErrorCode, kind: CoreType },
    /// The raw value is structurally invalid for the requested kind
    InvalidArgument {
        code: ErrorCode,
        reason: Cow<'static, str>,
    },
    /// The handle was already released
    UseAfterRelease,
    /// The object's tag has no typed view
    UnsupportedType(CoreType),
}

impl CoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NullHandle => ErrorCode::ARGUMENT_NULL,
            CoreError::CastFailed { code, .. }
            | CoreError::OperationFailed { code, .. }
            | CoreError::AllocationFailed { code, .. }
            | CoreError::InvalidArgument { code, .. } => *code,
            CoreError::UseAfterRelease | CoreError::UnsupportedType(_) => ErrorCode::INVALIDTYPE,
        }
    }

    /// Argument rejected by the binding before reaching the native core
    pub fn invalid_argument(reason: impl Into<Cow<'static, str>>) -> Self {
        CoreError::InvalidArgument {
            code: ErrorCode::INVALIDPARAMETER,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::NullHandle => write!(f, "Null handle"),
            CoreError::CastFailed { code, requested, actual } => {
                write!(f, "Cannot cast {} object to {}: {}", actual, requested, code)
            }
            CoreError::OperationFailed { code, operation } => {
                write!(f, "Native operation '{}' failed: {}", operation, code)
            }
            CoreError::AllocationFailed { code, kind } => {
                write!(f, "Failed to allocate {} object: {}", kind, code)
            }
            CoreError::InvalidArgument { code, reason } => {
                write!(f, "Invalid argument: {} ({})", reason, code)
            }
            CoreError::UseAfterRelease => write!(f, "Handle used after release"),
            CoreError::UnsupportedType(tag) => write!(f, "No typed view for {} objects", tag),
        }
    }
}

impl std::error::Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;

/// Status-returning construction result: never an error value
pub type Status<T> = (ErrorCode, Option<T>);

/// Turn a strict result into the status-returning form
pub trait StatusExt<T> {
    fn into_status(self) -> Status<T>;
}

impl<T> StatusExt<T> for CoreResult<T> {
    fn into_status(self) -> Status<T> {
        match self {
            Ok(value) => (ErrorCode::SUCCESS, Some(value)),
            Err(err) => (err.code(), None),
        }
    }
}

/// Check the status of a native operation
#[inline]
pub(crate) fn check(code: ErrorCode, operation: &'static str) -> CoreResult<()> {
    if code.succeeded() {
        Ok(())
    } else {
        Err(CoreError::OperationFailed { code, operation })
    }
}

/// Check the status of a native factory call
pub(crate) fn check_create(code: ErrorCode, kind: CoreType, operation: &'static str) -> CoreResult<()> {
    if code.succeeded() {
        return Ok(());
    }

    Err(match code {
        ErrorCode::NOMEMORY => CoreError::AllocationFailed { code, kind },
        ErrorCode::INVALIDPARAMETER | ErrorCode::ARGUMENT_NULL => CoreError::InvalidArgument {
            code,
            reason: format!("{} rejected the {} value", operation, kind).into(),
        },
        _ => CoreError::OperationFailed { code, operation },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesised_codes() {
        assert_eq!(CoreError::NullHandle.code(), ErrorCode::ARGUMENT_NULL);
        assert_eq!(CoreError::UseAfterRelease.code(), ErrorCode::INVALIDTYPE);
        assert_eq!(
            CoreError::UnsupportedType(CoreType::BinaryData).code(),
            ErrorCode::INVALIDTYPE
        );
        assert_eq!(CoreError::invalid_argument("x").code(), ErrorCode::INVALIDPARAMETER);
    }

    #[test]
    fn test_factory_status_mapping() {
        let err = check_create(ErrorCode::NOMEMORY, CoreType::Int, "integer_create").unwrap_err();
        assert!(matches!(err, CoreError::AllocationFailed { kind: CoreType::Int, .. }));

        let err = check_create(ErrorCode::ARGUMENT_NULL, CoreType::List, "list_create").unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { code: ErrorCode::ARGUMENT_NULL, .. }));

        let err = check_create(ErrorCode::GENERALERROR, CoreType::Dict, "dict_create").unwrap_err();
        assert!(matches!(err, CoreError::OperationFailed { operation: "dict_create", .. }));

        assert!(check_create(ErrorCode::SUCCESS, CoreType::Int, "integer_create").is_ok());
    }

    #[test]
    fn test_into_status() {
        let ok: CoreResult<i32> = Ok(5);
        assert_eq!(ok.into_status(), (ErrorCode::SUCCESS, Some(5)));

        let err: CoreResult<i32> = Err(CoreError::NullHandle);
        assert_eq!(err.into_status(), (ErrorCode::ARGUMENT_NULL, None));
    }

    #[test]
    fn test_display() {
        let err = CoreError::OperationFailed {
            code: ErrorCode::OUTOFRANGE,
            operation: "list_get_item_at",
        };
        assert_eq!(
            err.to_string(),
            "Native operation 'list_get_item_at' failed: 0x80000005 (OUTOFRANGE)"
        );
    }
}
