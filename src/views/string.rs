//! String view

use std::{ptr, slice};

use coretypes_runtime::abi::{InterfaceId, StringVTable};

use crate::error::{check, CoreError, CoreResult};
use crate::handle::Handle;
use crate::view::define_view;

define_view!(
    /// View over an immutable UTF-8 String object
    StringView,
    StringVTable,
    InterfaceId::STRING
);

impl StringView {
    /// Bytes of the string, borrowed from the native object
    pub fn as_bytes(&self) -> CoreResult<&[u8]> {
        let raw = self.raw()?;
        let mut data = ptr::null();
        let mut len = 0;
        check(unsafe { (self.table.get_bytes)(raw, &mut data, &mut len) }, "string_get_bytes")?;
        if len == 0 {
            return Ok(&[]);
        }
        // The bytes live as long as the object, which this view keeps alive
        Ok(unsafe { slice::from_raw_parts(data, len) })
    }

    pub fn value(&self) -> CoreResult<String> {
        let bytes = self.as_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CoreError::OperationFailed {
            code: coretypes_runtime::ErrorCode::INVALIDTYPE,
            operation: "string_get_bytes",
        })
    }

    pub fn to_string_lossy(&self) -> CoreResult<String> {
        Ok(String::from_utf8_lossy(self.as_bytes()?).into_owned())
    }

    /// Length in bytes
    pub fn len(&self) -> CoreResult<usize> {
        let raw = self.raw()?;
        let mut out = 0;
        check(unsafe { (self.table.get_length)(raw, &mut out) }, "string_get_length")?;
        Ok(out)
    }

    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Byte-wise equality with `value`
    pub fn equals_value(&self, value: &str) -> CoreResult<bool> {
        let raw = self.raw()?;
        let mut out = false;
        let code = unsafe { (self.table.equals_value)(raw, value.as_ptr(), value.len(), &mut out) };
        check(code, "string_equals_value")?;
        Ok(out)
    }
}

/// Read a handle that must hold a String
pub(crate) fn read_string(handle: &Handle) -> CoreResult<String> {
    handle.query_as::<StringView>()?.value()
}
