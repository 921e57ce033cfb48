//! VersionInfo and ErrorInfo views

use std::ptr;

use coretypes_runtime::abi::{ErrorInfoVTable, InterfaceId, VersionInfoVTable};
use coretypes_runtime::ErrorCode;

use crate::error::{check, CoreResult};
use crate::version::VersionTriple;
use crate::view::{define_view, owned_result};

use super::string::read_string;

define_view!(
    /// View over a VersionInfo object
    VersionInfoView,
    VersionInfoVTable,
    InterfaceId::VERSION_INFO
);

define_view!(
    /// View over the detailed failure kept by the native core
    ErrorInfoView,
    ErrorInfoVTable,
    InterfaceId::ERROR_INFO
);

impl VersionInfoView {
    pub fn major(&self) -> CoreResult<usize> {
        let raw = self.raw()?;
        let mut out = 0;
        check(unsafe { (self.table.get_major)(raw, &mut out) }, "version_get_major")?;
        Ok(out)
    }

    pub fn minor(&self) -> CoreResult<usize> {
        let raw = self.raw()?;
        let mut out = 0;
        check(unsafe { (self.table.get_minor)(raw, &mut out) }, "version_get_minor")?;
        Ok(out)
    }

    pub fn patch(&self) -> CoreResult<usize> {
        let raw = self.raw()?;
        let mut out = 0;
        check(unsafe { (self.table.get_patch)(raw, &mut out) }, "version_get_patch")?;
        Ok(out)
    }

    pub fn triple(&self) -> CoreResult<VersionTriple> {
        let part = |v: usize| u32::try_from(v).unwrap_or(u32::MAX);
        Ok(VersionTriple::new(part(self.major()?), part(self.minor()?), part(self.patch()?)))
    }
}

impl ErrorInfoView {
    pub fn code(&self) -> CoreResult<ErrorCode> {
        let raw = self.raw()?;
        let mut out = ErrorCode::SUCCESS;
        check(unsafe { (self.table.get_code)(raw, &mut out) }, "error_info_get_code")?;
        Ok(out)
    }

    pub fn message(&self) -> CoreResult<String> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get_message)(raw, &mut out) }, "error_info_get_message")?;
        read_string(&owned_result(out, "error_info_get_message")?)
    }
}
