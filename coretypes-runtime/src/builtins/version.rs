//! VersionInfo objects and the runtime's own version

use crate::abi::{core_type, InterfaceId, RawObject, VersionInfoVTable};
use crate::errors::{guarded, ErrorCode};
use crate::ffi::{drop_object, out_param, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;

use super::emit_new;

/// Payload of a VersionInfo object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionInfoData {
    pub major: usize,
    pub minor: usize,
    pub patch: usize,
}

static VERSION_INFO_TYPE: TypeInfo = TypeInfo {
    name: "VersionInfo",
    core_type: core_type::OBJECT,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::VERSION_INFO],
    drop: drop_object::<VersionInfoData>,
    hash: version_hash,
    equals: version_equals,
    display: version_display,
};

static VERSION_INFO_VTABLE: VersionInfoVTable = VersionInfoVTable {
    base: BASE_VTABLE,
    get_major: version_get_major,
    get_minor: version_get_minor,
    get_patch: version_get_patch,
};

impl Payload for VersionInfoData {
    type VTable = VersionInfoVTable;

    fn type_info() -> &'static TypeInfo {
        &VERSION_INFO_TYPE
    }

    fn vtable() -> &'static VersionInfoVTable {
        &VERSION_INFO_VTABLE
    }
}

unsafe fn version_hash(this: *mut RawObject) -> u64 {
    payload::<VersionInfoData>(this)
        .map(|d| ((d.major as u64) << 40) ^ ((d.minor as u64) << 20) ^ d.patch as u64)
        .unwrap_or(0)
}

unsafe fn version_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<VersionInfoData>(this), payload::<VersionInfoData>(other)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

unsafe fn version_display(this: *mut RawObject) -> String {
    payload::<VersionInfoData>(this)
        .map(|d| format!("{}.{}.{}", d.major, d.minor, d.patch))
        .unwrap_or_default()
}

unsafe extern "C" fn version_get_major(this: *mut RawObject, out: *mut usize) -> ErrorCode {
    guarded("version_get_major", || {
        let out = out_param(out)?;
        *out = payload::<VersionInfoData>(this)?.major;
        Ok(())
    })
}

unsafe extern "C" fn version_get_minor(this: *mut RawObject, out: *mut usize) -> ErrorCode {
    guarded("version_get_minor", || {
        let out = out_param(out)?;
        *out = payload::<VersionInfoData>(this)?.minor;
        Ok(())
    })
}

unsafe extern "C" fn version_get_patch(this: *mut RawObject, out: *mut usize) -> ErrorCode {
    guarded("version_get_patch", || {
        let out = out_param(out)?;
        *out = payload::<VersionInfoData>(this)?.patch;
        Ok(())
    })
}

/// Create a VersionInfo object
#[no_mangle]
pub unsafe extern "C" fn ct_version_info_create(
    out: *mut *mut RawObject,
    major: usize,
    minor: usize,
    patch: usize,
) -> ErrorCode {
    guarded("version_info_create", || {
        emit_new(out, VersionInfoData { major, minor, patch })
    })
}

/// Version of this runtime build
pub fn runtime_version() -> VersionInfoData {
    let part = |s: &str| s.parse().unwrap_or(0);
    VersionInfoData {
        major: part(env!("CARGO_PKG_VERSION_MAJOR")),
        minor: part(env!("CARGO_PKG_VERSION_MINOR")),
        patch: part(env!("CARGO_PKG_VERSION_PATCH")),
    }
}

/// Report the runtime version; null out-pointers are skipped
#[no_mangle]
pub unsafe extern "C" fn ct_core_types_get_version(
    major: *mut u32,
    minor: *mut u32,
    patch: *mut u32,
) {
    let version = runtime_version();
    for (out, value) in [(major, version.major), (minor, version.minor), (patch, version.patch)] {
        if let Some(out) = out.as_mut() {
            *out = u32::try_from(value).unwrap_or(u32::MAX);
        }
    }
}
