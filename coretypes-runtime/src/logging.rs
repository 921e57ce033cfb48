//! Logging utilities for the coretypes runtime
//!
//! Lightweight event helpers for object lifetime, capability queries and
//! native failures. Installing a subscriber is left to the host.

// Re-export tracing macros for use throughout the runtime
pub use tracing::{debug, error, info, trace, warn, Level};

/// Log an object allocation
#[inline]
pub fn log_allocation(type_name: &str, size: usize, ptr: *const u8) {
    trace!(
        target: "objects",
        type_name,
        size,
        ptr = ?ptr,
        "object allocated"
    );
}

/// Log an object being freed after its last release
#[inline]
pub fn log_release(type_name: &str, ptr: *const u8) {
    trace!(
        target: "objects",
        type_name,
        ptr = ?ptr,
        "object freed"
    );
}

/// Log a rejected capability query
#[inline]
pub fn log_query_rejected(type_name: &str, iid: u32) {
    debug!(
        target: "objects",
        type_name,
        iid = format_args!("0x{:04X}", iid),
        "interface not implemented"
    );
}

/// Log a failed entry point
#[inline]
pub fn log_native_error(operation: &str, code: u32, message: &str) {
    debug!(
        target: "ffi",
        operation,
        code = format_args!("0x{:08X}", code),
        message,
        "native call failed"
    );
}

/// Log a callback that panicked across the boundary
#[inline]
pub fn log_callback_panic(operation: &str) {
    error!(
        target: "ffi",
        operation,
        "callback panicked"
    );
}

/// Log runtime initialization
#[inline]
pub fn log_runtime_init(version: &str) {
    info!(target: "runtime", version, "coretypes runtime initialized");
}

/// Log runtime shutdown
#[inline]
pub fn log_runtime_shutdown(live_objects: usize) {
    info!(target: "runtime", live_objects, "coretypes runtime shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_functions() {
        // These should not panic
        log_allocation("Integer", 32, std::ptr::null());
        log_release("Integer", std::ptr::null());
        log_query_rejected("Integer", 0x0104);
        log_native_error("list_get_item_at", 0x8000_0005, "index 3 is out of range");
        log_callback_panic("procedure_dispatch");
        log_runtime_init("0.1.0");
        log_runtime_shutdown(0);
    }
}
