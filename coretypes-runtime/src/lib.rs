//! coretypes runtime - in-process native core for the Core Types object model
//!
//! Every object is reference counted and starts with a pointer to its
//! operation table. Callers drive it exclusively through the `extern "C"`
//! entry points and the tables described in [`abi`].

pub mod abi;
pub mod builtins;
pub mod errors;
pub mod ffi;
pub mod header;
pub mod logging;
pub mod object_ref;

pub use abi::{core_type, InterfaceId, RawObject};
pub use builtins::*;
pub use errors::{ct_clear_error_info, ct_get_error_info, last_error, ErrorCode, ErrorRecord};
pub use ffi::{ct_add_ref, ct_free_string, ct_ref_count, ct_release, stats, RuntimeStats};
pub use object_ref::ObjRef;

#[cfg(feature = "fault-injection")]
pub use ffi::fail_next_allocations;

/// Runtime initialization
#[no_mangle]
pub extern "C" fn ct_runtime_init() {
    logging::log_runtime_init(env!("CARGO_PKG_VERSION"));
}

/// Runtime cleanup; reports objects that are still alive
#[no_mangle]
pub extern "C" fn ct_runtime_cleanup() {
    let live = stats().live_objects();
    if live > 0 {
        logging::warn!(target: "runtime", live, "objects still alive at shutdown");
    }
    logging::log_runtime_shutdown(live);
}
