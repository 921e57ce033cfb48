//! coretypes - typed handles over the Core Types native object model
//!
//! Native objects are reference counted and carry a type tag. A [`Handle`]
//! owns one reference; [`Handle::query_as`] narrows it to a typed view after
//! the native core confirms the capability; the `create_*` factories build
//! new objects from raw values.
//!
//! ```no_run
//! use coretypes::{create_int, IntegerView};
//!
//! let handle = create_int(42)?;
//! let int = handle.query_as::<IntegerView>()?;
//! assert_eq!(int.value()?, 42);
//! # Ok::<(), coretypes::CoreError>(())
//! ```

// Core modules
pub mod core_type;
pub mod error;
pub mod factory;
pub mod handle;
pub mod registry;
pub mod version;
pub mod view;
pub mod views;

// Ambient
pub mod config;
pub mod diagnostics;
pub mod logging;

// Re-export commonly used items
pub use config::Config;
pub use core_type::CoreType;
pub use coretypes_runtime::ErrorCode;
pub use diagnostics::{clear_error_info, last_error_info, live_objects, ErrorInfo};
pub use error::{CoreError, CoreResult, Status, StatusExt};
pub use factory::{
    create_binary_data, create_bool, create_complex_number, create_dict, create_enumeration,
    create_float, create_function, create_int, create_list, create_primitive, create_procedure,
    create_ratio, create_string, create_string_from_bytes, create_struct, create_version_info,
    Primitive,
};
pub use handle::Handle;
pub use registry::{capability, supported_types, AnyView, Capability};
pub use version::{native_version, VersionTriple};
pub use view::{ScalarValue, View};
pub use views::*;

use tracing_appender::non_blocking::WorkerGuard;

/// Initialize logging and the native core from `config`
///
/// Checks the native version against `runtime.expected_version`; a mismatch
/// is logged as a warning, or as an error when `strict_version` is set.
/// Never fails: an unusable logging section falls back to the defaults.
pub fn init_with_config(config: &Config) -> Option<WorkerGuard> {
    let log_config = config.log_config().unwrap_or_else(|err| {
        eprintln!("coretypes: {}; using default logging", err);
        logging::LogConfig::default()
    });
    let guard = logging::init_logging(log_config);

    coretypes_runtime::ct_runtime_init();

    let actual = native_version();
    match config.runtime.expected_version {
        Some(expected) if !actual.is_compatible_with(&expected) => {
            if config.runtime.strict_version {
                tracing::error!(%expected, %actual, "incompatible native core version");
            } else {
                tracing::warn!(%expected, %actual, "native core version differs from expected");
            }
        }
        _ => tracing::debug!(version = %actual, "native core ready"),
    }

    guard
}

/// Initialize from the discovered `coretypes.toml` and the environment
pub fn init() -> Option<WorkerGuard> {
    init_with_config(&Config::discover().with_env_overrides())
}

/// Report objects still alive and shut the native core down
pub fn shutdown() {
    coretypes_runtime::ct_runtime_cleanup();
}
