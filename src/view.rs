//! Typed views over handles
//!
//! A view owns one `Handle` plus the operation table resolved from the
//! object's first word when the view was created. Views may alias the same
//! object; each holds its own reference.

use coretypes_runtime::abi::{BaseVTable, InterfaceId, OperationTable, RawObject};

use crate::error::CoreResult;
use crate::handle::Handle;
use crate::views::{BoolView, FloatView, IntegerView, StringView};

/// Capability set reachable through `Handle::query_as`
pub trait View: Sized {
    /// Operation table layout of this capability set
    type Table: OperationTable;
    /// Interface the native core is asked for
    const INTERFACE: InterfaceId;
    const NAME: &'static str;

    #[doc(hidden)]
    fn from_parts(handle: Handle, table: &'static Self::Table) -> Self;

    fn handle(&self) -> &Handle;
}

/// The untyped object view is the handle itself
impl View for Handle {
    type Table = BaseVTable;
    const INTERFACE: InterfaceId = InterfaceId::BASE_OBJECT;
    const NAME: &'static str = "Object";

    fn from_parts(handle: Handle, _table: &'static BaseVTable) -> Self {
        handle
    }

    fn handle(&self) -> &Handle {
        self
    }
}

macro_rules! define_view {
    ($(#[$meta:meta])* $name:ident, $table:ty, $iid:expr) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            handle: $crate::handle::Handle,
            table: &'static $table,
        }

        impl $crate::view::View for $name {
            type Table = $table;
            const INTERFACE: ::coretypes_runtime::abi::InterfaceId = $iid;
            const NAME: &'static str = stringify!($name);

            fn from_parts(handle: $crate::handle::Handle, table: &'static $table) -> Self {
                Self { handle, table }
            }

            fn handle(&self) -> &$crate::handle::Handle {
                &self.handle
            }
        }

        impl $name {
            pub fn into_handle(self) -> $crate::handle::Handle {
                self.handle
            }

            /// Give back the view's reference
            pub fn release(&mut self) -> $crate::error::CoreResult<()> {
                self.handle.release()
            }

            #[inline]
            #[allow(dead_code)]
            fn raw(&self) -> $crate::error::CoreResult<*mut ::coretypes_runtime::abi::RawObject> {
                self.handle.raw()
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::handle::Handle;

            fn deref(&self) -> &$crate::handle::Handle {
                &self.handle
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name)).field("handle", &self.handle).finish()
            }
        }
    };
}

pub(crate) use define_view;

/// Raw values accepted by `Handle::equals_value`
pub trait ScalarValue {
    type View: View;

    fn equals_in(self, view: &Self::View) -> CoreResult<bool>;
}

impl ScalarValue for bool {
    type View = BoolView;

    fn equals_in(self, view: &BoolView) -> CoreResult<bool> {
        view.equals_value(self)
    }
}

impl ScalarValue for i64 {
    type View = IntegerView;

    fn equals_in(self, view: &IntegerView) -> CoreResult<bool> {
        view.equals_value(self)
    }
}

impl ScalarValue for f64 {
    type View = FloatView;

    fn equals_in(self, view: &FloatView) -> CoreResult<bool> {
        view.equals_value(self)
    }
}

impl ScalarValue for &str {
    type View = StringView;

    fn equals_in(self, view: &StringView) -> CoreResult<bool> {
        view.equals_value(self)
    }
}

/// Own a reference returned through an out-parameter
pub(crate) fn owned_result(out: *mut RawObject, operation: &'static str) -> CoreResult<Handle> {
    if out.is_null() {
        return Err(crate::error::CoreError::OperationFailed {
            code: coretypes_runtime::ErrorCode::GENERALERROR,
            operation,
        });
    }
    Ok(unsafe { Handle::from_owned(out) })
}
