//! Reference-counted handles to native objects
//!
//! A `Handle` owns exactly one native reference while it is Live. Cloning
//! adds a reference, dropping or `release` gives it back; the native core
//! frees the object when the last reference goes.

use std::ffi::CStr;
use std::fmt;
use std::ptr::{self, NonNull};

use coretypes_runtime::abi::{vtable_of, BaseVTable, InterfaceId, RawObject};
use coretypes_runtime::{ct_free_string, ct_ref_count, ErrorCode};

use crate::core_type::CoreType;
use crate::error::{check, CoreError, CoreResult};
use crate::view::{ScalarValue, View};

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Null,
    Live(NonNull<RawObject>),
    Released,
}

/// Owning reference to a native object
pub struct Handle {
    state: State,
}

/// Resolve the base operation table of a live object
///
/// # Safety
/// `obj` must be a live native object.
#[inline]
pub(crate) unsafe fn base_table<'a>(obj: *mut RawObject) -> &'a BaseVTable {
    &*vtable_of(obj)
}

impl Handle {
    /// Empty handle that never referred to an object
    pub const fn null() -> Self {
        Self { state: State::Null }
    }

    /// Adopt a reference the caller owns (null gives a Null handle)
    ///
    /// # Safety
    /// `ptr` must be null or a live native object whose reference is handed over.
    pub unsafe fn from_owned(ptr: *mut RawObject) -> Self {
        match NonNull::new(ptr) {
            Some(ptr) => Self { state: State::Live(ptr) },
            None => Self::null(),
        }
    }

    /// Take a new reference to a borrowed object
    ///
    /// # Safety
    /// `ptr` must be null or a live native object.
    pub unsafe fn from_borrowed(ptr: *mut RawObject) -> Self {
        if !ptr.is_null() {
            (base_table(ptr).add_ref)(ptr);
        }
        Self::from_owned(ptr)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.state == State::Null
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self.state, State::Live(_))
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.state == State::Released
    }

    /// Native address of a live handle
    pub(crate) fn raw(&self) -> CoreResult<*mut RawObject> {
        match self.state {
            State::Live(ptr) => Ok(ptr.as_ptr()),
            State::Null => Err(CoreError::NullHandle),
            State::Released => Err(CoreError::UseAfterRelease),
        }
    }

    /// Native address, or null when the handle is not Live
    pub fn as_raw(&self) -> *mut RawObject {
        self.raw().unwrap_or(ptr::null_mut())
    }

    /// Give up ownership of the native reference without releasing it
    pub fn into_raw(mut self) -> *mut RawObject {
        let raw = self.as_raw();
        self.state = State::Null;
        raw
    }

    /// Declared core type of the object
    pub fn core_type(&self) -> CoreResult<CoreType> {
        let raw = self.raw()?;
        let mut tag = CoreType::Undefined.as_raw();
        check(unsafe { (base_table(raw).get_core_type)(raw, &mut tag) }, "get_core_type")?;
        Ok(CoreType::from_raw(tag))
    }

    /// Current native reference count (diagnostics)
    pub fn ref_count(&self) -> CoreResult<u32> {
        Ok(unsafe { ct_ref_count(self.raw()?) })
    }

    /// Reinterpret the object as the view `T`
    ///
    /// The view owns a new reference; the native core has the final say on
    /// whether the object implements `T`'s capability set.
    pub fn query_as<T: View>(&self) -> CoreResult<T> {
        let raw = self.raw()?;
        let obj = self.query_interface(raw, T::INTERFACE).map_err(|code| {
            if code == ErrorCode::NOINTERFACE {
                CoreError::CastFailed {
                    code,
                    requested: T::NAME,
                    actual: self.core_type().unwrap_or(CoreType::Undefined),
                }
            } else {
                CoreError::OperationFailed { code, operation: "query_interface" }
            }
        })?;

        let table = unsafe { &*(vtable_of(obj) as *const T::Table) };
        Ok(T::from_parts(unsafe { Handle::from_owned(obj) }, table))
    }

    fn query_interface(&self, raw: *mut RawObject, iid: InterfaceId) -> Result<*mut RawObject, ErrorCode> {
        let mut out = ptr::null_mut();
        let code = unsafe { (base_table(raw).query_interface)(raw, iid, &mut out) };
        if code.failed() {
            return Err(code);
        }
        if out.is_null() {
            return Err(ErrorCode::GENERALERROR);
        }
        Ok(out)
    }

    /// Compare the stored scalar against a raw value
    ///
    /// The tag is not re-validated: an object of another kind reports
    /// `OperationFailed`.
    pub fn equals_value<V: ScalarValue>(&self, value: V) -> CoreResult<bool> {
        let view = self.query_as::<V::View>().map_err(|err| match err {
            CoreError::CastFailed { code, .. } => {
                CoreError::OperationFailed { code, operation: "equals_value" }
            }
            other => other,
        })?;
        value.equals_in(&view)
    }

    pub fn hash_code(&self) -> CoreResult<u64> {
        let raw = self.raw()?;
        let mut hash = 0;
        check(unsafe { (base_table(raw).get_hash_code)(raw, &mut hash) }, "get_hash_code")?;
        Ok(hash)
    }

    /// Native equality of two objects
    pub fn equals(&self, other: &Handle) -> CoreResult<bool> {
        let raw = self.raw()?;
        let other = other.raw()?;
        let mut eq = false;
        check(unsafe { (base_table(raw).equals)(raw, other, &mut eq) }, "equals")?;
        Ok(eq)
    }

    /// Whether both handles refer to the same native object
    pub fn same_object(&self, other: &Handle) -> bool {
        matches!((self.state, other.state), (State::Live(a), State::Live(b)) if a == b)
    }

    /// Textual form produced by the native core
    pub fn to_display_string(&self) -> CoreResult<String> {
        let raw = self.raw()?;
        let mut text = ptr::null_mut();
        check(unsafe { (base_table(raw).to_string)(raw, &mut text) }, "to_string")?;
        if text.is_null() {
            return Ok(String::new());
        }

        let owned = unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned();
        unsafe { ct_free_string(text) };
        Ok(owned)
    }

    /// Give back this handle's reference; the handle becomes Released
    pub fn release(&mut self) -> CoreResult<()> {
        let raw = self.raw()?;
        self.state = State::Released;
        unsafe { (base_table(raw).release)(raw) };
        Ok(())
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::null()
    }
}

impl Clone for Handle {
    fn clone(&self) -> Self {
        if let State::Live(ptr) = self.state {
            unsafe { (base_table(ptr.as_ptr()).add_ref)(ptr.as_ptr()) };
        }
        Self { state: self.state }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if let State::Live(ptr) = self.state {
            self.state = State::Released;
            unsafe { (base_table(ptr.as_ptr()).release)(ptr.as_ptr()) };
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            State::Null => f.write_str("Handle(null)"),
            State::Released => f.write_str("Handle(released)"),
            State::Live(ptr) => f
                .debug_struct("Handle")
                .field("ptr", &ptr)
                .field("core_type", &self.core_type().unwrap_or(CoreType::Undefined))
                .finish(),
        }
    }
}

// The native reference count is atomic and the core guards its own storage
unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}
