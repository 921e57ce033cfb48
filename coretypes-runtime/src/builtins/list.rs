//! List type - ordered, mutable sequence of objects
//!
//! Design: items are held as `ObjRef`s behind a `RwLock`, so a list may be
//! shared between threads; every read hands out a fresh reference. An item
//! that already reaches the list is refused, so no list ever contains
//! itself, directly or through other containers.

use core::ptr;
use core::slice;

use parking_lot::RwLock;

use crate::abi::{core_type, InterfaceId, ListVTable, RawObject};
use crate::errors::{guarded, ErrorCode, NativeError, NativeResult};
use crate::ffi::object::{hash_bytes, HASH_SEED};
use crate::ffi::{borrow_arg, drop_object, out_param, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;
use crate::object_ref::ObjRef;

use super::{emit_new, emit_ref, reject_cycle};

/// Payload of a List object
#[derive(Debug, Default)]
pub struct ListData {
    items: RwLock<Vec<ObjRef>>,
}

impl ListData {
    pub fn new(items: Vec<ObjRef>) -> Self {
        Self { items: RwLock::new(items) }
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Copy of the current items (each with its own reference)
    pub fn snapshot(&self) -> Vec<ObjRef> {
        self.items.read().clone()
    }
}

static LIST_TYPE: TypeInfo = TypeInfo {
    name: "List",
    core_type: core_type::LIST,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::LIST],
    drop: drop_object::<ListData>,
    hash: list_hash,
    equals: list_equals,
    display: list_display,
};

static LIST_VTABLE: ListVTable = ListVTable {
    base: BASE_VTABLE,
    get_count: list_get_count,
    get_item_at: list_get_item_at,
    set_item_at: list_set_item_at,
    push_back: list_push_back,
    pop_back: list_pop_back,
    insert_at: list_insert_at,
    remove_at: list_remove_at,
    clear: list_clear,
};

impl Payload for ListData {
    type VTable = ListVTable;

    fn type_info() -> &'static TypeInfo {
        &LIST_TYPE
    }

    fn vtable() -> &'static ListVTable {
        &LIST_VTABLE
    }
}

/// Render an element the way containers show it (strings quoted)
pub(crate) fn element_display(item: &ObjRef) -> String {
    if item.core_type() == core_type::STRING {
        format!("\"{}\"", item.display())
    } else {
        item.display()
    }
}

unsafe fn list_hash(this: *mut RawObject) -> u64 {
    payload::<ListData>(this)
        .map(|d| {
            d.items
                .read()
                .iter()
                .fold(HASH_SEED, |h, item| hash_bytes(h, &item.hash_code().to_le_bytes()))
        })
        .unwrap_or(0)
}

unsafe fn list_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<ListData>(this), payload::<ListData>(other)) {
        (Ok(a), Ok(b)) => {
            let a = a.snapshot();
            let b = b.snapshot();
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.value_eq(y))
        }
        _ => false,
    }
}

unsafe fn list_display(this: *mut RawObject) -> String {
    payload::<ListData>(this)
        .map(|d| {
            let parts: Vec<String> = d.snapshot().iter().map(element_display).collect();
            format!("[{}]", parts.join(", "))
        })
        .unwrap_or_default()
}

unsafe extern "C" fn list_get_count(this: *mut RawObject, out: *mut usize) -> ErrorCode {
    guarded("list_get_count", || {
        let out = out_param(out)?;
        *out = payload::<ListData>(this)?.len();
        Ok(())
    })
}

unsafe extern "C" fn list_get_item_at(
    this: *mut RawObject,
    index: usize,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("list_get_item_at", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let items = payload::<ListData>(this)?.items.read();
        let item = items
            .get(index)
            .ok_or_else(|| NativeError::out_of_range(index, items.len()))?;
        emit_ref(out, item.clone());
        Ok(())
    })
}

unsafe extern "C" fn list_set_item_at(
    this: *mut RawObject,
    index: usize,
    item: *mut RawObject,
) -> ErrorCode {
    guarded("list_set_item_at", || {
        let data = payload::<ListData>(this)?;
        let item = borrow_arg(item, "item")?;
        reject_cycle(this, &item, "list")?;

        let old = {
            let mut items = data.items.write();
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or_else(|| NativeError::out_of_range(index, len))?;
            core::mem::replace(slot, item)
        };
        drop(old);
        Ok(())
    })
}

unsafe extern "C" fn list_push_back(this: *mut RawObject, item: *mut RawObject) -> ErrorCode {
    guarded("list_push_back", || {
        let data = payload::<ListData>(this)?;
        let item = borrow_arg(item, "item")?;
        reject_cycle(this, &item, "list")?;
        data.items.write().push(item);
        Ok(())
    })
}

unsafe extern "C" fn list_pop_back(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode {
    guarded("list_pop_back", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let item = payload::<ListData>(this)?
            .items
            .write()
            .pop()
            .ok_or_else(|| NativeError::new(ErrorCode::OUTOFRANGE, "pop from an empty list"))?;
        emit_ref(out, item);
        Ok(())
    })
}

unsafe extern "C" fn list_insert_at(
    this: *mut RawObject,
    index: usize,
    item: *mut RawObject,
) -> ErrorCode {
    guarded("list_insert_at", || {
        let data = payload::<ListData>(this)?;
        let item = borrow_arg(item, "item")?;
        reject_cycle(this, &item, "list")?;

        let mut items = data.items.write();
        if index > items.len() {
            return Err(NativeError::out_of_range(index, items.len()));
        }
        items.insert(index, item);
        Ok(())
    })
}

unsafe extern "C" fn list_remove_at(
    this: *mut RawObject,
    index: usize,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("list_remove_at", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let data = payload::<ListData>(this)?;

        let item = {
            let mut items = data.items.write();
            if index >= items.len() {
                return Err(NativeError::out_of_range(index, items.len()));
            }
            items.remove(index)
        };
        emit_ref(out, item);
        Ok(())
    })
}

unsafe extern "C" fn list_clear(this: *mut RawObject) -> ErrorCode {
    guarded("list_clear", || {
        let removed = core::mem::take(&mut *payload::<ListData>(this)?.items.write());
        drop(removed);
        Ok(())
    })
}

/// Take references to `count` caller-provided objects
pub(crate) unsafe fn borrow_items(
    items: *const *mut RawObject,
    count: usize,
) -> NativeResult<Vec<ObjRef>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if items.is_null() {
        return Err(NativeError::null_argument("items"));
    }

    slice::from_raw_parts(items, count)
        .iter()
        .map(|&item| borrow_arg(item, "item"))
        .collect()
}

/// Create a List object holding `count` items (each gains a reference)
#[no_mangle]
pub unsafe extern "C" fn ct_list_create(
    out: *mut *mut RawObject,
    items: *const *mut RawObject,
    count: usize,
) -> ErrorCode {
    guarded("list_create", || {
        out_param(out)?;
        let items = borrow_items(items, count)?;
        emit_new(out, ListData::new(items))
    })
}

/// Build a list object directly from references
pub(crate) fn new_list(items: Vec<ObjRef>) -> NativeResult<ObjRef> {
    super::new_ref(ListData::new(items))
}
