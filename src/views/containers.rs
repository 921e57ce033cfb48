//! List and Dict views
//!
//! Every handle handed out by these views owns its own reference.

use std::ptr;

use coretypes_runtime::abi::{DictVTable, InterfaceId, ListVTable};

use crate::error::{check, CoreResult};
use crate::handle::Handle;
use crate::view::{define_view, owned_result};

define_view!(
    /// View over an ordered, mutable List object
    ListView,
    ListVTable,
    InterfaceId::LIST
);

define_view!(
    /// View over an insertion-ordered Dict object
    DictView,
    DictVTable,
    InterfaceId::DICT
);

impl ListView {
    pub fn len(&self) -> CoreResult<usize> {
        let raw = self.raw()?;
        let mut out = 0;
        check(unsafe { (self.table.get_count)(raw, &mut out) }, "list_get_count")?;
        Ok(out)
    }

    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Item at `index`; out of range reports `OUTOFRANGE`
    pub fn get(&self, index: usize) -> CoreResult<Handle> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get_item_at)(raw, index, &mut out) }, "list_get_item_at")?;
        owned_result(out, "list_get_item_at")
    }

    pub fn set(&self, index: usize, item: &Handle) -> CoreResult<()> {
        let raw = self.raw()?;
        let item = item.raw()?;
        check(unsafe { (self.table.set_item_at)(raw, index, item) }, "list_set_item_at")
    }

    pub fn push_back(&self, item: &Handle) -> CoreResult<()> {
        let raw = self.raw()?;
        let item = item.raw()?;
        check(unsafe { (self.table.push_back)(raw, item) }, "list_push_back")
    }

    /// Remove and return the last item
    pub fn pop_back(&self) -> CoreResult<Handle> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.pop_back)(raw, &mut out) }, "list_pop_back")?;
        owned_result(out, "list_pop_back")
    }

    pub fn insert_at(&self, index: usize, item: &Handle) -> CoreResult<()> {
        let raw = self.raw()?;
        let item = item.raw()?;
        check(unsafe { (self.table.insert_at)(raw, index, item) }, "list_insert_at")
    }

    pub fn remove_at(&self, index: usize) -> CoreResult<Handle> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.remove_at)(raw, index, &mut out) }, "list_remove_at")?;
        owned_result(out, "list_remove_at")
    }

    pub fn clear(&self) -> CoreResult<()> {
        let raw = self.raw()?;
        check(unsafe { (self.table.clear)(raw) }, "list_clear")
    }

    pub fn iter(&self) -> CoreResult<ListIter<'_>> {
        Ok(ListIter { list: self, index: 0, len: self.len()? })
    }

    pub fn to_vec(&self) -> CoreResult<Vec<Handle>> {
        self.iter()?.collect()
    }
}

/// Iterator over the items a list held when iteration started
pub struct ListIter<'a> {
    list: &'a ListView,
    index: usize,
    len: usize,
}

impl Iterator for ListIter<'_> {
    type Item = CoreResult<Handle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let item = self.list.get(self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

/// Own a native list result as its items
fn list_items(out: *mut coretypes_runtime::abi::RawObject, operation: &'static str) -> CoreResult<Vec<Handle>> {
    owned_result(out, operation)?.query_as::<ListView>()?.to_vec()
}

impl DictView {
    pub fn len(&self) -> CoreResult<usize> {
        let raw = self.raw()?;
        let mut out = 0;
        check(unsafe { (self.table.get_count)(raw, &mut out) }, "dict_get_count")?;
        Ok(out)
    }

    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Value stored under `key`; a missing key reports `NOTFOUND`
    pub fn get(&self, key: &Handle) -> CoreResult<Handle> {
        let raw = self.raw()?;
        let key = key.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get)(raw, key, &mut out) }, "dict_get")?;
        owned_result(out, "dict_get")
    }

    /// Insert or replace; an existing key keeps its position
    pub fn set(&self, key: &Handle, value: &Handle) -> CoreResult<()> {
        let raw = self.raw()?;
        let key = key.raw()?;
        let value = value.raw()?;
        check(unsafe { (self.table.set)(raw, key, value) }, "dict_set")
    }

    /// Remove `key`, returning its value
    pub fn remove(&self, key: &Handle) -> CoreResult<Handle> {
        let raw = self.raw()?;
        let key = key.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.remove)(raw, key, &mut out) }, "dict_remove")?;
        owned_result(out, "dict_remove")
    }

    pub fn has_key(&self, key: &Handle) -> CoreResult<bool> {
        let raw = self.raw()?;
        let key = key.raw()?;
        let mut out = false;
        check(unsafe { (self.table.has_key)(raw, key, &mut out) }, "dict_has_key")?;
        Ok(out)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> CoreResult<Vec<Handle>> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get_keys)(raw, &mut out) }, "dict_get_keys")?;
        list_items(out, "dict_get_keys")
    }

    /// Values in key insertion order
    pub fn values(&self) -> CoreResult<Vec<Handle>> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get_values)(raw, &mut out) }, "dict_get_values")?;
        list_items(out, "dict_get_values")
    }

    pub fn entries(&self) -> CoreResult<Vec<(Handle, Handle)>> {
        Ok(self.keys()?.into_iter().zip(self.values()?).collect())
    }

    pub fn clear(&self) -> CoreResult<()> {
        let raw = self.raw()?;
        check(unsafe { (self.table.clear)(raw) }, "dict_clear")
    }
}
