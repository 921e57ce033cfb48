//! Dict type - insertion-ordered key/value mapping
//!
//! Design: entries live in a `Vec` in insertion order. Keys match by hash
//! code and then value equality; setting an existing key replaces its value
//! in place, so the last write wins and the key keeps its position. Keys
//! and values that already reach the dict are refused.

use core::ptr;
use core::slice;

use parking_lot::RwLock;

use crate::abi::{core_type, DictVTable, InterfaceId, RawObject};
use crate::errors::{guarded, ErrorCode, NativeError, NativeResult};
use crate::ffi::{borrow_arg, drop_object, out_param, payload, Payload, BASE_VTABLE};
use crate::header::TypeInfo;
use crate::object_ref::ObjRef;

use super::list::{element_display, new_list};
use super::{emit_new, emit_ref, reject_cycle};

/// Payload of a Dict object
#[derive(Debug, Default)]
pub struct DictData {
    entries: RwLock<Vec<(ObjRef, ObjRef)>>,
}

// `hash` is computed by the caller before any lock on the entries is taken
fn position(entries: &[(ObjRef, ObjRef)], key: &ObjRef, hash: u64) -> Option<usize> {
    entries
        .iter()
        .position(|(k, _)| k.hash_code() == hash && k.value_eq(key))
}

impl DictData {
    /// Build from pairs; later duplicates overwrite earlier ones
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ObjRef, ObjRef)>) -> Self {
        let data = Self::default();
        for (key, value) in pairs {
            data.insert(key, value);
        }
        data
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Insert or replace, returning the previous value
    pub fn insert(&self, key: ObjRef, value: ObjRef) -> Option<ObjRef> {
        let hash = key.hash_code();
        let mut entries = self.entries.write();
        match position(&entries, &key, hash) {
            Some(i) => Some(core::mem::replace(&mut entries[i].1, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    pub fn lookup(&self, key: &ObjRef) -> Option<ObjRef> {
        let hash = key.hash_code();
        let entries = self.entries.read();
        position(&entries, key, hash).map(|i| entries[i].1.clone())
    }

    pub fn contains_key(&self, key: &ObjRef) -> bool {
        let hash = key.hash_code();
        position(&self.entries.read(), key, hash).is_some()
    }

    pub fn remove(&self, key: &ObjRef) -> Option<(ObjRef, ObjRef)> {
        let hash = key.hash_code();
        let mut entries = self.entries.write();
        position(&entries, key, hash).map(|i| entries.remove(i))
    }

    pub fn snapshot(&self) -> Vec<(ObjRef, ObjRef)> {
        self.entries.read().clone()
    }
}

static DICT_TYPE: TypeInfo = TypeInfo {
    name: "Dict",
    core_type: core_type::DICT,
    interfaces: &[InterfaceId::BASE_OBJECT, InterfaceId::CORE_TYPE, InterfaceId::DICT],
    drop: drop_object::<DictData>,
    hash: dict_hash,
    equals: dict_equals,
    display: dict_display,
};

static DICT_VTABLE: DictVTable = DictVTable {
    base: BASE_VTABLE,
    get_count: dict_get_count,
    get: dict_get,
    set: dict_set,
    remove: dict_remove,
    has_key: dict_has_key,
    get_keys: dict_get_keys,
    get_values: dict_get_values,
    clear: dict_clear,
};

impl Payload for DictData {
    type VTable = DictVTable;

    fn type_info() -> &'static TypeInfo {
        &DICT_TYPE
    }

    fn vtable() -> &'static DictVTable {
        &DICT_VTABLE
    }
}

// Order independent, matching equality
unsafe fn dict_hash(this: *mut RawObject) -> u64 {
    payload::<DictData>(this)
        .map(|d| {
            d.snapshot()
                .iter()
                .fold(0u64, |h, (k, v)| h ^ k.hash_code().wrapping_add(v.hash_code().rotate_left(17)))
        })
        .unwrap_or(0)
}

unsafe fn dict_equals(this: *mut RawObject, other: *mut RawObject) -> bool {
    match (payload::<DictData>(this), payload::<DictData>(other)) {
        (Ok(a), Ok(b)) => {
            let a = a.snapshot();
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.lookup(k).map_or(false, |other| other.value_eq(v)))
        }
        _ => false,
    }
}

unsafe fn dict_display(this: *mut RawObject) -> String {
    payload::<DictData>(this)
        .map(|d| {
            let parts: Vec<String> = d
                .snapshot()
                .iter()
                .map(|(k, v)| format!("{}: {}", element_display(k), element_display(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        })
        .unwrap_or_default()
}

fn not_found(key: &ObjRef) -> NativeError {
    NativeError::new(ErrorCode::NOTFOUND, format!("key {} not found", element_display(key)))
}

unsafe extern "C" fn dict_get_count(this: *mut RawObject, out: *mut usize) -> ErrorCode {
    guarded("dict_get_count", || {
        let out = out_param(out)?;
        *out = payload::<DictData>(this)?.len();
        Ok(())
    })
}

unsafe extern "C" fn dict_get(
    this: *mut RawObject,
    key: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("dict_get", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let data = payload::<DictData>(this)?;
        let key = borrow_arg(key, "key")?;
        let value = data.lookup(&key).ok_or_else(|| not_found(&key))?;
        emit_ref(out, value);
        Ok(())
    })
}

unsafe extern "C" fn dict_set(
    this: *mut RawObject,
    key: *mut RawObject,
    value: *mut RawObject,
) -> ErrorCode {
    guarded("dict_set", || {
        let data = payload::<DictData>(this)?;
        let key = borrow_arg(key, "key")?;
        let value = borrow_arg(value, "value")?;
        reject_cycle(this, &key, "dict")?;
        reject_cycle(this, &value, "dict")?;
        drop(data.insert(key, value));
        Ok(())
    })
}

unsafe extern "C" fn dict_remove(
    this: *mut RawObject,
    key: *mut RawObject,
    out: *mut *mut RawObject,
) -> ErrorCode {
    guarded("dict_remove", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let data = payload::<DictData>(this)?;
        let key = borrow_arg(key, "key")?;

        let (_, value) = data.remove(&key).ok_or_else(|| not_found(&key))?;
        emit_ref(out, value);
        Ok(())
    })
}

unsafe extern "C" fn dict_has_key(
    this: *mut RawObject,
    key: *mut RawObject,
    out: *mut bool,
) -> ErrorCode {
    guarded("dict_has_key", || {
        let out = out_param(out)?;
        let data = payload::<DictData>(this)?;
        let key = borrow_arg(key, "key")?;
        *out = data.contains_key(&key);
        Ok(())
    })
}

unsafe extern "C" fn dict_get_keys(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode {
    guarded("dict_get_keys", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let keys = payload::<DictData>(this)?.snapshot().into_iter().map(|(k, _)| k).collect();
        emit_ref(out, new_list(keys)?);
        Ok(())
    })
}

unsafe extern "C" fn dict_get_values(this: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode {
    guarded("dict_get_values", || {
        let out = out_param(out)?;
        *out = ptr::null_mut();
        let values = payload::<DictData>(this)?.snapshot().into_iter().map(|(_, v)| v).collect();
        emit_ref(out, new_list(values)?);
        Ok(())
    })
}

unsafe extern "C" fn dict_clear(this: *mut RawObject) -> ErrorCode {
    guarded("dict_clear", || {
        let removed = core::mem::take(&mut *payload::<DictData>(this)?.entries.write());
        drop(removed);
        Ok(())
    })
}

unsafe fn borrow_pairs(
    keys: *const *mut RawObject,
    values: *const *mut RawObject,
    count: usize,
) -> NativeResult<Vec<(ObjRef, ObjRef)>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if keys.is_null() {
        return Err(NativeError::null_argument("keys"));
    }
    if values.is_null() {
        return Err(NativeError::null_argument("values"));
    }

    let keys = slice::from_raw_parts(keys, count);
    let values = slice::from_raw_parts(values, count);
    keys.iter()
        .zip(values)
        .map(|(&k, &v)| -> NativeResult<(ObjRef, ObjRef)> {
            Ok((borrow_arg(k, "key")?, borrow_arg(v, "value")?))
        })
        .collect()
}

/// Create a Dict object from `count` parallel keys and values
#[no_mangle]
pub unsafe extern "C" fn ct_dict_create(
    out: *mut *mut RawObject,
    keys: *const *mut RawObject,
    values: *const *mut RawObject,
    count: usize,
) -> ErrorCode {
    guarded("dict_create", || {
        out_param(out)?;
        let pairs = borrow_pairs(keys, values, count)?;
        emit_new(out, DictData::from_pairs(pairs))
    })
}

/// Build a dict object directly from references
pub(crate) fn new_dict(pairs: Vec<(ObjRef, ObjRef)>) -> NativeResult<ObjRef> {
    super::new_ref(DictData::from_pairs(pairs))
}
