//! Tests for the built-in object kinds, driven through their operation tables

use core::ffi::c_void;
use core::ptr;
use std::ffi::CStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::abi::*;
use crate::errors::ErrorCode;
use crate::ffi::{ct_free_string, ct_ref_count, ct_release};

unsafe fn table<T>(obj: *mut RawObject) -> &'static T {
    &*(vtable_of(obj) as *const T)
}

fn check(code: ErrorCode) {
    assert_eq!(code, ErrorCode::SUCCESS);
}

fn int(value: i64) -> *mut RawObject {
    let mut out = ptr::null_mut();
    check(unsafe { ct_integer_create(&mut out, value) });
    out
}

fn string(value: &str) -> *mut RawObject {
    let mut out = ptr::null_mut();
    check(unsafe { ct_string_create(&mut out, value.as_ptr(), value.len()) });
    out
}

fn int_value(obj: *mut RawObject) -> i64 {
    let mut value = 0;
    unsafe { check((table::<IntegerVTable>(obj).get_value)(obj, &mut value)) };
    value
}

fn core_type_of(obj: *mut RawObject) -> u32 {
    let mut tag = u32::MAX;
    unsafe { check((table::<BaseVTable>(obj).get_core_type)(obj, &mut tag)) };
    tag
}

fn equals(a: *mut RawObject, b: *mut RawObject) -> bool {
    let mut eq = false;
    unsafe { check((table::<BaseVTable>(a).equals)(a, b, &mut eq)) };
    eq
}

fn to_string(obj: *mut RawObject) -> String {
    let mut raw = ptr::null_mut();
    unsafe {
        check((table::<BaseVTable>(obj).to_string)(obj, &mut raw));
        let text = CStr::from_ptr(raw).to_string_lossy().into_owned();
        ct_free_string(raw);
        text
    }
}

fn release(obj: *mut RawObject) {
    unsafe { ct_release(obj) };
}

#[test]
fn test_scalar_create_and_read() {
    let mut b = ptr::null_mut();
    check(unsafe { ct_boolean_create(&mut b, true) });
    let i = int(42);
    let mut f = ptr::null_mut();
    check(unsafe { ct_float_create(&mut f, 2.5) });

    assert_eq!(core_type_of(b), core_type::BOOL);
    assert_eq!(core_type_of(i), core_type::INT);
    assert_eq!(core_type_of(f), core_type::FLOAT);

    let mut bv = false;
    let mut fv = 0.0;
    unsafe {
        check((table::<BoolVTable>(b).get_value)(b, &mut bv));
        check((table::<FloatVTable>(f).get_value)(f, &mut fv));
    }
    assert!(bv);
    assert_eq!(int_value(i), 42);
    assert_eq!(fv, 2.5);

    for obj in [b, i, f] {
        assert_eq!(unsafe { ct_ref_count(obj) }, 1);
        release(obj);
    }
}

#[test]
fn test_equals_value() {
    let i = int(42);
    let mut eq = false;
    unsafe {
        check((table::<IntegerVTable>(i).equals_value)(i, 42, &mut eq));
        assert!(eq);
        check((table::<IntegerVTable>(i).equals_value)(i, 7, &mut eq));
        assert!(!eq);
    }
    release(i);

    let s = string("héllo");
    unsafe {
        let t = table::<StringVTable>(s);
        check((t.equals_value)(s, "héllo".as_ptr(), "héllo".len(), &mut eq));
        assert!(eq);
        check((t.equals_value)(s, "hello".as_ptr(), 5, &mut eq));
        assert!(!eq);
    }
    release(s);
}

#[test]
fn test_string_rejects_invalid_utf8() {
    let bytes = [0xFFu8, 0xFE];
    let mut out = ptr::null_mut();
    let code = unsafe { ct_string_create(&mut out, bytes.as_ptr(), bytes.len()) };
    assert_eq!(code, ErrorCode::INVALIDPARAMETER);
    assert!(out.is_null());

    let code = unsafe { ct_string_create(&mut out, ptr::null(), 3) };
    assert_eq!(code, ErrorCode::ARGUMENT_NULL);

    check(unsafe { ct_string_create(&mut out, ptr::null(), 0) });
    assert_eq!(to_string(out), "");
    release(out);
}

#[test]
fn test_query_interface() {
    let i = int(1);
    let base = unsafe { table::<BaseVTable>(i) };

    let mut view = ptr::null_mut();
    check(unsafe { (base.query_interface)(i, InterfaceId::INTEGER, &mut view) });
    assert_eq!(view, i);
    assert_eq!(unsafe { ct_ref_count(i) }, 2);
    release(view);

    let code = unsafe { (base.query_interface)(i, InterfaceId::STRING, &mut view) };
    assert_eq!(code, ErrorCode::NOINTERFACE);
    assert!(view.is_null());
    assert_eq!(unsafe { ct_ref_count(i) }, 1);
    release(i);
}

#[test]
fn test_value_equality_across_kinds() {
    let a = int(3);
    let b = int(3);
    let mut f = ptr::null_mut();
    check(unsafe { ct_float_create(&mut f, 3.0) });

    assert!(equals(a, b));
    assert!(!equals(a, f));

    let mut h1 = 0;
    let mut h2 = 0;
    unsafe {
        check((table::<BaseVTable>(a).get_hash_code)(a, &mut h1));
        check((table::<BaseVTable>(b).get_hash_code)(b, &mut h2));
    }
    assert_eq!(h1, h2);

    for obj in [a, b, f] {
        release(obj);
    }
}

#[test]
fn test_ratio() {
    let mut r = ptr::null_mut();
    assert_eq!(unsafe { ct_ratio_create(&mut r, 1, 0) }, ErrorCode::INVALIDPARAMETER);
    assert!(r.is_null());

    check(unsafe { ct_ratio_create(&mut r, 1, 2) });
    let mut q = ptr::null_mut();
    check(unsafe { ct_ratio_create(&mut q, 2, 4) });
    assert!(equals(r, q));
    assert_eq!(to_string(q), "2/4");

    let mut den = 0;
    unsafe { check((table::<RatioVTable>(q).get_denominator)(q, &mut den)) };
    assert_eq!(den, 4);

    release(r);
    release(q);
}

#[test]
fn test_list_operations() {
    let a = int(1);
    let b = int(2);
    let items = [a, b];
    let mut list = ptr::null_mut();
    check(unsafe { ct_list_create(&mut list, items.as_ptr(), items.len()) });
    assert_eq!(unsafe { ct_ref_count(a) }, 2);

    let t = unsafe { table::<ListVTable>(list) };
    let mut count = 0;
    unsafe {
        check((t.get_count)(list, &mut count));
        assert_eq!(count, 2);

        let mut item = ptr::null_mut();
        check((t.get_item_at)(list, 1, &mut item));
        assert_eq!(int_value(item), 2);
        release(item);

        assert_eq!((t.get_item_at)(list, 5, &mut item), ErrorCode::OUTOFRANGE);
        assert!(item.is_null());

        let c = int(3);
        check((t.insert_at)(list, 0, c));
        release(c);
        assert_eq!(to_string(list), "[3, 1, 2]");

        check((t.remove_at)(list, 1, &mut item));
        assert_eq!(int_value(item), 1);
        release(item);

        check((t.pop_back)(list, &mut item));
        assert_eq!(int_value(item), 2);
        release(item);

        assert_eq!((t.push_back)(list, list), ErrorCode::INVALIDPARAMETER);
        assert_eq!((t.push_back)(list, ptr::null_mut()), ErrorCode::ARGUMENT_NULL);

        check((t.clear)(list));
        assert_eq!((t.pop_back)(list, &mut item), ErrorCode::OUTOFRANGE);
    }

    release(list);
    assert_eq!(unsafe { ct_ref_count(a) }, 1);
    assert_eq!(unsafe { ct_ref_count(b) }, 1);
    release(a);
    release(b);
}

#[test]
fn test_list_rejects_null_item() {
    let a = int(1);
    let items = [a, ptr::null_mut()];
    let mut list = ptr::null_mut();
    let code = unsafe { ct_list_create(&mut list, items.as_ptr(), items.len()) };
    assert_eq!(code, ErrorCode::ARGUMENT_NULL);
    assert!(list.is_null());
    assert_eq!(unsafe { ct_ref_count(a) }, 1);
    release(a);
}

#[test]
fn test_containers_refuse_indirect_cycles() {
    let mut outer = ptr::null_mut();
    check(unsafe { ct_list_create(&mut outer, ptr::null(), 0) });
    let mut inner = ptr::null_mut();
    check(unsafe { ct_list_create(&mut inner, &outer, 1) });
    let mut dict = ptr::null_mut();
    check(unsafe { ct_dict_create(&mut dict, ptr::null(), ptr::null(), 0) });

    let name = string("Wrapper");
    let field = string("inner");
    let mut fields = ptr::null_mut();
    check(unsafe { ct_dict_create(&mut fields, &field, &inner, 1) });
    let mut record = ptr::null_mut();
    check(unsafe { ct_struct_create(&mut record, name, fields) });

    let lt = unsafe { table::<ListVTable>(outer) };
    let dt = unsafe { table::<DictVTable>(dict) };
    unsafe {
        // outer -> inner -> outer
        assert_eq!((lt.push_back)(outer, inner), ErrorCode::INVALIDPARAMETER);
        assert_eq!((lt.insert_at)(outer, 0, inner), ErrorCode::INVALIDPARAMETER);
        // through a struct field
        assert_eq!((lt.push_back)(outer, record), ErrorCode::INVALIDPARAMETER);

        // a list holding the dict, used as key or value of that dict
        let mut holder = ptr::null_mut();
        check(ct_list_create(&mut holder, &dict, 1));
        let one = int(1);
        assert_eq!((dt.set)(dict, holder, one), ErrorCode::INVALIDPARAMETER);
        assert_eq!((dt.set)(dict, one, holder), ErrorCode::INVALIDPARAMETER);
        check((dt.set)(dict, one, inner));

        let mut count = 0;
        check((lt.get_count)(outer, &mut count));
        assert_eq!(count, 0);
        assert_eq!(to_string(dict), "{1: [[]]}");

        // shared children without a cycle stay allowed
        check((lt.push_back)(outer, one));
        check((lt.push_back)(outer, one));
        check((lt.insert_at)(outer, 0, name));
        assert_eq!(to_string(outer), "[\"Wrapper\", 1, 1]");

        // outer -> dict -> inner -> outer
        assert_eq!((lt.set_item_at)(outer, 0, dict), ErrorCode::INVALIDPARAMETER);
        release(holder);
        release(one);
    }

    for obj in [record, fields, name, field, dict, inner, outer] {
        release(obj);
    }
}

#[test]
fn test_dict_last_write_wins() {
    let k = string("k");
    let k2 = string("k");
    let x = string("x");
    let y = string("y");
    let keys = [k, k2];
    let values = [x, y];

    let mut dict = ptr::null_mut();
    check(unsafe { ct_dict_create(&mut dict, keys.as_ptr(), values.as_ptr(), 2) });
    let t = unsafe { table::<DictVTable>(dict) };

    unsafe {
        let mut count = 0;
        check((t.get_count)(dict, &mut count));
        assert_eq!(count, 1);

        let mut value = ptr::null_mut();
        check((t.get)(dict, k2, &mut value));
        assert!(equals(value, y));
        release(value);

        let missing = string("missing");
        assert_eq!((t.get)(dict, missing, &mut value), ErrorCode::NOTFOUND);
        let mut has = true;
        check((t.has_key)(dict, missing, &mut has));
        assert!(!has);
        release(missing);

        let mut keys_list = ptr::null_mut();
        check((t.get_keys)(dict, &mut keys_list));
        assert_eq!(core_type_of(keys_list), core_type::LIST);
        assert_eq!(to_string(keys_list), "[\"k\"]");
        release(keys_list);

        check((t.remove)(dict, k, &mut value));
        assert!(equals(value, y));
        release(value);
        assert_eq!((t.remove)(dict, k, &mut value), ErrorCode::NOTFOUND);
    }

    release(dict);
    for obj in [k, k2, x, y] {
        assert_eq!(unsafe { ct_ref_count(obj) }, 1);
        release(obj);
    }
}

#[test]
fn test_struct_fields() {
    let name = string("Point");
    let fx = string("x");
    let fy = string("y");
    let vx = int(1);
    let vy = int(2);
    let mut fields = ptr::null_mut();
    check(unsafe { ct_dict_create(&mut fields, [fx, fy].as_ptr(), [vx, vy].as_ptr(), 2) });

    let mut s = ptr::null_mut();
    check(unsafe { ct_struct_create(&mut s, name, fields) });
    assert_eq!(core_type_of(s), core_type::STRUCT);
    assert_eq!(to_string(s), "Point {x: 1, y: 2}");

    let t = unsafe { table::<StructVTable>(s) };
    unsafe {
        let mut value = ptr::null_mut();
        check((t.get)(s, fy, &mut value));
        assert_eq!(int_value(value), 2);
        release(value);

        let z = string("z");
        assert_eq!((t.get)(s, z, &mut value), ErrorCode::NOTFOUND);
        release(z);

        let mut as_dict = ptr::null_mut();
        check((t.get_as_dictionary)(s, &mut as_dict));
        assert!(equals(as_dict, fields));
        release(as_dict);
    }

    // Non-string field names are rejected
    let mut bad_fields = ptr::null_mut();
    check(unsafe { ct_dict_create(&mut bad_fields, [vx].as_ptr(), [vy].as_ptr(), 1) });
    let mut bad = ptr::null_mut();
    assert_eq!(unsafe { ct_struct_create(&mut bad, name, bad_fields) }, ErrorCode::INVALIDPARAMETER);
    assert!(bad.is_null());

    for obj in [s, bad_fields, fields, name, fx, fy, vx, vy] {
        release(obj);
    }
}

#[test]
fn test_enumeration() {
    let type_name = string("Color");
    let value = string("Green");
    let mut e = ptr::null_mut();
    check(unsafe { ct_enumeration_create(&mut e, type_name, value, 1) });
    assert_eq!(to_string(e), "Color::Green");

    let mut int_value = 0;
    unsafe { check((table::<EnumerationVTable>(e).get_int_value)(e, &mut int_value)) };
    assert_eq!(int_value, 1);

    let one = int(1);
    let mut bad = ptr::null_mut();
    let code = unsafe { ct_enumeration_create(&mut bad, type_name, one, 1) };
    assert_eq!(code, ErrorCode::INVALIDPARAMETER);

    for obj in [e, type_name, value, one] {
        release(obj);
    }
}

static DROPS: AtomicUsize = AtomicUsize::new(0);

unsafe extern "C" fn add_one(_context: *mut c_void, params: *mut RawObject, out: *mut *mut RawObject) -> ErrorCode {
    ct_integer_create(out, int_value(params) + 1)
}

unsafe extern "C" fn reject(_context: *mut c_void, _params: *mut RawObject) -> ErrorCode {
    ErrorCode::NOTIMPLEMENTED
}

unsafe extern "C" fn count_drop(_context: *mut c_void) {
    DROPS.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn test_callables() {
    let mut func = ptr::null_mut();
    check(unsafe { ct_function_create(&mut func, Some(add_one), ptr::null_mut(), Some(count_drop)) });
    assert_eq!(core_type_of(func), core_type::FUNC);

    let arg = int(41);
    let mut result = ptr::null_mut();
    unsafe { check((table::<FunctionVTable>(func).call)(func, arg, &mut result)) };
    assert_eq!(int_value(result), 42);
    release(result);
    release(arg);

    let mut procedure = ptr::null_mut();
    check(unsafe { ct_procedure_create(&mut procedure, Some(reject), ptr::null_mut(), Some(count_drop)) });
    let code = unsafe { (table::<ProcedureVTable>(procedure).dispatch)(procedure, ptr::null_mut()) };
    assert_eq!(code, ErrorCode::NOTIMPLEMENTED);

    let before = DROPS.load(Ordering::SeqCst);
    release(func);
    release(procedure);
    assert_eq!(DROPS.load(Ordering::SeqCst), before + 2);

    // The context is released even when creation fails
    let mut missing = ptr::null_mut();
    let code = unsafe { ct_procedure_create(&mut missing, None, ptr::null_mut(), Some(count_drop)) };
    assert_eq!(code, ErrorCode::ARGUMENT_NULL);
    assert_eq!(DROPS.load(Ordering::SeqCst), before + 3);
}

#[test]
fn test_binary_and_complex_expose_base_table_only() {
    let bytes = [1u8, 2, 3];
    let mut bin = ptr::null_mut();
    check(unsafe { ct_binary_data_create(&mut bin, bytes.as_ptr(), bytes.len()) });
    assert_eq!(core_type_of(bin), core_type::BINARY_DATA);
    assert_eq!(to_string(bin), "<3 bytes>");

    let mut c = ptr::null_mut();
    check(unsafe { ct_complex_number_create(&mut c, 1.0, -2.0) });
    assert_eq!(core_type_of(c), core_type::COMPLEX_NUMBER);
    assert_eq!(to_string(c), "(1-2i)");

    let mut view = ptr::null_mut();
    let code = unsafe { (table::<BaseVTable>(c).query_interface)(c, InterfaceId::FLOAT, &mut view) };
    assert_eq!(code, ErrorCode::NOINTERFACE);

    release(bin);
    release(c);
}

#[test]
fn test_version() {
    let (mut major, mut minor, mut patch) = (u32::MAX, u32::MAX, u32::MAX);
    unsafe { ct_core_types_get_version(&mut major, &mut minor, &mut patch) };
    let expected = version::runtime_version();
    assert_eq!(major as usize, expected.major);
    assert_eq!(minor as usize, expected.minor);
    assert_eq!(patch as usize, expected.patch);

    let mut v = ptr::null_mut();
    check(unsafe { ct_version_info_create(&mut v, 3, 1, 4) });
    assert_eq!(core_type_of(v), core_type::OBJECT);
    assert_eq!(to_string(v), "3.1.4");
    release(v);
}

#[test]
fn test_null_out_parameter() {
    assert_eq!(unsafe { ct_integer_create(ptr::null_mut(), 1) }, ErrorCode::ARGUMENT_NULL);
}
