use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use coretypes::{
    create_dict, create_enumeration, create_int, create_list, create_string, create_struct,
    CoreError, CoreType, DictView, EnumerationView, ErrorCode, Handle, IntegerView, ListView,
    StringView, StructView,
};

fn int(value: i64) -> Handle {
    create_int(value).unwrap()
}

fn string(value: &str) -> Handle {
    create_string(value).unwrap()
}

fn int_of(handle: &Handle) -> i64 {
    handle.query_as::<IntegerView>().unwrap().value().unwrap()
}

fn text_of(handle: &Handle) -> String {
    handle.query_as::<StringView>().unwrap().value().unwrap()
}

fn failed_with(err: CoreError, expected: ErrorCode) -> bool {
    matches!(err, CoreError::OperationFailed { code, .. } if code == expected)
}

#[test]
fn test_list_scenario() {
    let a = int(1);
    let b = int(2);
    let mut list = create_list(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(a.ref_count().unwrap(), 2);
    assert_eq!(b.ref_count().unwrap(), 2);

    let view = list.query_as::<ListView>().unwrap();
    assert_eq!(int_of(&view.get(0).unwrap()), 1);
    assert_eq!(int_of(&view.get(1).unwrap()), 2);
    drop(view);

    list.release().unwrap();
    assert_eq!(a.ref_count().unwrap(), 1);
    assert_eq!(b.ref_count().unwrap(), 1);
    assert!(a.equals_value(1i64).unwrap());
}

#[test]
fn test_list_round_trip_order() {
    let items = [string("a"), string("b"), string("c")];
    let list = create_list(&items).unwrap().query_as::<ListView>().unwrap();
    let back = list.to_vec().unwrap();
    assert_eq!(back.len(), 3);
    for (item, original) in back.iter().zip(&items) {
        assert!(item.same_object(original));
    }
    assert_eq!(list.to_display_string().unwrap(), r#"["a", "b", "c"]"#);
}

#[test]
fn test_list_mutation() {
    let list = create_list(&[]).unwrap().query_as::<ListView>().unwrap();
    assert!(list.is_empty().unwrap());

    list.push_back(&int(1)).unwrap();
    list.push_back(&int(3)).unwrap();
    list.insert_at(1, &int(2)).unwrap();
    list.insert_at(3, &int(4)).unwrap();
    let values: Vec<i64> = list.iter().unwrap().map(|h| int_of(&h.unwrap())).collect();
    assert_eq!(values, vec![1, 2, 3, 4]);

    list.set(0, &int(10)).unwrap();
    assert_eq!(int_of(&list.remove_at(0).unwrap()), 10);
    assert_eq!(int_of(&list.pop_back().unwrap()), 4);
    assert_eq!(list.len().unwrap(), 2);

    list.clear().unwrap();
    assert!(list.is_empty().unwrap());
}

#[test]
fn test_list_errors() {
    let list = create_list(&[int(1)]).unwrap().query_as::<ListView>().unwrap();
    assert!(failed_with(list.get(1).unwrap_err(), ErrorCode::OUTOFRANGE));
    assert!(failed_with(list.set(5, &int(0)).unwrap_err(), ErrorCode::OUTOFRANGE));
    assert!(failed_with(list.insert_at(3, &int(0)).unwrap_err(), ErrorCode::OUTOFRANGE));
    assert!(failed_with(list.push_back(&list).unwrap_err(), ErrorCode::INVALIDPARAMETER));
    assert_eq!(list.push_back(&Handle::null()), Err(CoreError::NullHandle));

    list.clear().unwrap();
    assert!(failed_with(list.pop_back().unwrap_err(), ErrorCode::OUTOFRANGE));
}

#[test]
fn test_list_shares_items() {
    let item = int(5);
    let list = create_list(&[item.clone(), item.clone()]).unwrap().query_as::<ListView>().unwrap();
    assert_eq!(item.ref_count().unwrap(), 3);
    list.clear().unwrap();
    assert_eq!(item.ref_count().unwrap(), 1);
}

#[test]
fn test_dict_last_write_wins() {
    let k = string("k");
    let dict = create_dict(&[(k.clone(), string("x")), (k.clone(), string("y"))])
        .unwrap()
        .query_as::<DictView>()
        .unwrap();
    assert_eq!(dict.len().unwrap(), 1);
    assert_eq!(text_of(&dict.get(&k).unwrap()), "y");

    // An equal but distinct key addresses the same entry
    dict.set(&string("k"), &string("z")).unwrap();
    assert_eq!(dict.len().unwrap(), 1);
    assert_eq!(text_of(&dict.get(&k).unwrap()), "z");
}

#[test]
fn test_dict_keeps_insertion_order() {
    let dict = create_dict(&[
        (string("b"), int(2)),
        (string("a"), int(1)),
        (string("c"), int(3)),
    ])
    .unwrap()
    .query_as::<DictView>()
    .unwrap();

    dict.set(&string("b"), &int(20)).unwrap();
    let keys: Vec<String> = dict.keys().unwrap().iter().map(text_of).collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
    let values: Vec<i64> = dict.values().unwrap().iter().map(int_of).collect();
    assert_eq!(values, vec![20, 1, 3]);
    assert_eq!(dict.to_display_string().unwrap(), r#"{"b": 20, "a": 1, "c": 3}"#);
}

#[test]
fn test_dict_operations() {
    let dict = create_dict(&[]).unwrap().query_as::<DictView>().unwrap();
    let key = int(7);
    assert!(!dict.has_key(&key).unwrap());
    assert!(failed_with(dict.get(&key).unwrap_err(), ErrorCode::NOTFOUND));

    dict.set(&key, &string("seven")).unwrap();
    assert!(dict.has_key(&int(7)).unwrap());
    let entries = dict.entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].0.same_object(&key));

    assert_eq!(text_of(&dict.remove(&key).unwrap()), "seven");
    assert!(failed_with(dict.remove(&key).unwrap_err(), ErrorCode::NOTFOUND));

    dict.set(&string("x"), &int(1)).unwrap();
    dict.clear().unwrap();
    assert!(dict.is_empty().unwrap());
    assert!(failed_with(dict.set(&key, &dict).unwrap_err(), ErrorCode::INVALIDPARAMETER));
}

#[test]
fn test_indirect_cycles_refused() {
    let a = create_list(&[]).unwrap();
    let b = create_list(&[a.clone()]).unwrap();
    let list = a.query_as::<ListView>().unwrap();
    assert!(failed_with(list.push_back(&b).unwrap_err(), ErrorCode::INVALIDPARAMETER));
    list.push_back(&int(1)).unwrap();
    assert!(failed_with(list.insert_at(0, &b).unwrap_err(), ErrorCode::INVALIDPARAMETER));
    assert!(failed_with(list.set(0, &b).unwrap_err(), ErrorCode::INVALIDPARAMETER));

    // Through a dict value and a struct field
    let dict = create_dict(&[(string("a"), a.clone())]).unwrap();
    let holder = create_struct("Holder", &[("d", dict.clone())]).unwrap();
    assert!(failed_with(list.push_back(&holder).unwrap_err(), ErrorCode::INVALIDPARAMETER));
    let wrapped = create_list(&[holder.clone()]).unwrap();
    let dict_view = dict.query_as::<DictView>().unwrap();
    assert!(failed_with(
        dict_view.set(&string("b"), &wrapped).unwrap_err(),
        ErrorCode::INVALIDPARAMETER
    ));
    assert_eq!(dict_view.len().unwrap(), 1);

    // Refused elements leave every container finite
    assert_eq!(list.len().unwrap(), 1);
    assert_eq!(a.to_display_string().unwrap(), "[1]");
    assert_eq!(b.to_display_string().unwrap(), "[[1]]");
    let expected = create_list(&[create_list(&[int(1)]).unwrap()]).unwrap();
    assert!(b.equals(&expected).unwrap());
    assert_eq!(b.hash_code().unwrap(), expected.hash_code().unwrap());
}

#[test]
fn test_dict_keyed_by_container_holding_it() {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let dict = create_dict(&[]).unwrap();
        let view = dict.query_as::<DictView>().unwrap();
        let holder = create_list(&[dict.clone()]).unwrap();
        let as_key = view.set(&holder, &int(1)).unwrap_err();
        let as_value = view.set(&int(1), &holder).unwrap_err();

        // A container key that does not reach the dict is fine
        let other = create_dict(&[(string("x"), int(1))]).unwrap();
        view.set(&create_list(&[other.clone()]).unwrap(), &int(2)).unwrap();
        let found = int_of(&view.get(&create_list(&[other]).unwrap()).unwrap());

        tx.send((as_key, as_value, view.len().unwrap(), found)).unwrap();
    });

    let (as_key, as_value, len, found) = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("dict set with a container key did not return");
    assert!(failed_with(as_key, ErrorCode::INVALIDPARAMETER));
    assert!(failed_with(as_value, ErrorCode::INVALIDPARAMETER));
    assert_eq!(len, 1);
    assert_eq!(found, 2);
}

#[test]
fn test_dict_value_equality() {
    let a = create_dict(&[(string("x"), int(1)), (string("y"), int(2))]).unwrap();
    let b = create_dict(&[(string("y"), int(2)), (string("x"), int(1))]).unwrap();
    let c = create_dict(&[(string("x"), int(1))]).unwrap();
    assert!(a.equals(&b).unwrap());
    assert_eq!(a.hash_code().unwrap(), b.hash_code().unwrap());
    assert!(!a.equals(&c).unwrap());
}

#[test]
fn test_struct() {
    let point = create_struct("Point", &[("x", int(1)), ("y", int(2))]).unwrap();
    assert_eq!(point.core_type().unwrap(), CoreType::Struct);
    assert_eq!(point.to_display_string().unwrap(), "Point {x: 1, y: 2}");

    let view = point.query_as::<StructView>().unwrap();
    assert_eq!(view.type_name().unwrap(), "Point");
    assert_eq!(view.field_names().unwrap(), vec!["x", "y"]);
    let values: Vec<i64> = view.field_values().unwrap().iter().map(int_of).collect();
    assert_eq!(values, vec![1, 2]);
    assert_eq!(int_of(&view.get("y").unwrap()), 2);
    assert!(view.has_field("x").unwrap());
    assert!(!view.has_field("z").unwrap());
    assert!(failed_with(view.get("z").unwrap_err(), ErrorCode::NOTFOUND));

    let fields = view.as_dictionary().unwrap();
    assert_eq!(fields.len().unwrap(), 2);
    assert_eq!(int_of(&fields.get(&string("x")).unwrap()), 1);

    let same = create_struct("Point", &[("x", int(1)), ("y", int(2))]).unwrap();
    let other = create_struct("Vec2", &[("x", int(1)), ("y", int(2))]).unwrap();
    assert!(point.equals(&same).unwrap());
    assert!(!point.equals(&other).unwrap());
}

#[test]
fn test_enumeration() {
    let green = create_enumeration("Color", "Green", 1).unwrap();
    assert_eq!(green.to_display_string().unwrap(), "Color::Green");

    let view = green.query_as::<EnumerationView>().unwrap();
    assert_eq!(view.type_name().unwrap(), "Color");
    assert_eq!(view.value().unwrap(), "Green");
    assert_eq!(view.int_value().unwrap(), 1);

    assert!(green.equals(&create_enumeration("Color", "Green", 1).unwrap()).unwrap());
    assert!(!green.equals(&create_enumeration("Color", "Red", 0).unwrap()).unwrap());
}

#[test]
fn test_container_allocation_failure() {
    coretypes_runtime::fail_next_allocations(1);
    assert_eq!(
        create_list(&[]).unwrap_err(),
        CoreError::AllocationFailed { code: ErrorCode::NOMEMORY, kind: CoreType::List }
    );

    coretypes_runtime::fail_next_allocations(1);
    assert_eq!(
        create_struct("Point", &[]).unwrap_err(),
        CoreError::AllocationFailed { code: ErrorCode::NOMEMORY, kind: CoreType::Struct }
    );
}
