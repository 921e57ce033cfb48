use coretypes::{
    create_binary_data, create_bool, create_complex_number, create_dict, create_enumeration,
    create_float, create_int, create_list, create_ratio, create_string, create_struct,
    create_version_info, AnyView, BoolView, CoreError, CoreType, DictView, ErrorCode, FloatView,
    Handle, IntegerView, ListView, RatioView, StringView, StructView, VersionInfoView,
    VersionTriple,
};

#[test]
fn test_cast_failure_is_reported() {
    let handle = create_int(3).unwrap();
    let err = handle.query_as::<StringView>().unwrap_err();
    assert_eq!(
        err,
        CoreError::CastFailed {
            code: ErrorCode::NOINTERFACE,
            requested: "StringView",
            actual: CoreType::Int,
        }
    );

    // The failed query takes no reference
    assert_eq!(handle.ref_count().unwrap(), 1);
}

#[test]
fn test_query_then_release_nets_zero() {
    let handles = [
        create_bool(true).unwrap(),
        create_int(1).unwrap(),
        create_string("s").unwrap(),
        create_list(&[]).unwrap(),
    ];

    for handle in &handles {
        let before = handle.ref_count().unwrap();
        let mut view = handle.query_as::<Handle>().unwrap();
        assert_eq!(handle.ref_count().unwrap(), before + 1);
        view.release().unwrap();
        assert_eq!(handle.ref_count().unwrap(), before);
    }
}

#[test]
fn test_views_alias_one_object() {
    let handle = create_float(0.25).unwrap();
    let a = handle.query_as::<FloatView>().unwrap();
    let b = a.query_as::<FloatView>().unwrap();
    assert!(a.same_object(&b));
    assert_eq!(handle.ref_count().unwrap(), 3);
    assert_eq!(b.value().unwrap(), 0.25);

    drop(a);
    drop(b);
    assert_eq!(handle.ref_count().unwrap(), 1);
}

#[test]
fn test_view_outlives_handle() {
    let view = {
        let handle = create_string("kept").unwrap();
        handle.query_as::<StringView>().unwrap()
    };
    assert_eq!(view.value().unwrap(), "kept");
    assert_eq!(view.ref_count().unwrap(), 1);
}

#[test]
fn test_view_release() {
    let handle = create_int(8).unwrap();
    let mut view = handle.query_as::<IntegerView>().unwrap();
    view.release().unwrap();
    assert_eq!(view.value(), Err(CoreError::UseAfterRelease));
    assert_eq!(handle.ref_count().unwrap(), 1);
}

#[test]
fn test_scalar_views() {
    assert!(create_bool(false).unwrap().query_as::<BoolView>().unwrap().equals_value(false).unwrap());

    let ratio = create_ratio(-3, 9).unwrap().query_as::<RatioView>().unwrap();
    assert_eq!(ratio.numerator().unwrap(), -3);
    assert_eq!(ratio.denominator().unwrap(), 9);

    let text = create_string("héllo").unwrap().query_as::<StringView>().unwrap();
    assert_eq!(text.len().unwrap(), "héllo".len());
    assert_eq!(text.as_bytes().unwrap(), "héllo".as_bytes());
    assert!(text.equals_value("héllo").unwrap());
    assert!(!text.equals_value("hello").unwrap());

    assert!(create_string("").unwrap().query_as::<StringView>().unwrap().is_empty().unwrap());
}

#[test]
fn test_equals_value_on_wrong_kind() {
    let handle = create_string("42").unwrap();
    let err = handle.equals_value(42i64).unwrap_err();
    assert!(matches!(err, CoreError::OperationFailed { code, .. } if code == ErrorCode::NOINTERFACE));
}

#[test]
fn test_every_object_is_an_object() {
    let handles = [
        create_int(1).unwrap(),
        create_binary_data(b"raw").unwrap(),
        create_complex_number(1.0, -2.0).unwrap(),
        create_version_info(VersionTriple::new(1, 2, 3)).unwrap(),
    ];
    for handle in &handles {
        let object = handle.query_as::<Handle>().unwrap();
        assert!(object.same_object(handle));
    }
}

#[test]
fn test_narrow() {
    let cases = [
        (create_bool(true).unwrap(), CoreType::Bool),
        (create_int(1).unwrap(), CoreType::Int),
        (create_float(1.0).unwrap(), CoreType::Float),
        (create_string("s").unwrap(), CoreType::String),
        (create_list(&[]).unwrap(), CoreType::List),
        (create_dict(&[]).unwrap(), CoreType::Dict),
        (create_ratio(1, 2).unwrap(), CoreType::Ratio),
        (create_struct("Unit", &[]).unwrap(), CoreType::Struct),
        (create_enumeration("E", "A", 1).unwrap(), CoreType::Enumeration),
        (create_version_info(VersionTriple::new(0, 1, 0)).unwrap(), CoreType::Object),
    ];

    for (handle, tag) in &cases {
        let view = handle.narrow().unwrap();
        assert_eq!(view.core_type(), *tag);
        assert!(view.handle().same_object(handle));
    }

    match create_int(5).unwrap().narrow().unwrap() {
        AnyView::Int(int) => assert_eq!(int.value().unwrap(), 5),
        other => panic!("unexpected view {:?}", other),
    }
}

#[test]
fn test_narrow_without_view() {
    let binary = create_binary_data(&[1, 2, 3]).unwrap();
    assert_eq!(binary.narrow().unwrap_err(), CoreError::UnsupportedType(CoreType::BinaryData));

    let complex = create_complex_number(0.0, 1.0).unwrap();
    assert_eq!(complex.narrow().unwrap_err(), CoreError::UnsupportedType(CoreType::ComplexNumber));
    assert_eq!(complex.to_display_string().unwrap(), "(0+1i)");
    assert_eq!(binary.to_display_string().unwrap(), "<3 bytes>");
}

#[test]
fn test_version_info_view() {
    let handle = create_version_info(VersionTriple::new(2, 5, 1)).unwrap();
    let version = handle.query_as::<VersionInfoView>().unwrap();
    assert_eq!(version.major().unwrap(), 2);
    assert_eq!(version.triple().unwrap(), VersionTriple::new(2, 5, 1));
    assert!(handle.query_as::<ListView>().is_err());
}

#[test]
fn test_records_do_not_cross_cast() {
    let point = create_struct("Point", &[("x", create_int(1).unwrap())]).unwrap();
    assert!(point.query_as::<StructView>().is_ok());
    assert!(matches!(
        point.query_as::<DictView>().unwrap_err(),
        CoreError::CastFailed { actual: CoreType::Struct, .. }
    ));
}
