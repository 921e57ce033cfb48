//! The last-error slot is process-wide, so everything touching it runs in
//! this single test.

use coretypes::{
    clear_error_info, create_int, create_ratio, create_version_info, init_with_config,
    last_error_info, native_version, Config, CoreError, CoreType, ErrorCode, StringView,
    VersionInfoView, VersionTriple,
};

#[test]
fn test_error_info_slot() {
    let mut config = Config::default();
    config.runtime.expected_version = Some(VersionTriple::new(9, 0, 0));
    let _guard = init_with_config(&config);

    clear_error_info();
    assert_eq!(last_error_info().unwrap(), None);

    // Successful calls leave the slot alone
    let int = create_int(1).unwrap();
    assert_eq!(last_error_info().unwrap(), None);

    // A rejected factory call is described
    assert!(create_ratio(1, 0).is_err());
    let info = last_error_info().unwrap().expect("error info after failed create");
    assert_eq!(info.code, ErrorCode::INVALIDPARAMETER);
    assert!(info.message.contains("denominator"), "message: {}", info.message);
    assert!(info.to_string().starts_with("0x80000001"));

    // Reading the slot does not change it
    assert_eq!(last_error_info().unwrap(), Some(info.clone()));

    // Nor does failing to build the ErrorInfo object
    coretypes_runtime::fail_next_allocations(1);
    assert_eq!(
        last_error_info().unwrap_err(),
        CoreError::AllocationFailed { code: ErrorCode::NOMEMORY, kind: CoreType::Object }
    );
    assert_eq!(last_error_info().unwrap(), Some(info.clone()));

    // A later failure replaces the earlier one
    assert!(int.query_as::<StringView>().is_err());
    let info = last_error_info().unwrap().unwrap();
    assert_eq!(info.code, ErrorCode::NOINTERFACE);
    assert!(info.message.contains("0x0104"), "message: {}", info.message);

    clear_error_info();
    assert_eq!(last_error_info().unwrap(), None);

    // The native version is available as a triple and as an object
    let version = native_version();
    assert_eq!(version, VersionTriple::new(0, 1, 0));
    let object = create_version_info(version).unwrap().query_as::<VersionInfoView>().unwrap();
    assert_eq!(object.triple().unwrap(), version);
    assert_eq!(last_error_info().unwrap(), None);
}
