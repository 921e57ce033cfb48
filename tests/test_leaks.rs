//! Live-object counters are process-wide; this binary holds a single test.

use coretypes::{
    create_dict, create_function, create_int, create_list, create_procedure, create_string,
    create_struct, diagnostics, live_objects, FunctionView, ListView, ProcedureView, StructView,
};

#[test]
fn test_no_objects_leak() {
    let baseline = live_objects();

    {
        let a = create_int(1).unwrap();
        let b = create_string("two").unwrap();
        let list = create_list(&[a.clone(), b.clone()]).unwrap();
        let _dict = create_dict(&[(b.clone(), list.clone())]).unwrap();
        assert_eq!(live_objects(), baseline + 4);

        let view = list.query_as::<ListView>().unwrap();
        view.push_back(&list).unwrap_err();
        view.push_back(&create_int(3).unwrap()).unwrap();
        let _popped = view.pop_back().unwrap();

        let point = create_struct("Point", &[("x", a.clone())]).unwrap();
        let names = point.query_as::<StructView>().unwrap().field_names().unwrap();
        assert_eq!(names, vec!["x"]);

        let procedure = create_procedure(|_| Ok(())).unwrap();
        procedure.query_as::<ProcedureView>().unwrap().dispatch(Some(&a)).unwrap();

        let function = create_function(|params| Ok(params.unwrap_or_default())).unwrap();
        let echoed = function.query_as::<FunctionView>().unwrap().call(Some(&b)).unwrap();
        assert!(echoed.same_object(&b));
    }

    assert_eq!(live_objects(), baseline);
    let stats = diagnostics::runtime_stats();
    assert!(stats.objects_allocated >= stats.objects_freed);
}
