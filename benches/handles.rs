use coretypes::{create_int, create_list, create_string, Handle, IntegerView, ListView};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_handles(c: &mut Criterion) {
    let handle = create_int(7).unwrap();

    c.bench_function("handle_clone_drop", |b| {
        b.iter(|| drop(black_box(handle.clone())));
    });

    c.bench_function("query_as_integer", |b| {
        b.iter(|| {
            let view = black_box(&handle).query_as::<IntegerView>().unwrap();
            black_box(view.value().unwrap())
        });
    });

    c.bench_function("equals_value", |b| {
        b.iter(|| black_box(&handle).equals_value(black_box(7i64)).unwrap());
    });
}

fn bench_factories(c: &mut Criterion) {
    c.bench_function("create_int", |b| {
        b.iter(|| create_int(black_box(42)).unwrap());
    });

    c.bench_function("create_string", |b| {
        b.iter(|| create_string(black_box("a moderately short string")).unwrap());
    });

    let mut group = c.benchmark_group("create_list");
    for size in [4usize, 64, 1024] {
        let items: Vec<Handle> = (0..size as i64).map(|i| create_int(i).unwrap()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| create_list(black_box(items)).unwrap());
        });
    }
    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let items: Vec<Handle> = (0..256).map(|i| create_int(i).unwrap()).collect();
    let list = create_list(&items).unwrap().query_as::<ListView>().unwrap();

    c.bench_function("list_iter_256", |b| {
        b.iter(|| {
            list.iter()
                .unwrap()
                .map(|item| item.unwrap().query_as::<IntegerView>().unwrap().value().unwrap())
                .sum::<i64>()
        });
    });
}

criterion_group!(benches, bench_handles, bench_factories, bench_iteration);
criterion_main!(benches);
