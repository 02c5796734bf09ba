use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use catalog_products::{Category, InMemoryProductStore, Product};

fn seeded_store(rows: usize) -> InMemoryProductStore {
    let store = InMemoryProductStore::new();
    for i in 0..rows {
        let mut product = Product::new(
            format!("Product {}", i % 50),
            "benchmark row",
            Decimal::new((i % 1_000) as i64, 2),
            i % 2 == 0,
            Category::ALL[i % Category::ALL.len()],
        );
        product
            .create(&store)
            .expect("in-memory insert should not fail");
    }
    store
}

fn bench_create(c: &mut Criterion) {
    c.bench_function("create_product", |b| {
        let store = InMemoryProductStore::new();
        b.iter(|| {
            let mut product = Product::new("Fedora", "A red hat", Decimal::new(1250, 2), true, Category::Cloths);
            product.create(&store).expect("insert");
            black_box(product.id())
        })
    });
}

fn bench_finders(c: &mut Criterion) {
    let mut group = c.benchmark_group("finders");
    for rows in [100usize, 1_000, 10_000] {
        let store = seeded_store(rows);

        group.bench_with_input(BenchmarkId::new("find_by_name", rows), &rows, |b, _| {
            b.iter(|| black_box(Product::find_by_name(&store, "Product 7").count().expect("count")))
        });

        group.bench_with_input(BenchmarkId::new("find_by_category", rows), &rows, |b, _| {
            b.iter(|| {
                black_box(
                    Product::find_by_category(&store, Category::Food)
                        .fetch()
                        .expect("fetch")
                        .len(),
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("find_by_price", rows), &rows, |b, _| {
            b.iter(|| {
                black_box(
                    Product::find_by_price(&store, Decimal::new(125, 2))
                        .count()
                        .expect("count"),
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_create, bench_finders);
criterion_main!(benches);
