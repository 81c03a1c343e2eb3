//! Cleaning and metrics performance benchmarks.
//!
//! Measures the per-sheet cleaner on raw orders and the full metrics engine
//! over generated datasets of increasing size.

use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use storelens::{Cleaner, Customer, Dataset, MetricsEngine, Order, Review, Table};

const CATEGORIES: [&str; 5] = ["Electronics", "Books", "Toys", "Home", "Garden"];
const PAYMENTS: [&str; 4] = ["credit card", "PAYPAL", "cash", ""];

/// Generate a typed dataset with `customers` customers and ~8 orders each.
fn generate_dataset(customers: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(42);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let customers_vec: Vec<Customer> = (0..customers)
        .map(|i| Customer {
            customer_id: i as i64,
            gender: ["Male", "Female", "Other"][i % 3].to_string(),
            age: rng.gen_range(18..90),
            city: format!("City{}", i % 25),
            loyalty_score: (rng.gen_range(0..50) as f64) / 10.0,
        })
        .collect();

    let orders: Vec<Order> = (0..customers * 8)
        .map(|i| Order {
            order_id: i as i64,
            customer_id: rng.gen_range(0..customers as i64),
            order_date: start + Duration::days(rng.gen_range(0..540)),
            product_category: CATEGORIES[i % CATEGORIES.len()].to_string(),
            order_value: (rng.gen_range(100..100_000) as f64) / 100.0,
            payment_method: "Cash".to_string(),
            delivered: "Yes".to_string(),
        })
        .collect();

    let reviews: Vec<Review> = (0..customers * 2)
        .map(|i| Review {
            review_id: i as i64,
            customer_id: rng.gen_range(0..customers as i64),
            product_id: rng.gen_range(0..200),
            rating: rng.gen_range(1..=5) as f64,
            review_text: String::new(),
        })
        .collect();

    Dataset {
        customers: customers_vec,
        products: Vec::new(),
        orders,
        reviews,
    }
}

/// Generate a raw orders sheet with nulls, bad dates and duplicates.
fn generate_raw_orders(rows: usize) -> Table {
    let mut rng = StdRng::seed_from_u64(7);
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            let date = if i % 40 == 0 {
                String::new()
            } else {
                format!("2024-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1)
            };
            let value = if i % 25 == 0 {
                String::new()
            } else {
                format!("{:.2}", rng.gen_range(1.0..900.0))
            };
            vec![
                (i / 2 * 2).to_string(),
                (i % 500).to_string(),
                date,
                CATEGORIES[i % CATEGORIES.len()].to_string(),
                value,
                PAYMENTS[i % PAYMENTS.len()].to_string(),
                ["yes", "no", "True", ""][i % 4].to_string(),
            ]
        })
        .collect();

    Table::from_raw(
        &[
            "order_id",
            "customer_id",
            "order_date",
            "product_category",
            "order_value",
            "payment_method",
            "delivered",
        ],
        &data,
    )
}

fn bench_metrics_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics_engine");
    let engine = MetricsEngine::new();

    for customers in [100, 1_000, 10_000].iter() {
        let dataset = generate_dataset(*customers);
        group.throughput(Throughput::Elements(dataset.orders.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("customers", customers),
            &dataset,
            |b, dataset| b.iter(|| engine.run(black_box(dataset))),
        );
    }

    group.finish();
}

fn bench_clean_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_orders");
    let cleaner = Cleaner::new();

    for rows in [1_000, 10_000, 50_000].iter() {
        let table = generate_raw_orders(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter_with_setup(
                || table.clone(),
                |table| cleaner.clean_sheet("orders", black_box(table)).unwrap(),
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_metrics_engine, bench_clean_orders);
criterion_main!(benches);
