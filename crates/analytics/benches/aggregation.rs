//! Benchmarks for the review analytics pass
//!
//! Run with: cargo bench --package analytics
//!
//! Uses a synthetic catalog of 2,000 products with up to 20 reviews each,
//! spread over 500 reviewers.

use analytics::ReviewAnalytics;
use catalog::{Product, Review};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const PRODUCTS: usize = 2_000;
const USERS: usize = 500;
const CATEGORIES: usize = 12;
const TAGS: usize = 40;

fn synthetic_products() -> Vec<Product> {
    (0..PRODUCTS)
        .map(|i| {
            let mut product = Product::new(format!("p{i:05}"), format!("Product {i}"));
            product.category = Some(format!("c{:02}", i % CATEGORIES));
            product.tags = (0..3).map(|t| format!("t{:02}", (i * 7 + t * 13) % TAGS)).collect();
            product.price = 5.0 + (i % 200) as f64;
            product.reviews = (0..i % 20)
                .map(|r| Review {
                    user: Some(format!("u{:04}", (i * 31 + r * 17) % USERS)),
                    rating: ((i + r * 3) % 5 + 1) as i32,
                    comment: String::new(),
                    date: None,
                    approved: r % 4 != 0,
                })
                .collect();
            product
        })
        .collect()
}

fn bench_full_report(c: &mut Criterion) {
    let products = synthetic_products();
    let analytics = ReviewAnalytics::default();

    c.bench_function("analytics_full_report", |b| {
        b.iter(|| {
            let report = analytics.compute(black_box(&products)).unwrap();
            black_box(report)
        })
    });
}

fn bench_single_user(c: &mut Criterion) {
    let products = synthetic_products();
    let analytics = ReviewAnalytics::default();

    c.bench_function("analytics_user_report", |b| {
        b.iter(|| {
            let report = analytics
                .user_report(black_box(&products), black_box("u0042"))
                .unwrap();
            black_box(report)
        })
    });
}

criterion_group!(benches, bench_full_report, bench_single_user);
criterion_main!(benches);
