use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Cart, DiscountRate, DiscountTiers, LineItem, Money, PricingResult};

fn sample_items(count: usize) -> Vec<LineItem> {
    (0..count)
        .map(|i| {
            if i % 3 == 0 {
                LineItem::with_print(
                    format!("printed-{i}"),
                    Money::from_cents(9_999),
                    (i % 5) as u32 + 1,
                    Money::from_cents(1_500),
                )
            } else {
                LineItem::new(format!("item-{i}"), Money::from_cents(4_250), 2)
            }
        })
        .collect()
}

fn bench_compute_small_cart(c: &mut Criterion) {
    let items = sample_items(4);
    let rate = DiscountRate::from_fraction(0.05).unwrap();

    c.bench_function("pricing/compute_4_items", |b| {
        b.iter(|| PricingResult::compute(&items, rate));
    });
}

fn bench_compute_large_cart(c: &mut Criterion) {
    let items = sample_items(250);
    let rate = DiscountRate::from_fraction(0.10).unwrap();

    c.bench_function("pricing/compute_250_items", |b| {
        b.iter(|| PricingResult::compute(&items, rate));
    });
}

fn bench_resolve_and_compute(c: &mut Criterion) {
    let items = sample_items(12);
    let cart = Cart::new(items);
    let tiers = DiscountTiers::default();

    c.bench_function("pricing/resolve_tier_and_compute", |b| {
        b.iter(|| {
            let rate = tiers.resolve(cart.total_quantity()).unwrap();
            PricingResult::compute(&cart.items, rate)
        });
    });
}

criterion_group!(
    benches,
    bench_compute_small_cart,
    bench_compute_large_cart,
    bench_resolve_and_compute
);
criterion_main!(benches);
