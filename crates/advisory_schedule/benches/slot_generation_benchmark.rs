use advisory_schedule::{annotate, generate_slots, paginate, BookedRegistry, OfficeHours};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
}

fn noon() -> NaiveDateTime {
    base_date().and_hms_opt(12, 0, 0).unwrap()
}

// Registry with `days` days of demo-like bookings
fn busy_registry(days: i64) -> BookedRegistry {
    let mut registry = BookedRegistry::new();
    for offset in (0..days).step_by(4) {
        registry.merge(BookedRegistry::demo(base_date() + Duration::days(offset)));
    }
    registry
}

fn benchmark_slot_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("slot_generation");

    group.bench_function("default_office_hours", |b| {
        let hours = OfficeHours::default();
        b.iter(|| generate_slots(black_box(base_date()), black_box(&hours)))
    });

    group.bench_function("full_day_every_minute", |b| {
        let hours = OfficeHours::new(0, 23, 1).unwrap();
        b.iter(|| generate_slots(black_box(base_date()), black_box(&hours)))
    });

    group.bench_function("four_weeks", |b| {
        let hours = OfficeHours::default();
        b.iter(|| {
            (0..28)
                .map(|offset| generate_slots(base_date() + Duration::days(offset), &hours).len())
                .sum::<usize>()
        })
    });

    group.finish();
}

fn benchmark_availability(c: &mut Criterion) {
    let mut group = c.benchmark_group("availability");
    let hours = OfficeHours::default();
    let slots = generate_slots(base_date(), &hours);

    group.bench_function("annotate_empty_registry", |b| {
        let registry = BookedRegistry::new();
        b.iter(|| {
            annotate(
                black_box(base_date()),
                black_box(&slots),
                black_box(&registry),
                black_box(noon()),
            )
        })
    });

    group.bench_function("annotate_busy_registry", |b| {
        let registry = busy_registry(365);
        b.iter(|| {
            annotate(
                black_box(base_date()),
                black_box(&slots),
                black_box(&registry),
                black_box(noon()),
            )
        })
    });

    group.bench_function("annotate_visible_page", |b| {
        let registry = busy_registry(365);
        b.iter(|| {
            let page = paginate(black_box(&slots), 9, black_box(2));
            annotate(base_date(), page.items, &registry, noon())
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_slot_generation, benchmark_availability);
criterion_main!(benches);
