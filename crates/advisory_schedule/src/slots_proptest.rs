#[cfg(test)]
mod tests {
    use crate::availability::{classify, BookedRegistry, SlotStatus};
    use crate::pagination::{page_count, paginate};
    use crate::slots::{generate_slots, OfficeHours, TimeOfDay};
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    fn minutes(time: &TimeOfDay) -> i64 {
        i64::from(time.hour() * 60 + time.minute())
    }

    proptest! {
        // Slots start at start_hour:00, are evenly spaced and never pass end_hour:00
        #[test]
        fn test_slots_are_evenly_spaced_within_window(
            start_hour in 0u32..24,
            span in 0u32..24,
            step in 1u32..=180,
            day_offset in 0i64..365,
        ) {
            let end_hour = (start_hour + span).min(23);
            let hours = OfficeHours::new(start_hour, end_hour, step).unwrap();
            let date = base_date() + Duration::days(day_offset);
            let slots = generate_slots(date, &hours);

            prop_assert!(!slots.is_empty());
            prop_assert_eq!(slots[0], hours.start());
            for pair in slots.windows(2) {
                prop_assert_eq!(minutes(&pair[1]) - minutes(&pair[0]), i64::from(step));
            }
            let last = slots[slots.len() - 1];
            prop_assert!(last <= hours.end());
            // the next step would overshoot the boundary
            prop_assert!(minutes(&last) + i64::from(step) > minutes(&hours.end()));
        }

        // When the step divides the window the last slot is exactly end_hour:00
        #[test]
        fn test_dividing_step_ends_on_boundary(
            start_hour in 0u32..24,
            span in 0u32..24,
            step in prop::sample::select(vec![1u32, 5, 10, 15, 20, 30, 60]),
        ) {
            let end_hour = (start_hour + span).min(23);
            let hours = OfficeHours::new(start_hour, end_hour, step).unwrap();
            let slots = generate_slots(base_date(), &hours);
            prop_assert_eq!(slots.last().copied(), Some(hours.end()));
            let expected = ((end_hour - start_hour) * 60 / step + 1) as usize;
            prop_assert_eq!(slots.len(), expected);
        }

        #[test]
        fn test_generation_is_idempotent(
            start_hour in 0u32..24,
            end_hour in 0u32..24,
            step in 1u32..=240,
        ) {
            let hours = OfficeHours::new(start_hour, end_hour, step).unwrap();
            prop_assert_eq!(
                generate_slots(base_date(), &hours),
                generate_slots(base_date(), &hours)
            );
        }

        // Pages have page_size items except possibly the last, and concatenate back
        #[test]
        fn test_pages_reconstruct_sequence(
            len in 0usize..200,
            page_size in 1usize..30,
        ) {
            let items: Vec<usize> = (0..len).collect();
            let count = page_count(len, page_size);
            prop_assert_eq!(count, std::cmp::max(1, len.div_ceil(page_size)));

            let mut rebuilt = Vec::with_capacity(len);
            for page in 0..count {
                let view = paginate(&items, page_size, page);
                prop_assert_eq!(view.page_count, count);
                prop_assert_eq!(view.current_page, page);
                if page + 1 < count {
                    prop_assert_eq!(view.items.len(), page_size);
                } else {
                    prop_assert!(view.items.len() <= page_size);
                }
                rebuilt.extend_from_slice(view.items);
            }
            prop_assert_eq!(rebuilt, items);
        }

        #[test]
        fn test_booked_always_classifies_booked(
            hour in 0u32..24,
            minute in 0u32..60,
            now_minutes in 0i64..(3 * 24 * 60),
        ) {
            let time = TimeOfDay::new(hour, minute).unwrap();
            let mut registry = BookedRegistry::new();
            registry.insert(base_date(), time);
            let now = base_date().and_hms_opt(0, 0, 0).unwrap()
                - Duration::days(1)
                + Duration::minutes(now_minutes);
            prop_assert_eq!(classify(base_date(), time, &registry, now), SlotStatus::Booked);
        }

        #[test]
        fn test_today_splits_on_now(
            hour in 0u32..24,
            minute in 0u32..60,
            now_hour in 0u32..24,
            now_minute in 0u32..60,
        ) {
            let time = TimeOfDay::new(hour, minute).unwrap();
            let now = base_date().and_hms_opt(now_hour, now_minute, 0).unwrap();
            let status = classify(base_date(), time, &BookedRegistry::new(), now);
            if (hour, minute) <= (now_hour, now_minute) {
                prop_assert_eq!(status, SlotStatus::Past);
            } else {
                prop_assert_eq!(status, SlotStatus::Available);
            }
        }
    }
}
