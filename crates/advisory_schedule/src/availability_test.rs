#[cfg(test)]
mod tests {
    use crate::availability::{annotate, classify, BookedRegistry, SlotStatus};
    use crate::error::ScheduleError;
    use crate::slots::{generate_slots, OfficeHours, TimeOfDay};
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use std::collections::BTreeMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, minute, 0).unwrap()
    }

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn registry_with(date: NaiveDate, times: &[&str]) -> BookedRegistry {
        let mut registry = BookedRegistry::new();
        for time in times {
            registry.insert(date, t(time));
        }
        registry
    }

    #[test]
    fn test_scenario_today_with_bookings_at_noon() {
        let registry = registry_with(today(), &["11:00", "14:30", "18:00"]);
        let now = at(today(), 12, 0);

        assert_eq!(classify(today(), t("11:00"), &registry, now), SlotStatus::Booked);
        assert_eq!(classify(today(), t("09:00"), &registry, now), SlotStatus::Past);
        assert_eq!(
            classify(today(), t("14:30"), &registry, now),
            SlotStatus::Booked
        );
        assert_eq!(classify(today(), t("18:00"), &registry, now), SlotStatus::Booked);
        assert_eq!(
            classify(today(), t("15:00"), &registry, now),
            SlotStatus::Available
        );
    }

    #[test]
    fn test_booked_wins_regardless_of_now() {
        let registry = registry_with(today(), &["09:00", "22:00"]);
        for now in [
            at(today(), 8, 0),
            at(today(), 23, 59),
            at(today() - Duration::days(3), 12, 0),
            at(today() + Duration::days(3), 12, 0),
        ] {
            assert_eq!(classify(today(), t("09:00"), &registry, now), SlotStatus::Booked);
            assert_eq!(classify(today(), t("22:00"), &registry, now), SlotStatus::Booked);
        }
    }

    #[test]
    fn test_slot_at_exactly_now_is_past() {
        let registry = BookedRegistry::new();
        let now = at(today(), 12, 0);
        assert_eq!(classify(today(), t("12:00"), &registry, now), SlotStatus::Past);
        assert_eq!(
            classify(today(), t("12:30"), &registry, now),
            SlotStatus::Available
        );
    }

    #[test]
    fn test_seconds_past_the_slot_make_it_past() {
        let registry = BookedRegistry::new();
        let now = today().and_hms_opt(12, 0, 1).unwrap();
        assert_eq!(classify(today(), t("12:00"), &registry, now), SlotStatus::Past);
    }

    #[test]
    fn test_other_days_are_never_past() {
        let registry = BookedRegistry::new();
        let now = at(today(), 23, 59);
        let tomorrow = today() + Duration::days(1);
        let yesterday = today() - Duration::days(1);
        assert_eq!(
            classify(tomorrow, t("09:00"), &registry, now),
            SlotStatus::Available
        );
        // only "today" is checked against the clock
        assert_eq!(
            classify(yesterday, t("09:00"), &registry, now),
            SlotStatus::Available
        );
    }

    #[test]
    fn test_bookings_are_per_day() {
        let registry = registry_with(today(), &["10:00"]);
        let now = at(today(), 8, 0);
        let tomorrow = today() + Duration::days(1);
        assert_eq!(
            classify(tomorrow, t("10:00"), &registry, now),
            SlotStatus::Available
        );
    }

    #[test]
    fn test_annotate_keeps_order_and_labels() {
        let registry = registry_with(today(), &["10:00"]);
        let hours = OfficeHours::new(9, 11, 60).unwrap();
        let slots = generate_slots(today(), &hours);
        let views = annotate(today(), &slots, &registry, at(today(), 9, 30));

        let statuses: Vec<_> = views.iter().map(|v| (v.time.to_string(), v.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("09:00".to_string(), SlotStatus::Past),
                ("10:00".to_string(), SlotStatus::Booked),
                ("11:00".to_string(), SlotStatus::Available),
            ]
        );
        assert_eq!(views[2].label, "11:00 AM");
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let mut registry = BookedRegistry::new();
        assert!(registry.insert(today(), t("10:00")));
        assert!(!registry.insert(today(), t("10:00")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.booked_on(today()), vec![t("10:00")]);
    }

    #[test]
    fn test_iso_table_round_trip() {
        let table = BTreeMap::from([
            (
                "2025-05-05".to_string(),
                vec!["14:30".to_string(), "11:00".to_string()],
            ),
            ("2025-05-06".to_string(), vec!["09:30".to_string()]),
        ]);
        let registry = BookedRegistry::from_iso_table(&table).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.is_booked(today(), t("11:00")));

        let exported = registry.to_iso_table();
        // times come back sorted
        assert_eq!(exported["2025-05-05"], vec!["11:00", "14:30"]);
        assert_eq!(exported["2025-05-06"], vec!["09:30"]);
    }

    #[test]
    fn test_iso_table_rejects_bad_entries() {
        let bad_date = BTreeMap::from([("05.05.2025".to_string(), vec!["10:00".to_string()])]);
        assert!(matches!(
            BookedRegistry::from_iso_table(&bad_date),
            Err(ScheduleError::InvalidDate(_))
        ));

        let bad_time = BTreeMap::from([("2025-05-05".to_string(), vec!["10am".to_string()])]);
        assert!(matches!(
            BookedRegistry::from_iso_table(&bad_time),
            Err(ScheduleError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_registry_serializes_as_iso_table() {
        let registry = registry_with(today(), &["18:00", "11:00"]);
        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json, serde_json::json!({"2025-05-05": ["11:00", "18:00"]}));

        let back: BookedRegistry = serde_json::from_value(json).unwrap();
        assert_eq!(back, registry);
    }

    #[test]
    fn test_demo_registry_offsets() {
        let registry = BookedRegistry::demo(today());
        assert_eq!(registry.len(), 9);
        assert_eq!(
            registry.booked_on(today()),
            vec![t("11:00"), t("14:30"), t("18:00")]
        );
        assert_eq!(
            registry.booked_on(today() + Duration::days(1)),
            vec![t("09:30"), t("12:00"), t("16:30")]
        );
        assert!(registry.booked_on(today() + Duration::days(2)).is_empty());
        assert_eq!(
            registry.booked_on(today() + Duration::days(3)),
            vec![t("10:00"), t("10:30"), t("20:00")]
        );
    }

    #[test]
    fn test_merge_unions_days() {
        let mut registry = registry_with(today(), &["10:00"]);
        registry.merge(registry_with(today(), &["10:00", "11:00"]));
        assert_eq!(registry.booked_on(today()), vec![t("10:00"), t("11:00")]);
        assert_eq!(registry.dates().count(), 1);
    }
}
