//! Tests for classification records and outcome tags

#[cfg(test)]
mod tests {
    use treasuremap::io::configuration::NEUTRAL_GRAY;
    use treasuremap::spatial::tiles::{
        BlankReason, FailureKind, OutcomeCounts, TileOutcome, TileRecord,
    };

    fn record(outcome: TileOutcome) -> TileRecord {
        TileRecord {
            filename: "07_tile.png".to_string(),
            outcome,
            color: [10, 20, 30],
            mean_intensity: 100.0,
            std_intensity: 12.5,
        }
    }

    // Tests accessors of a found record
    // Verified by returning the centroid for blank outcomes
    #[test]
    fn test_found_record_accessors() {
        let found = record(TileOutcome::Found {
            centroid: [64, 40],
            area: 900,
        });

        assert!(!found.is_blank());
        assert_eq!(found.centroid(), Some([64, 40]));
        assert_eq!(found.area(), 900);
        assert!(found.error().is_none());
        assert!(found.blank_reason().is_none());
        assert_eq!(found.outcome_label(), "center=(64,40)");
    }

    // Tests blank records carry no centroid or area
    // Verified by treating only Flat as blank
    #[test]
    fn test_blank_record_accessors() {
        let blank = record(TileOutcome::Blank {
            reason: BlankReason::SmallContour,
        });

        assert!(blank.is_blank());
        assert!(blank.centroid().is_none());
        assert_eq!(blank.area(), 0);
        assert_eq!(blank.blank_reason(), Some(BlankReason::SmallContour));
        assert_eq!(blank.outcome_label(), "SMALL_CONTOUR");
    }

    // Tests failed records are blank, neutral gray and tagged
    // Verified by using black as the failure color
    #[test]
    fn test_failed_record() {
        let failed = TileRecord::failed("broken.png", FailureKind::LoadFailed);

        assert!(failed.is_blank());
        assert_eq!(failed.color, [NEUTRAL_GRAY; 3]);
        assert_eq!(failed.error(), Some(&FailureKind::LoadFailed));
        assert!(failed.centroid().is_none());
        assert_eq!(failed.outcome_label(), "LOAD_FAILED");
    }

    // Tests blank reason tags parse back, with legacy and unknown values
    // Verified by making tag parsing case-sensitive
    #[test]
    fn test_blank_reason_tags() {
        for reason in [
            BlankReason::Flat,
            BlankReason::NoContour,
            BlankReason::SmallContour,
        ] {
            assert_eq!(BlankReason::from_tag(reason.tag()), reason);
        }

        assert_eq!(BlankReason::from_tag(" NO_CONTOUR "), BlankReason::NoContour);
        assert_eq!(BlankReason::from_tag("blank"), BlankReason::Flat);
        assert_eq!(BlankReason::from_tag(""), BlankReason::Unrecorded);
        assert_eq!(BlankReason::from_tag("smudge"), BlankReason::Unrecorded);
        assert_eq!(BlankReason::Unrecorded.tag(), "");
    }

    // Tests failure tags keep unknown kinds verbatim
    // Verified by mapping every tag to LoadFailed
    #[test]
    fn test_failure_kind_tags() {
        assert_eq!(FailureKind::from_tag("LOAD_FAILED"), FailureKind::LoadFailed);
        assert_eq!(FailureKind::from_tag(" load_failed"), FailureKind::LoadFailed);
        assert_eq!(
            FailureKind::from_tag(" decode_timeout "),
            FailureKind::Other(" decode_timeout ".to_string())
        );
        assert_eq!(FailureKind::Other("x".to_string()).tag(), "x");
        assert_eq!(FailureKind::LoadFailed.tag(), "load_failed");
    }

    // Tests outcome tally over a mixed batch
    // Verified by counting failures as blank
    #[test]
    fn test_outcome_counts() {
        let records = vec![
            record(TileOutcome::Found {
                centroid: [1, 1],
                area: 60,
            }),
            record(TileOutcome::Blank {
                reason: BlankReason::Flat,
            }),
            record(TileOutcome::Blank {
                reason: BlankReason::NoContour,
            }),
            TileRecord::failed("x.png", FailureKind::LoadFailed),
        ];

        let counts = OutcomeCounts::tally(&records);
        assert_eq!(counts.found, 1);
        assert_eq!(counts.blank, 2);
        assert_eq!(counts.failed, 1);
        assert_eq!(OutcomeCounts::tally(&[]), OutcomeCounts::default());
    }
}
