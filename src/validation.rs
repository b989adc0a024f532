//! Daily-total check against the expected number of logged hours.

use rust_decimal::Decimal;

use redmine_api::TimeEntry;

/// Result of comparing a day's logged total with the expected total.
/// This is data, not an error: a mismatch routes the run to the
/// validation notice instead of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub total_hours: Decimal,
    pub message: Option<String>,
}

/// Sums entry hours with decimal arithmetic and compares the total to
/// `expected` exactly. Float accumulation would report phantom mismatches
/// for fractional entries, so hours never leave `Decimal` here.
pub fn check_daily_total(entries: &[TimeEntry], expected: Decimal) -> ValidationOutcome {
    let total: Decimal = entries.iter().map(|entry| entry.hours).sum();
    if total == expected {
        ValidationOutcome {
            is_valid: true,
            total_hours: total,
            message: None,
        }
    } else {
        let direction = if total < expected { "less" } else { "more" };
        let message = format!(
            "logged total of {} h is {} than the expected {} h",
            total.normalize(),
            direction,
            expected.normalize()
        );
        ValidationOutcome {
            is_valid: false,
            total_hours: total,
            message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::check_daily_total;
    use chrono::NaiveDate;
    use redmine_api::models::TimeEntry;
    use rust_decimal::Decimal;

    fn entry(hours: &str) -> TimeEntry {
        serde_json::from_str(&format!(
            r#"{{
                "id": 1,
                "project": {{"id": 1, "name": "Website"}},
                "activity": {{"id": 9, "name": "Development"}},
                "hours": {hours},
                "spent_on": "2024-01-15"
            }}"#
        ))
        .expect("entry fixture should parse")
    }

    fn expected() -> Decimal {
        Decimal::from(8)
    }

    #[test]
    fn exact_total_is_valid() {
        let entries = vec![entry("3.5"), entry("4.5")];
        let outcome = check_daily_total(&entries, expected());
        assert!(outcome.is_valid);
        assert_eq!(outcome.total_hours, Decimal::from(8));
        assert!(outcome.message.is_none());
    }

    #[test]
    fn under_total_notes_less_than() {
        let entries = vec![entry("7.5")];
        let outcome = check_daily_total(&entries, expected());
        assert!(!outcome.is_valid);
        assert_eq!(outcome.total_hours, Decimal::new(75, 1));
        let message = outcome.message.expect("mismatch should carry a message");
        assert!(message.contains("less"));
        assert!(message.contains("7.5"));
    }

    #[test]
    fn over_total_notes_more_than() {
        let entries = vec![entry("8.5")];
        let outcome = check_daily_total(&entries, expected());
        assert!(!outcome.is_valid);
        let message = outcome.message.expect("mismatch should carry a message");
        assert!(message.contains("more"));
    }

    #[test]
    fn fractional_hours_sum_without_drift() {
        // Ten 0.1 h entries plus a 7 h entry must compare equal to 8.
        let mut entries: Vec<_> = (0..10).map(|_| entry("0.1")).collect();
        entries.push(entry("7.0"));
        let outcome = check_daily_total(&entries, expected());
        assert!(outcome.is_valid);
    }

    #[test]
    fn empty_day_totals_zero() {
        let outcome = check_daily_total(&[], expected());
        assert!(!outcome.is_valid);
        assert_eq!(outcome.total_hours, Decimal::ZERO);
    }

    #[test]
    fn date_fixture_is_well_formed() {
        let fixture = entry("1.0");
        assert_eq!(
            fixture.spent_on,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }
}
