// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cron expression parsing and next occurrence calculation.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use cron::Schedule;

use crate::error::SchedulerError;

/// Convert a standard 5-field Unix cron expression to the 7-field format
/// expected by the `cron` crate.
///
/// 5-field format: minute hour day-of-month month day-of-week
/// 7-field format: second minute hour day-of-month month day-of-week year
///
/// We add "0" for seconds (run at :00 of each minute) and "*" for year (any
/// year). 6- and 7-field expressions pass through unchanged.
fn to_extended_format(expression: &str) -> String {
	let field_count = expression.split_whitespace().count();
	if field_count >= 6 {
		expression.to_string()
	} else if field_count == 5 {
		format!("0 {} *", expression)
	} else {
		// Invalid shape, return as-is and let the parser error
		expression.to_string()
	}
}

/// Parse a cron expression, normalizing the 5-field Unix form.
///
/// An empty (or whitespace-only) expression is reported as
/// [`SchedulerError::EmptySchedule`] so callers can park rather than fail.
pub fn parse(expression: &str) -> Result<Schedule, SchedulerError> {
	let trimmed = expression.trim();
	if trimmed.is_empty() {
		return Err(SchedulerError::EmptySchedule);
	}

	let extended = to_extended_format(trimmed);
	Schedule::from_str(&extended).map_err(|e| SchedulerError::InvalidSchedule {
		expression: expression.to_string(),
		message: e.to_string(),
	})
}

/// The next occurrence strictly after `after`, in UTC.
///
/// Returns `None` when the schedule has no future occurrence.
pub fn next_occurrence(schedule: &Schedule, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
	schedule.after(&after).next()
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use proptest::prelude::*;

	#[test]
	fn test_parse_six_field_seconds_resolution() {
		let schedule = parse("*/1 * * * * *").unwrap();

		let after = Utc.with_ymd_and_hms(2026, 1, 19, 10, 30, 0).unwrap();
		let next = next_occurrence(&schedule, after).unwrap();

		assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 19, 10, 30, 1).unwrap());
	}

	#[test]
	fn test_parse_five_field_normalized() {
		let schedule = parse("*/15 * * * *").unwrap();

		// 2026-01-19 10:32:00 UTC
		let after = Utc.with_ymd_and_hms(2026, 1, 19, 10, 32, 0).unwrap();
		let next = next_occurrence(&schedule, after).unwrap();

		// Should be 2026-01-19 10:45:00 UTC
		assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 19, 10, 45, 0).unwrap());
	}

	#[test]
	fn test_daily_midnight() {
		let schedule = parse("0 0 0 * * *").unwrap();

		let after = Utc.with_ymd_and_hms(2026, 1, 19, 10, 30, 0).unwrap();
		let next = next_occurrence(&schedule, after).unwrap();

		assert_eq!(next.date_naive().to_string(), "2026-01-20");
		assert_eq!(next.time().to_string(), "00:00:00");
	}

	#[test]
	fn test_occurrence_is_strictly_after() {
		let schedule = parse("0 0 12 * * *").unwrap();

		// Exactly at an occurrence: the next one is tomorrow, not now.
		let at_noon = Utc.with_ymd_and_hms(2026, 1, 19, 12, 0, 0).unwrap();
		let next = next_occurrence(&schedule, at_noon).unwrap();

		assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0).unwrap());
	}

	#[test]
	fn test_parse_empty_is_distinct_error() {
		assert!(matches!(parse(""), Err(SchedulerError::EmptySchedule)));
		assert!(matches!(parse("   "), Err(SchedulerError::EmptySchedule)));
	}

	#[test]
	fn test_parse_invalid_expressions() {
		assert!(parse("invalid").is_err());
		assert!(parse("60 0 * * *").is_err()); // minute > 59
		assert!(parse("* * * *").is_err()); // missing field
	}

	#[test]
	fn test_parse_valid_expressions() {
		assert!(parse("0 0 * * *").is_ok());
		assert!(parse("*/15 * * * *").is_ok());
		assert!(parse("0 9 * * 1-5").is_ok());
		assert!(parse("*/30 * * * * *").is_ok());
	}

	proptest! {
		#[test]
		fn prop_next_occurrence_is_in_the_future(
			expression in prop::sample::select(vec![
				"*/1 * * * * *",
				"*/7 * * * * *",
				"0 */5 * * * *",
				"0 0 * * * *",
				"0 30 9 * * 1-5",
				"0 0 0 1 * *",
			]),
			secs in 0i64..4_102_444_800, // up to year 2100
		) {
			let schedule = parse(expression).unwrap();
			let after = Utc.timestamp_opt(secs, 0).unwrap();
			if let Some(next) = next_occurrence(&schedule, after) {
				prop_assert!(next > after);
			}
		}
	}
}
