//! Lifecycle dates and status of exercises.
//!
//! All dates are derived from a reference start (the creation timestamp of
//! the exercise, or the enrollment of a student) plus the day offsets stored
//! on the exercise. The same computation serves management views (no
//! submission context) and student views (with submission context).

use chrono::{DateTime, Duration, Utc};
use entity::{exercises_exercises, exercises_submissions};
use schemas::exercises::exercises::ExerciseStatus;

/// Number of days an exercise stays open after its due date if it has no
/// explicit close offset.
pub const DEFAULT_CLOSE_AFTER_DUE_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayOffsets {
    pub open: Option<i32>,
    pub due: Option<i32>,
    pub close: Option<i32>,
}

impl DayOffsets {
    pub fn of(exercise: &exercises_exercises::Model) -> Self {
        Self {
            open: exercise.days_to_open,
            due: exercise.days_to_due,
            close: exercise.days_to_close,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub open: DateTime<Utc>,
    pub due: DateTime<Utc>,
    pub close: DateTime<Utc>,
}

impl Schedule {
    pub fn new(reference_start: DateTime<Utc>, offsets: DayOffsets) -> Self {
        let at = |days: i32| reference_start + Duration::days(days.into());
        let open = at(offsets.open.unwrap_or(0));
        let due = at(offsets.due.unwrap_or(0));
        let close = match offsets.close {
            Some(days) => at(days),
            None => due + Duration::days(DEFAULT_CLOSE_AFTER_DUE_DAYS),
        };
        Self { open, due, close }
    }

    pub fn of(exercise: &exercises_exercises::Model, reference_start: DateTime<Utc>) -> Self {
        Self::new(reference_start, DayOffsets::of(exercise))
    }
}

/// What a student has done for an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Missing,
    Submitted,
    Graded,
}

impl SubmissionState {
    pub fn of(submission: Option<&exercises_submissions::Model>) -> Self {
        match submission {
            Some(submission) if submission.score.is_some() => Self::Graded,
            Some(_) => Self::Submitted,
            None => Self::Missing,
        }
    }
}

/// Computes the status of an exercise at `now`.
///
/// Without a submission context the result is one of `Upcoming`, `Active`,
/// `Overdue` or `Closed`. With a submission context it is one of
/// `Completed`, `Pending`, `Overdue` or `NotStarted`.
pub fn status(
    schedule: &Schedule,
    submission: Option<SubmissionState>,
    now: DateTime<Utc>,
) -> ExerciseStatus {
    match submission {
        None if now < schedule.open => ExerciseStatus::Upcoming,
        None if now <= schedule.due => ExerciseStatus::Active,
        None if now <= schedule.close => ExerciseStatus::Overdue,
        None => ExerciseStatus::Closed,
        Some(SubmissionState::Graded) => ExerciseStatus::Completed,
        Some(SubmissionState::Submitted) => ExerciseStatus::Pending,
        Some(SubmissionState::Missing) if now > schedule.due => ExerciseStatus::Overdue,
        Some(SubmissionState::Missing) => ExerciseStatus::NotStarted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn example() -> Schedule {
        Schedule::new(
            ts("2024-01-01T00:00:00Z"),
            DayOffsets {
                open: Some(2),
                due: Some(5),
                close: None,
            },
        )
    }

    #[test]
    fn test_schedule_dates() {
        let schedule = example();
        assert_eq!(schedule.open, ts("2024-01-03T00:00:00Z"));
        assert_eq!(schedule.due, ts("2024-01-06T00:00:00Z"));
        assert_eq!(schedule.close, ts("2024-01-13T00:00:00Z"));
    }

    #[test]
    fn test_explicit_close() {
        let schedule = Schedule::new(
            ts("2024-01-01T00:00:00Z"),
            DayOffsets {
                open: None,
                due: Some(3),
                close: Some(4),
            },
        );
        assert_eq!(schedule.open, ts("2024-01-01T00:00:00Z"));
        assert_eq!(schedule.close, ts("2024-01-05T00:00:00Z"));
    }

    #[test]
    fn test_missing_offsets() {
        let start = ts("2024-05-01T12:00:00Z");
        let schedule = Schedule::new(start, DayOffsets::default());
        assert_eq!(schedule.open, start);
        assert_eq!(schedule.due, start);
        assert_eq!(schedule.close, ts("2024-05-08T12:00:00Z"));
        assert_eq!(status(&schedule, None, start), ExerciseStatus::Active);
        assert_eq!(
            status(&schedule, None, ts("2024-05-09T00:00:00Z")),
            ExerciseStatus::Closed
        );
    }

    #[test]
    fn test_management_status() {
        let schedule = example();
        for (now, expected) in [
            ("2024-01-02T00:00:00Z", ExerciseStatus::Upcoming),
            ("2024-01-03T00:00:00Z", ExerciseStatus::Active),
            ("2024-01-03T12:00:00Z", ExerciseStatus::Active),
            ("2024-01-06T00:00:00Z", ExerciseStatus::Active),
            ("2024-01-06T01:00:00Z", ExerciseStatus::Overdue),
            ("2024-01-13T00:00:00Z", ExerciseStatus::Overdue),
            ("2024-01-13T01:00:00Z", ExerciseStatus::Closed),
        ] {
            assert_eq!(status(&schedule, None, ts(now)), expected, "at {now}");
        }
    }

    #[test]
    fn test_management_status_is_monotonic() {
        let start = ts("2024-01-01T00:00:00Z");
        let rank = |status| match status {
            ExerciseStatus::Upcoming => 0,
            ExerciseStatus::Active => 1,
            ExerciseStatus::Overdue => 2,
            ExerciseStatus::Closed => 3,
            other => panic!("unexpected status {other:?}"),
        };
        for open in 0..4 {
            for due in 0..6 {
                for close in [None, Some(0), Some(3), Some(9)] {
                    let schedule = Schedule::new(
                        start,
                        DayOffsets {
                            open: Some(open),
                            due: Some(due),
                            close,
                        },
                    );
                    let mut last = 0;
                    for hour in 0..24 * 20 {
                        let now = start + Duration::hours(hour);
                        let current = rank(status(&schedule, None, now));
                        assert!(current >= last, "regressed at hour {hour}");
                        last = current;
                    }
                    assert_eq!(last, 3);
                }
            }
        }
    }

    #[test]
    fn test_student_status() {
        let schedule = example();
        let before_due = ts("2024-01-04T00:00:00Z");
        let after_due = ts("2024-01-07T00:00:00Z");
        let after_close = ts("2024-02-01T00:00:00Z");

        assert_eq!(
            status(&schedule, Some(SubmissionState::Missing), before_due),
            ExerciseStatus::NotStarted
        );
        assert_eq!(
            status(&schedule, Some(SubmissionState::Missing), after_due),
            ExerciseStatus::Overdue
        );
        assert_eq!(
            status(&schedule, Some(SubmissionState::Missing), after_close),
            ExerciseStatus::Overdue
        );
        assert_eq!(
            status(&schedule, Some(SubmissionState::Submitted), after_due),
            ExerciseStatus::Pending
        );
        assert_eq!(
            status(&schedule, Some(SubmissionState::Graded), before_due),
            ExerciseStatus::Completed
        );
    }

    #[test]
    fn test_student_anchor_shifts_due_date() {
        let offsets = DayOffsets {
            open: Some(0),
            due: Some(7),
            close: None,
        };
        let created = Schedule::new(ts("2024-01-01T00:00:00Z"), offsets);
        let enrolled = Schedule::new(ts("2024-03-01T00:00:00Z"), offsets);
        let now = ts("2024-03-05T00:00:00Z");
        assert_eq!(
            status(&created, Some(SubmissionState::Missing), now),
            ExerciseStatus::Overdue
        );
        assert_eq!(
            status(&enrolled, Some(SubmissionState::Missing), now),
            ExerciseStatus::NotStarted
        );
    }
}
