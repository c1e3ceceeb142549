use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::{exercises_exercises, exercises_submissions};
use lib::config::SubmissionsConfig;
use schemas::exercises::{exercises::ExerciseStatus, submissions::GradeSubmissionRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, Unchanged,
};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{
    grading, metadata,
    schedule::{self, Schedule, SubmissionState},
};

/// Submission state of every exercise the student has submitted to.
pub async fn get_submission_states<C: ConnectionTrait>(
    db: &C,
    student_id: Uuid,
) -> Result<HashMap<Uuid, SubmissionState>, DbErr> {
    Ok(exercises_submissions::Entity::find()
        .filter(exercises_submissions::Column::StudentId.eq(student_id))
        .all(db)
        .await?
        .into_iter()
        .map(|x| (x.exercise_id, SubmissionState::of(Some(&x))))
        .collect())
}

pub async fn get_submission<C: ConnectionTrait>(
    db: &C,
    exercise_id: Uuid,
    student_id: Uuid,
) -> Result<Option<exercises_submissions::Model>, DbErr> {
    exercises_submissions::Entity::find()
        .filter(exercises_submissions::Column::ExerciseId.eq(exercise_id))
        .filter(exercises_submissions::Column::StudentId.eq(student_id))
        .one(db)
        .await
}

pub async fn list_submissions<C: ConnectionTrait>(
    db: &C,
    exercise_id: Uuid,
) -> Result<Vec<exercises_submissions::Model>, DbErr> {
    exercises_submissions::Entity::find()
        .filter(exercises_submissions::Column::ExerciseId.eq(exercise_id))
        .order_by_asc(exercises_submissions::Column::SubmittedAt)
        .all(db)
        .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    TooManyAnswers(usize),
    NotOpen(DateTime<Utc>),
    Closed,
    AlreadyGraded,
}

/// Checks that an exercise currently accepts submissions.
pub fn check_window(schedule: &Schedule, now: DateTime<Utc>) -> Result<(), SubmitError> {
    match schedule::status(schedule, None, now) {
        ExerciseStatus::Upcoming => Err(SubmitError::NotOpen(schedule.open)),
        ExerciseStatus::Closed => Err(SubmitError::Closed),
        _ => Ok(()),
    }
}

/// Stores the answers of a student and grades them if possible. A previous
/// submission is replaced unless a trainer has graded it already.
pub async fn submit_exercise<C: ConnectionTrait>(
    db: &C,
    config: &SubmissionsConfig,
    exercise: &exercises_exercises::Model,
    student_id: Uuid,
    reference_start: Option<DateTime<Utc>>,
    answers: HashMap<String, Value>,
    now: DateTime<Utc>,
) -> Result<Result<exercises_submissions::Model, SubmitError>, DbErr> {
    if answers.len() > config.max_answers {
        return Ok(Err(SubmitError::TooManyAnswers(config.max_answers)));
    }
    let schedule = Schedule::of(
        exercise,
        reference_start.unwrap_or_else(|| exercise.creation_timestamp.and_utc()),
    );
    if let Err(err) = check_window(&schedule, now) {
        return Ok(Err(err));
    }

    let previous = get_submission(db, exercise.id, student_id).await?;
    if previous.as_ref().is_some_and(|x| x.grader.is_some()) {
        return Ok(Err(SubmitError::AlreadyGraded));
    }

    let form = metadata::normalize_form_structure(exercise.form_structure.as_ref());
    let grade = grading::grade(exercise.exercise_type, &form, &answers, exercise.points);
    let now = now.naive_utc();
    let values = exercises_submissions::ActiveModel {
        exercise_id: Set(exercise.id),
        student_id: Set(student_id),
        answers: Set(Value::Object(answers.into_iter().collect())),
        score: Set(grade.score),
        completion_percentage: Set(grade.completion_percentage),
        auto_graded: Set(grade.auto_graded()),
        feedback: Set(None),
        grader: Set(None),
        submitted_at: Set(now),
        graded_at: Set(grade.auto_graded().then_some(now)),
        ..Default::default()
    };
    let submission = match previous {
        Some(previous) => {
            exercises_submissions::ActiveModel {
                id: Unchanged(previous.id),
                ..values
            }
            .update(db)
            .await?
        }
        None => {
            exercises_submissions::ActiveModel {
                id: Set(Uuid::new_v4()),
                ..values
            }
            .insert(db)
            .await?
        }
    };
    debug!(
        "student {student_id} submitted exercise {} (score: {:?})",
        exercise.id, submission.score
    );
    Ok(Ok(submission))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeError {
    SubmissionNotFound,
    ScoreTooHigh(u32),
}

pub async fn grade_submission<C: ConnectionTrait>(
    db: &C,
    submission_id: Uuid,
    grader: Uuid,
    data: GradeSubmissionRequest,
    now: DateTime<Utc>,
) -> Result<Result<exercises_submissions::Model, GradeError>, DbErr> {
    let Some(submission) = exercises_submissions::Entity::find_by_id(submission_id)
        .one(db)
        .await?
    else {
        return Ok(Err(GradeError::SubmissionNotFound));
    };
    let Some(exercise) = exercises_exercises::Entity::find_by_id(submission.exercise_id)
        .one(db)
        .await?
    else {
        return Ok(Err(GradeError::SubmissionNotFound));
    };
    let points = exercise.points.max(0) as u32;
    if data.score > points {
        return Ok(Err(GradeError::ScoreTooHigh(points)));
    }

    exercises_submissions::ActiveModel {
        id: Unchanged(submission.id),
        score: Set(Some(data.score as _)),
        auto_graded: Set(false),
        feedback: Set(data.feedback),
        grader: Set(Some(grader)),
        graded_at: Set(Some(now.naive_utc())),
        ..Default::default()
    }
    .update(db)
    .await
    .map(Ok)
}

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::ExercisesExerciseType;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn config() -> SubmissionsConfig {
        SubmissionsConfig { max_answers: 4 }
    }

    fn exercise(exercise_type: ExercisesExerciseType) -> exercises_exercises::Model {
        exercises_exercises::Model {
            id: Uuid::new_v4(),
            course_id: "rust".into(),
            category_id: None,
            title: "Quiz".into(),
            description: String::new(),
            exercise_type,
            difficulty: None,
            points: 10,
            estimated_time: None,
            days_to_open: Some(1),
            days_to_due: Some(3),
            days_to_close: None,
            order_index: 999_999,
            metadata: None,
            form_structure: Some(json!({"questions": [
                {"id": "q1", "correct_answer": "a"},
                {"id": "q2", "correct_answer": "b"},
            ]})),
            creator: Uuid::new_v4(),
            creation_timestamp: ts("2024-01-01T00:00:00Z").naive_utc(),
            update_timestamp: ts("2024-01-01T00:00:00Z").naive_utc(),
        }
    }

    fn submission(exercise_id: Uuid, student_id: Uuid) -> exercises_submissions::Model {
        exercises_submissions::Model {
            id: Uuid::new_v4(),
            exercise_id,
            student_id,
            answers: json!({}),
            score: None,
            completion_percentage: 0,
            auto_graded: false,
            feedback: None,
            grader: None,
            submitted_at: ts("2024-01-02T00:00:00Z").naive_utc(),
            graded_at: None,
        }
    }

    #[test]
    fn test_check_window() {
        let schedule = Schedule::new(
            ts("2024-01-01T00:00:00Z"),
            schedule::DayOffsets {
                open: Some(1),
                due: Some(3),
                close: Some(4),
            },
        );
        assert_eq!(
            check_window(&schedule, ts("2024-01-01T12:00:00Z")),
            Err(SubmitError::NotOpen(ts("2024-01-02T00:00:00Z")))
        );
        assert_eq!(check_window(&schedule, ts("2024-01-03T00:00:00Z")), Ok(()));
        assert_eq!(check_window(&schedule, ts("2024-01-04T12:00:00Z")), Ok(()));
        assert_eq!(
            check_window(&schedule, ts("2024-01-05T00:00:01Z")),
            Err(SubmitError::Closed)
        );
    }

    #[tokio::test]
    async fn test_too_many_answers() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let answers = (0..5).map(|i| (format!("q{i}"), json!("a"))).collect();
        let result = submit_exercise(
            &db,
            &config(),
            &exercise(ExercisesExerciseType::Form),
            Uuid::new_v4(),
            None,
            answers,
            ts("2024-01-03T00:00:00Z"),
        )
        .await
        .unwrap();
        assert_eq!(result, Err(SubmitError::TooManyAnswers(4)));
    }

    #[tokio::test]
    async fn test_submit_uses_enrollment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = submit_exercise(
            &db,
            &config(),
            &exercise(ExercisesExerciseType::Form),
            Uuid::new_v4(),
            Some(ts("2024-06-01T00:00:00Z")),
            HashMap::new(),
            ts("2024-01-03T00:00:00Z"),
        )
        .await
        .unwrap();
        assert_eq!(
            result,
            Err(SubmitError::NotOpen(ts("2024-06-02T00:00:00Z")))
        );
    }

    #[tokio::test]
    async fn test_graded_submission_is_final() {
        let exercise = exercise(ExercisesExerciseType::Form);
        let student_id = Uuid::new_v4();
        let previous = exercises_submissions::Model {
            score: Some(7),
            grader: Some(Uuid::new_v4()),
            ..submission(exercise.id, student_id)
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![previous]])
            .into_connection();

        let result = submit_exercise(
            &db,
            &config(),
            &exercise,
            student_id,
            None,
            HashMap::new(),
            ts("2024-01-03T00:00:00Z"),
        )
        .await
        .unwrap();
        assert_eq!(result, Err(SubmitError::AlreadyGraded));
    }

    #[tokio::test]
    async fn test_submit_form() {
        let exercise = exercise(ExercisesExerciseType::Form);
        let student_id = Uuid::new_v4();
        let stored = exercises_submissions::Model {
            answers: json!({"q1": "a", "q2": "c"}),
            score: Some(5),
            completion_percentage: 100,
            auto_graded: true,
            ..submission(exercise.id, student_id)
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<exercises_submissions::Model>::new()])
            .append_query_results([vec![stored.clone()]])
            .into_connection();

        let answers = [("q1".to_owned(), json!("a")), ("q2".to_owned(), json!("c"))].into();
        let result = submit_exercise(
            &db,
            &config(),
            &exercise,
            student_id,
            None,
            answers,
            ts("2024-01-03T00:00:00Z"),
        )
        .await
        .unwrap();
        assert_eq!(result, Ok(stored));
    }

    #[tokio::test]
    async fn test_grade_score_too_high() {
        let exercise = exercise(ExercisesExerciseType::Simple);
        let submission = submission(exercise.id, Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![submission]])
            .append_query_results([vec![exercise]])
            .into_connection();

        let result = grade_submission(
            &db,
            Uuid::new_v4(),
            Uuid::new_v4(),
            GradeSubmissionRequest {
                score: 11,
                feedback: None,
            },
            Utc::now(),
        )
        .await
        .unwrap();
        assert_eq!(result, Err(GradeError::ScoreTooHigh(10)));
    }
}
