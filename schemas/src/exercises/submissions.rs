use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::exercises_submissions;
use poem_openapi::Object;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Object)]
pub struct Submission {
    /// The unique identifier of the submission.
    pub id: Uuid,
    /// The exercise this submission belongs to.
    pub exercise_id: Uuid,
    /// The student who submitted.
    pub student_id: Uuid,
    /// The answers of the student, keyed by question id.
    pub answers: HashMap<String, Value>,
    /// The score of the submission. Null if it has not been graded yet.
    pub score: Option<u32>,
    /// Percentage of questions the student has answered.
    pub completion_percentage: u32,
    /// Whether the score has been computed automatically.
    pub auto_graded: bool,
    /// Feedback of the grader.
    pub feedback: Option<String>,
    /// The trainer who graded the submission.
    pub grader: Option<Uuid>,
    /// The timestamp of the (latest) submission.
    pub submitted_at: DateTime<Utc>,
    /// The timestamp at which the submission has been graded.
    pub graded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Object)]
pub struct SubmitExerciseRequest {
    /// The answers of the student, keyed by question id. May be empty for
    /// exercises without questions.
    #[oai(default)]
    pub answers: HashMap<String, Value>,
}

#[derive(Debug, Clone, Object)]
pub struct GradeSubmissionRequest {
    /// The score of the submission. Must not exceed the points of the exercise.
    pub score: u32,
    /// Feedback for the student.
    #[oai(validator(max_length = 4096))]
    pub feedback: Option<String>,
}

impl From<exercises_submissions::Model> for Submission {
    fn from(value: exercises_submissions::Model) -> Self {
        Self {
            id: value.id,
            exercise_id: value.exercise_id,
            student_id: value.student_id,
            answers: match value.answers {
                Value::Object(answers) => answers.into_iter().collect(),
                _ => HashMap::new(),
            },
            score: value.score.map(|x| x.max(0) as _),
            completion_percentage: value.completion_percentage.clamp(0, 100) as _,
            auto_graded: value.auto_graded,
            feedback: value.feedback,
            grader: value.grader,
            submitted_at: value.submitted_at.and_utc(),
            graded_at: value.graded_at.map(|ts| ts.and_utc()),
        }
    }
}
