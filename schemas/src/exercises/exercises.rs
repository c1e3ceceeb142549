use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::ExercisesExerciseType;
use poem_ext::patch_value::PatchValue;
use poem_openapi::{Enum, Object};
use serde_json::Value;
use uuid::Uuid;

use super::content::{ExerciseContent, FormStructure};

#[derive(Debug, Clone, Object)]
pub struct Exercise {
    /// The unique identifier of the exercise.
    pub id: Uuid,
    /// The course the exercise belongs to.
    pub course_id: String,
    /// The title of the course. Null if the course catalog does not know it.
    pub course_title: Option<String>,
    /// The category of the exercise. Null for uncategorized exercises.
    pub category_id: Option<Uuid>,
    /// The title of the exercise.
    pub title: String,
    /// The description of the exercise.
    pub description: String,
    /// The type of the exercise.
    pub exercise_type: ExercisesExerciseType,
    /// The difficulty of the exercise.
    pub difficulty: Option<String>,
    /// The number of points a student can get for this exercise.
    pub points: u32,
    /// The estimated time (in minutes) needed to complete the exercise.
    pub estimated_time: Option<u32>,
    /// Days from the reference start until the exercise opens.
    pub days_to_open: Option<u32>,
    /// Days from the reference start until the exercise is due.
    pub days_to_due: Option<u32>,
    /// Days from the reference start until the exercise closes.
    pub days_to_close: Option<u32>,
    /// The sort key of the exercise.
    pub order_index: i32,
    /// The 1-based position of the exercise within its category.
    pub display_number: i32,
    /// The 1-based position of the exercise within the returned list.
    pub position: Option<u64>,
    /// The current state of the exercise.
    pub status: ExerciseStatus,
    /// The timestamp at which the exercise opens.
    pub open_date: DateTime<Utc>,
    /// The timestamp at which the exercise is due.
    pub due_date: DateTime<Utc>,
    /// The timestamp at which the exercise closes.
    pub close_date: DateTime<Utc>,
    /// The typed content of the exercise. Null if the stored metadata is
    /// missing or unusable.
    pub content: Option<ExerciseContent>,
    /// The creator of the exercise.
    pub creator: Uuid,
    /// The creation timestamp of the exercise.
    pub creation_timestamp: DateTime<Utc>,
    /// The timestamp of the last update of the exercise.
    pub update_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Enum)]
#[oai(rename_all = "snake_case")]
pub enum ExerciseStatus {
    /// The exercise has not been opened yet.
    Upcoming,
    /// The exercise is open and not yet due.
    Active,
    /// The exercise is past its due date but still accepts submissions.
    Overdue,
    /// The exercise does not accept submissions anymore.
    Closed,
    /// The student has not submitted anything yet.
    NotStarted,
    /// The student has submitted and is waiting for a grade.
    Pending,
    /// The student's submission has been graded.
    Completed,
}

#[derive(Debug, Clone, Object)]
pub struct CreateExerciseRequest {
    /// The course the exercise belongs to.
    #[oai(validator(max_length = 255))]
    pub course_id: String,
    /// The category of the exercise. Omit for uncategorized exercises.
    pub category_id: Option<Uuid>,
    /// The title of the exercise.
    #[oai(validator(min_length = 1, max_length = 255))]
    pub title: String,
    /// The description of the exercise.
    #[oai(validator(max_length = 16384), default)]
    pub description: String,
    /// The type of the exercise.
    pub exercise_type: ExercisesExerciseType,
    /// The difficulty of the exercise.
    #[oai(validator(max_length = 64))]
    pub difficulty: Option<String>,
    /// The number of points a student can get for this exercise.
    #[oai(validator(maximum(value = "2147483647")), default)]
    pub points: u32,
    /// The estimated time (in minutes) needed to complete the exercise.
    #[oai(validator(maximum(value = "2147483647")))]
    pub estimated_time: Option<u32>,
    /// Days from the reference start until the exercise opens.
    #[oai(validator(maximum(value = "36500")))]
    pub days_to_open: Option<u32>,
    /// Days from the reference start until the exercise is due.
    #[oai(validator(maximum(value = "36500")))]
    pub days_to_due: Option<u32>,
    /// Days from the reference start until the exercise closes. Defaults to
    /// one week after the due date.
    #[oai(validator(maximum(value = "36500")))]
    pub days_to_close: Option<u32>,
    /// Provider specific configuration. Must be an object.
    pub metadata: Option<Value>,
    /// The questions of a form exercise.
    pub form_structure: Option<FormStructure>,
}

#[derive(Debug, Clone, Object)]
pub struct UpdateExerciseRequest {
    /// The category of the exercise. Moving an exercise appends it to the end
    /// of the new category.
    pub category_id: PatchValue<Option<Uuid>>,
    /// The title of the exercise.
    #[oai(validator(min_length = 1, max_length = 255))]
    pub title: PatchValue<String>,
    /// The description of the exercise.
    #[oai(validator(max_length = 16384))]
    pub description: PatchValue<String>,
    /// The type of the exercise.
    pub exercise_type: PatchValue<ExercisesExerciseType>,
    /// The difficulty of the exercise.
    #[oai(validator(max_length = 64))]
    pub difficulty: PatchValue<Option<String>>,
    /// The number of points a student can get for this exercise.
    #[oai(validator(maximum(value = "2147483647")))]
    pub points: PatchValue<u32>,
    /// The estimated time (in minutes) needed to complete the exercise.
    #[oai(validator(maximum(value = "2147483647")))]
    pub estimated_time: PatchValue<Option<u32>>,
    /// Days from the reference start until the exercise opens.
    #[oai(validator(maximum(value = "36500")))]
    pub days_to_open: PatchValue<Option<u32>>,
    /// Days from the reference start until the exercise is due.
    #[oai(validator(maximum(value = "36500")))]
    pub days_to_due: PatchValue<Option<u32>>,
    /// Days from the reference start until the exercise closes.
    #[oai(validator(maximum(value = "36500")))]
    pub days_to_close: PatchValue<Option<u32>>,
    /// Provider specific configuration. Must be an object.
    pub metadata: PatchValue<Option<Value>>,
    /// The questions of a form exercise.
    pub form_structure: PatchValue<Option<FormStructure>>,
}

#[derive(Debug, Clone, Object)]
pub struct ReorderExercisesRequest {
    /// All exercises of the group in their new order.
    pub exercise_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use poem_openapi::types::ParseFromJSON;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_reorder_request_accepts_large_groups() {
        let ids = (0..1500).map(|_| Uuid::new_v4()).collect::<Vec<_>>();
        let request =
            ReorderExercisesRequest::parse_from_json(Some(json!({ "exercise_ids": &ids }))).unwrap();
        assert_eq!(request.exercise_ids, ids);
    }
}
