use std::sync::Arc;

use chrono::Utc;
use lib::{
    auth::{TrainerAuth, VerifiedUserAuth},
    SharedState,
};
use poem::web::Data;
use poem_ext::{db::DbTxn, response};
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi,
};
use schemas::exercises::exercises::{
    CreateExerciseRequest, Exercise, ReorderExercisesRequest, UpdateExerciseRequest,
};
use uuid::Uuid;

use super::Tags;
use crate::services::{
    categories::get_category,
    exercises::{
        course_title, create_exercise, delete_exercise, get_exercise, get_exercise_row,
        is_visible_to_students, list_exercises, reorder_exercises, resolve_exercise,
        student_context, update_exercise, CreateExerciseError, ExerciseFilter, Group,
        UpdateExerciseError,
    },
    ReorderMismatch,
};

pub struct Exercises {
    pub state: Arc<SharedState>,
}

#[OpenApi(tag = "Tags::Exercises")]
impl Exercises {
    /// List exercises for course management.
    ///
    /// Statuses are computed relative to the creation of each exercise.
    #[oai(path = "/exercises", method = "get")]
    async fn list_exercises(
        &self,
        /// Filter by course.
        course_id: Query<Option<String>>,
        /// Filter by category.
        category_id: Query<Option<Uuid>>,
        /// Only return exercises without a category.
        uncategorized: Query<Option<bool>>,
        db: Data<&DbTxn>,
        _auth: TrainerAuth,
    ) -> ListExercises::Response<TrainerAuth> {
        let group = match (category_id.0, uncategorized.0) {
            (Some(category_id), _) => Some(Group::Category(category_id)),
            (None, Some(true)) => Some(Group::Uncategorized),
            (None, _) => None,
        };
        let filter = ExerciseFilter {
            course_id: course_id.0,
            group,
            active_categories_only: false,
        };
        ListExercises::ok(
            list_exercises(&***db, &self.state.services, &filter, None, Utc::now()).await?,
        )
    }

    /// List the exercises of a course for the current student.
    ///
    /// Dates are computed relative to the enrollment of the student and
    /// statuses reflect their submissions. Exercises in deactivated categories
    /// are hidden.
    #[oai(path = "/courses/:course_id/exercises", method = "get")]
    async fn list_course_exercises(
        &self,
        course_id: Path<String>,
        db: Data<&DbTxn>,
        auth: VerifiedUserAuth,
    ) -> ListCourseExercises::Response<VerifiedUserAuth> {
        let student =
            student_context(&***db, &self.state.services, auth.0.id, &course_id.0).await?;
        let filter = ExerciseFilter {
            course_id: Some(course_id.0),
            group: None,
            active_categories_only: true,
        };
        ListCourseExercises::ok(
            list_exercises(
                &***db,
                &self.state.services,
                &filter,
                Some(&student),
                Utc::now(),
            )
            .await?,
        )
    }

    /// Get an exercise by id.
    ///
    /// Trainers receive the management view, everyone else the student view.
    /// Exercises in deactivated categories are only visible to trainers.
    #[oai(path = "/exercises/:exercise_id", method = "get")]
    async fn get_exercise(
        &self,
        exercise_id: Path<Uuid>,
        db: Data<&DbTxn>,
        auth: VerifiedUserAuth,
    ) -> GetExercise::Response<VerifiedUserAuth> {
        let now = Utc::now();
        if auth.0.is_trainer() {
            return match get_exercise(&***db, &self.state.services, exercise_id.0, None, now)
                .await?
            {
                Some(exercise) => GetExercise::ok(exercise),
                None => GetExercise::not_found(),
            };
        }

        let Some(row) = get_exercise_row(&***db, exercise_id.0).await? else {
            return GetExercise::not_found();
        };
        if !is_visible_to_students(&***db, &row).await? {
            return GetExercise::not_found();
        }
        let student =
            student_context(&***db, &self.state.services, auth.0.id, &row.course_id).await?;
        let title = course_title(&self.state.services, &row.course_id).await?;
        GetExercise::ok(resolve_exercise(&***db, title, row, Some(&student), now).await?)
    }

    /// Create a new exercise.
    ///
    /// The exercise is appended to the end of its category.
    #[oai(path = "/exercises", method = "post")]
    async fn create_exercise(
        &self,
        data: Json<CreateExerciseRequest>,
        db: Data<&DbTxn>,
        auth: TrainerAuth,
    ) -> CreateExercise::Response<TrainerAuth> {
        let course_titles = self.state.services.courses.get_course_titles().await?;
        let now = Utc::now();
        let row = match create_exercise(&***db, &course_titles, data.0, auth.0.id, now).await? {
            Ok(row) => row,
            Err(CreateExerciseError::CourseNotFound) => return CreateExercise::course_not_found(),
            Err(CreateExerciseError::CategoryNotFound) => {
                return CreateExercise::category_not_found()
            }
            Err(CreateExerciseError::CategoryFull) => return CreateExercise::category_full(),
            Err(CreateExerciseError::InvalidMetadata) => {
                return CreateExercise::invalid_metadata()
            }
        };
        let title = course_titles.get(&row.course_id).cloned();
        CreateExercise::ok(resolve_exercise(&***db, title, row, None, now).await?)
    }

    /// Update an exercise.
    ///
    /// Moving an exercise to another category appends it to the end of the
    /// new category.
    #[oai(path = "/exercises/:exercise_id", method = "patch")]
    async fn update_exercise(
        &self,
        exercise_id: Path<Uuid>,
        data: Json<UpdateExerciseRequest>,
        db: Data<&DbTxn>,
        _auth: TrainerAuth,
    ) -> UpdateExercise::Response<TrainerAuth> {
        let now = Utc::now();
        let row = match update_exercise(&***db, exercise_id.0, data.0, now).await? {
            Ok(row) => row,
            Err(UpdateExerciseError::ExerciseNotFound) => {
                return UpdateExercise::exercise_not_found()
            }
            Err(UpdateExerciseError::CategoryNotFound) => {
                return UpdateExercise::category_not_found()
            }
            Err(UpdateExerciseError::CategoryFull) => return UpdateExercise::category_full(),
            Err(UpdateExerciseError::InvalidMetadata) => {
                return UpdateExercise::invalid_metadata()
            }
        };
        let title = course_title(&self.state.services, &row.course_id).await?;
        UpdateExercise::ok(resolve_exercise(&***db, title, row, None, now).await?)
    }

    /// Delete an exercise.
    ///
    /// This will also delete all submissions for this exercise!
    #[oai(path = "/exercises/:exercise_id", method = "delete")]
    async fn delete_exercise(
        &self,
        exercise_id: Path<Uuid>,
        db: Data<&DbTxn>,
        _auth: TrainerAuth,
    ) -> DeleteExercise::Response<TrainerAuth> {
        match delete_exercise(&***db, exercise_id.0).await? {
            true => DeleteExercise::ok(),
            false => DeleteExercise::exercise_not_found(),
        }
    }

    /// Reorder the exercises of a category.
    #[oai(path = "/categories/:category_id/exercises/order", method = "put")]
    async fn reorder_category_exercises(
        &self,
        category_id: Path<Uuid>,
        data: Json<ReorderExercisesRequest>,
        db: Data<&DbTxn>,
        _auth: TrainerAuth,
    ) -> ReorderExercises::Response<TrainerAuth> {
        let Some(category) = get_category(&***db, category_id.0).await? else {
            return ReorderExercises::category_not_found();
        };
        match reorder_exercises(
            &***db,
            &category.course_id,
            Some(&category),
            &data.0.exercise_ids,
        )
        .await?
        {
            Ok(_) => {}
            Err(ReorderMismatch) => return ReorderExercises::exercises_mismatch(),
        }
        let filter = ExerciseFilter {
            course_id: Some(category.course_id),
            group: Some(Group::Category(category.id)),
            active_categories_only: false,
        };
        ReorderExercises::ok(
            list_exercises(&***db, &self.state.services, &filter, None, Utc::now()).await?,
        )
    }

    /// Reorder the exercises of a course that do not belong to a category.
    #[oai(path = "/courses/:course_id/exercises/order", method = "put")]
    async fn reorder_uncategorized_exercises(
        &self,
        course_id: Path<String>,
        data: Json<ReorderExercisesRequest>,
        db: Data<&DbTxn>,
        _auth: TrainerAuth,
    ) -> ReorderExercises::Response<TrainerAuth> {
        match reorder_exercises(&***db, &course_id.0, None, &data.0.exercise_ids).await? {
            Ok(_) => {}
            Err(ReorderMismatch) => return ReorderExercises::exercises_mismatch(),
        }
        let filter = ExerciseFilter {
            course_id: Some(course_id.0),
            group: Some(Group::Uncategorized),
            active_categories_only: false,
        };
        ReorderExercises::ok(
            list_exercises(&***db, &self.state.services, &filter, None, Utc::now()).await?,
        )
    }
}

response!(ListExercises = {
    Ok(200) => Vec<Exercise>,
});

response!(ListCourseExercises = {
    Ok(200) => Vec<Exercise>,
});

response!(GetExercise = {
    Ok(200) => Exercise,
    /// Exercise does not exist.
    NotFound(404, error),
});

response!(CreateExercise = {
    Ok(201) => Exercise,
    /// Course does not exist.
    CourseNotFound(404, error),
    /// Category does not exist in this course.
    CategoryNotFound(404, error),
    /// The category cannot hold any more exercises.
    CategoryFull(409, error),
    /// The metadata is not a JSON object.
    InvalidMetadata(400, error),
});

response!(UpdateExercise = {
    Ok(200) => Exercise,
    /// Exercise does not exist.
    ExerciseNotFound(404, error),
    /// Category does not exist in the course of this exercise.
    CategoryNotFound(404, error),
    /// The category cannot hold any more exercises.
    CategoryFull(409, error),
    /// The metadata is not a JSON object.
    InvalidMetadata(400, error),
});

response!(DeleteExercise = {
    Ok(200),
    /// Exercise does not exist.
    ExerciseNotFound(404, error),
});

response!(ReorderExercises = {
    Ok(200) => Vec<Exercise>,
    /// Category does not exist.
    CategoryNotFound(404, error),
    /// The list does not contain exactly the exercises of the group.
    ExercisesMismatch(400, error),
});
