use std::sync::Arc;

use chrono::{DateTime, Utc};
use lib::{
    auth::{TrainerAuth, VerifiedUserAuth},
    config::Config,
    SharedState,
};
use poem::web::Data;
use poem_ext::{db::DbTxn, response};
use poem_openapi::{param::Path, payload::Json, OpenApi};
use schemas::exercises::submissions::{
    GradeSubmissionRequest, SubmitExerciseRequest, Submission,
};
use uuid::Uuid;

use super::Tags;
use crate::services::{
    exercises::{get_exercise_row, is_visible_to_students},
    submissions::{
        get_submission, grade_submission, list_submissions, submit_exercise, GradeError,
        SubmitError,
    },
};

pub struct Submissions {
    pub state: Arc<SharedState>,
    pub config: Arc<Config>,
}

#[OpenApi(tag = "Tags::Submissions")]
impl Submissions {
    /// List all submissions of an exercise.
    #[oai(path = "/exercises/:exercise_id/submissions", method = "get")]
    async fn list_submissions(
        &self,
        exercise_id: Path<Uuid>,
        db: Data<&DbTxn>,
        _auth: TrainerAuth,
    ) -> ListSubmissions::Response<TrainerAuth> {
        if get_exercise_row(&***db, exercise_id.0).await?.is_none() {
            return ListSubmissions::exercise_not_found();
        }
        ListSubmissions::ok(
            list_submissions(&***db, exercise_id.0)
                .await?
                .into_iter()
                .map(Into::into)
                .collect(),
        )
    }

    /// Get the submission of the current user.
    #[oai(path = "/exercises/:exercise_id/submissions/me", method = "get")]
    async fn get_own_submission(
        &self,
        exercise_id: Path<Uuid>,
        db: Data<&DbTxn>,
        auth: VerifiedUserAuth,
    ) -> GetOwnSubmission::Response<VerifiedUserAuth> {
        match get_submission(&***db, exercise_id.0, auth.0.id).await? {
            Some(submission) => GetOwnSubmission::ok(submission.into()),
            None => GetOwnSubmission::not_found(),
        }
    }

    /// Submit answers for an exercise.
    ///
    /// A previous submission is replaced unless it has been graded by a
    /// trainer. Exercises without open questions are graded immediately.
    #[oai(path = "/exercises/:exercise_id/submissions", method = "post")]
    async fn submit_exercise(
        &self,
        exercise_id: Path<Uuid>,
        data: Json<SubmitExerciseRequest>,
        db: Data<&DbTxn>,
        auth: VerifiedUserAuth,
    ) -> SubmitExercise::Response<VerifiedUserAuth> {
        let Some(exercise) = get_exercise_row(&***db, exercise_id.0).await? else {
            return SubmitExercise::exercise_not_found();
        };
        if !auth.0.is_trainer() && !is_visible_to_students(&***db, &exercise).await? {
            return SubmitExercise::exercise_not_found();
        }
        let enrollment = self
            .state
            .services
            .courses
            .get_enrollment(auth.0.id, &exercise.course_id)
            .await?;
        if enrollment.is_none() && !auth.0.is_trainer() {
            return SubmitExercise::not_enrolled();
        }

        match submit_exercise(
            &***db,
            &self.config.exercises.submissions,
            &exercise,
            auth.0.id,
            enrollment.map(|x| x.reference_start()),
            data.0.answers,
            Utc::now(),
        )
        .await?
        {
            Ok(submission) => SubmitExercise::ok(submission.into()),
            Err(SubmitError::TooManyAnswers(max)) => SubmitExercise::too_many_answers(max),
            Err(SubmitError::NotOpen(open)) => SubmitExercise::not_open(open),
            Err(SubmitError::Closed) => SubmitExercise::closed(),
            Err(SubmitError::AlreadyGraded) => SubmitExercise::already_graded(),
        }
    }

    /// Grade a submission.
    #[oai(path = "/submissions/:submission_id/grade", method = "patch")]
    async fn grade_submission(
        &self,
        submission_id: Path<Uuid>,
        data: Json<GradeSubmissionRequest>,
        db: Data<&DbTxn>,
        auth: TrainerAuth,
    ) -> GradeSubmission::Response<TrainerAuth> {
        match grade_submission(&***db, submission_id.0, auth.0.id, data.0, Utc::now()).await? {
            Ok(submission) => GradeSubmission::ok(submission.into()),
            Err(GradeError::SubmissionNotFound) => GradeSubmission::submission_not_found(),
            Err(GradeError::ScoreTooHigh(max)) => GradeSubmission::score_too_high(max),
        }
    }
}

response!(ListSubmissions = {
    Ok(200) => Vec<Submission>,
    /// Exercise does not exist.
    ExerciseNotFound(404, error),
});

response!(GetOwnSubmission = {
    Ok(200) => Submission,
    /// The user has not submitted anything for this exercise.
    NotFound(404, error),
});

response!(SubmitExercise = {
    Ok(201) => Submission,
    /// Exercise does not exist.
    ExerciseNotFound(404, error),
    /// The user is not enrolled in the course of this exercise.
    NotEnrolled(403, error),
    /// The exercise has not been opened yet. `details` contains the opening date.
    NotOpen(403, error) => DateTime<Utc>,
    /// The exercise does not accept submissions anymore.
    Closed(403, error),
    /// The submission has already been graded by a trainer.
    AlreadyGraded(409, error),
    /// Too many answers. `details` contains the maximum number of answers.
    TooManyAnswers(400, error) => usize,
});

response!(GradeSubmission = {
    Ok(200) => Submission,
    /// Submission does not exist.
    SubmissionNotFound(404, error),
    /// The score exceeds the points of the exercise. `details` contains the maximum score.
    ScoreTooHigh(400, error) => u32,
});
