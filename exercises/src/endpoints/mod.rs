use std::sync::Arc;

use lib::{config::Config, SharedState};
use poem_openapi::OpenApi;

use self::{categories::Categories, exercises::Exercises, submissions::Submissions};

mod categories;
mod exercises;
mod submissions;

#[derive(poem_openapi::Tags)]
pub enum Tags {
    /// Endpoints for exercises within a course
    Exercises,
    /// Endpoints for the categories grouping the exercises of a course
    Categories,
    /// Endpoints for submissions of students
    Submissions,
}

pub fn get_api(state: Arc<SharedState>, config: Arc<Config>) -> impl OpenApi {
    (
        Exercises {
            state: state.clone(),
        },
        Categories {
            state: state.clone(),
        },
        Submissions { state, config },
    )
}
