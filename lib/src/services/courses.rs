use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Service, ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct CoursesService(Service);

impl CoursesService {
    pub(super) fn new(service: Service) -> Self {
        Self(service)
    }

    pub async fn get_courses(&self) -> ServiceResult<HashMap<String, Course>> {
        let courses: Vec<Course> = self
            .0
            .get("/courses")?
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(courses
            .into_iter()
            .map(|course| (course.id.clone(), course))
            .collect())
    }

    /// Map of course id to course title.
    pub async fn get_course_titles(&self) -> ServiceResult<HashMap<String, String>> {
        Ok(self
            .get_courses()
            .await?
            .into_iter()
            .map(|(id, course)| (id, course.title))
            .collect())
    }

    pub async fn get_enrollment(
        &self,
        user_id: Uuid,
        course_id: &str,
    ) -> ServiceResult<Option<Enrollment>> {
        let response = self
            .0
            .get(&format!("/enrollments/{user_id}/{course_id}"))?
            .send()
            .await?;
        match response.status() {
            StatusCode::OK => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(ServiceError::UnexpectedStatusCode(status)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub user_id: Uuid,
    pub course_id: String,
    pub enrolled_at: DateTime<Utc>,
    /// Start of the term the student is enrolled in, if the course runs in terms.
    #[serde(default)]
    pub term_start_date: Option<DateTime<Utc>>,
}

impl Enrollment {
    /// The instant from which exercise day offsets are measured for this student.
    pub fn reference_start(&self) -> DateTime<Utc> {
        self.term_start_date.unwrap_or(self.enrolled_at)
    }
}
