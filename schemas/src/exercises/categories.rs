use chrono::{DateTime, Utc};
use entity::exercises_categories;
use poem_ext::patch_value::PatchValue;
use poem_openapi::Object;
use uuid::Uuid;

#[derive(Debug, Clone, Object)]
pub struct Category {
    /// The unique identifier of the category.
    pub id: Uuid,
    /// The course the category belongs to.
    pub course_id: String,
    /// The name of the category.
    pub name: String,
    /// The position of the category among the categories of its course.
    pub order_index: i32,
    /// Whether the category is shown to students.
    pub is_active: bool,
    /// The creation timestamp of the category.
    pub creation_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Object)]
pub struct CreateCategoryRequest {
    /// The name of the category.
    #[oai(validator(min_length = 1, max_length = 255))]
    pub name: String,
    /// Whether the category is shown to students.
    #[oai(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Object)]
pub struct UpdateCategoryRequest {
    /// The name of the category.
    #[oai(validator(min_length = 1, max_length = 255))]
    pub name: PatchValue<String>,
    /// Whether the category is shown to students.
    pub is_active: PatchValue<bool>,
}

#[derive(Debug, Clone, Object)]
pub struct ReorderCategoriesRequest {
    /// All categories of the course in their new order.
    #[oai(validator(max_items = 1000))]
    pub category_ids: Vec<Uuid>,
}

fn default_active() -> bool {
    true
}

impl From<exercises_categories::Model> for Category {
    fn from(value: exercises_categories::Model) -> Self {
        Self {
            id: value.id,
            course_id: value.course_id,
            name: value.name,
            order_index: value.order_index,
            is_active: value.is_active,
            creation_timestamp: value.creation_timestamp.and_utc(),
        }
    }
}
