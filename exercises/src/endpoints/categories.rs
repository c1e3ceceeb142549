use std::sync::Arc;

use chrono::Utc;
use lib::{
    auth::{TrainerAuth, VerifiedUserAuth},
    SharedState,
};
use poem::web::Data;
use poem_ext::{db::DbTxn, response};
use poem_openapi::{param::Path, payload::Json, OpenApi};
use schemas::exercises::categories::{
    Category, CreateCategoryRequest, ReorderCategoriesRequest, UpdateCategoryRequest,
};
use uuid::Uuid;

use super::Tags;
use crate::services::{
    categories::{
        create_category, delete_category, get_category, list_categories, reorder_categories,
        update_category,
    },
    ReorderMismatch,
};

pub struct Categories {
    pub state: Arc<SharedState>,
}

#[OpenApi(tag = "Tags::Categories")]
impl Categories {
    /// List the categories of a course.
    ///
    /// Deactivated categories are only visible to trainers.
    #[oai(path = "/courses/:course_id/categories", method = "get")]
    async fn list_categories(
        &self,
        course_id: Path<String>,
        db: Data<&DbTxn>,
        auth: VerifiedUserAuth,
    ) -> ListCategories::Response<VerifiedUserAuth> {
        let trainer = auth.0.is_trainer();
        ListCategories::ok(
            list_categories(&***db, &course_id.0)
                .await?
                .into_iter()
                .filter(|category| trainer || category.is_active)
                .map(Into::into)
                .collect(),
        )
    }

    /// Create a new category.
    ///
    /// The category is appended to the end of the categories of the course.
    #[oai(path = "/courses/:course_id/categories", method = "post")]
    async fn create_category(
        &self,
        course_id: Path<String>,
        data: Json<CreateCategoryRequest>,
        db: Data<&DbTxn>,
        _auth: TrainerAuth,
    ) -> CreateCategory::Response<TrainerAuth> {
        let courses = self.state.services.courses.get_courses().await?;
        if !courses.contains_key(&course_id.0) {
            return CreateCategory::course_not_found();
        }
        CreateCategory::ok(
            create_category(&***db, course_id.0, data.0, Utc::now())
                .await?
                .into(),
        )
    }

    /// Update a category.
    #[oai(path = "/categories/:category_id", method = "patch")]
    async fn update_category(
        &self,
        category_id: Path<Uuid>,
        data: Json<UpdateCategoryRequest>,
        db: Data<&DbTxn>,
        _auth: TrainerAuth,
    ) -> UpdateCategory::Response<TrainerAuth> {
        match get_category(&***db, category_id.0).await? {
            Some(category) => {
                UpdateCategory::ok(update_category(&***db, category, data.0).await?.into())
            }
            None => UpdateCategory::not_found(),
        }
    }

    /// Delete a category.
    ///
    /// The exercises of the category are moved to the end of the uncategorized
    /// exercises of the course.
    #[oai(path = "/categories/:category_id", method = "delete")]
    async fn delete_category(
        &self,
        category_id: Path<Uuid>,
        db: Data<&DbTxn>,
        _auth: TrainerAuth,
    ) -> DeleteCategory::Response<TrainerAuth> {
        match get_category(&***db, category_id.0).await? {
            Some(category) => {
                delete_category(&***db, category).await?;
                DeleteCategory::ok()
            }
            None => DeleteCategory::not_found(),
        }
    }

    /// Reorder the categories of a course.
    #[oai(path = "/courses/:course_id/categories/order", method = "put")]
    async fn reorder_categories(
        &self,
        course_id: Path<String>,
        data: Json<ReorderCategoriesRequest>,
        db: Data<&DbTxn>,
        _auth: TrainerAuth,
    ) -> ReorderCategories::Response<TrainerAuth> {
        match reorder_categories(&***db, &course_id.0, &data.0.category_ids).await? {
            Ok(categories) => {
                ReorderCategories::ok(categories.into_iter().map(Into::into).collect())
            }
            Err(ReorderMismatch) => ReorderCategories::categories_mismatch(),
        }
    }
}

response!(ListCategories = {
    Ok(200) => Vec<Category>,
});

response!(CreateCategory = {
    Ok(201) => Category,
    /// Course does not exist.
    CourseNotFound(404, error),
});

response!(UpdateCategory = {
    Ok(200) => Category,
    /// Category does not exist.
    NotFound(404, error),
});

response!(DeleteCategory = {
    Ok(200),
    /// Category does not exist.
    NotFound(404, error),
});

response!(ReorderCategories = {
    Ok(200) => Vec<Category>,
    /// The list does not contain exactly the categories of the course.
    CategoriesMismatch(400, error),
});
