use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::{exercises_categories, exercises_exercises};
use schemas::exercises::categories::{CreateCategoryRequest, UpdateCategoryRequest};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait, Unchanged,
};
use tracing::info;
use uuid::Uuid;

use super::{
    exercises::{apply_order, group_members, recalculate_group},
    ordering, ReorderMismatch,
};

pub async fn list_categories<C: ConnectionTrait>(
    db: &C,
    course_id: &str,
) -> Result<Vec<exercises_categories::Model>, DbErr> {
    exercises_categories::Entity::find()
        .filter(exercises_categories::Column::CourseId.eq(course_id))
        .order_by_asc(exercises_categories::Column::OrderIndex)
        .order_by_asc(exercises_categories::Column::CreationTimestamp)
        .all(db)
        .await
}

pub async fn get_category<C: ConnectionTrait>(
    db: &C,
    category_id: Uuid,
) -> Result<Option<exercises_categories::Model>, DbErr> {
    exercises_categories::Entity::find_by_id(category_id)
        .one(db)
        .await
}

pub async fn get_course_category<C: ConnectionTrait>(
    db: &C,
    course_id: &str,
    category_id: Uuid,
) -> Result<Option<exercises_categories::Model>, DbErr> {
    exercises_categories::Entity::find_by_id(category_id)
        .filter(exercises_categories::Column::CourseId.eq(course_id))
        .one(db)
        .await
}

/// Appends a new category to the categories of a course.
pub async fn create_category<C: ConnectionTrait>(
    db: &C,
    course_id: String,
    data: CreateCategoryRequest,
    now: DateTime<Utc>,
) -> Result<exercises_categories::Model, DbErr> {
    let order_index = exercises_categories::Entity::find()
        .filter(exercises_categories::Column::CourseId.eq(course_id.as_str()))
        .count(db)
        .await?;
    exercises_categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(course_id),
        name: Set(data.name),
        order_index: Set(order_index as _),
        is_active: Set(data.is_active),
        creation_timestamp: Set(now.naive_utc()),
    }
    .insert(db)
    .await
}

pub async fn update_category<C: ConnectionTrait>(
    db: &C,
    category: exercises_categories::Model,
    data: UpdateCategoryRequest,
) -> Result<exercises_categories::Model, DbErr> {
    exercises_categories::ActiveModel {
        id: Unchanged(category.id),
        course_id: Unchanged(category.course_id),
        name: data.name.update(category.name),
        order_index: Unchanged(category.order_index),
        is_active: data.is_active.update(category.is_active),
        creation_timestamp: Unchanged(category.creation_timestamp),
    }
    .update(db)
    .await
}

/// Deletes a category. Its exercises are appended to the uncategorized
/// exercises of the course and the remaining categories are renumbered.
pub async fn delete_category<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    category: exercises_categories::Model,
) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    let moved = group_members(&txn, &category.course_id, Some(category.id)).await?;
    let mut uncategorized = group_members(&txn, &category.course_id, None).await?;
    exercises_exercises::Entity::update_many()
        .col_expr(
            exercises_exercises::Column::CategoryId,
            Expr::value(Option::<Uuid>::None),
        )
        .filter(exercises_exercises::Column::CategoryId.eq(category.id))
        .exec(&txn)
        .await?;
    let moved_count = moved.len();
    uncategorized.extend(moved);
    let ids = uncategorized.iter().map(|e| e.id).collect::<Vec<_>>();
    apply_order(
        &txn,
        &uncategorized,
        &ordering::recalculate_category(None, &ids),
    )
    .await?;

    exercises_categories::Entity::delete_by_id(category.id)
        .exec(&txn)
        .await?;

    let remaining = list_categories(&txn, &category.course_id).await?;
    let ids = remaining.iter().map(|c| c.id).collect::<Vec<_>>();
    apply_category_order(&txn, &remaining, &ids).await?;

    txn.commit().await?;
    info!(
        "deleted category {} of course {}, {} exercise(s) moved to uncategorized",
        category.id, category.course_id, moved_count
    );
    Ok(())
}

/// Assigns new consecutive orders to all categories of a course and moves
/// their exercises accordingly. `ordered_ids` must contain every category of
/// the course exactly once.
pub async fn reorder_categories<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    course_id: &str,
    ordered_ids: &[Uuid],
) -> Result<Result<Vec<exercises_categories::Model>, ReorderMismatch>, DbErr> {
    let categories = list_categories(db, course_id).await?;
    if !ordering::is_permutation(categories.iter().map(|c| c.id), ordered_ids) {
        return Ok(Err(ReorderMismatch));
    }

    let txn = db.begin().await?;
    apply_category_order(&txn, &categories, ordered_ids).await?;
    txn.commit().await?;

    Ok(Ok(list_categories(db, course_id).await?))
}

async fn apply_category_order<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    categories: &[exercises_categories::Model],
    ordered_ids: &[Uuid],
) -> Result<(), DbErr> {
    let categories = categories
        .iter()
        .map(|c| (c.id, c))
        .collect::<HashMap<_, _>>();
    for (order, id) in ordered_ids.iter().enumerate() {
        let order =
            i32::try_from(order).map_err(|_| DbErr::Custom("too many categories".into()))?;
        let Some(category) = categories.get(id) else {
            continue;
        };
        if category.order_index == order {
            continue;
        }
        exercises_categories::Entity::update_many()
            .col_expr(exercises_categories::Column::OrderIndex, Expr::value(order))
            .filter(exercises_categories::Column::Id.eq(*id))
            .exec(db)
            .await?;
        recalculate_group(db, &category.course_id, Some(*id), Some(order)).await?;
    }
    Ok(())
}
