use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::{exercises_categories, exercises_exercises};
use itertools::Itertools;
use lib::services::{ServiceResult, Services};
use schemas::exercises::{
    content::FormStructure,
    exercises::{CreateExerciseRequest, Exercise, UpdateExerciseRequest},
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait, Unchanged,
};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use super::{
    categories::get_course_category,
    metadata, ordering,
    schedule::{self, Schedule, SubmissionState},
    submissions::get_submission_states,
    ExercisesError, ReorderMismatch,
};

/// The exercises of a course sharing one sort key range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Category(Uuid),
    Uncategorized,
}

#[derive(Debug, Default, Clone)]
pub struct ExerciseFilter {
    pub course_id: Option<String>,
    pub group: Option<Group>,
    /// Hide exercises in deactivated categories.
    pub active_categories_only: bool,
}

/// Everything needed to compute the student view of exercises.
#[derive(Debug, Default, Clone)]
pub struct StudentContext {
    /// Reference start per course id. Courses without an entry fall back to
    /// the creation timestamp of the exercise.
    pub reference_starts: HashMap<String, DateTime<Utc>>,
    pub submissions: HashMap<Uuid, SubmissionState>,
}

pub async fn student_context<C: ConnectionTrait>(
    db: &C,
    services: &Services,
    user_id: Uuid,
    course_id: &str,
) -> Result<StudentContext, ExercisesError> {
    let mut reference_starts = HashMap::new();
    if let Some(enrollment) = services.courses.get_enrollment(user_id, course_id).await? {
        reference_starts.insert(course_id.to_owned(), enrollment.reference_start());
    }
    Ok(StudentContext {
        reference_starts,
        submissions: get_submission_states(db, user_id).await?,
    })
}

pub async fn list_exercises<C: ConnectionTrait>(
    db: &C,
    services: &Services,
    filter: &ExerciseFilter,
    student: Option<&StudentContext>,
    now: DateTime<Utc>,
) -> Result<Vec<Exercise>, ExercisesError> {
    let rows = query_exercises(db, filter).await?;
    let course_titles = services.courses.get_course_titles().await?;
    Ok(compose_exercises(rows, &course_titles, student, now))
}

pub async fn query_exercises<C: ConnectionTrait>(
    db: &C,
    filter: &ExerciseFilter,
) -> Result<Vec<exercises_exercises::Model>, DbErr> {
    let mut query = sorted(exercises_exercises::Entity::find());
    if let Some(course_id) = &filter.course_id {
        query = query.filter(exercises_exercises::Column::CourseId.eq(course_id.as_str()));
    }
    match filter.group {
        Some(Group::Category(id)) => {
            query = query.filter(exercises_exercises::Column::CategoryId.eq(id))
        }
        Some(Group::Uncategorized) => {
            query = query.filter(exercises_exercises::Column::CategoryId.is_null())
        }
        None => {}
    }
    if filter.active_categories_only {
        let mut inactive = exercises_categories::Entity::find()
            .filter(exercises_categories::Column::IsActive.eq(false));
        if let Some(course_id) = &filter.course_id {
            inactive =
                inactive.filter(exercises_categories::Column::CourseId.eq(course_id.as_str()));
        }
        let inactive = inactive.all(db).await?.into_iter().map(|c| c.id).collect_vec();
        if !inactive.is_empty() {
            query = query.filter(
                Condition::any()
                    .add(exercises_exercises::Column::CategoryId.is_null())
                    .add(exercises_exercises::Column::CategoryId.is_not_in(inactive)),
            );
        }
    }
    query.all(db).await
}

/// Builds the views of already sorted rows. Rows with unusable metadata are
/// returned without content.
pub fn compose_exercises(
    rows: Vec<exercises_exercises::Model>,
    course_titles: &HashMap<String, String>,
    student: Option<&StudentContext>,
    now: DateTime<Utc>,
) -> Vec<Exercise> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let course_title = course_titles.get(&row.course_id).cloned();
            compose_exercise(row, course_title, Some(i as u64 + 1), student, now)
        })
        .collect()
}

pub fn compose_exercise(
    row: exercises_exercises::Model,
    course_title: Option<String>,
    position: Option<u64>,
    student: Option<&StudentContext>,
    now: DateTime<Utc>,
) -> Exercise {
    let reference_start = student
        .and_then(|student| student.reference_starts.get(&row.course_id).copied())
        .unwrap_or_else(|| row.creation_timestamp.and_utc());
    let schedule = Schedule::of(&row, reference_start);
    let submission = student.map(|student| {
        student
            .submissions
            .get(&row.id)
            .copied()
            .unwrap_or(SubmissionState::Missing)
    });
    let content = metadata::exercise_content(
        row.exercise_type,
        row.metadata.as_ref(),
        row.form_structure.as_ref(),
    );
    Exercise {
        id: row.id,
        course_id: row.course_id,
        course_title,
        category_id: row.category_id,
        title: row.title,
        description: row.description,
        exercise_type: row.exercise_type,
        difficulty: row.difficulty,
        points: unsigned(row.points),
        estimated_time: row.estimated_time.map(unsigned),
        days_to_open: row.days_to_open.map(unsigned),
        days_to_due: row.days_to_due.map(unsigned),
        days_to_close: row.days_to_close.map(unsigned),
        order_index: row.order_index,
        display_number: ordering::display_number(row.order_index),
        position,
        status: schedule::status(&schedule, submission, now),
        open_date: schedule.open,
        due_date: schedule.due,
        close_date: schedule.close,
        content,
        creator: row.creator,
        creation_timestamp: row.creation_timestamp.and_utc(),
        update_timestamp: row.update_timestamp.and_utc(),
    }
}

pub async fn get_exercise_row<C: ConnectionTrait>(
    db: &C,
    exercise_id: Uuid,
) -> Result<Option<exercises_exercises::Model>, DbErr> {
    exercises_exercises::Entity::find_by_id(exercise_id)
        .one(db)
        .await
}

/// Title of a course, `None` if the course catalog does not know it.
pub async fn course_title(services: &Services, course_id: &str) -> ServiceResult<Option<String>> {
    Ok(services.courses.get_course_titles().await?.remove(course_id))
}

/// Builds the view of a single row, positioned within its course.
pub async fn resolve_exercise<C: ConnectionTrait>(
    db: &C,
    course_title: Option<String>,
    row: exercises_exercises::Model,
    student: Option<&StudentContext>,
    now: DateTime<Utc>,
) -> Result<Exercise, DbErr> {
    let course_ids = sorted(exercises_exercises::Entity::find())
        .select_only()
        .column(exercises_exercises::Column::Id)
        .filter(exercises_exercises::Column::CourseId.eq(row.course_id.as_str()))
        .into_tuple::<Uuid>()
        .all(db)
        .await?;
    let position = ordering::continuous_display_number(course_ids, row.id);
    Ok(compose_exercise(row, course_title, position, student, now))
}

pub async fn get_exercise<C: ConnectionTrait>(
    db: &C,
    services: &Services,
    exercise_id: Uuid,
    student: Option<&StudentContext>,
    now: DateTime<Utc>,
) -> Result<Option<Exercise>, ExercisesError> {
    let Some(row) = get_exercise_row(db, exercise_id).await? else {
        return Ok(None);
    };
    let course_title = course_title(services, &row.course_id).await?;
    Ok(Some(
        resolve_exercise(db, course_title, row, student, now).await?,
    ))
}

/// Whether students may see an exercise. Exercises in deactivated categories
/// are hidden.
pub async fn is_visible_to_students<C: ConnectionTrait>(
    db: &C,
    row: &exercises_exercises::Model,
) -> Result<bool, DbErr> {
    let Some(category_id) = row.category_id else {
        return Ok(true);
    };
    Ok(get_course_category(db, &row.course_id, category_id)
        .await?
        .map_or(true, |category| category.is_active))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateExerciseError {
    CourseNotFound,
    CategoryNotFound,
    CategoryFull,
    InvalidMetadata,
}

pub async fn create_exercise<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    course_titles: &HashMap<String, String>,
    data: CreateExerciseRequest,
    creator: Uuid,
    now: DateTime<Utc>,
) -> Result<Result<exercises_exercises::Model, CreateExerciseError>, DbErr> {
    if !course_titles.contains_key(&data.course_id) {
        return Ok(Err(CreateExerciseError::CourseNotFound));
    }
    if !is_valid_metadata(data.metadata.as_ref()) {
        return Ok(Err(CreateExerciseError::InvalidMetadata));
    }
    let order_index = match next_index_for_category(db, &data.course_id, data.category_id).await? {
        Ok(order_index) => order_index,
        Err(AllocationError::CategoryNotFound) => {
            return Ok(Err(CreateExerciseError::CategoryNotFound))
        }
        Err(AllocationError::CategoryFull) => return Ok(Err(CreateExerciseError::CategoryFull)),
    };

    let now = now.naive_utc();
    let exercise = exercises_exercises::ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(data.course_id),
        category_id: Set(data.category_id),
        title: Set(data.title),
        description: Set(data.description),
        exercise_type: Set(data.exercise_type),
        difficulty: Set(data.difficulty),
        points: Set(data.points as _),
        estimated_time: Set(data.estimated_time.map(|x| x as _)),
        days_to_open: Set(data.days_to_open.map(|x| x as _)),
        days_to_due: Set(data.days_to_due.map(|x| x as _)),
        days_to_close: Set(data.days_to_close.map(|x| x as _)),
        order_index: Set(order_index),
        metadata: Set(data.metadata),
        form_structure: Set(data.form_structure.as_ref().map(form_structure_value)),
        creator: Set(creator),
        creation_timestamp: Set(now),
        update_timestamp: Set(now),
    }
    .insert(db)
    .await?;
    debug!(
        "created exercise {} in course {} at {}",
        exercise.id, exercise.course_id, exercise.order_index
    );
    Ok(Ok(exercise))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateExerciseError {
    ExerciseNotFound,
    CategoryNotFound,
    CategoryFull,
    InvalidMetadata,
}

/// Applies a partial update. Moving an exercise to another category appends
/// it to its new group and compacts the group it left.
pub async fn update_exercise<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    exercise_id: Uuid,
    data: UpdateExerciseRequest,
    now: DateTime<Utc>,
) -> Result<Result<exercises_exercises::Model, UpdateExerciseError>, DbErr> {
    let Some(exercise) = get_exercise_row(db, exercise_id).await? else {
        return Ok(Err(UpdateExerciseError::ExerciseNotFound));
    };

    let metadata = data.metadata.get_new(&exercise.metadata);
    if *metadata != exercise.metadata && !is_valid_metadata(metadata.as_ref()) {
        return Ok(Err(UpdateExerciseError::InvalidMetadata));
    }

    let old_category = exercise.category_id;
    let new_category = *data.category_id.get_new(&old_category);
    let moved = new_category != old_category;
    let order_index = if moved {
        match next_index_for_category(db, &exercise.course_id, new_category).await? {
            Ok(order_index) => Set(order_index),
            Err(AllocationError::CategoryNotFound) => {
                return Ok(Err(UpdateExerciseError::CategoryNotFound))
            }
            Err(AllocationError::CategoryFull) => {
                return Ok(Err(UpdateExerciseError::CategoryFull))
            }
        }
    } else {
        Unchanged(exercise.order_index)
    };
    let old_category_order = old_category.map(|_| ordering::category_order_of(exercise.order_index));
    let course_id = exercise.course_id.clone();

    let txn = db.begin().await?;
    let exercise = exercises_exercises::ActiveModel {
        id: Unchanged(exercise.id),
        course_id: Unchanged(exercise.course_id),
        category_id: data.category_id.update(exercise.category_id),
        title: data.title.update(exercise.title),
        description: data.description.update(exercise.description),
        exercise_type: data.exercise_type.update(exercise.exercise_type),
        difficulty: data.difficulty.update(exercise.difficulty),
        points: data.points.map(|x| x as _).update(exercise.points),
        estimated_time: data
            .estimated_time
            .map(|x| x.map(|x| x as _))
            .update(exercise.estimated_time),
        days_to_open: data
            .days_to_open
            .map(|x| x.map(|x| x as _))
            .update(exercise.days_to_open),
        days_to_due: data
            .days_to_due
            .map(|x| x.map(|x| x as _))
            .update(exercise.days_to_due),
        days_to_close: data
            .days_to_close
            .map(|x| x.map(|x| x as _))
            .update(exercise.days_to_close),
        order_index,
        metadata: data.metadata.update(exercise.metadata),
        form_structure: data
            .form_structure
            .map(|x| x.as_ref().map(form_structure_value))
            .update(exercise.form_structure),
        creator: Unchanged(exercise.creator),
        creation_timestamp: Unchanged(exercise.creation_timestamp),
        update_timestamp: Set(now.naive_utc()),
    }
    .update(&txn)
    .await?;
    if moved {
        recalculate_group(&txn, &course_id, old_category, old_category_order).await?;
    }
    txn.commit().await?;

    Ok(Ok(exercise))
}

/// Deletes an exercise. The remaining exercises of its group keep their sort
/// keys. Returns `false` if the exercise does not exist.
pub async fn delete_exercise<C: ConnectionTrait>(db: &C, exercise_id: Uuid) -> Result<bool, DbErr> {
    let result = exercises_exercises::Entity::delete_by_id(exercise_id)
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Assigns new consecutive sort keys to all exercises of a group.
/// `ordered_ids` must contain every member of the group exactly once.
pub async fn reorder_exercises<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    course_id: &str,
    category: Option<&exercises_categories::Model>,
    ordered_ids: &[Uuid],
) -> Result<Result<Vec<(Uuid, i32)>, ReorderMismatch>, DbErr> {
    let members = group_members(db, course_id, category.map(|c| c.id)).await?;
    if !ordering::is_permutation(members.iter().map(|e| e.id), ordered_ids) {
        return Ok(Err(ReorderMismatch));
    }
    let assignments =
        ordering::recalculate_category(category.map(|c| c.order_index), ordered_ids);
    apply_order(db, &members, &assignments).await?;
    Ok(Ok(assignments))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationError {
    CategoryNotFound,
    CategoryFull,
}

/// Returns the sort key for an exercise appended to the end of the given
/// group. A category whose last key reached the end of its range is
/// compacted first.
pub async fn next_index_for_category<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    course_id: &str,
    category_id: Option<Uuid>,
) -> Result<Result<i32, AllocationError>, DbErr> {
    let category_order = match category_id {
        Some(category_id) => match get_course_category(db, course_id, category_id).await? {
            Some(category) => Some(category.order_index),
            None => return Ok(Err(AllocationError::CategoryNotFound)),
        },
        None => None,
    };
    let members = group_members(db, course_id, category_id).await?;
    if category_order.is_some() && !ordering::has_capacity(members.len()) {
        return Ok(Err(AllocationError::CategoryFull));
    }
    let last = members.iter().map(|e| e.order_index).max();
    if let Some(order_index) = ordering::next_key(category_order, last) {
        return Ok(Ok(order_index));
    }

    let ids = members.iter().map(|e| e.id).collect_vec();
    let assignments = ordering::recalculate_category(category_order, &ids);
    apply_order(db, &members, &assignments).await?;
    Ok(Ok(ordering::allocate(category_order, members.len())))
}

/// The exercises of a group in display order.
pub async fn group_members<C: ConnectionTrait>(
    db: &C,
    course_id: &str,
    category_id: Option<Uuid>,
) -> Result<Vec<exercises_exercises::Model>, DbErr> {
    sorted(exercises_exercises::Entity::find())
        .filter(group_condition(course_id, category_id))
        .all(db)
        .await
}

/// Closes the gaps in the sort keys of a group while keeping the relative
/// order of its exercises.
pub async fn recalculate_group<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    course_id: &str,
    category_id: Option<Uuid>,
    category_order: Option<i32>,
) -> Result<(), DbErr> {
    let members = group_members(db, course_id, category_id).await?;
    let ids = members.iter().map(|e| e.id).collect_vec();
    let assignments = ordering::recalculate_category(category_order, &ids);
    apply_order(db, &members, &assignments).await
}

/// Writes the changed sort keys of a group in one transaction.
pub(super) async fn apply_order<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    members: &[exercises_exercises::Model],
    assignments: &[(Uuid, i32)],
) -> Result<(), DbErr> {
    let current = members
        .iter()
        .map(|e| (e.id, e.order_index))
        .collect::<HashMap<_, _>>();
    let changed = assignments
        .iter()
        .filter(|(id, order_index)| current.get(id) != Some(order_index))
        .collect_vec();
    if changed.is_empty() {
        return Ok(());
    }

    let txn = db.begin().await?;
    for &&(id, order_index) in &changed {
        exercises_exercises::Entity::update_many()
            .col_expr(
                exercises_exercises::Column::OrderIndex,
                Expr::value(order_index),
            )
            .filter(exercises_exercises::Column::Id.eq(id))
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;
    debug!("updated order of {} exercise(s)", changed.len());
    Ok(())
}

fn group_condition(course_id: &str, category_id: Option<Uuid>) -> Condition {
    Condition::all()
        .add(exercises_exercises::Column::CourseId.eq(course_id))
        .add(match category_id {
            Some(category_id) => exercises_exercises::Column::CategoryId.eq(category_id),
            None => exercises_exercises::Column::CategoryId.is_null(),
        })
}

fn sorted(query: Select<exercises_exercises::Entity>) -> Select<exercises_exercises::Entity> {
    query
        .order_by_asc(exercises_exercises::Column::OrderIndex)
        .order_by_asc(exercises_exercises::Column::CreationTimestamp)
        .order_by_asc(exercises_exercises::Column::Id)
}

fn is_valid_metadata(metadata: Option<&Value>) -> bool {
    metadata.map_or(true, Value::is_object)
}

fn form_structure_value(form: &FormStructure) -> Value {
    json!({ "questions": form.questions })
}

fn unsigned(x: i32) -> u32 {
    x.max(0) as _
}
