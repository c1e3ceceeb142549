use sea_orm_migration::{prelude::*, sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(ExerciseType::Type)
                    .values([
                        ExerciseType::Form,
                        ExerciseType::Video,
                        ExerciseType::Audio,
                        ExerciseType::Simple,
                        ExerciseType::Spotplayer,
                        ExerciseType::ArvanVideo,
                        ExerciseType::Negavid,
                        ExerciseType::Iframe,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .col(ColumnDef::new(Category::Id).uuid().primary_key())
                    .col(ColumnDef::new(Category::CourseId).text().not_null())
                    .col(ColumnDef::new(Category::Name).text().not_null())
                    .col(ColumnDef::new(Category::OrderIndex).integer().not_null())
                    .col(
                        ColumnDef::new(Category::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Category::CreationTimestamp)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Exercise::Table)
                    .col(ColumnDef::new(Exercise::Id).uuid().primary_key())
                    .col(ColumnDef::new(Exercise::CourseId).text().not_null())
                    .col(ColumnDef::new(Exercise::CategoryId).uuid().null())
                    .col(ColumnDef::new(Exercise::Title).text().not_null())
                    .col(ColumnDef::new(Exercise::Description).text().not_null())
                    .col(
                        ColumnDef::new(Exercise::ExerciseType)
                            .custom(ExerciseType::Type)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Exercise::Difficulty).text().null())
                    .col(ColumnDef::new(Exercise::Points).integer().not_null())
                    .col(ColumnDef::new(Exercise::EstimatedTime).integer().null())
                    .col(ColumnDef::new(Exercise::DaysToOpen).integer().null())
                    .col(ColumnDef::new(Exercise::DaysToDue).integer().null())
                    .col(ColumnDef::new(Exercise::DaysToClose).integer().null())
                    .col(ColumnDef::new(Exercise::OrderIndex).integer().not_null())
                    .col(ColumnDef::new(Exercise::Metadata).json_binary().null())
                    .col(ColumnDef::new(Exercise::FormStructure).json_binary().null())
                    .col(ColumnDef::new(Exercise::Creator).uuid().not_null())
                    .col(
                        ColumnDef::new(Exercise::CreationTimestamp)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Exercise::UpdateTimestamp)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Exercise::Table, Exercise::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("exercises_exercises_ordering_idx")
                    .table(Exercise::Table)
                    .col(Exercise::CourseId)
                    .col(Exercise::CategoryId)
                    .col(Exercise::OrderIndex)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Exercise::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ExerciseType::Type).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub enum Category {
    #[iden = "exercises_categories"]
    Table,
    Id,
    CourseId,
    Name,
    OrderIndex,
    IsActive,
    CreationTimestamp,
}

#[derive(Iden)]
pub enum Exercise {
    #[iden = "exercises_exercises"]
    Table,
    Id,
    CourseId,
    CategoryId,
    Title,
    Description,
    ExerciseType,
    Difficulty,
    Points,
    EstimatedTime,
    DaysToOpen,
    DaysToDue,
    DaysToClose,
    OrderIndex,
    Metadata,
    FormStructure,
    Creator,
    CreationTimestamp,
    UpdateTimestamp,
}

#[derive(Debug, Iden)]
pub enum ExerciseType {
    #[iden = "exercises_exercise_type"]
    Type,
    Form,
    Video,
    Audio,
    Simple,
    Spotplayer,
    ArvanVideo,
    Negavid,
    Iframe,
}
