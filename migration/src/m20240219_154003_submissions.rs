use sea_orm_migration::prelude::*;

use crate::m20240108_091512_exercises_init::Exercise;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .col(ColumnDef::new(Submission::Id).uuid().primary_key())
                    .col(ColumnDef::new(Submission::ExerciseId).uuid().not_null())
                    .col(ColumnDef::new(Submission::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Submission::Answers).json_binary().not_null())
                    .col(ColumnDef::new(Submission::Score).integer().null())
                    .col(
                        ColumnDef::new(Submission::CompletionPercentage)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submission::AutoGraded).boolean().not_null())
                    .col(ColumnDef::new(Submission::Feedback).text().null())
                    .col(ColumnDef::new(Submission::Grader).uuid().null())
                    .col(
                        ColumnDef::new(Submission::SubmittedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submission::GradedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submission::Table, Submission::ExerciseId)
                            .to(Exercise::Table, Exercise::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("exercises_submissions_exercise_student_idx")
                    .table(Submission::Table)
                    .col(Submission::ExerciseId)
                    .col(Submission::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Submission {
    #[iden = "exercises_submissions"]
    Table,
    Id,
    ExerciseId,
    StudentId,
    Answers,
    Score,
    CompletionPercentage,
    AutoGraded,
    Feedback,
    Grader,
    SubmittedAt,
    GradedAt,
}
