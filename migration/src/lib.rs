#![forbid(unsafe_code)]
#![warn(clippy::dbg_macro, clippy::use_debug)]

pub use sea_orm_migration::prelude::*;

pub struct Migrator;

mod m20240108_091512_exercises_init;
mod m20240219_154003_submissions;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240108_091512_exercises_init::Migration),
            Box::new(m20240219_154003_submissions::Migration),
        ]
    }
}
