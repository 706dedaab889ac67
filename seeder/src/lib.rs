pub mod cli;
pub mod seed;
pub mod seeds;

use sea_orm::DatabaseConnection;

use crate::seed::{SeedReport, Seeder, run_seeder};
use crate::seeds::{movie::MovieSeeder, user::UserSeeder};

/// Runs every seeder in order: users first, then movies.
pub async fn seed_all(db: &DatabaseConnection) -> SeedReport {
    let mut total = SeedReport::default();

    for seeder in [
        Box::new(UserSeeder) as Box<dyn Seeder>,
        Box::new(MovieSeeder),
    ] {
        total += run_seeder(&*seeder, db).await;
    }

    total
}
