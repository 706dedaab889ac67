use async_trait::async_trait;
use db::ModelError;
use db::models::{permission, user};
use sea_orm::{DatabaseConnection, DbErr};
use thiserror::Error;

use crate::seed::{SeedReport, Seeder};

/// A sample account and the permissions it should hold.
#[derive(Debug, Clone, Copy)]
pub struct UserSeed {
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub activated: bool,
    pub permissions: &'static [&'static str],
}

pub const USERS: [UserSeed; 3] = [
    UserSeed {
        name: "Admin User",
        email: "admin@greenlight.go",
        password: "admin123",
        activated: true,
        permissions: &[permission::MOVIES_READ, permission::MOVIES_WRITE],
    },
    UserSeed {
        name: "Activated User",
        email: "activated@greenlight.go",
        password: "activated123",
        activated: true,
        permissions: &[permission::MOVIES_READ],
    },
    UserSeed {
        name: "Unactivated User",
        email: "unactivated@greenlight.go",
        password: "unactivated123",
        activated: false,
        permissions: &[permission::MOVIES_READ],
    },
];

/// Why a single user record was skipped.
#[derive(Debug, Error)]
pub enum SeedFailure {
    #[error("failed to set password for user: {0}")]
    Password(String),

    #[error("a user with this email address already exists")]
    DuplicateEmail,

    #[error("error inserting user: {0}")]
    Insert(DbErr),

    /// The user row exists but holds no permissions.
    #[error("failed to add permissions for user: {0}")]
    Permissions(DbErr),
}

impl From<ModelError> for SeedFailure {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::DuplicateEmail => SeedFailure::DuplicateEmail,
            ModelError::PasswordHash(msg) => SeedFailure::Password(msg),
            ModelError::Db(err) => SeedFailure::Insert(err),
        }
    }
}

/// Inserts one user and grants its permissions, returning the new user ID.
pub async fn seed_user(db: &DatabaseConnection, seed: &UserSeed) -> Result<i64, SeedFailure> {
    let created = user::Model::create(db, seed.name, seed.email, seed.password, seed.activated).await?;

    permission::Model::add_for_user(db, created.id, seed.permissions)
        .await
        .map_err(SeedFailure::Permissions)?;

    Ok(created.id)
}

pub struct UserSeeder;

#[async_trait]
impl Seeder for UserSeeder {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn seed(&self, db: &DatabaseConnection) -> SeedReport {
        let mut report = SeedReport::default();

        for seed in &USERS {
            tracing::info!(email = seed.email, "seeding user...");

            let result = seed_user(db, seed).await;
            match &result {
                Ok(id) => tracing::info!(email = seed.email, id, "successfully seeded user"),
                Err(err) => tracing::error!(email = seed.email, error = %err, "skipping user"),
            }
            report.record(&result);

            tracing::info!(email = seed.email, "done seeding user");
        }

        report
    }
}
