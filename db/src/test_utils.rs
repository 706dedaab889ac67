//! Databases for tests.
//!
//! The real schema is owned by the API's migrations. [`setup_test_db`] mirrors
//! its storage types as far as SQLite allows (genres as text, password hashes
//! as bytes); [`setup_postgres_test_db`] recreates the API tables verbatim.

use sea_orm::sea_query::{Alias, ColumnDef, Expr, ForeignKey, ForeignKeyAction, Index, Table};
use sea_orm::{ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Set};

use crate::models::permission::{self, MOVIES_READ, MOVIES_WRITE};

pub async fn setup_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to in-memory db");

    create_tables(&db).await;
    insert_permissions(&db).await;

    db
}

/// API schema for Postgres, as created by its migrations.
const POSTGRES_SCHEMA: &[&str] = &[
    "DROP TABLE IF EXISTS users_permissions, permissions, movies, users CASCADE",
    "CREATE EXTENSION IF NOT EXISTS citext",
    "CREATE TABLE users (
        id bigserial PRIMARY KEY,
        created_at timestamp(0) with time zone NOT NULL DEFAULT NOW(),
        name text NOT NULL,
        email citext UNIQUE NOT NULL,
        password_hash bytea NOT NULL,
        activated bool NOT NULL,
        version integer NOT NULL DEFAULT 1
    )",
    "CREATE TABLE movies (
        id bigserial PRIMARY KEY,
        created_at timestamp(0) with time zone NOT NULL DEFAULT NOW(),
        title text NOT NULL,
        year integer NOT NULL,
        runtime integer NOT NULL,
        genres text[] NOT NULL,
        version integer NOT NULL DEFAULT 1
    )",
    "CREATE TABLE permissions (
        id bigserial PRIMARY KEY,
        code text NOT NULL
    )",
    "CREATE TABLE users_permissions (
        user_id bigint NOT NULL REFERENCES users ON DELETE CASCADE,
        permission_id bigint NOT NULL REFERENCES permissions ON DELETE CASCADE,
        PRIMARY KEY (user_id, permission_id)
    )",
];

/// Connects to `url` and replaces the API tables with empty ones.
///
/// Destructive: only point this at a throwaway database.
pub async fn setup_postgres_test_db(url: &str) -> DatabaseConnection {
    let db = Database::connect(url)
        .await
        .expect("Failed to connect to Postgres test db");

    for stmt in POSTGRES_SCHEMA {
        db.execute_unprepared(stmt)
            .await
            .expect("Failed to create Postgres schema");
    }
    insert_permissions(&db).await;

    db
}

async fn insert_permissions(db: &DatabaseConnection) {
    for code in [MOVIES_READ, MOVIES_WRITE] {
        permission::ActiveModel {
            code: Set(code.to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert permission");
    }
}

async fn create_tables(db: &DatabaseConnection) {
    let backend = db.get_database_backend();

    let users = Table::create()
        .table(Alias::new("users"))
        .if_not_exists()
        .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
        .col(ColumnDef::new(Alias::new("created_at")).timestamp_with_time_zone().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
        .col(ColumnDef::new(Alias::new("name")).string().not_null())
        .col(ColumnDef::new(Alias::new("email")).string().not_null().unique_key())
        .col(ColumnDef::new(Alias::new("password_hash")).blob().not_null())
        .col(ColumnDef::new(Alias::new("activated")).boolean().not_null())
        .col(ColumnDef::new(Alias::new("version")).integer().not_null().default(1))
        .to_owned();

    let movies = Table::create()
        .table(Alias::new("movies"))
        .if_not_exists()
        .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
        .col(ColumnDef::new(Alias::new("created_at")).timestamp_with_time_zone().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
        .col(ColumnDef::new(Alias::new("title")).string().not_null())
        .col(ColumnDef::new(Alias::new("year")).integer().not_null())
        .col(ColumnDef::new(Alias::new("runtime")).integer().not_null())
        .col(ColumnDef::new(Alias::new("genres")).text().not_null())
        .col(ColumnDef::new(Alias::new("version")).integer().not_null().default(1))
        .to_owned();

    let permissions = Table::create()
        .table(Alias::new("permissions"))
        .if_not_exists()
        .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
        .col(ColumnDef::new(Alias::new("code")).string().not_null().unique_key())
        .to_owned();

    let users_permissions = Table::create()
        .table(Alias::new("users_permissions"))
        .if_not_exists()
        .col(ColumnDef::new(Alias::new("user_id")).integer().not_null())
        .col(ColumnDef::new(Alias::new("permission_id")).integer().not_null())
        .primary_key(
            Index::create()
                .col(Alias::new("user_id"))
                .col(Alias::new("permission_id")),
        )
        .foreign_key(
            ForeignKey::create()
                .from(Alias::new("users_permissions"), Alias::new("user_id"))
                .to(Alias::new("users"), Alias::new("id"))
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(Alias::new("users_permissions"), Alias::new("permission_id"))
                .to(Alias::new("permissions"), Alias::new("id"))
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned();

    for stmt in [users, movies, permissions, users_permissions] {
        db.execute(backend.build(&stmt))
            .await
            .expect("Failed to create table");
    }
}
