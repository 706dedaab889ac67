use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Query, SimpleExpr};
use sea_orm::{ConnectionTrait, DbBackend};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Runtime in minutes.
    pub runtime: i32,
    /// `text[]` in the API schema.
    pub genres: Vec<String>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Binds a genre list for `backend`.
///
/// Postgres gets a native `text[]`; SQLite has no array type and stores the
/// list as a JSON array in a text column.
pub fn genres_value(backend: DbBackend, genres: &[&str]) -> Result<Value, DbErr> {
    match backend {
        DbBackend::Postgres => Ok(genres
            .iter()
            .map(|g| (*g).to_owned())
            .collect::<Vec<String>>()
            .into()),
        _ => serde_json::to_string(genres)
            .map(Value::from)
            .map_err(|e| DbErr::Custom(format!("failed to encode genres: {e}"))),
    }
}

impl Model {
    pub async fn create(
        db: &DbConn,
        title: &str,
        year: i32,
        runtime: i32,
        genres: &[&str],
    ) -> Result<Model, DbErr> {
        let backend = db.get_database_backend();
        let created_at = Utc::now();

        let row: [SimpleExpr; 5] = [
            created_at.into(),
            title.to_owned().into(),
            year.into(),
            runtime.into(),
            genres_value(backend, genres)?.into(),
        ];

        let mut insert = Query::insert();
        insert
            .into_table(Entity)
            .columns([
                Column::CreatedAt,
                Column::Title,
                Column::Year,
                Column::Runtime,
                Column::Genres,
            ])
            .values(row)
            .map_err(|e| DbErr::Custom(e.to_string()))?;
        insert.returning(Query::returning().columns([Column::Id, Column::Version]));

        let returned = db
            .query_one(backend.build(&insert))
            .await?
            .ok_or(DbErr::RecordNotInserted)?;

        Ok(Model {
            id: returned.try_get("", "id")?,
            created_at,
            title: title.to_owned(),
            year,
            runtime,
            genres: genres.iter().map(|g| (*g).to_owned()).collect(),
            version: returned.try_get("", "version")?,
        })
    }
}
