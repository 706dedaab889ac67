use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Query, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectionTrait, QueryFilter};
use serde::Serialize;

use crate::error::ModelError;

/// bcrypt work factor the API uses when it hashes passwords itself.
pub const PASSWORD_COST: u32 = 12;

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// Display name.
    pub name: String,
    /// User's unique email address.
    #[sea_orm(unique)]
    pub email: String,
    /// bcrypt hash bytes (`bytea`); never serialized.
    #[serde(skip_serializing)]
    pub password_hash: Vec<u8>,
    /// Whether the account has been activated.
    pub activated: bool,
    /// Optimistic-locking counter, starts at 1.
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_permission::Entity")]
    UserPermission,
}

impl Related<super::user_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserPermission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Hashes `password` and inserts a new user.
    ///
    /// Only the generated `id` and `version` are read back, so the insert works
    /// whatever type the `email` column has (the API uses `citext`).
    ///
    /// # Errors
    ///
    /// * [`ModelError::DuplicateEmail`] if `email` is already registered.
    /// * [`ModelError::PasswordHash`] if the password could not be hashed.
    /// * [`ModelError::Db`] for any other database failure.
    pub async fn create(
        db: &DbConn,
        name: &str,
        email: &str,
        password: &str,
        activated: bool,
    ) -> Result<Model, ModelError> {
        let password_hash = Self::hash_password(password)?;
        let created_at = Utc::now();

        let row: [SimpleExpr; 5] = [
            created_at.into(),
            name.to_owned().into(),
            email.to_owned().into(),
            password_hash.clone().into(),
            activated.into(),
        ];

        let mut insert = Query::insert();
        insert
            .into_table(Entity)
            .columns([
                Column::CreatedAt,
                Column::Name,
                Column::Email,
                Column::PasswordHash,
                Column::Activated,
            ])
            .values(row)
            .map_err(|e| DbErr::Custom(e.to_string()))?;
        insert.returning(Query::returning().columns([Column::Id, Column::Version]));

        let stmt = db.get_database_backend().build(&insert);
        let returned = db
            .query_one(stmt)
            .await
            .map_err(ModelError::from_user_insert)?
            .ok_or(DbErr::RecordNotInserted)?;

        Ok(Model {
            id: returned.try_get("", "id")?,
            created_at,
            name: name.to_owned(),
            email: email.to_owned(),
            password_hash,
            activated,
            version: returned.try_get("", "version")?,
        })
    }

    pub async fn find_by_email(db: &DbConn, email: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email))
            .one(db)
            .await
    }

    /// Produces the bcrypt hash (as UTF-8 bytes of the `$2b$` string) the API stores.
    pub fn hash_password(password: &str) -> Result<Vec<u8>, ModelError> {
        bcrypt::hash(password, PASSWORD_COST)
            .map(String::into_bytes)
            .map_err(|e| ModelError::PasswordHash(e.to_string()))
    }

    pub fn verify_password(&self, password: &str) -> bool {
        password_matches(&self.password_hash, password)
    }
}

/// Checks `password` against stored hash bytes, as the API's login does.
pub fn password_matches(hash: &[u8], password: &str) -> bool {
    match std::str::from_utf8(hash) {
        Ok(hash) => bcrypt::verify(password, hash).unwrap_or(false),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::PaginatorTrait;

    #[test]
    fn hash_is_bcrypt_with_api_cost() {
        let hash = Model::hash_password("admin123").unwrap();
        let hash = String::from_utf8(hash).unwrap();

        assert!(hash.starts_with("$2b$12$"), "got {hash}");
        assert!(bcrypt::verify("admin123", &hash).unwrap());
    }

    #[tokio::test]
    async fn create_hashes_password_and_keeps_flags() {
        let db = setup_test_db().await;

        let user = Model::create(&db, "Unactivated User", "unactivated@greenlight.go", "unactivated123", false)
            .await
            .expect("insert failed");

        assert_eq!(user.email, "unactivated@greenlight.go");
        assert!(!user.activated);
        assert_eq!(user.version, 1);
        assert!(user.verify_password("unactivated123"));
        assert!(!user.verify_password("wrong"));

        let stored = Model::find_by_email(&db, "unactivated@greenlight.go")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, user.id);
        assert!(stored.verify_password("unactivated123"));
    }

    #[tokio::test]
    async fn second_insert_with_same_email_is_duplicate() {
        let db = setup_test_db().await;

        Model::create(&db, "Admin User", "admin@greenlight.go", "admin123", true)
            .await
            .expect("first insert failed");

        let err = Model::create(&db, "Someone Else", "admin@greenlight.go", "other", true)
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::DuplicateEmail), "got {err:?}");
        assert_eq!(Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_by_email_returns_inserted_user() {
        let db = setup_test_db().await;
        let created = Model::create(&db, "Activated User", "activated@greenlight.go", "activated123", true)
            .await
            .unwrap();

        let found = Model::find_by_email(&db, "activated@greenlight.go").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
        assert!(Model::find_by_email(&db, "nobody@greenlight.go").await.unwrap().is_none());
    }

    #[test]
    fn non_utf8_hash_never_verifies() {
        let user = Model {
            id: 1,
            created_at: Utc::now(),
            name: "Broken".into(),
            email: "broken@greenlight.go".into(),
            password_hash: vec![0xff, 0xfe],
            activated: true,
            version: 1,
        };
        assert!(!user.verify_password("anything"));
    }
}
