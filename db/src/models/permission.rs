use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryFilter;
use serde::Serialize;

use super::user_permission;

pub const MOVIES_READ: &str = "movies:read";
pub const MOVIES_WRITE: &str = "movies:write";

/// A named capability such as `movies:read`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
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
    /// Grants every permission in `codes` to the user.
    ///
    /// Codes with no row in `permissions` are ignored. Returns the number of
    /// grants written.
    pub async fn add_for_user(db: &DbConn, user_id: i64, codes: &[&str]) -> Result<u64, DbErr> {
        let permissions = Entity::find()
            .filter(Column::Code.is_in(codes.iter().copied()))
            .all(db)
            .await?;

        if permissions.is_empty() {
            return Ok(0);
        }

        let grants = permissions.iter().map(|p| user_permission::ActiveModel {
            user_id: Set(user_id),
            permission_id: Set(p.id),
        });

        user_permission::Entity::insert_many(grants)
            .exec_without_returning(db)
            .await
    }

    /// Returns the permission codes granted to a user, sorted.
    pub async fn all_for_user(db: &DbConn, user_id: i64) -> Result<Vec<String>, DbErr> {
        let mut codes: Vec<String> = Entity::find()
            .inner_join(user_permission::Entity)
            .filter(user_permission::Column::UserId.eq(user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|p| p.code)
            .collect();
        codes.sort();
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn grants_known_codes_and_skips_unknown() {
        let db = setup_test_db().await;
        let u = user::Model::create(&db, "Admin User", "admin@greenlight.go", "admin123", true)
            .await
            .unwrap();

        let written = Model::add_for_user(&db, u.id, &[MOVIES_READ, MOVIES_WRITE, "movies:delete"])
            .await
            .unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            Model::all_for_user(&db, u.id).await.unwrap(),
            vec![MOVIES_READ.to_string(), MOVIES_WRITE.to_string()]
        );
    }

    #[tokio::test]
    async fn no_known_codes_writes_nothing() {
        let db = setup_test_db().await;
        let u = user::Model::create(&db, "Activated User", "activated@greenlight.go", "activated123", true)
            .await
            .unwrap();

        assert_eq!(Model::add_for_user(&db, u.id, &["comments:read"]).await.unwrap(), 0);
        assert_eq!(Model::add_for_user(&db, u.id, &[]).await.unwrap(), 0);
        assert!(Model::all_for_user(&db, u.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn granting_twice_fails() {
        let db = setup_test_db().await;
        let u = user::Model::create(&db, "Activated User", "activated@greenlight.go", "activated123", true)
            .await
            .unwrap();

        Model::add_for_user(&db, u.id, &[MOVIES_READ]).await.unwrap();
        assert!(Model::add_for_user(&db, u.id, &[MOVIES_READ]).await.is_err());
    }
}
