pub mod movie;
pub mod permission;
pub mod user;
pub mod user_permission;

pub use movie::Entity as Movie;
pub use permission::Entity as Permission;
pub use user::Entity as User;
pub use user_permission::Entity as UserPermission;
