//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<Date>,
    pub photo_url: Option<String>,
    pub register_date: DateTimeWithTimeZone,
    pub status: bool,
    /// Role names as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub roles: Json,
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for inkwell_core::domain::User {
    fn from(model: Model) -> Self {
        let roles = match serde_json::from_value::<Vec<String>>(model.roles) {
            Ok(roles) => roles,
            Err(e) => {
                tracing::warn!(
                    user_id = %model.id,
                    error = %e,
                    "Malformed roles column, loading without roles"
                );
                Vec::new()
            }
        };

        Self {
            id: model.id,
            user_name: model.user_name,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            birth_date: model.birth_date,
            photo_url: model.photo_url,
            register_date: model.register_date.into(),
            status: model.status,
            roles,
            password_hash: model.password_hash,
        }
    }
}

/// Conversion from Domain User to SeaORM ActiveModel.
impl From<inkwell_core::domain::User> for ActiveModel {
    fn from(user: inkwell_core::domain::User) -> Self {
        Self {
            id: Set(user.id),
            user_name: Set(user.user_name),
            email: Set(user.email),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            birth_date: Set(user.birth_date),
            photo_url: Set(user.photo_url),
            register_date: Set(user.register_date.into()),
            status: Set(user.status),
            roles: Set(Json::from(user.roles)),
            password_hash: Set(user.password_hash),
        }
    }
}
