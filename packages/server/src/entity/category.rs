use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display name. Not unique.
    pub name: String,

    #[sea_orm(has_many)]
    pub sub_categories: HasMany<super::sub_category::Entity>,

    #[sea_orm(has_many)]
    pub menu_items: HasMany<super::menu_item::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
