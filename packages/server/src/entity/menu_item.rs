use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use spice_common::Spiciness;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub spicyness: Spiciness,

    /// URL path of the image inside the web root, e.g. `/images/7.png`.
    /// Unset only between the insert and the image write of a create.
    pub image: Option<String>,

    pub price: f64,

    pub category_id: i32,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::category::Entity>,

    /// Must reference a sub category of `category_id`.
    pub sub_category_id: i32,
    #[sea_orm(belongs_to, from = "sub_category_id", to = "id")]
    pub sub_category: HasOne<super::sub_category::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
