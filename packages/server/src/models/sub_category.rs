use serde::Serialize;

use crate::entity::sub_category;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SubCategoryResponse {
    #[schema(example = 4)]
    pub id: i32,
    #[schema(example = "Vegetarian")]
    pub name: String,
    #[schema(example = 1)]
    pub category_id: i32,
}

impl From<sub_category::Model> for SubCategoryResponse {
    fn from(m: sub_category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            category_id: m.category_id,
        }
    }
}
