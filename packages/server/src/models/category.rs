use serde::{Deserialize, Serialize};

use crate::entity::category;

use super::shared::{FieldErrors, validate_name};

/// Submitted category form (`application/x-www-form-urlencoded`).
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CategoryForm {
    /// Category display name.
    #[serde(default)]
    #[schema(example = "Pizza")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Pizza")]
    pub name: String,
}

/// A category form as (re)displayed to the manager.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CategoryFormView {
    /// Identifier of the row being edited; absent on create.
    pub id: Option<i32>,
    pub category: CategoryForm,
    pub errors: FieldErrors,
}

impl CategoryFormView {
    pub fn empty() -> Self {
        Self {
            id: None,
            category: CategoryForm::default(),
            errors: FieldErrors::new(),
        }
    }

    pub fn rejected(id: Option<i32>, category: CategoryForm, errors: FieldErrors) -> Self {
        Self {
            id,
            category,
            errors,
        }
    }
}

impl From<category::Model> for CategoryResponse {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

pub fn validate_category(form: &CategoryForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    validate_name(&mut errors, "name", "Name", &form.name);
    errors
}
