use serde::Serialize;
use spice_common::Spiciness;

use crate::entity::menu_item;
use crate::utils::filename::image_extension;
use crate::utils::upload::RawForm;

use super::category::CategoryResponse;
use super::shared::{FieldErrors, parse_id_field, validate_name};
use super::sub_category::SubCategoryResponse;

/// A menu item row with its category and sub category attached.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct MenuItemResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Margherita")]
    pub name: String,
    pub description: Option<String>,
    pub spicyness: Spiciness,
    #[schema(example = "/images/7.png")]
    pub image: Option<String>,
    #[schema(example = 9.99)]
    pub price: f64,
    pub category_id: i32,
    pub sub_category_id: i32,
    pub category: Option<CategoryResponse>,
    pub sub_category: Option<SubCategoryResponse>,
}

impl MenuItemResponse {
    pub fn new(
        m: menu_item::Model,
        category: Option<CategoryResponse>,
        sub_category: Option<SubCategoryResponse>,
    ) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            spicyness: m.spicyness,
            image: m.image,
            price: m.price,
            category_id: m.category_id,
            sub_category_id: m.sub_category_id,
            category,
            sub_category,
        }
    }
}

/// The menu item inside a form: either a stored row or the submitted input,
/// including values that failed to parse.
#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
pub struct MenuItemDraft {
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub spicyness: Spiciness,
    pub image: Option<String>,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub category: Option<CategoryResponse>,
    pub sub_category: Option<SubCategoryResponse>,
}

impl From<MenuItemResponse> for MenuItemDraft {
    fn from(r: MenuItemResponse) -> Self {
        Self {
            id: Some(r.id),
            name: r.name,
            description: r.description,
            price: Some(r.price),
            spicyness: r.spicyness,
            image: r.image,
            category_id: Some(r.category_id),
            sub_category_id: Some(r.sub_category_id),
            category: r.category,
            sub_category: r.sub_category,
        }
    }
}

/// Everything a menu item form needs to render: the item plus the contents of
/// both dropdowns. Built fresh for every request.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MenuItemView {
    pub menu_item: MenuItemDraft,
    /// Every category, for the category picker.
    pub categories: Vec<CategoryResponse>,
    /// Sub categories of the selected category, for the dependent picker.
    pub sub_categories: Vec<SubCategoryResponse>,
    pub errors: FieldErrors,
}

/// Multipart body accepted by menu item create and edit.
///
/// Only describes the form for the API document; handlers read the parts
/// themselves through [`RawForm`].
#[derive(utoipa::ToSchema)]
pub struct MenuItemMultipart {
    #[schema(example = "Margherita")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "9.99")]
    pub price: String,
    /// `NA`, `NotSpicy`, `Spicy`, `VerySpicy` or the ordinal 0-3. Empty means `NA`.
    pub spicyness: Option<String>,
    #[schema(example = "1")]
    pub category_id: String,
    #[schema(example = "2")]
    pub sub_category_id: String,
    /// Optional image file. Without one, create falls back to the placeholder
    /// and edit keeps the current image.
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

/// Fields of a menu item that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemInput {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub spicyness: Spiciness,
    pub category_id: i32,
    pub sub_category_id: i32,
}

/// Result of binding a submitted multipart form.
#[derive(Debug)]
pub struct BoundMenuItem {
    pub draft: MenuItemDraft,
    pub errors: FieldErrors,
    /// Extension of the uploaded image (`".jpg"`), when a valid upload was sent.
    pub image_extension: Option<String>,
}

impl BoundMenuItem {
    /// The validated input, or `None` while any field error is recorded.
    pub fn input(&self) -> Option<MenuItemInput> {
        if !self.errors.is_empty() {
            return None;
        }
        Some(MenuItemInput {
            name: self.draft.name.trim().to_string(),
            description: self.draft.description.clone(),
            price: self.draft.price?,
            spicyness: self.draft.spicyness,
            category_id: self.draft.category_id?,
            sub_category_id: self.draft.sub_category_id?,
        })
    }
}

/// Bind and validate a menu item from the raw form fields.
///
/// `sub_category_id` is read straight from the raw fields because the
/// dependent dropdown is filled client-side after the form is rendered.
pub fn bind_menu_item(form: &RawForm) -> BoundMenuItem {
    let mut errors = FieldErrors::new();

    let name = form.get("name").unwrap_or_default().to_string();
    validate_name(&mut errors, "name", "Name", &name);

    let description = form
        .get("description")
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let price = parse_price(&mut errors, form.get("price"));

    let spicyness = match form.get("spicyness").unwrap_or_default().parse::<Spiciness>() {
        Ok(level) => level,
        Err(e) => {
            errors.add("spicyness", e.to_string());
            Spiciness::default()
        }
    };

    let category_id = parse_id_field(&mut errors, "category_id", "Category", form.get("category_id"));
    let sub_category_id = parse_id_field(
        &mut errors,
        "sub_category_id",
        "Sub Category",
        form.get("sub_category_id"),
    );

    let image_extension = match &form.upload {
        Some(upload) => match image_extension(&upload.file_name) {
            Ok(ext) => Some(ext),
            Err(e) => {
                errors.add("image", e.message());
                None
            }
        },
        None => None,
    };

    BoundMenuItem {
        draft: MenuItemDraft {
            name,
            description,
            price,
            spicyness,
            category_id,
            sub_category_id,
            ..Default::default()
        },
        errors,
        image_extension,
    }
}

fn parse_price(errors: &mut FieldErrors, raw: Option<&str>) -> Option<f64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        errors.add("price", "Price is required");
        return None;
    };
    let Ok(price) = raw.parse::<f64>() else {
        errors.add("price", format!("The value '{raw}' is not valid for Price"));
        return None;
    };
    if !price.is_finite() {
        errors.add("price", "Price must be a finite number");
        return None;
    }
    if price < 0.0 {
        errors.add("price", "Price must not be negative");
    }
    Some(price)
}
