//! Absolute locations used in redirects.

pub const ADMIN: &str = "/admin";
pub const CATEGORIES: &str = "/admin/categories";
pub const MENU_ITEMS: &str = "/admin/menu-items";

pub fn category_edit(id: i32) -> String {
    format!("{CATEGORIES}/edit/{id}")
}

pub fn menu_item_edit(id: i32) -> String {
    format!("{MENU_ITEMS}/edit/{id}")
}
