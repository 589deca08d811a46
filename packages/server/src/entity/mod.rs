pub mod category;
pub mod menu_item;
pub mod sub_category;
