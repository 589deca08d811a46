pub mod category;
pub mod menu_item;
pub mod shared;
pub mod sub_category;
