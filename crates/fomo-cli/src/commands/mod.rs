pub mod add;
pub mod board;
pub mod delete;
pub mod edit;
pub mod group;
pub mod list;
pub mod r#move;
pub mod reorder;
pub mod toggle;
