pub mod models;
pub mod view;
