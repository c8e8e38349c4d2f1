pub mod news;
pub mod provider;
pub mod synthetic;
pub mod types;
pub mod universe;
