pub mod batch;
pub mod delete;
pub mod export;
pub mod gallery;
pub mod health;
pub mod maintenance;
pub mod upload;
