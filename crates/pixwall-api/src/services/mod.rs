pub mod export;
pub mod upload;
