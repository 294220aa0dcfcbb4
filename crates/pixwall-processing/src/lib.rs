//! Image processing: upload validation and thumbnail generation.

pub mod thumbnail;
pub mod validator;

pub use thumbnail::Thumbnailer;
pub use validator::{UploadValidator, ValidationError};
