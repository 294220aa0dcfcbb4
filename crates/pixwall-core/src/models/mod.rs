pub mod image;

pub use image::{original_url, ImageRecord, ImageRecordView, NewImage, Page};
