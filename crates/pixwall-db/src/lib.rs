//! Database access: the image repository and transaction helpers.

pub mod images;
pub mod transaction;

pub use images::ImageRepository;
pub use transaction::with_transaction;
