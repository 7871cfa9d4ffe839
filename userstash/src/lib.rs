pub mod document;
pub mod store;
pub mod seed;
pub mod error;

pub use error::{Result, StashError};
pub use document::{Document, UserRecord};
pub use store::UserStore;
