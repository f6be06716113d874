pub mod mimetype;
pub mod resize;
pub mod store;
pub mod uploader;
