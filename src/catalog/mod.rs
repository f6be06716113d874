pub mod draft;
pub mod model;
pub mod save;
pub mod text;
pub mod validate;
