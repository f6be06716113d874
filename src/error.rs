use std::path::PathBuf;
use thiserror::Error;

/// Field-level validation failures. These are collected into a list and
/// returned as data so a form round-trip can show every problem at once;
/// they are never propagated with `?`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please enter search criteria")]
    EmptyQuery,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("name must be 30 characters or fewer")]
    NameTooLong,
    #[error("color must be 10 characters or fewer")]
    ColorTooLong,
    #[error("process notes must be 250 characters or fewer")]
    ProcessesTooLong,
    #[error("image must be a jpeg, png or gif")]
    UnsupportedImageType,
    #[error("image must be smaller than 10MB")]
    ImageTooLarge,
}

/// Failures inside the image publish pipeline. Any one of these aborts the
/// whole publish; callers decide whether that also aborts their own work.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("staging directory {} does not exist", .0.display())]
    NoStagingArea(PathBuf),
    #[error("upload descriptor is malformed or reports a transfer error")]
    BadDescriptor,
    #[error("could not determine content type from file data")]
    UnknownContentType,
    #[error("unsupported image extension '{0}'")]
    UnsupportedFormat(String),
    #[error("image processing failed")]
    Image(#[from] image::ImageError),
    #[error("object store rejected '{key}': {reason}")]
    Store { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("ingredient row {index} does not exist (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown ingredient id {0}")]
    IngredientNotFound(i64),
    #[error("image upload failed")]
    ImageUploadFailed(#[source] UploadError),
    #[error("failed to save cocktail")]
    SaveFailed(#[source] rusqlite::Error),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}
