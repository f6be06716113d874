use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, warn};

use crate::catalog::model::ImageUpload;
use crate::error::UploadError;
use crate::media::mimetype;
use crate::media::resize;
use crate::media::store::ObjectStore;

const THUMBNAIL_WIDTH: u32 = 150;
const DISPLAY_WIDTH: u32 = 300;

/// Publishes an uploaded image as two resized variants: a thumbnail and a
/// display copy. Variants are staged on local disk and pushed through the
/// injected store; all paths and naming come in at construction.
pub struct ImageUploader {
    staging_dir: PathBuf,
    filename_prefix: String,
    store: Box<dyn ObjectStore>,
}

impl ImageUploader {
    pub fn new(staging_dir: PathBuf, filename_prefix: String, store: Box<dyn ObjectStore>) -> Self {
        Self {
            staging_dir,
            filename_prefix,
            store,
        }
    }

    /// Runs the pipeline for one upload and returns the display copy's
    /// public URL. Any precondition failure aborts the whole publish;
    /// staged files are cleaned up best-effort either way.
    pub fn execute(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        if !self.staging_dir.is_dir() {
            return Err(UploadError::NoStagingArea(self.staging_dir.clone()));
        }
        if upload.transfer_error != Some(0) {
            return Err(UploadError::BadDescriptor);
        }

        let sniffed = mimetype::detect_mime(&upload.data).ok_or(UploadError::UnknownContentType)?;
        debug!("Upload {} sniffed as {}", upload.file_name, sniffed);

        let ext = extension_of(&upload.file_name);
        let format = resize::format_for_extension(&ext)
            .ok_or_else(|| UploadError::UnsupportedFormat(ext.clone()))?;

        let decoded = image::load_from_memory(&upload.data)?;

        let stamp = Local::now().format("%Y%m%d%H%M%S");
        let display_key = format!("{}_{}.{}", self.filename_prefix, stamp, ext);
        let thumb_key = format!("thumbnail_{}", display_key);

        let staged_thumb = self.staging_dir.join(&thumb_key);
        let staged_display = self.staging_dir.join(&display_key);

        let published = self.stage_and_publish(
            &decoded,
            format,
            &staged_thumb,
            &thumb_key,
            &staged_display,
            &display_key,
        );

        // Staged copies are scratch files; a failed cleanup is not an error.
        for staged in [&staged_thumb, &staged_display] {
            if staged.exists() {
                if let Err(e) = fs::remove_file(staged) {
                    warn!("Failed to remove staged file {:?}: {}", staged, e);
                }
            }
        }

        published
    }

    fn stage_and_publish(
        &self,
        decoded: &DynamicImage,
        format: ImageFormat,
        staged_thumb: &Path,
        thumb_key: &str,
        staged_display: &Path,
        display_key: &str,
    ) -> Result<String, UploadError> {
        let thumb = resize::resize_to_width(decoded, THUMBNAIL_WIDTH);
        thumb.save_with_format(staged_thumb, format)?;

        let display = resize::resize_to_width(decoded, DISPLAY_WIDTH);
        display.save_with_format(staged_display, format)?;

        self.store.put_public(thumb_key, staged_thumb)?;
        self.store.put_public(display_key, staged_display)
    }
}

fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}
