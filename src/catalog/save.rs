use tracing::{info, warn};

use crate::catalog::model::{CocktailRow, ValidatedCocktail};
use crate::catalog::text;
use crate::database::repo::CatalogRepo;
use crate::error::CatalogError;
use crate::media::uploader::ImageUploader;

/// What a completed save produced. `image_warning` carries an upload
/// failure that did not stop the save.
#[derive(Debug)]
pub struct SaveOutcome {
    pub id: i64,
    pub img_url: Option<String>,
    pub image_warning: Option<CatalogError>,
}

/// Saves a validated submission: image first, then the aggregate in one
/// transaction. An upload failure is reported in the outcome but never
/// fails the save; the record simply goes in without an image URL.
pub fn save_cocktail(
    repo: &mut CatalogRepo,
    uploader: &ImageUploader,
    cocktail: &ValidatedCocktail,
) -> Result<SaveOutcome, CatalogError> {
    let mut img_url = None;
    let mut image_warning = None;

    if let Some(upload) = &cocktail.image {
        match uploader.execute(upload) {
            Ok(url) => {
                info!("Stored image for '{}' at {}", cocktail.name, url);
                img_url = Some(url);
            }
            Err(e) => {
                warn!("Image upload for '{}' failed: {}", cocktail.name, e);
                image_warning = Some(CatalogError::ImageUploadFailed(e));
            }
        }
    }

    let row = CocktailRow {
        id: cocktail.id,
        name: cocktail.name.clone(),
        search_name: text::fold_width(&cocktail.name),
        glass: cocktail.glass.clone(),
        percentage: cocktail.percentage,
        color: cocktail.color.clone(),
        taste: cocktail.taste.clone(),
        processes: cocktail.processes.clone(),
        img_url: img_url.clone(),
    };

    let id = repo.save_cocktail(&row, &cocktail.ingredients, &cocktail.tag_ids)?;

    Ok(SaveOutcome {
        id,
        img_url,
        image_warning,
    })
}
