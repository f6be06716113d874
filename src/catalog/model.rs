use serde::{Deserialize, Serialize};

/// A saved cocktail row. `search_name` is derived from `name` on every save
/// and is never supplied by callers.
#[derive(Debug, Clone, Serialize)]
pub struct Cocktail {
    pub id: i64,
    pub name: String,
    pub search_name: String,
    pub glass: String,
    pub percentage: i64,
    pub color: Option<String>,
    pub taste: String,
    pub processes: Option<String>,
    pub img_url: Option<String>,
}

/// Ingredient reference data. Read-only from the catalog's perspective.
#[derive(Debug, Clone, Serialize)]
pub struct Ingredient {
    pub id: i64,
    pub category_code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// One ingredient/amount pair as edited and submitted. `saved_id` is the
/// persisted row id for lines loaded from an existing cocktail and `None`
/// for lines added during the current edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSlot {
    pub saved_id: Option<i64>,
    pub ingredient_id: i64,
    pub amount: String,
}

/// A persisted ingredient line joined with its reference data, in display
/// order.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientLine {
    pub id: i64,
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub category_code: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CocktailDetail {
    pub cocktail: Cocktail,
    pub ingredients: Vec<IngredientLine>,
    pub tags: Vec<Tag>,
}

/// Search form fields. All optional; validation decides whether the
/// combination is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub name: Option<String>,
    pub glass: Option<String>,
    pub taste: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub total: i64,
    pub items: Vec<Cocktail>,
}

/// An image as handed over by the transport layer: declared metadata plus
/// the raw bytes. `transfer_error` is the transport's status code, `Some(0)`
/// for a completed transfer.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub size: i64,
    pub transfer_error: Option<i64>,
    pub data: Vec<u8>,
}

/// A create/edit submission before validation: everything the form can
/// send, with absence representable per field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CocktailInput {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub glass: Option<String>,
    pub percentage: Option<i64>,
    pub color: Option<String>,
    pub taste: Option<String>,
    pub processes: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientSlot>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

/// A submission that passed validation. Required fields are no longer
/// optional, so the save path cannot observe a half-filled form.
#[derive(Debug, Clone)]
pub struct ValidatedCocktail {
    pub id: Option<i64>,
    pub name: String,
    pub glass: String,
    pub percentage: i64,
    pub color: Option<String>,
    pub taste: String,
    pub processes: Option<String>,
    pub ingredients: Vec<IngredientSlot>,
    pub tag_ids: Vec<i64>,
    pub image: Option<ImageUpload>,
}

/// The root row as written on save. Built by the save workflow, which owns
/// recomputing `search_name` and attaching the uploaded image URL.
#[derive(Debug, Clone)]
pub struct CocktailRow {
    pub id: Option<i64>,
    pub name: String,
    pub search_name: String,
    pub glass: String,
    pub percentage: i64,
    pub color: Option<String>,
    pub taste: String,
    pub processes: Option<String>,
    pub img_url: Option<String>,
}
