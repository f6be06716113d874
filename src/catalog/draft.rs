use crate::catalog::model::{Ingredient, IngredientSlot};
use crate::error::CatalogError;

/// Source of ingredient reference data for materializing a draft. The
/// repository implements this; tests use an in-memory map.
pub trait IngredientLookup {
    fn ingredient(&self, id: i64) -> Result<Option<Ingredient>, CatalogError>;
}

/// The ingredient table of a cocktail form while it is being edited: one
/// ordered sequence of slots, mutated by explicit add/remove calls and
/// resolved against reference data just before display or save.
#[derive(Debug, Clone, Default)]
pub struct IngredientDraft {
    slots: Vec<IngredientSlot>,
}

/// A slot joined with its ingredient reference row, ready for display.
#[derive(Debug, Clone)]
pub struct DraftLine {
    pub saved_id: Option<i64>,
    pub ingredient: Ingredient,
    pub amount: String,
}

impl IngredientDraft {
    /// Seeds the draft from lines already saved on the cocktail, keeping
    /// their row ids so an edit round-trip preserves line identity.
    pub fn from_slots(slots: Vec<IngredientSlot>) -> Self {
        Self { slots }
    }

    pub fn add(&mut self, ingredient_id: i64, amount: &str) {
        self.slots.push(IngredientSlot {
            saved_id: None,
            ingredient_id,
            amount: amount.to_string(),
        });
    }

    /// Removes the slot at `index`. The draft is left untouched on failure.
    pub fn remove(&mut self, index: usize) -> Result<(), CatalogError> {
        if index >= self.slots.len() {
            return Err(CatalogError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            });
        }
        self.slots.remove(index);
        Ok(())
    }

    pub fn slots(&self) -> &[IngredientSlot] {
        &self.slots
    }

    /// Resolves every slot against ingredient reference data, in slot order.
    /// A slot pointing at an unknown ingredient fails the whole call; a
    /// partially resolved draft is never returned.
    pub fn materialize(&self, lookup: &impl IngredientLookup) -> Result<Vec<DraftLine>, CatalogError> {
        let mut lines = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let ingredient = lookup
                .ingredient(slot.ingredient_id)?
                .ok_or(CatalogError::IngredientNotFound(slot.ingredient_id))?;
            lines.push(DraftLine {
                saved_id: slot.saved_id,
                ingredient,
                amount: slot.amount.clone(),
            });
        }
        Ok(lines)
    }
}
