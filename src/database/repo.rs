use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, error};

use crate::catalog::draft::IngredientLookup;
use crate::catalog::model::{
    Cocktail, CocktailDetail, CocktailRow, Ingredient, IngredientLine, IngredientSlot,
    SearchFilters, SearchPage, Tag,
};
use crate::catalog::text;
use crate::database::schema::SCHEMA;
use crate::error::CatalogError;

pub struct CatalogRepo {
    conn: Connection,
}

impl CatalogRepo {
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Ephemeral catalog with no backing file. Useful for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn init_schema(&self) -> Result<(), CatalogError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Saves the aggregate in one transaction: children replaced wholesale,
    /// root upserted with its recomputed search name. Any failure rolls the
    /// whole save back and surfaces as `SaveFailed`.
    pub fn save_cocktail(
        &mut self,
        row: &CocktailRow,
        lines: &[IngredientSlot],
        tag_ids: &[i64],
    ) -> Result<i64, CatalogError> {
        match self.save_cocktail_tx(row, lines, tag_ids) {
            Ok(id) => Ok(id),
            Err(e) => {
                error!("Cocktail save rolled back: {}", e);
                Err(CatalogError::SaveFailed(e))
            }
        }
    }

    fn save_cocktail_tx(
        &mut self,
        row: &CocktailRow,
        lines: &[IngredientSlot],
        tag_ids: &[i64],
    ) -> rusqlite::Result<i64> {
        let tx = self.conn.transaction()?;
        let cocktail_id: i64;

        {
            if let Some(id) = row.id {
                tx.execute(
                    "DELETE FROM cocktail_ingredients WHERE cocktail_id = ?1",
                    params![id],
                )?;
                tx.execute("DELETE FROM cocktail_tags WHERE cocktail_id = ?1", params![id])?;
            }

            let mut stmt_root = tx.prepare(
                "INSERT INTO cocktails (id, name, search_name, glass, percentage, color, taste, processes, img_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     search_name = excluded.search_name,
                     glass = excluded.glass,
                     percentage = excluded.percentage,
                     color = excluded.color,
                     taste = excluded.taste,
                     processes = excluded.processes,
                     img_url = excluded.img_url
                 RETURNING id",
            )?;

            cocktail_id = stmt_root.query_row(
                params![
                    row.id,
                    row.name,
                    row.search_name,
                    row.glass,
                    row.percentage,
                    row.color,
                    row.taste,
                    row.processes,
                    row.img_url
                ],
                |r| r.get(0),
            )?;

            let mut stmt_line = tx.prepare(
                "INSERT INTO cocktail_ingredients (id, cocktail_id, ingredient_id, amount, position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            // Lines carrying a row id go in first so a fresh rowid handed
            // out for a new line cannot collide with a carried one.
            for (position, slot) in lines.iter().enumerate().filter(|(_, s)| s.saved_id.is_some()) {
                stmt_line.execute(params![
                    slot.saved_id,
                    cocktail_id,
                    slot.ingredient_id,
                    slot.amount,
                    position as i64
                ])?;
            }
            for (position, slot) in lines.iter().enumerate().filter(|(_, s)| s.saved_id.is_none()) {
                stmt_line.execute(params![
                    slot.saved_id,
                    cocktail_id,
                    slot.ingredient_id,
                    slot.amount,
                    position as i64
                ])?;
            }

            let mut stmt_tag = tx.prepare(
                "INSERT OR IGNORE INTO cocktail_tags (cocktail_id, tag_id) VALUES (?1, ?2)",
            )?;
            for tag_id in tag_ids {
                stmt_tag.execute(params![cocktail_id, tag_id])?;
            }
        }

        tx.commit()?;
        debug!(
            "Saved cocktail {} ({} ingredient lines, {} tags)",
            cocktail_id,
            lines.len(),
            tag_ids.len()
        );
        Ok(cocktail_id)
    }

    /// Substring search over the folded name plus optional exact filters.
    /// The count and the page share one predicate so the total stays honest.
    pub fn search_cocktails(
        &self,
        filters: &SearchFilters,
        limit: i64,
        offset: i64,
    ) -> Result<SearchPage, CatalogError> {
        let needle = match filters.name.as_deref().map(text::fold_width) {
            Some(folded) if !folded.trim().is_empty() => {
                Some(format!("%{}%", escape_like(folded.trim())))
            }
            _ => None,
        };
        let glass = filters.glass.as_deref().map(str::trim).filter(|v| !v.is_empty());
        let taste = filters.taste.as_deref().map(str::trim).filter(|v| !v.is_empty());

        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM cocktails
             WHERE (?1 IS NULL OR search_name LIKE ?1 ESCAPE '\\')
               AND (?2 IS NULL OR glass = ?2)
               AND (?3 IS NULL OR taste = ?3)",
            params![needle, glass, taste],
            |r| r.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT id, name, search_name, glass, percentage, color, taste, processes, img_url
             FROM cocktails
             WHERE (?1 IS NULL OR search_name LIKE ?1 ESCAPE '\\')
               AND (?2 IS NULL OR glass = ?2)
               AND (?3 IS NULL OR taste = ?3)
             ORDER BY id
             LIMIT ?4 OFFSET ?5",
        )?;
        let items = stmt
            .query_map(params![needle, glass, taste, limit, offset], row_to_cocktail)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchPage { total, items })
    }

    /// The root record plus its ingredient lines (joined with reference
    /// data, in display order) and tags. `None` for an unknown id.
    pub fn fetch_detail(&self, id: i64) -> Result<Option<CocktailDetail>, CatalogError> {
        let cocktail = self
            .conn
            .query_row(
                "SELECT id, name, search_name, glass, percentage, color, taste, processes, img_url
                 FROM cocktails WHERE id = ?1",
                params![id],
                row_to_cocktail,
            )
            .optional()?;

        let cocktail = match cocktail {
            Some(c) => c,
            None => return Ok(None),
        };

        let mut stmt = self.conn.prepare(
            "SELECT ci.id, ci.ingredient_id, i.name, i.category_code, ci.amount
             FROM cocktail_ingredients ci
             JOIN ingredients i ON i.id = ci.ingredient_id
             WHERE ci.cocktail_id = ?1
             ORDER BY ci.position",
        )?;
        let ingredients = stmt
            .query_map(params![id], |r| {
                Ok(IngredientLine {
                    id: r.get(0)?,
                    ingredient_id: r.get(1)?,
                    ingredient_name: r.get(2)?,
                    category_code: r.get(3)?,
                    amount: r.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name
             FROM tags t
             JOIN cocktail_tags ct ON ct.tag_id = t.id
             WHERE ct.cocktail_id = ?1
             ORDER BY t.id",
        )?;
        let tags = stmt
            .query_map(params![id], |r| {
                Ok(Tag {
                    id: r.get(0)?,
                    name: r.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(CocktailDetail {
            cocktail,
            ingredients,
            tags,
        }))
    }

    /// Pulldown source for the form: every ingredient in a category, by id.
    pub fn ingredients_by_category(&self, category_code: &str) -> Result<Vec<Ingredient>, CatalogError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category_code, name, description
             FROM ingredients WHERE category_code = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![category_code], row_to_ingredient)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn all_tags(&self) -> Result<Vec<Tag>, CatalogError> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM tags ORDER BY id")?;
        let rows = stmt
            .query_map([], |r| {
                Ok(Tag {
                    id: r.get(0)?,
                    name: r.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn insert_ingredient(
        &self,
        category_code: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<i64, CatalogError> {
        self.conn.execute(
            "INSERT INTO ingredients (category_code, name, description) VALUES (?1, ?2, ?3)",
            params![category_code, name, description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_tag(&self, name: &str) -> Result<i64, CatalogError> {
        self.conn
            .execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", params![name])?;
        let id = self
            .conn
            .query_row("SELECT id FROM tags WHERE name = ?1", params![name], |r| r.get(0))?;
        Ok(id)
    }
}

impl IngredientLookup for CatalogRepo {
    fn ingredient(&self, id: i64) -> Result<Option<Ingredient>, CatalogError> {
        let found = self
            .conn
            .query_row(
                "SELECT id, category_code, name, description FROM ingredients WHERE id = ?1",
                params![id],
                row_to_ingredient,
            )
            .optional()?;
        Ok(found)
    }
}

fn row_to_cocktail(row: &rusqlite::Row) -> rusqlite::Result<Cocktail> {
    Ok(Cocktail {
        id: row.get(0)?,
        name: row.get(1)?,
        search_name: row.get(2)?,
        glass: row.get(3)?,
        percentage: row.get(4)?,
        color: row.get(5)?,
        taste: row.get(6)?,
        processes: row.get(7)?,
        img_url: row.get(8)?,
    })
}

fn row_to_ingredient(row: &rusqlite::Row) -> rusqlite::Result<Ingredient> {
    Ok(Ingredient {
        id: row.get(0)?,
        category_code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
    })
}

/// Escapes LIKE metacharacters so user input matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reference {
        gin: i64,
        tonic: i64,
        lime: i64,
        sour: i64,
        classic: i64,
    }

    fn repo_with_reference_data() -> (CatalogRepo, Reference) {
        let repo = CatalogRepo::open_in_memory().unwrap();
        repo.init_schema().unwrap();
        let reference = Reference {
            gin: repo.insert_ingredient("01", "gin", Some("juniper spirit")).unwrap(),
            tonic: repo.insert_ingredient("02", "tonic water", None).unwrap(),
            lime: repo.insert_ingredient("03", "lime", None).unwrap(),
            sour: repo.insert_tag("sour").unwrap(),
            classic: repo.insert_tag("classic").unwrap(),
        };
        (repo, reference)
    }

    fn row(id: Option<i64>, name: &str) -> CocktailRow {
        CocktailRow {
            id,
            name: name.to_string(),
            search_name: text::fold_width(name),
            glass: "tall".to_string(),
            percentage: 8,
            color: None,
            taste: "dry".to_string(),
            processes: None,
            img_url: None,
        }
    }

    fn slot(saved_id: Option<i64>, ingredient_id: i64, amount: &str) -> IngredientSlot {
        IngredientSlot {
            saved_id,
            ingredient_id,
            amount: amount.to_string(),
        }
    }

    fn name_filter(name: &str) -> SearchFilters {
        SearchFilters {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_save_and_fetch_round_trip() {
        let (mut repo, r) = repo_with_reference_data();
        let lines = vec![slot(None, r.gin, "2oz"), slot(None, r.tonic, "1oz")];
        let id = repo.save_cocktail(&row(None, "Gin Tonic"), &lines, &[r.sour]).unwrap();

        let detail = repo.fetch_detail(id).unwrap().unwrap();
        assert_eq!(detail.cocktail.name, "Gin Tonic");
        assert_eq!(detail.ingredients.len(), 2);
        assert_eq!(detail.ingredients[0].ingredient_id, r.gin);
        assert_eq!(detail.ingredients[0].amount, "2oz");
        assert_eq!(detail.ingredients[1].ingredient_id, r.tonic);
        assert!(detail.ingredients[0].id > 0);
        assert_eq!(detail.ingredients[0].ingredient_name, "gin");
        assert_eq!(detail.tags.len(), 1);
        assert_eq!(detail.tags[0].name, "sour");
    }

    #[test]
    fn test_resave_replaces_children_wholesale() {
        let (mut repo, r) = repo_with_reference_data();
        let lines = vec![slot(None, r.gin, "2oz"), slot(None, r.tonic, "1oz")];
        let id = repo
            .save_cocktail(&row(None, "Gin Tonic"), &lines, &[r.sour, r.classic])
            .unwrap();

        let lines = vec![slot(None, r.tonic, "1oz")];
        let saved_id = repo.save_cocktail(&row(Some(id), "Gin Tonic"), &lines, &[]).unwrap();
        assert_eq!(saved_id, id);

        let detail = repo.fetch_detail(id).unwrap().unwrap();
        assert_eq!(detail.ingredients.len(), 1);
        assert_eq!(detail.ingredients[0].ingredient_id, r.tonic);
        assert!(detail.tags.is_empty());

        let orphans: i64 = repo
            .conn
            .query_row("SELECT COUNT(*) FROM cocktail_ingredients", [], |r| r.get(0))
            .unwrap();
        assert_eq!(orphans, 1);
    }

    #[test]
    fn test_carried_line_ids_survive_resave() {
        let (mut repo, r) = repo_with_reference_data();
        let id = repo
            .save_cocktail(
                &row(None, "Gimlet"),
                &[slot(None, r.gin, "45ml"), slot(None, r.lime, "15ml")],
                &[],
            )
            .unwrap();

        let saved = repo.fetch_detail(id).unwrap().unwrap().ingredients;
        let kept = saved[1].id;

        // Keep the lime line by id, drop the gin line, append a new one.
        let lines = vec![slot(Some(kept), r.lime, "20ml"), slot(None, r.tonic, "60ml")];
        repo.save_cocktail(&row(Some(id), "Gimlet"), &lines, &[]).unwrap();

        let after = repo.fetch_detail(id).unwrap().unwrap().ingredients;
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].id, kept);
        assert_eq!(after[0].amount, "20ml");
        assert_ne!(after[1].id, kept);
    }

    #[test]
    fn test_failed_save_rolls_back_prior_children() {
        let (mut repo, r) = repo_with_reference_data();
        let id = repo
            .save_cocktail(
                &row(None, "Gin Tonic"),
                &[slot(None, r.gin, "2oz"), slot(None, r.tonic, "1oz")],
                &[r.sour],
            )
            .unwrap();

        // Unknown ingredient id violates the foreign key mid-transaction.
        let err = repo
            .save_cocktail(&row(Some(id), "Gin Tonic"), &[slot(None, 9999, "1oz")], &[])
            .unwrap_err();
        assert!(matches!(err, CatalogError::SaveFailed(_)));

        let detail = repo.fetch_detail(id).unwrap().unwrap();
        assert_eq!(detail.ingredients.len(), 2);
        assert_eq!(detail.tags.len(), 1);
    }

    #[test]
    fn test_duplicate_tag_ids_collapse() {
        let (mut repo, r) = repo_with_reference_data();
        let id = repo
            .save_cocktail(
                &row(None, "Gin Tonic"),
                &[slot(None, r.gin, "2oz")],
                &[r.sour, r.sour, r.classic],
            )
            .unwrap();

        let detail = repo.fetch_detail(id).unwrap().unwrap();
        assert_eq!(detail.tags.len(), 2);
    }

    #[test]
    fn test_duplicate_ingredient_lines_are_kept() {
        let (mut repo, r) = repo_with_reference_data();
        let id = repo
            .save_cocktail(
                &row(None, "Double Gin"),
                &[slot(None, r.gin, "30ml"), slot(None, r.gin, "30ml")],
                &[],
            )
            .unwrap();

        let detail = repo.fetch_detail(id).unwrap().unwrap();
        assert_eq!(detail.ingredients.len(), 2);
    }

    #[test]
    fn test_fetch_detail_unknown_id() {
        let (repo, _) = repo_with_reference_data();
        assert!(repo.fetch_detail(42).unwrap().is_none());
    }

    #[test]
    fn test_search_matches_folded_substring() {
        let (mut repo, r) = repo_with_reference_data();
        repo.save_cocktail(&row(None, "ＧＩＮトニック"), &[slot(None, r.gin, "2oz")], &[])
            .unwrap();
        repo.save_cocktail(&row(None, "Screwdriver"), &[slot(None, r.tonic, "1oz")], &[])
            .unwrap();

        let page = repo.search_cocktails(&name_filter("ＧＩＮ"), 12, 0).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "ＧＩＮトニック");
        assert_eq!(page.items[0].search_name, "GINトニック");

        let page = repo.search_cocktails(&name_filter("トニック"), 12, 0).unwrap();
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_search_escapes_like_metacharacters() {
        let (mut repo, r) = repo_with_reference_data();
        repo.save_cocktail(&row(None, "100% Proof"), &[slot(None, r.gin, "2oz")], &[])
            .unwrap();
        repo.save_cocktail(&row(None, "100x Proof"), &[slot(None, r.gin, "2oz")], &[])
            .unwrap();

        let page = repo.search_cocktails(&name_filter("0% P"), 12, 0).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "100% Proof");
    }

    #[test]
    fn test_search_exact_filters_and_paging() {
        let (mut repo, r) = repo_with_reference_data();
        for name in ["Gimlet", "Gin Fizz", "Gin Tonic"] {
            repo.save_cocktail(&row(None, name), &[slot(None, r.gin, "2oz")], &[])
                .unwrap();
        }
        let mut other = row(None, "Martini");
        other.glass = "cocktail".to_string();
        repo.save_cocktail(&other, &[slot(None, r.gin, "60ml")], &[]).unwrap();

        let filters = SearchFilters {
            name: Some("Gi".to_string()),
            glass: Some("tall".to_string()),
            taste: None,
        };
        let page = repo.search_cocktails(&filters, 2, 0).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);

        let rest = repo.search_cocktails(&filters, 2, 2).unwrap();
        assert_eq!(rest.total, 3);
        assert_eq!(rest.items.len(), 1);
        assert_eq!(rest.items[0].name, "Gin Tonic");
    }

    #[test]
    fn test_ingredients_by_category() {
        let (repo, r) = repo_with_reference_data();
        let spirits = repo.ingredients_by_category("01").unwrap();
        assert_eq!(spirits.len(), 1);
        assert_eq!(spirits[0].id, r.gin);
        assert!(repo.ingredients_by_category("99").unwrap().is_empty());
    }

    #[test]
    fn test_ingredient_lookup() {
        let (repo, r) = repo_with_reference_data();
        let found = repo.ingredient(r.tonic).unwrap().unwrap();
        assert_eq!(found.name, "tonic water");
        assert!(repo.ingredient(9999).unwrap().is_none());
    }

    #[test]
    fn test_insert_tag_is_idempotent() {
        let (repo, r) = repo_with_reference_data();
        let again = repo.insert_tag("sour").unwrap();
        assert_eq!(again, r.sour);
        assert_eq!(repo.all_tags().unwrap().len(), 2);
    }
}
