mod catalog;
mod database;
mod error;
mod media;
mod utils;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::draft::IngredientDraft;
use crate::catalog::model::{CocktailInput, ImageUpload, SearchFilters};
use crate::catalog::save;
use crate::catalog::validate;
use crate::database::repo::CatalogRepo;
use crate::media::mimetype;
use crate::media::store::FsObjectStore;
use crate::media::uploader::ImageUploader;
use crate::utils::config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the catalog schema.
    Init,
    /// Load ingredient and tag reference data from a JSON file.
    Seed { file: PathBuf },
    /// Search cocktails by name substring, glass and taste.
    Search {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        glass: Option<String>,
        #[arg(long)]
        taste: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },
    /// Show one cocktail with its ingredient lines and tags.
    Show { id: i64 },
    /// Validate and save a cocktail draft, optionally attaching an image.
    Save {
        /// JSON draft file with the cocktail fields and ingredient rows.
        file: PathBuf,
        /// Image file to publish alongside the cocktail.
        #[arg(short, long)]
        image: Option<PathBuf>,
        /// Append an ingredient row to the draft before saving.
        #[arg(long = "add", value_name = "INGREDIENT_ID:AMOUNT")]
        add: Vec<String>,
        /// Remove the draft row at this index (applied after any --add).
        #[arg(long = "remove", value_name = "INDEX")]
        remove: Vec<usize>,
    },
    /// List ingredients in a category.
    Ingredients { category: String },
    /// List all tags.
    Tags,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    ingredients: Vec<SeedIngredient>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SeedIngredient {
    category_code: String,
    name: String,
    description: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Command::Init => cmd_init(&config),
        Command::Seed { file } => cmd_seed(&config, &file),
        Command::Search {
            name,
            glass,
            taste,
            page,
        } => cmd_search(&config, SearchFilters { name, glass, taste }, page),
        Command::Show { id } => cmd_show(&config, id),
        Command::Save {
            file,
            image,
            add,
            remove,
        } => cmd_save(&config, &file, image.as_deref(), &add, &remove),
        Command::Ingredients { category } => cmd_ingredients(&config, &category),
        Command::Tags => cmd_tags(&config),
    }
}

fn open_repo(config: &Config) -> Result<CatalogRepo> {
    CatalogRepo::open(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))
}

fn build_uploader(config: &Config) -> ImageUploader {
    let store = FsObjectStore::new(config.store_root.clone(), config.public_base_url.clone());
    ImageUploader::new(
        config.staging_dir.clone(),
        config.filename_prefix.clone(),
        Box::new(store),
    )
}

fn cmd_init(config: &Config) -> Result<()> {
    let repo = open_repo(config)?;
    repo.init_schema().context("Failed to initialize schema")?;
    info!("Initialized catalog at {}", config.db_path.display());
    Ok(())
}

fn cmd_seed(config: &Config, file: &Path) -> Result<()> {
    let repo = open_repo(config)?;
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read seed file {}", file.display()))?;
    let seed: SeedFile = serde_json::from_str(&raw).context("Failed to parse seed file")?;

    for ingredient in &seed.ingredients {
        repo.insert_ingredient(
            &ingredient.category_code,
            &ingredient.name,
            ingredient.description.as_deref(),
        )?;
    }
    for tag in &seed.tags {
        repo.insert_tag(tag)?;
    }

    info!(
        "Seeded {} ingredients and {} tags",
        seed.ingredients.len(),
        seed.tags.len()
    );
    Ok(())
}

fn cmd_search(config: &Config, filters: SearchFilters, page: i64) -> Result<()> {
    let errors = validate::validate_search(&filters);
    if !errors.is_empty() {
        for e in &errors {
            println!("error: {}", e);
        }
        bail!("search rejected");
    }

    let repo = open_repo(config)?;
    let offset = (page.max(1) - 1) * config.page_size;
    let results = repo.search_cocktails(&filters, config.page_size, offset)?;

    if results.items.is_empty() {
        println!("no results");
        return Ok(());
    }

    println!("{} hits", results.total);
    for cocktail in &results.items {
        println!(
            "{:>4}  {}  ({}, {}%)",
            cocktail.id, cocktail.name, cocktail.glass, cocktail.percentage
        );
    }
    Ok(())
}

fn cmd_show(config: &Config, id: i64) -> Result<()> {
    let repo = open_repo(config)?;
    match repo.fetch_detail(id)? {
        Some(detail) => {
            println!("{}", serde_json::to_string_pretty(&detail)?);
            Ok(())
        }
        None => bail!("cocktail {} not found", id),
    }
}

fn cmd_save(
    config: &Config,
    file: &Path,
    image: Option<&Path>,
    add: &[String],
    remove: &[usize],
) -> Result<()> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read draft {}", file.display()))?;
    let mut input: CocktailInput = serde_json::from_str(&raw).context("Failed to parse draft")?;

    let mut repo = open_repo(config)?;

    // Apply draft edits the way the form's row controls would.
    let mut draft = IngredientDraft::from_slots(input.ingredients.clone());
    for entry in add {
        let (ingredient_id, amount) = parse_add(entry)?;
        draft.add(ingredient_id, amount);
    }
    for &index in remove {
        draft.remove(index)?;
    }
    input.ingredients = draft.slots().to_vec();

    if let Some(path) = image {
        input.image = Some(read_image(path)?);
    }

    let validated = match validate::validate_cocktail(&input) {
        Ok(v) => v,
        Err(errors) => {
            for e in &errors {
                println!("error: {}", e);
            }
            // Redisplay the draft rows as the form would, with names joined
            // from reference data.
            match draft.materialize(&repo) {
                Ok(lines) => {
                    for (index, line) in lines.iter().enumerate() {
                        let status = match line.saved_id {
                            Some(id) => format!("row {}", id),
                            None => "new".to_string(),
                        };
                        println!(
                            "{:>3}: {} {} [{}] ({})",
                            index,
                            line.amount,
                            line.ingredient.name,
                            line.ingredient.category_code,
                            status
                        );
                    }
                }
                Err(e) => warn!("Could not materialize draft: {}", e),
            }
            bail!("draft rejected with {} error(s)", errors.len());
        }
    };

    let uploader = build_uploader(config);
    let outcome = save::save_cocktail(&mut repo, &uploader, &validated)?;

    if let Some(warning) = &outcome.image_warning {
        println!("warning: {}", warning);
    }
    match &outcome.img_url {
        Some(url) => println!("saved cocktail {} (image at {})", outcome.id, url),
        None => println!("saved cocktail {}", outcome.id),
    }
    Ok(())
}

fn cmd_ingredients(config: &Config, category: &str) -> Result<()> {
    let repo = open_repo(config)?;
    let ingredients = repo.ingredients_by_category(category)?;

    if ingredients.is_empty() {
        println!("no ingredients in category {}", category);
        return Ok(());
    }
    for ingredient in &ingredients {
        println!("{:>4}  {}", ingredient.id, ingredient.name);
    }
    Ok(())
}

fn cmd_tags(config: &Config) -> Result<()> {
    let repo = open_repo(config)?;
    let tags = repo.all_tags()?;
    for tag in &tags {
        println!("{:>4}  {}", tag.id, tag.name);
    }
    Ok(())
}

fn parse_add(entry: &str) -> Result<(i64, &str)> {
    let (id, amount) = entry
        .split_once(':')
        .context("--add expects INGREDIENT_ID:AMOUNT")?;
    let id = id
        .trim()
        .parse()
        .context("--add ingredient id must be an integer")?;
    Ok((id, amount.trim()))
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let data = fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime = mimetype::detect_mime(&data)
        .unwrap_or("application/octet-stream")
        .to_string();

    Ok(ImageUpload {
        file_name,
        mime,
        size: data.len() as i64,
        transfer_error: Some(0),
        data,
    })
}
