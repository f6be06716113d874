pub const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS cocktails (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        search_name TEXT NOT NULL,
        glass TEXT NOT NULL,
        percentage INTEGER NOT NULL,
        color TEXT,
        taste TEXT NOT NULL,
        processes TEXT,
        img_url TEXT
    );

    CREATE TABLE IF NOT EXISTS ingredients (
        id INTEGER PRIMARY KEY,
        category_code TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT
    );

    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY,
        name TEXT UNIQUE NOT NULL
    );

    CREATE TABLE IF NOT EXISTS cocktail_ingredients (
        id INTEGER PRIMARY KEY,
        cocktail_id INTEGER NOT NULL,
        ingredient_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        position INTEGER NOT NULL,
        FOREIGN KEY(cocktail_id) REFERENCES cocktails(id) ON DELETE CASCADE,
        FOREIGN KEY(ingredient_id) REFERENCES ingredients(id)
    );

    CREATE TABLE IF NOT EXISTS cocktail_tags (
        cocktail_id INTEGER NOT NULL,
        tag_id INTEGER NOT NULL,
        FOREIGN KEY(cocktail_id) REFERENCES cocktails(id) ON DELETE CASCADE,
        FOREIGN KEY(tag_id) REFERENCES tags(id),
        PRIMARY KEY(cocktail_id, tag_id)
    );

    CREATE INDEX IF NOT EXISTS idx_cocktails_search_name ON cocktails(search_name);
    CREATE INDEX IF NOT EXISTS idx_cocktail_ingredients_cocktail ON cocktail_ingredients(cocktail_id);
";
