use std::path::Path;
use threadmark_core::extraction::catalog::{load_catalog_preset, CATALOG_PRESETS};
use threadmark_core::vocab::builtin::{load_preset, PRESETS};
use threadmark_core::vocab::load_vocabulary;
use threadmark_core::ThreadmarkError;

pub fn list() -> Result<(), ThreadmarkError> {
    println!("Vocabularies:\n");
    for name in PRESETS {
        let vocab = load_preset(name)?;
        let def = vocab.def();
        println!("  {:<12} v{}  {}", def.name, def.version, def.description.as_deref().unwrap_or(""));
    }

    println!("\nCatalogs:\n");
    for name in CATALOG_PRESETS {
        let catalog = load_catalog_preset(name)?;
        let def = catalog.def();
        println!(
            "  {:<12} v{}  {} entries  {}",
            name,
            def.version,
            def.entries.len(),
            def.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), ThreadmarkError> {
    let vocab = load_preset(preset)?;
    let def = vocab.def();

    println!("=== {} (v{}) ===", def.name, def.version);
    if let Some(desc) = &def.description {
        println!("{desc}");
    }
    println!();

    for (category, nouns) in &def.nouns {
        print_table(&format!("nouns/{category}"), nouns);
    }
    print_table("colors", &def.colors);
    print_table("materials", &def.materials);
    print_table("patterns", &def.patterns);
    print_table("fits", &def.fits);
    print_table("forbidden", &def.forbidden);
    print_table("blacklist", &def.blacklist);
    print_table("meta terms", &def.meta_terms);
    print_table("styling verbs", &def.styling_verbs);

    if !def.aliases.is_empty() {
        println!("  aliases ({}):", def.aliases.len());
        for (alias, canonical) in &def.aliases {
            println!("    {alias} -> {canonical}");
        }
    }
    Ok(())
}

fn print_table(label: &str, words: &[String]) {
    if words.is_empty() {
        return;
    }
    println!("  {} ({}): {}", label, words.len(), words.join(", "));
}

pub fn validate(file: &Path) -> Result<(), ThreadmarkError> {
    let vocab = load_vocabulary(file)?;
    let def = vocab.def();
    let noun_count: usize = def.nouns.values().map(Vec::len).sum();
    println!(
        "OK: {} (v{}) with {} nouns in {} categories, {} descriptors",
        def.name,
        def.version,
        noun_count,
        def.nouns.len(),
        def.colors.len() + def.materials.len() + def.patterns.len()
    );
    Ok(())
}
