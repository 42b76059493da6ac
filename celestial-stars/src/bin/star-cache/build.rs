//! Cache build command

use crate::cli::CatalogArgs;
use celestial_stars::cache::read_header;
use std::time::Instant;

pub fn run(args: &CatalogArgs) -> anyhow::Result<()> {
    let loader = args.loader()?;
    let catalogs = loader.catalog_set();
    if catalogs.is_empty() {
        anyhow::bail!("No catalogs configured; pass catalog paths or --config");
    }

    println!("\n=== Star Cache Build ===");
    println!("Catalogs: {}", catalogs);
    println!("Active: {:?}", loader.active_catalogs());
    println!("Cache: {:?}", loader.cache_path());
    println!();

    let start = Instant::now();
    let catalog = loader.load();
    let elapsed = start.elapsed();

    println!(
        "Loaded {} stars in {:.2} s",
        catalog.len(),
        elapsed.as_secs_f64()
    );

    if catalog.is_empty() {
        anyhow::bail!("No stars loaded; cache not written");
    }

    let header = read_header(loader.cache_path())?;
    println!("\n=== Cache ===");
    println!("{}", header);
    Ok(())
}
