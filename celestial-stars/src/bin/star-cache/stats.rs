//! Vertex table statistics

use crate::cli::CatalogArgs;
use celestial_stars::color::{color_index, spectral_bucket, SPECTRAL_COLORS};
use celestial_stars::VertexTable;

const HISTOGRAM_WIDTH: usize = 50;

pub fn run(args: &CatalogArgs) -> anyhow::Result<()> {
    let catalog = args.loader()?.load();
    let table = VertexTable::build(catalog.records());

    println!("\n=== Star Table ===");
    println!("Catalogs: {}", catalog.catalogs());
    println!("Stars: {}", table.len());
    println!("Vertex buffer: {} bytes", table.as_bytes().len());

    let Some((min, max)) = table.magnitude_range() else {
        println!("No stars loaded");
        return Ok(());
    };
    println!("Visual magnitude range: {:.2} .. {:.2}", min, max);

    let with_parallax = catalog.iter().filter(|s| s.parallax > 0.0).count();
    println!(
        "With parallax: {} ({:.1}%)",
        with_parallax,
        100.0 * with_parallax as f64 / table.len() as f64
    );

    let mut histogram = [0usize; SPECTRAL_COLORS.len()];
    for star in catalog.iter() {
        histogram[spectral_bucket(color_index(star))] += 1;
    }
    print_histogram(&histogram);
    Ok(())
}

fn print_histogram(histogram: &[usize]) {
    let peak = histogram.iter().copied().max().unwrap_or(0).max(1);
    println!("\n=== Spectral buckets ===");
    for (bucket, &count) in histogram.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let bar = "#".repeat(count * HISTOGRAM_WIDTH / peak);
        println!(
            "{:>2} #{:06x} {:>8} {}",
            bucket, SPECTRAL_COLORS[bucket], count, bar
        );
    }
}
