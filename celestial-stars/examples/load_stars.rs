use celestial_stars::{StarsSettings, VertexTable, load_stars};

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .expect("Usage: load_stars <settings.json>");

    let settings = StarsSettings::from_json_file(&path)?;
    let catalog = load_stars(&settings);
    let table = VertexTable::build(catalog.records());

    println!("Catalogs: {}", catalog.catalogs());
    println!("Stars: {}", table.len());
    if let Some((min, max)) = table.magnitude_range() {
        println!("Magnitudes: {:.2} .. {:.2}", min, max);
    }

    for v in table.vertices().iter().take(10) {
        println!(
            "  dec {:+.4}  asc {:.4}  dist {:>10.2} pc  M {:+.2}  rgb ({:.2}, {:.2}, {:.2})",
            v.declination,
            v.ascension,
            v.distance,
            v.magnitude,
            v.color[0],
            v.color[1],
            v.color[2],
        );
    }

    Ok(())
}
