//! Cache header inspection

use crate::cli::InfoArgs;
use anyhow::Context;
use celestial_stars::cache::{read_header, HEADER_SIZE, RECORD_SIZE};
use celestial_stars::CACHE_VERSION;

pub fn run(args: &InfoArgs) -> anyhow::Result<()> {
    let header = read_header(&args.cache)
        .with_context(|| format!("Failed to read cache header {:?}", args.cache))?;
    let file_size = std::fs::metadata(&args.cache)?.len();

    println!("{}", header);
    println!("File size: {} bytes", file_size);

    if header.version != CACHE_VERSION {
        println!(
            "Stale: written by format {}, this build reads {}",
            header.version, CACHE_VERSION
        );
    }

    let expected = HEADER_SIZE as u64 + header.count.max(0) as u64 * RECORD_SIZE as u64;
    if file_size < expected {
        println!(
            "Truncated: expected at least {} bytes for {} stars",
            expected, header.count
        );
    }
    Ok(())
}
