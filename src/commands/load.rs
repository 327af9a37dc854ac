//! Extract and load command implementations

use d2xx_core::{LoadSource, LoaderConfig, NativeLibraryLoader};
use std::path::Path;

/// Extract the bundled library to `output`
pub fn cmd_extract(
    config: &LoaderConfig,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let loader = NativeLibraryLoader::new(config.clone());
    let extracted = loader.extract_library(&config.library_name)?;

    let size = std::fs::copy(extracted.path(), output)?;
    println!(
        "Extracted {} for {} ({} bytes) to {}",
        config.library_name,
        extracted.platform(),
        size,
        output.display()
    );
    Ok(())
}

/// Load the library into this process and check `symbols`
pub fn cmd_load(
    config: &LoaderConfig,
    symbols: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let library = d2xx_core::load_library_with(config)?;

    match library.source() {
        LoadSource::Extracted(path) => {
            println!("Loaded {} from {}", config.library_name, path.display())
        }
        LoadSource::SystemSearch(name) => {
            println!("Loaded {} from the system library search path", name)
        }
    }

    let mut missing = 0;
    for symbol in symbols {
        if library.has_symbol(symbol) {
            println!("  {:<32} found", symbol);
        } else {
            println!("  {:<32} MISSING", symbol);
            missing += 1;
        }
    }

    if missing > 0 {
        return Err(format!("{} of {} symbols missing", missing, symbols.len()).into());
    }
    Ok(())
}
