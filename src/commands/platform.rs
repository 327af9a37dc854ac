//! Platform command implementation

use d2xx_core::{LoaderConfig, NativeLibraryLoader};

/// Show detected host and resolved library locations
pub fn cmd_platform(config: &LoaderConfig) -> Result<(), Box<dyn std::error::Error>> {
    let host = config.host();
    println!("OS name:       {}", host.os_name);
    println!("OS arch:       {}", host.os_arch);

    let loader = NativeLibraryLoader::new(config.clone());
    let platform = loader.os_arch()?;
    let name = &config.library_name;

    println!("Platform:      {}", platform);
    println!("Extension:     {}", platform.extension());
    println!("Library file:  {}", loader.resolve_native_library_name(name)?);
    println!("Resource path: {}", loader.resolve_library_path(name)?);

    let search = config.search_path();
    println!("Search path:");
    for dir in search.dirs() {
        println!("  {}", dir.display());
    }
    match search.locate(&loader.resolve_library_path(name)?) {
        Some(path) => println!("Bundled:       {}", path.display()),
        None => println!("Bundled:       not found (system search path fallback)"),
    }

    Ok(())
}
