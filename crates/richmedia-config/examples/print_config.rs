/// Print the effective rich media configuration
///
/// Run with: cargo run -p richmedia-config --example print_config

fn main() {
    let config = richmedia_config::RichMediaConfig::load();

    println!("=== Rich Media Configuration ===\n");

    println!("Frame Settings:");
    println!("  Base URL: {}", config.frame.base_url);
    println!("  Broadcast Debounce: {:?}", config.frame.broadcast_debounce());
    println!();

    println!("Search Settings:");
    println!("  Default Engine: {}", config.search.default_engine);
    println!("  Prefs Path: {:?}", config.search.prefs_path);
    for engine in &config.search.engines {
        println!("  Engine: {} ({}) {}", engine.name, engine.host, engine.keyword);
    }
    println!();

    println!("Ads Settings:");
    println!("  Destination URL: {:?}", config.ads.destination_url);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
