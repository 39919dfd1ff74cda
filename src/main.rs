/// Native preview: render one panel description to its overlay fragment
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use clap::Parser;
    use scanlet::{AppConfig, Panel, PanelRenderer, RenderContext};

    /// Render a panel's text slots as the overlay HTML shown in the browser
    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Panel description as JSON
        panel: PathBuf,

        /// Config file (default: the platform config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Language to show, overriding the configured primary language
        #[arg(short, long)]
        lang: Option<String>,

        /// Also write the effective config to the platform config directory
        #[arg(long)]
        save_config: bool,
    }

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match AppConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(2);
            }
        },
        None => AppConfig::load_from_default_path().unwrap_or_default(),
    };

    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let mut ctx = RenderContext::from_config(&config);
    if let Some(lang) = &args.lang {
        match ctx.langs.iter().position(|l| l == lang) {
            Some(index) => ctx.primary_lang = index,
            None => log::warn!("Language {} not configured, using {:?}", lang, ctx.langs),
        }
    }

    if args.save_config {
        if let Err(e) = config.save_to_default_path() {
            eprintln!("Failed to save config: {}", e);
        }
    }

    let panel: Panel = match std::fs::read_to_string(&args.panel)
        .map_err(|e| e.to_string())
        .and_then(|json| serde_json::from_str(&json).map_err(|e| e.to_string()))
    {
        Ok(panel) => panel,
        Err(e) => {
            eprintln!("Failed to read panel {:?}: {}", args.panel, e);
            std::process::exit(1);
        }
    };

    match PanelRenderer::from_config(&config).render_panel(&panel, &ctx) {
        Ok(html) => println!("{}", html),
        Err(e) => {
            log::error!("Render failed: {}", e);
            eprintln!("Render error: {}", e);
            std::process::exit(1);
        }
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
