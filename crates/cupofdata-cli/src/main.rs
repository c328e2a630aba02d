mod output;
mod recommend;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cupofdata")]
#[command(about = "Ranked drink recommendations for a beverage brand, from PTT posts")]
struct Cli {
    /// Brand to analyse, e.g. 五十嵐
    brand: String,

    /// Number of recent board index pages to scan
    #[arg(default_value_t = 8)]
    pages: u32,

    /// Maximum number of matching articles to fetch
    #[arg(default_value_t = 20)]
    limit: usize,

    /// Log pipeline decisions at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = cupofdata_core::load_app_config()?;

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "configuration loaded");

    let brand = cli.brand.trim();
    if brand.is_empty() {
        anyhow::bail!("brand must not be empty");
    }

    recommend::run_recommend(&config, brand, cli.pages, cli.limit).await
}
