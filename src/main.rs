use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod aggregate;
mod heatmap;
mod models;
mod notion;

#[derive(Parser)]
#[command(name = "application-heatmap")]
#[command(about = "Renders a calendar heatmap of job applications", long_about = None)]
struct Cli {
    /// Where to write the chart file
    #[arg(long, default_value = "heatmap/interactive_grid.html")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let token = std::env::var("NOTION_TOKEN")
        .context("NOTION_TOKEN must be set to a Notion integration token")?;
    let database_id = std::env::var("NOTION_DATABASE_ID")
        .context("NOTION_DATABASE_ID must be set to the applications database id")?;

    let client = notion::NotionClient::new(token, &database_id);
    let records = client.fetch_all().await?;
    let daily_counts = aggregate::count_per_day(&records);
    heatmap::write_heatmap(&daily_counts, &cli.out)?;

    Ok(())
}
