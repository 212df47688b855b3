use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use conflict_select::data::loader;
use conflict_select::{plot, select, SelectionConfig};

/// Filter a global conflict-event extract by conflict properties, period,
/// continent, and climate zone.
#[derive(Parser)]
#[command(name = "conflict-select", version)]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Conflict-event extract (.csv or .geojson).
    #[arg(short, long)]
    events: PathBuf,

    /// Write the selected events to this CSV file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render the selection over the continent boundary to this PNG file.
    #[arg(long)]
    plot: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = SelectionConfig::from_yaml(&cli.config)?;
    let dataset = loader::load_events(&cli.events)?;
    info!("loaded {} events from {}", dataset.len(), cli.events.display());

    let (selected, continent) = select(dataset, &config)?;
    println!("{} events selected", selected.len());

    if let Some(path) = &cli.output {
        loader::write_events_csv(&selected, path)?;
        info!("wrote selection to {}", path.display());
    }
    if let Some(path) = &cli.plot {
        plot::render_selection(&selected, &continent, path)?;
        info!("wrote plot to {}", path.display());
    }

    Ok(())
}
