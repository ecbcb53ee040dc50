mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trawlmap_core::outputs::{classify_cpue, markers_to_geojson, write_parquet};
use trawlmap_core::pipeline::{build_cpue_table, CpueTable};
use trawlmap_core::types::{DateRange, FilterParams};
use trawlmap_tables::RawTables;

#[derive(Parser, Debug)]
#[command(author, version, about = "Trawl survey CPUE pipeline and map-query tool", long_about = None)]
struct Cli {
    /// Directory holding the four raw survey tables
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Optional TOML file overriding the table file names
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline and write the derived CPUE table as parquet
    Build(BuildArgs),
    /// Filter the derived table and print per-station average CPUE
    Query(QueryArgs),
    /// List the species names available for filtering
    Species,
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Output file for the derived table
    #[arg(long, default_value = "cpue.parquet")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Species common name, or "All" for the aggregate
    #[arg(long)]
    species: String,

    /// Start of the inclusive date range (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// End of the inclusive date range (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,

    /// Also write the markers as a GeoJSON FeatureCollection
    #[arg(long)]
    geojson: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let table = load_table(&cli)?;

    match cli.command {
        Command::Build(args) => handle_build(&table, args),
        Command::Query(args) => handle_query(&table, args),
        Command::Species => handle_species(&table),
    }
}

fn load_table(cli: &Cli) -> Result<CpueTable> {
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    let config = cli
        .config
        .as_deref()
        .map(config::Config::load)
        .transpose()?;
    let files = config::resolve_table_files(&data_dir, config.as_ref());

    let raw = RawTables::load(&files).context("failed to load raw survey tables")?;
    info!(
        stations = raw.stations.len(),
        tows = raw.tows.len(),
        catches = raw.catches.len(),
        species = raw.species.len(),
        "loaded raw tables"
    );

    let table = build_cpue_table(&raw).context("pipeline failed")?;
    info!(rows = table.dataframe().height(), "derived CPUE table ready");
    Ok(table)
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    dotenvy::dotenv().ok();
    let dir = std::env::var("TRAWLMAP_DATA_DIR")
        .context("TRAWLMAP_DATA_DIR must be set when --data-dir is not given")?;
    Ok(PathBuf::from(dir))
}

fn handle_build(table: &CpueTable, args: BuildArgs) -> Result<()> {
    write_parquet(table.dataframe(), &args.out)
        .with_context(|| format!("failed to write '{}'", args.out.display()))?;
    info!(
        rows = table.dataframe().height(),
        out = %args.out.display(),
        "wrote derived CPUE table"
    );
    Ok(())
}

fn handle_query(table: &CpueTable, args: QueryArgs) -> Result<()> {
    let params = FilterParams {
        species: args.species,
        range: DateRange::new(args.start, args.end),
    };
    let markers = table.query(&params)?;

    if markers.is_empty() {
        println!(
            "No stations matched species '{}' between {} and {}.",
            params.species, params.range.start, params.range.end
        );
    } else {
        let mut out = Table::new();
        out.set_header(vec!["Station", "Latitude", "Longitude", "Mean CPUE", "Bin"]);
        for marker in &markers {
            let (cpue, bin) = match marker.mean_cpue {
                Some(value) => (format!("{value:.4}"), classify_cpue(value).label),
                None => ("-".to_string(), "no data"),
            };
            out.add_row(vec![
                marker.station_code.clone(),
                format!("{:.4}", marker.latitude),
                format!("{:.4}", marker.longitude),
                cpue,
                bin.to_string(),
            ]);
        }
        println!("{out}");

        let bounds = CpueTable::bounds(&markers);
        println!(
            "View bounds: ({:.4}, {:.4}) to ({:.4}, {:.4})",
            bounds.min_latitude, bounds.min_longitude, bounds.max_latitude, bounds.max_longitude
        );
    }

    if let Some(path) = args.geojson {
        let collection = markers_to_geojson(&markers);
        let body = serde_json::to_string_pretty(&collection)?;
        std::fs::write(&path, body)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        info!(markers = markers.len(), out = %path.display(), "wrote GeoJSON markers");
    }

    Ok(())
}

fn handle_species(table: &CpueTable) -> Result<()> {
    for name in table.species_names()? {
        println!("{name}");
    }
    Ok(())
}
