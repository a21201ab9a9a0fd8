use analytics::KpiEngine;
use api_client::{NbpClient, RatesApi};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use database::{DbRepository, connect, run_migrations};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// The main entry point for the kpiboard application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from the .env file, if present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::SyncRates(args) => handle_sync_rates(args).await,
        Commands::Kpi => handle_kpi(),
        Commands::Rates(args) => handle_rates(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A small KPI dashboard backend: daily profit metrics over a CSV, plus an
/// NBP currency-rates archive in Postgres.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard HTTP API.
    Serve(ServeArgs),
    /// Fetch currency rates from the NBP API and store the new ones.
    SyncRates(SyncRatesArgs),
    /// Print the current KPI cards from the configured CSV.
    Kpi,
    /// List the currency rates on file for a date.
    Rates(RatesArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Bind host; overrides the configured value.
    #[arg(long)]
    host: Option<String>,

    /// Bind port; overrides the configured value.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct SyncRatesArgs {
    /// Effective date of the table to fetch (YYYY-MM-DD). Defaults to the
    /// latest published table.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Which NBP table to fetch; overrides the configured value.
    #[arg(long)]
    table: Option<String>,
}

#[derive(Parser)]
struct RatesArgs {
    /// Effective date to list (YYYY-MM-DD). Defaults to the most recent
    /// date in the archive.
    #[arg(long)]
    date: Option<NaiveDate>,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = configuration::load_config()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    web_server::run_server(addr, config).await
}

async fn handle_sync_rates(args: SyncRatesArgs) -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let mut rates_config = config.rates;
    if let Some(table) = args.table {
        rates_config.table = table;
    }

    let client = NbpClient::new(&rates_config);
    let rates = client.fetch_rates(args.date).await?;
    tracing::info!(fetched = rates.len(), table = %rates_config.table, "fetched NBP rates");

    let db_pool = connect().await?;
    run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    let inserted = db_repo.insert_rates(&rates).await?;
    if inserted == 0 {
        println!("No new rates to load.");
    } else {
        println!("Loaded {} new rates.", inserted);
    }

    Ok(())
}

fn handle_kpi() -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let records = ingest::read_csv_file(&config.data.csv_path)?;
    let snapshot = KpiEngine::new().compute(&records);

    let mut table = Table::new();
    table.set_header(vec!["KPI", "Value"]);
    table.add_row(vec!["Today's profit".to_string(), fmt_metric(snapshot.today)]);
    table.add_row(vec!["Month to date".to_string(), fmt_metric(Some(snapshot.mtd))]);
    table.add_row(vec!["7-day average".to_string(), fmt_metric(Some(snapshot.avg7))]);
    table.add_row(vec!["Δ vs yesterday".to_string(), fmt_metric(snapshot.delta)]);
    table.add_row(vec![
        "Last date".to_string(),
        snapshot
            .last_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "—".to_string()),
    ]);
    println!("{table}");

    Ok(())
}

async fn handle_rates(args: RatesArgs) -> anyhow::Result<()> {
    let db_pool = connect().await?;
    run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    let date = match args.date {
        Some(d) => Some(d),
        None => db_repo.latest_rate_date().await?,
    };
    let Some(date) = date else {
        println!("No rates on file.");
        return Ok(());
    };

    let rates = db_repo.rates_for_date(date).await?;
    let mut table = Table::new();
    table.set_header(vec!["Date", "Ticker", "Mid (PLN)", "Currency"]);
    for rate in &rates {
        table.add_row(vec![
            rate.as_of_date.to_string(),
            rate.ticker.clone(),
            rate.mid.to_string(),
            rate.name.clone(),
        ]);
    }
    println!("{table}");

    Ok(())
}

/// Renders a metric the way the dashboard cards do: an em dash for absent
/// values, two decimals, spaces for thousands, a minus sign (U+2212).
fn fmt_metric(value: Option<f64>) -> String {
    let Some(v) = value else {
        return "—".to_string();
    };

    let formatted = format!("{:.2}", v.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    let sign = if v < 0.0 { "−" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_formatting() {
        assert_eq!(fmt_metric(None), "—");
        assert_eq!(fmt_metric(Some(0.0)), "0.00");
        assert_eq!(fmt_metric(Some(1234567.5)), "1 234 567.50");
        assert_eq!(fmt_metric(Some(-42.0)), "−42.00");
    }
}
