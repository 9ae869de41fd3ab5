use std::{
    fs::File,
    io::{BufReader, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use tracing::{debug, error, trace};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};
use txnview::{
    errors::Error,
    io,
    view::{customer_options, CustomerFilter, SortKey, TransactionView, ViewState},
};

/// txnview: prints the transaction table or chart data for one customer filter and sort order.
#[derive(Debug, Parser)]
struct Args {
    /// CSV file of customers, with columns `id,name`
    #[arg(long, env = "TXNVIEW_CUSTOMERS")]
    customers: PathBuf,

    /// CSV file of transactions, with columns `id,customer_id,amount,date`
    #[arg(long, env = "TXNVIEW_TRANSACTIONS")]
    transactions: PathBuf,

    /// Only show this customer's transactions. "All customers" shows everyone.
    #[arg(long, default_value = "All customers")]
    customer: String,

    /// Sort order, e.g. "Lowest amount" or "Most Recent". Unknown values keep load order.
    #[arg(long, default_value = "Most Relevant")]
    sort: String,

    /// What to print
    #[arg(long, value_enum, default_value_t = Output::Table)]
    output: Output,

    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Table rows as CSV
    Table,
    /// Chart labels and values as JSON
    Chart,
    /// The accepted --customer and --sort values
    Options,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.log_level);
    debug!("Log level set to {}", args.log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn main_inner(args: Args) -> Result<(), Error> {
    trace!("{args:?}");
    let customers = BufReader::new(File::open(&args.customers)?);
    let transactions = BufReader::new(File::open(&args.transactions)?);
    let dataset = io::load_dataset(customers, transactions)?;

    let state = ViewState {
        customer: CustomerFilter::from_selection(&args.customer),
        sort: SortKey::from_selection(&args.sort),
    };
    debug!("Selected {state:?}");
    let view = TransactionView::with_state(&dataset, state);

    let mut stdout = std::io::stdout().lock();
    match args.output {
        Output::Table => io::write_rows_to_csv(&mut stdout, &view.projection().rows)?,
        Output::Chart => io::write_chart_to_json(&mut stdout, &view.projection().chart)?,
        Output::Options => {
            writeln!(stdout, "# --customer")?;
            for option in customer_options(&dataset) {
                writeln!(stdout, "{option}")?;
            }
            writeln!(stdout, "# --sort")?;
            for option in SortKey::options() {
                writeln!(stdout, "{option}")?;
            }
        }
    }
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // RUST_LOG does not exist; use the requested level for this crate only.
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
