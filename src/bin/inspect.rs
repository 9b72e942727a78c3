//! cfgtable inspector
//!
//! Loads a compiled config blob and prints the load report and table rows.

use clap::{Parser, ValueEnum};
use cfgtable::tables::{self, DataSignin};
use cfgtable::{BlobLayout, Config, Registry};
use tracing_subscriber::{fmt, EnvFilter};

/// cfgtable inspector
#[derive(Parser, Debug)]
#[command(name = "cfgtable-inspect")]
#[command(about = "Load compiled config tables and print their contents")]
#[command(version)]
struct Args {
    /// Compiled config blob
    #[arg(short, long, default_value = "config.data")]
    data: String,

    /// How table payloads are framed in the blob
    #[arg(short, long, value_enum, default_value_t = Layout::Sectioned)]
    layout: Layout,

    /// Exit with an error if any data issue was reported
    #[arg(short, long)]
    strict: bool,

    /// Print the rows of this table
    #[arg(short, long)]
    table: Option<String>,

    /// Print only the row with this id (requires --table)
    #[arg(short, long, requires = "table")]
    id: Option<i32>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Layout {
    Sectioned,
    Contiguous,
}

impl From<Layout> for BlobLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Sectioned => BlobLayout::Sectioned,
            Layout::Contiguous => BlobLayout::Contiguous,
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cfgtable=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::info!("cfgtable inspector v{}", cfgtable::VERSION);
    tracing::info!("Data file: {}", args.data);

    let config = Config::builder()
        .data_path(&args.data)
        .layout(args.layout.into())
        .data_errors_fatal(args.strict)
        .build();

    let registry = match tables::register_all(Registry::builder().config(config.clone())).build() {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to build registry: {}", e);
            std::process::exit(1);
        }
    };

    let report = registry.initialize_from_config();
    for (name, rows) in &report.tables {
        println!("{:<24} {:>8} rows", name, rows);
    }
    for issue in &report.errors {
        println!("{}", issue);
    }

    if let Err(e) = report.into_result(config.data_errors_fatal) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    let Some(table) = args.table else {
        return;
    };

    match table.as_str() {
        "signin" => print_signin(&registry, args.id),
        other => {
            tracing::error!("Unknown table: {}", other);
            std::process::exit(2);
        }
    }
}

fn print_signin(registry: &Registry, id: Option<i32>) {
    let Some(table) = DataSignin::table(registry) else {
        return;
    };
    match id {
        Some(id) => match table.get(&id) {
            Some(row) => println!("{}", row),
            None => println!("signin[{}] not found", id),
        },
        None => {
            for row in table.all() {
                println!("{}", row);
            }
        }
    }
}
