use clap::Parser;
use likewise_api::{CatalogSource, IndexHandle, RestApi};
use likewise_core::{ColumnMapping, RecommenderConfig, DEFAULT_CUTOFF, DEFAULT_TOP_K};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Recommend similar catalog items over HTTP
#[derive(Parser, Debug)]
#[command(name = "likewise")]
#[command(about = "Content-based item recommendation service", long_about = None)]
struct Args {
    /// Path to the catalog CSV file
    #[arg(short, long, default_value = "./songs.csv")]
    catalog: PathBuf,

    /// Address to bind the HTTP API to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 8000)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Minimum fuzzy match ratio for resolving a query
    #[arg(long, default_value_t = DEFAULT_CUTOFF)]
    cutoff: f64,

    /// Number of recommendations returned per query
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// CSV column holding item names
    #[arg(long, default_value = "song")]
    name_column: String,

    /// CSV column holding the secondary attribute
    #[arg(long, default_value = "artist")]
    attribute_column: String,

    /// CSV column holding the description
    #[arg(long, default_value = "text")]
    description_column: String,

    /// CSV column holding the payload
    #[arg(long, default_value = "link")]
    payload_column: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Likewise v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {:?}", args.catalog);

    let config = RecommenderConfig {
        cutoff: args.cutoff,
        top_k: args.top_k,
    };
    let columns = ColumnMapping {
        name: args.name_column,
        secondary_attribute: args.attribute_column,
        description: args.description_column,
        payload: args.payload_column,
    };

    let source = CatalogSource::new(&args.catalog, columns, config);
    let handle = match IndexHandle::from_source(source) {
        Ok(handle) => Arc::new(handle),
        Err(e) => {
            error!("Failed to build recommendation index: {}", e);
            return Err(e.into());
        }
    };
    info!("Index built with {} items", handle.snapshot().len());

    let host = args.host.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", host, http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(handle, &host, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://{}:{}/", args.host, args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
