use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "movie-search-server")]
#[command(about = "Movie search front end for the OMDb API", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "movie-search.yaml")]
    config: String,

    /// Log at debug level
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "movie_search=debug,tower_http=debug"
    } else {
        "movie_search=info,tower_http=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if args.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if let Err(e) = movie_search::run(&args.config, args.debug).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
