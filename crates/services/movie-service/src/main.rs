//! Movie Service - HTTP server for movie records.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_service_lib::BoxError;

#[derive(Parser)]
#[command(name = "movie-service")]
#[command(about = "Movie record service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "MOVIE_SERVICE_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "MOVIE_SERVICE_PORT", default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            movie_service_lib::run_embedded(&host, port).await?;
        }
    }

    Ok(())
}
