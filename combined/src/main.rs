//! Combined binary - runs the movie and user services in one process.

use clap::{Parser, Subcommand};
use tokio::task::JoinHandle;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "catalog-api")]
#[command(about = "Movie and user services in a single process")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both services, each on its own port
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "MOVIE_SERVICE_PORT", default_value = "3000")]
        movie_port: u16,
        #[arg(long, env = "USER_SERVICE_PORT", default_value = "3001")]
        user_port: u16,
    },
}

/// The two services cannot share a listener.
fn check_ports(movie_port: u16, user_port: u16) -> Result<(), String> {
    if movie_port == user_port {
        return Err(format!(
            "movie and user services both configured for port {}",
            movie_port
        ));
    }
    Ok(())
}

async fn wait_for(name: &str, handle: JoinHandle<Result<(), BoxError>>) -> Result<(), BoxError> {
    match handle.await {
        Ok(Ok(())) => {
            info!("{} stopped", name);
            Ok(())
        }
        Ok(Err(e)) => {
            error!("{} failed: {}", name, e);
            Err(e)
        }
        Err(e) => {
            error!("{} task aborted: {}", name, e);
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            movie_port,
            user_port,
        } => {
            check_ports(movie_port, user_port)?;

            info!("Starting combined services");
            info!("  Movie service: http://{}:{}", host, movie_port);
            info!("  User service:  http://{}:{}", host, user_port);

            let movie_host = host.clone();
            let movies = tokio::spawn(async move {
                movie_service_lib::run_embedded(&movie_host, movie_port).await
            });

            let user_host = host;
            let users = tokio::spawn(async move {
                user_service_lib::run_embedded(&user_host, user_port).await
            });

            // A failing service takes the process down; a clean stop waits
            // for both to drain.
            tokio::try_join!(
                wait_for("Movie service", movies),
                wait_for("User service", users)
            )?;
        }
    }

    Ok(())
}
