use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_kernel::settings::Settings;

/// Library catalog REST API.
#[derive(Debug, Parser)]
#[command(name = "libris", version, about)]
struct Cli {
    /// Override `server.port`.
    #[arg(long, global = true, env = "LIBRIS_PORT")]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and serve the API until Ctrl-C.
    Serve,
    /// Apply pending migrations and exit.
    Migrate,
    /// Print every mounted endpoint without connecting anywhere.
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    match cli.command {
        Command::Serve => {
            libris_telemetry::init(&settings.telemetry)?;
            libris_app::app::serve(settings).await
        }
        Command::Migrate => {
            libris_telemetry::init(&settings.telemetry)?;
            let applied = libris_app::app::migrate(&settings).await?;
            tracing::info!(applied, "migrations complete");
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Routes => {
            for operation in libris_app::app::routes(&settings)? {
                println!("{operation}");
            }
            Ok(())
        }
    }
}
