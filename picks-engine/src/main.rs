mod config;
mod demo;
mod discord;
mod odds_api;
mod publish;
mod schedule;
mod server;
mod site;
mod updater;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use odds_processor::{american_to_decimal, combine_legs, decimal_to_american, implied_probability};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use updater::SharedReport;

#[derive(Parser, Debug)]
#[command(name = "picks-engine")]
#[command(version, about = "Weekly NFL and CFB picks, parlays and odds tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Service(ServiceCommand),

    #[command(flatten)]
    Tool(ToolCommand),
}

/// Commands that need configuration and logging
#[derive(Subcommand, Debug)]
enum ServiceCommand {
    /// Run one full update and exit
    Update,

    /// Run updates on the weekly schedule
    Schedule,

    /// Serve the site and report, running the schedule in the background
    Serve {
        /// Port to listen on (defaults to PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Offline odds calculators
#[derive(Subcommand, Debug)]
enum ToolCommand {
    /// Price a parlay from American odds legs
    Parlay {
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        legs: Vec<i32>,
    },

    /// Convert between American and decimal odds
    #[command(subcommand)]
    Convert(ConvertCommand),
}

#[derive(Subcommand, Debug)]
enum ConvertCommand {
    /// American to decimal
    American {
        #[arg(allow_negative_numbers = true)]
        odds: i32,
    },
    /// Decimal to American
    Decimal { odds: f64 },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => fmt().json().with_env_filter(filter).init(),
        _ => fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tool(tool) => run_tool(tool),
        Commands::Service(command) => {
            init_logging();
            let config = Config::from_env().context("invalid configuration")?;
            info!("📋 Configuration loaded");
            run(command, config).await
        }
    }
}

fn run_tool(tool: ToolCommand) -> Result<()> {
    match tool {
        ToolCommand::Parlay { legs } => {
            let odds = combine_legs(&legs)?;
            println!("{odds:+}");
        }
        ToolCommand::Convert(ConvertCommand::American { odds }) => {
            let decimal = american_to_decimal(odds)?;
            let implied = implied_probability(odds)?;
            println!("{decimal:.3} (implied {:.1}%)", implied * 100.0);
        }
        ToolCommand::Convert(ConvertCommand::Decimal { odds }) => {
            println!("{:+}", decimal_to_american(odds)?);
        }
    }
    Ok(())
}

async fn run(command: ServiceCommand, config: Config) -> Result<()> {
    match command {
        ServiceCommand::Update => {
            let report = updater::run_update(&config).await?;
            for league in &report.leagues {
                info!(
                    "{}: {} games, parlay {}",
                    league.league,
                    league.games.len(),
                    league
                        .parlay
                        .odds
                        .map(|o| format!("{o:+}"))
                        .unwrap_or_else(|| "none".to_string())
                );
            }
            Ok(())
        }
        ServiceCommand::Schedule => {
            let latest: SharedReport = Arc::new(RwLock::new(None));
            schedule::run_forever(config, latest).await;
            Ok(())
        }
        ServiceCommand::Serve { port } => {
            let port = port.unwrap_or(config.server_port);
            let site_dir = site_dir(&config.site_output).to_path_buf();
            let existing = updater::load_report(&updater::report_path(&config.site_output)).await;
            if existing.is_some() {
                info!("Loaded previous report");
            }
            let latest: SharedReport = Arc::new(RwLock::new(existing));

            let scheduler = tokio::spawn(schedule::run_forever(config, latest.clone()));
            let result = server::serve(latest, &site_dir, port).await;
            scheduler.abort();
            if let Err(e) = &result {
                error!("Server stopped: {:#}", e);
            }
            result
        }
    }
}

fn site_dir(site_output: &Path) -> &Path {
    match site_output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_parlay_legs() {
        let cli = Cli::try_parse_from(["picks-engine", "parlay", "-110", "+150", "-200"]).unwrap();
        match cli.command {
            Commands::Tool(ToolCommand::Parlay { legs }) => assert_eq!(legs, vec![-110, 150, -200]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_convert_subcommands() {
        let cli = Cli::try_parse_from(["picks-engine", "convert", "american", "-110"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Tool(ToolCommand::Convert(ConvertCommand::American { odds: -110 }))
        ));

        let cli = Cli::try_parse_from(["picks-engine", "convert", "decimal", "2.5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Tool(ToolCommand::Convert(ConvertCommand::Decimal { .. }))
        ));
    }

    #[test]
    fn service_commands_sit_at_top_level() {
        let cli = Cli::try_parse_from(["picks-engine", "update"]).unwrap();
        assert!(matches!(cli.command, Commands::Service(ServiceCommand::Update)));

        let cli = Cli::try_parse_from(["picks-engine", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Service(ServiceCommand::Serve { port: Some(9000) })
        ));

        let cli = Cli::try_parse_from(["picks-engine", "schedule"]).unwrap();
        assert!(matches!(cli.command, Commands::Service(ServiceCommand::Schedule)));
    }

    #[test]
    fn tools_run_without_configuration() {
        assert!(run_tool(ToolCommand::Parlay { legs: vec![-110, -110, -110] }).is_ok());
        assert!(run_tool(ToolCommand::Parlay { legs: vec![0] }).is_err());
        assert!(run_tool(ToolCommand::Convert(ConvertCommand::Decimal { odds: 1.0 })).is_err());
    }

    #[test]
    fn site_dir_defaults_to_cwd() {
        assert_eq!(site_dir(Path::new("index.html")), Path::new("."));
        assert_eq!(site_dir(Path::new("public/index.html")), Path::new("public"));
    }
}
