mod config;
mod generate_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use hoop_core::ExportFormat;

use config::{ConfigOverrides, HoopConfig};

#[derive(Parser)]
#[command(name = "hoopbuddy", about = "Personalized basketball workout plans", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a hoopbuddy config file
    Init {
        /// Gemini API key to store
        #[arg(long)]
        api_key: Option<String>,
        /// Gemini model to use (default: gemini-1.5-pro)
        #[arg(long)]
        model: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Serve POST /api/generate-workout over HTTP
    Serve {
        /// Address to bind (overrides HOOPBUDDY_BIND)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides HOOPBUDDY_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the interactive intake wizard
    Wizard {
        /// Generate through a running `hoopbuddy serve` at this URL
        #[arg(long)]
        server: Option<String>,
        /// Directory exported plans are written to (default: current directory)
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Generate a plan from a request JSON file
    Generate {
        /// Path to the request JSON (name, age, position, level, improvement, availableDays)
        #[arg(long)]
        profile: PathBuf,
        /// Output format: json or markdown
        #[arg(long, default_value = "json")]
        format: ExportFormat,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Generate through a running `hoopbuddy serve` at this URL
        #[arg(long)]
        server: Option<String>,
    },
    /// Print shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Execute the `hoopbuddy init` command: write config file.
fn cmd_init(api_key: Option<String>, model: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        gemini: config::GeminiSection {
            api_key: api_key.clone(),
            model: model.clone(),
        },
        server: config::ServerSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match api_key.as_deref() {
        Some(key) => println!("  gemini.api_key = {}", mask_key(key)),
        None => println!("  gemini.api_key not set; export GEMINI_API_KEY before generating"),
    }
    if let Some(model) = model {
        println!("  gemini.model = {model}");
    }
    println!();
    println!("Next: run `hoopbuddy wizard` to build your workout plan.");

    Ok(())
}

/// Show only the first and last four characters of a secret.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "(set)".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The wizard owns the terminal; only log when explicitly asked to.
    let wants_logs = !matches!(cli.command, Commands::Wizard { .. })
        || std::env::var_os("RUST_LOG").is_some();
    if wants_logs {
        init_tracing();
    }

    match cli.command {
        Commands::Init {
            api_key,
            model,
            force,
        } => {
            cmd_init(api_key, model, force)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = HoopConfig::resolve(&ConfigOverrides {
                bind,
                port,
                ..Default::default()
            })?;
            let generator = resolved.local_generator()?;
            tracing::info!(model_id = %generator.model_id(), "using Gemini model");
            serve_cmd::run_serve(Arc::new(generator), &resolved.bind, resolved.port).await?;
        }
        Commands::Wizard { server, export_dir } => {
            let resolved = HoopConfig::resolve(&ConfigOverrides {
                backend_url: server,
                ..Default::default()
            })?;
            let planner = resolved.planner()?;
            let export_dir = match export_dir {
                Some(dir) => dir,
                None => std::env::current_dir().context("failed to read current directory")?,
            };
            tui::run_wizard(planner, export_dir).await?;
        }
        Commands::Generate {
            profile,
            format,
            output,
            server,
        } => {
            let resolved = HoopConfig::resolve(&ConfigOverrides {
                backend_url: server,
                ..Default::default()
            })?;
            generate_cmd::run_generate(&resolved, &profile, format, output.as_deref()).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "hoopbuddy",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_parses_format() {
        let cli = Cli::try_parse_from([
            "hoopbuddy",
            "generate",
            "--profile",
            "me.json",
            "--format",
            "markdown",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { format, output, .. } => {
                assert_eq!(format, ExportFormat::Markdown);
                assert!(output.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn generate_rejects_unknown_format() {
        let result = Cli::try_parse_from([
            "hoopbuddy",
            "generate",
            "--profile",
            "me.json",
            "--format",
            "pdf",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn mask_key_hides_the_middle() {
        assert_eq!(mask_key("AIzaSyDemoKeyAb1234"), "AIza...1234");
        assert_eq!(mask_key("short"), "(set)");
    }
}
