use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use uss_inspect::asf_parser::{inspect, list_chunks};
use uss_inspect::config::Config;
use uss_inspect::http_server;
use uss_inspect::savestate_dir::{list_savestates, resolve_savestate};
use uss_inspect::summary::summary;

#[derive(Parser, Debug)]
#[command(name = "uss-inspect")]
#[command(about = "Inspect Amiberry savestates and serve them over HTTP", long_about = None)]
struct Args {
    /// Directory holding .uss savestates (defaults to the Amiberry home layout)
    #[arg(long, global = true)]
    savestate_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a savestate and print its summary
    Inspect {
        /// File name inside the savestate directory, or an absolute path
        name: String,
        /// Print the decoded metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the raw chunk directory of a savestate
    Chunks { name: String },
    /// List savestates in the savestate directory
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the platform paths in use
    Platform,
    /// Start the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(dir) = args.savestate_dir {
        config = config.with_savestate_dir(dir);
    }

    match args.command {
        Command::Inspect { name, json } => {
            let path = resolve_savestate(&config.savestate_dir, &name)?;
            let metadata = inspect(&path).with_context(|| format!("inspecting {}", path.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                println!("{}", summary(&metadata));
                println!();
                println!("Chunks: {}", metadata.chunks.join(", "));
            }
        }
        Command::Chunks { name } => {
            let path = resolve_savestate(&config.savestate_dir, &name)?;
            let chunks = list_chunks(&path).with_context(|| format!("listing chunks of {}", path.display()))?;
            println!("{:<6} {:>10} {:>10} {:>10}", "TAG", "OFFSET", "SIZE", "DATA");
            for chunk in &chunks {
                println!(
                    "{:<6} {:08X}   {:>10} {:>10}",
                    format!("{:?}", chunk.tag),
                    chunk.offset,
                    chunk.total_size,
                    chunk.payload_size
                );
            }
        }
        Command::List { search } => {
            let savestates = list_savestates(&config.savestate_dir, search.as_deref())?;
            if savestates.is_empty() {
                match search {
                    Some(term) => println!("No savestates found matching \"{term}\"."),
                    None => println!("No savestates found."),
                }
                return Ok(());
            }
            println!("Found {} savestate(s):\n", savestates.len());
            for state in &savestates {
                println!("- {}\n  Modified: {}\n  Path: {}", state.name, state.modified, state.path.display());
            }
        }
        Command::Platform => {
            println!("{}", serde_json::to_string_pretty(&config.platform_info())?);
        }
        Command::Serve { host, port } => {
            http_server::serve(config, &host, port)
                .await
                .with_context(|| format!("serving on {host}:{port}"))?;
        }
    }

    Ok(())
}
