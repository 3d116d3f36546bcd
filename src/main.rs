use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use runpad::dispatch::{ClipboardUrlSource, UrlSource, encode};
use runpad::panel::{self, PanelOptions};
use runpad::relay;
use runpad::store::CommandStore;

#[derive(Parser)]
#[command(name = "runpad")]
#[command(about = "Compose a command, append the active URL, dispatch it", long_about = None)]
struct Cli {
    /// Directory holding the persisted command state
    #[arg(long, value_name = "PATH")]
    store_dir: Option<PathBuf>,

    /// Executor endpoint
    #[arg(long, default_value = relay::DEFAULT_EXECUTOR_URL)]
    executor_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored command
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Dispatch the stored command once, appending a URL
    Run {
        /// URL to append (defaults to the clipboard)
        #[arg(long)]
        url: Option<String>,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let store_dir = match cli.store_dir {
        Some(dir) => dir,
        None => default_store_dir()?,
    };

    match cli.command {
        None => panel::run(PanelOptions {
            store_dir,
            executor_url: cli.executor_url,
        }),
        Some(Commands::Show { json }) => {
            let store = CommandStore::open(&store_dir)?;
            let spec = store.load();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&spec).context("serialize command")?
                );
            } else {
                println!("{} {}", spec.base, spec.args.join(" "));
            }
            Ok(())
        }
        Some(Commands::Run { url }) => {
            let store = CommandStore::open(&store_dir)?;
            let spec = store.load();
            let url = url.or_else(|| ClipboardUrlSource::new().active_url());
            let Some(payload) = encode(&spec, url.as_deref()) else {
                anyhow::bail!("no URL available (pass --url or copy one to the clipboard)");
            };
            let client = reqwest::blocking::Client::new();
            let reply = relay::post_command(&client, &cli.executor_url, &payload)?;
            println!("{}", reply);
            Ok(())
        }
    }
}

fn default_store_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("resolve home directory")?;
    Ok(home.join(".runpad"))
}
