use std::{
    io::{stdin, stdout},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scribe_db::{
    Config, Database,
    shell::{HELP, LineStatus, Shell},
    storage::JsonStore,
};

/// Scribe DB command shell
#[derive(Parser, Debug)]
#[command(
    name = "scribe",
    version,
    about = "A small file-backed table store with typed columns"
)]
struct Args {
    /// Directory holding db_meta.json and the data/ folder
    #[arg(short = 'd', long, env = "SCRIBE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// JSON config file
    #[arg(long, value_name = "FILE", env = "SCRIBE_CONFIG")]
    config: Option<PathBuf>,

    /// Run a single command and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Do not ask for confirmation before drop_table and delete
    #[arg(short = 'y', long)]
    yes: bool,

    /// Disable the select result cache
    #[arg(long)]
    no_cache: bool,
}

fn main() -> Result<ExitCode> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(false)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if args.yes {
        config.confirm_destructive = false;
    }
    if args.no_cache {
        config.cache_enabled = false;
    }

    info!(
        data_dir = %config.data_dir.display(),
        cache = config.cache_enabled,
        confirm = config.confirm_destructive,
        "starting scribe"
    );

    let db = Database::new(JsonStore::new(&config.data_dir)).with_cache(config.cache_enabled);

    if args.command.is_none() {
        println!("*** Scribe DB ***\n");
        println!("{HELP}");
    }

    let mut shell = Shell::new(db, stdin().lock(), stdout().lock())
        .confirm_destructive(config.confirm_destructive);

    match args.command {
        Some(command) => match shell.execute_line(&command)? {
            LineStatus::Failed => Ok(ExitCode::FAILURE),
            _ => Ok(ExitCode::SUCCESS),
        },
        None => {
            shell.run()?;
            println!("Exiting Scribe");
            Ok(ExitCode::SUCCESS)
        }
    }
}
