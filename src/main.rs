use std::{
    io,
    path::PathBuf,
};

use clap::Parser;
use duotag::{
    anki::{
        self,
        Collection,
    },
    core::{
        pipeline::{
            commit_changes,
            stage_changes,
        },
        SyncConfig,
    },
    duolingo::{
        load_token,
        DuolingoProfile,
    },
};

/// Tags Anki vocabulary notes that Duolingo already considers learned.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Duolingo username whose learned words to fetch
    user: String,

    /// File holding the Duolingo session JWT
    #[arg(long, value_name = "FILE", default_value = "jwt.txt")]
    token: PathBuf,

    /// Path to collection.anki2 (default: the single local Anki profile)
    #[arg(long, value_name = "FILE")]
    collection: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), duotag::core::DuotagError> {
    let config = SyncConfig::default();

    let token = load_token(&cli.token)?;
    let profile = DuolingoProfile::new(&cli.user, &token)?;

    let collection_path = match cli.collection {
        Some(path) => path,
        None => anki::find_collection()?,
    };
    let mut collection = Collection::open(&collection_path)?;

    let report = stage_changes(&profile, &mut collection, &config)?;
    commit_changes(&mut collection, &report, &config, &mut io::stdin().lock())?;

    Ok(())
}
