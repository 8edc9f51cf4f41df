use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use folio::app::{App, show_dataset_error};
use folio::catalog::Dataset;
use folio::config::{Config, default_state_path};
use folio::error::AppResult;
use folio::history::format_location;
use folio::logging::{LogTarget, init_logging};
use folio::prefs::PreferenceStore;

/// Terminal viewer for an art portfolio.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Args {
    /// Portfolio dataset (JSON array of works).
    #[arg(value_name = "DATASET")]
    dataset: PathBuf,

    /// Initial hero position.
    #[arg(long, conflicts_with = "location")]
    image: Option<usize>,

    /// Restore from a location such as "?image=3".
    #[arg(long)]
    location: Option<String>,

    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn startup_location(&self) -> String {
        match (&self.location, self.image) {
            (Some(location), _) => location.clone(),
            (None, Some(position)) => format_location(position),
            (None, None) => String::new(),
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if let Err(err) = run(Args::parse()).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> AppResult<()> {
    let _log_guard = init_logging(LogTarget::resolve(args.log_file.as_deref()))?;

    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let prefs = PreferenceStore::load(args.state.clone().or_else(default_state_path));

    let dataset = match Dataset::load_from_path(&args.dataset) {
        Ok(dataset) => dataset,
        Err(err) => {
            error!(path = %args.dataset.display(), error = %err, "dataset unavailable");
            return show_dataset_error(&err.to_string()).await;
        }
    };
    info!(path = %args.dataset.display(), works = dataset.len(), "dataset loaded");

    let mut app = App::new(dataset, config, prefs)?;
    app.run(&args.startup_location()).await
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::Args;

    #[test]
    fn dataset_path_is_required() {
        assert!(Args::try_parse_from(["folio"]).is_err());
        let args = Args::try_parse_from(["folio", "portfolio.json"]).expect("dataset should parse");
        assert_eq!(args.dataset, PathBuf::from("portfolio.json"));
        assert_eq!(args.startup_location(), "");
    }

    #[test]
    fn image_flag_becomes_location() {
        let args = Args::try_parse_from(["folio", "p.json", "--image", "3"])
            .expect("image flag should parse");
        assert_eq!(args.startup_location(), "?image=3");

        let args = Args::try_parse_from(["folio", "p.json", "--location", "?image=7x"])
            .expect("location flag should parse");
        assert_eq!(args.startup_location(), "?image=7x");
    }

    #[test]
    fn image_and_location_conflict() {
        assert!(
            Args::try_parse_from(["folio", "p.json", "--image", "1", "--location", "?image=2"])
                .is_err()
        );
    }
}
