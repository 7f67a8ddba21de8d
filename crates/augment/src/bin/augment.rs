//! Small driver: maps every record in a JSON dataset file through the
//! configured pipeline and reports what survived.

use std::{fs, path::PathBuf};

use augment::{MapperConfig, Mode, SampleRecord};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON dataset file (an array of sample records)
    dataset: PathBuf,
    /// Path to a JSON mapper configuration; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Run in inference mode (pixels only, no instances)
    #[arg(long)]
    inference: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let mode = if cli.inference {
        Mode::Inference
    } else {
        Mode::Training
    };

    let config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => MapperConfig::default(),
    };
    let mapper = config.build(mode)?;

    let records: Vec<SampleRecord> = serde_json::from_str(&fs::read_to_string(&cli.dataset)?)?;
    info!(records = records.len(), ?mode, "loaded dataset");

    let mut rng = StdRng::from_entropy();
    let mut failed = 0usize;
    for record in &records {
        match mapper.map(&mut rng, record) {
            Ok(sample) => info!(
                file = %record.file_name.display(),
                height = sample.image.height,
                width = sample.image.width,
                instances = sample.instances.len(),
                "mapped"
            ),
            Err(err) => {
                failed += 1;
                error!(file = %record.file_name.display(), %err, "failed to map");
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} records failed", records.len()).into());
    }
    Ok(())
}
