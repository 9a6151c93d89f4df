//! physio-viz: scatter plots of wearable signals against exam scores.
//!
//! Run: `physio-viz render --data processed_data.json --measure EDA --stat max`

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use physio_viz::config::{default_config_path, Config};
use physio_viz::dataset::{Dataset, ExamType, FileSource};
use physio_viz::format::format_measure_value;
use physio_viz::measure::{label_for, unit_for};
use physio_viz::prepare::prepare_dataset;
use physio_viz::render::SvgSurface;
use physio_viz::resolver::Resolver;
use physio_viz::stats::is_valid;
use physio_viz::view::{LoadState, Scene, Selection, ViewState};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// physio-viz: wearable signals vs exam performance
#[derive(Parser, Debug)]
#[command(name = "physio-viz")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Scatter plots correlating wearable physiological signals with exam scores", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the scatter plot to an SVG file
    Render {
        /// Processed dataset (JSON)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Measure: HR, EDA, TEMP or BVP
        #[arg(long)]
        measure: Option<String>,

        /// Statistic: avg, median, max, min, q1, q3, range or iqr
        #[arg(long)]
        stat: Option<String>,

        /// Output SVG path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render without transitions
        #[arg(long)]
        no_animation: bool,
    },

    /// Print one resolved value
    Resolve {
        /// Processed dataset (JSON)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Student id, e.g. S01
        #[arg(long)]
        student: String,

        /// Exam: "Midterm 1", "Midterm 2" or "Final"
        #[arg(long)]
        exam: String,

        /// Measure: HR, EDA, TEMP or BVP
        #[arg(long, default_value = "HR")]
        measure: String,

        /// Statistic: avg, median, max, min, q1, q3, range or iqr
        #[arg(long, default_value = "avg")]
        stat: String,
    },

    /// Build the processed dataset from raw recordings
    Prepare {
        /// Directory holding StudentGrades.txt and Data/
        #[arg(long, default_value = "Project3Data")]
        input: PathBuf,

        /// Output JSON path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(default_config_path().map_or_else(Config::default, Config::load_or_default)),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Render {
            data,
            measure,
            stat,
            output,
            no_animation,
        } => {
            let mut scene = Scene::from_config(&config)?;
            if no_animation {
                scene.layout.transition_ms = 0;
            }
            let selection = Selection::new(
                measure.unwrap_or(config.selection.measure),
                stat.unwrap_or(config.selection.statistic),
            );
            let data = data.unwrap_or(config.data_path);
            let output = output.unwrap_or(config.output_path);

            let mut view = ViewState::new(scene.clone(), selection);
            let mut surface = SvgSurface::new(scene);
            view.load(&FileSource::new(&data), &mut surface)?;
            surface
                .write_to_file(&output)
                .with_context(|| format!("writing {}", output.display()))?;

            if let LoadState::Failed(reason) = view.load_state() {
                bail!("{reason}");
            }
            tracing::info!(
                output = %output.display(),
                points = surface.point_count(),
                "plot written"
            );
        }

        Commands::Resolve {
            data,
            student,
            exam,
            measure,
            stat,
        } => {
            let Some(exam_type) = ExamType::parse(&exam) else {
                bail!("unknown exam {exam:?}; expected \"Midterm 1\", \"Midterm 2\" or \"Final\"");
            };
            let data = data.unwrap_or(config.data_path);
            let dataset = Dataset::load(&FileSource::new(&data))?;
            let value = Resolver::new(&dataset).resolve(&student, exam_type, &measure, &stat);

            let unit = unit_for(&measure);
            let formatted = format_measure_value(value, &measure);
            if is_valid(value) && !unit.is_empty() {
                println!("{} {measure} for {student} ({exam_type}): {formatted} {unit}", label_for(&stat));
            } else {
                println!("{} {measure} for {student} ({exam_type}): {formatted}", label_for(&stat));
            }
        }

        Commands::Prepare { input, output } => {
            let dataset = prepare_dataset(&input)
                .with_context(|| format!("preparing dataset from {}", input.display()))?;
            let output = output.unwrap_or(config.data_path);
            dataset
                .write_to_file(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(output = %output.display(), records = dataset.len(), "dataset written");
        }
    }

    Ok(())
}
