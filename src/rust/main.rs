use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::info;
use placement_predictor::service::missing_artifact_message;
use placement_predictor::{
    init_logger, AppConfig, InternshipExperience, PlacementService, PredictionRequest,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the trained pipeline (defaults to $PLACEMENT_MODEL, then model/pipe.json)
    #[arg(short, long)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the prediction form (default)
    Gui,
    /// Predict once from the command line and print the result
    Predict(PredictArgs),
}

#[derive(ClapArgs, Debug)]
struct PredictArgs {
    #[arg(long, default_value_t = 100)]
    iq: i64,
    #[arg(long, default_value_t = 7.0)]
    prev_sem_result: f64,
    #[arg(long, default_value_t = 7.0)]
    cgpa: f64,
    #[arg(long, default_value_t = 7)]
    academic_performance: i64,
    /// "No" or "Yes"
    #[arg(long, default_value = "No")]
    internship_experience: InternshipExperience,
    #[arg(long, default_value_t = 5)]
    extra_curricular_score: i64,
    #[arg(long, default_value_t = 7)]
    communication_skills: i64,
    #[arg(long, default_value_t = 2)]
    projects_completed: i64,
}

impl From<PredictArgs> for PredictionRequest {
    fn from(args: PredictArgs) -> Self {
        PredictionRequest {
            iq: args.iq,
            prev_sem_result: args.prev_sem_result,
            cgpa: args.cgpa,
            academic_performance: args.academic_performance,
            internship_experience: args.internship_experience,
            extra_curricular_score: args.extra_curricular_score,
            communication_skills: args.communication_skills,
            projects_completed: args.projects_completed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Args::parse();
    let config = AppConfig::resolve(args.model.as_deref());
    info!("Using pipeline at {:?}", config.model_path);

    match args.command.unwrap_or(Command::Gui) {
        Command::Gui => run_gui(&config),
        Command::Predict(predict) => run_predict(&config, predict.into()),
    }
}

#[cfg(feature = "gui")]
fn run_gui(config: &AppConfig) -> anyhow::Result<()> {
    use placement_predictor::ui;

    match PlacementService::open(config) {
        Ok(service) => ui::run(service).map_err(|e| anyhow::anyhow!("{}", e)),
        Err(err) => {
            let message = missing_artifact_message(&err);
            ui::run_launch_error(message.clone()).map_err(|e| anyhow::anyhow!("{}", e))?;
            bail!(message)
        }
    }
}

#[cfg(not(feature = "gui"))]
fn run_gui(_config: &AppConfig) -> anyhow::Result<()> {
    bail!("This binary was built without the `gui` feature; use the `predict` subcommand")
}

fn run_predict(config: &AppConfig, request: PredictionRequest) -> anyhow::Result<()> {
    let service = PlacementService::open(config)
        .map_err(|err| anyhow::anyhow!(missing_artifact_message(&err)))
        .context("Cannot start without a pipeline")?;

    let submission = service.submit(&request);
    match submission.result {
        Ok(outcome) => {
            println!("{}", outcome.message);
            if let Some(line) = outcome.probability_line {
                println!("{}", line);
            }
            Ok(())
        }
        Err(report) => {
            eprintln!("{}", report.message);
            bail!(report.detail)
        }
    }
}
