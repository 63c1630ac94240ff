//! Stress CLI - Command-line interface for Stress Sense
//!
//! Commands:
//! - predict: Predict the stress level of a single submission
//! - encode: Validate a submission and print its feature vector
//! - batch: Predict every submission of an NDJSON file
//! - validate: Validate NDJSON submissions without a model
//! - options: List the accepted labels of every categorical field
//! - doctor: Diagnose model bundle and environment

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use stress_sense::encoding::{
    BmiCategory, Categorical, Gender, Occupation, SleepDisorder, SleepQuality,
};
use stress_sense::{
    FeatureEncoder, Feedback, Field, FormAction, FormState, PredictError, PredictionResult,
    RawInput, StressPredictor, ValidationError, PRODUCER_NAME, STRESS_SENSE_VERSION,
};

/// Stress - predict stress levels from lifestyle and sleep habits
#[derive(Parser)]
#[command(name = "stress")]
#[command(version = STRESS_SENSE_VERSION)]
#[command(about = "Predict stress levels from lifestyle and sleep habits", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the stress level of a single submission
    Predict {
        #[command(flatten)]
        form: FormArgs,

        /// Model bundle (JSON)
        #[arg(short, long, env = "STRESS_MODEL_PATH")]
        model: PathBuf,

        /// Print the full prediction report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a submission and print its feature vector
    Encode {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Predict every submission of an NDJSON file
    Batch {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Model bundle (JSON)
        #[arg(short, long, env = "STRESS_MODEL_PATH")]
        model: PathBuf,
    },

    /// Validate NDJSON submissions without a model
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the accepted labels of every categorical field
    Options {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose model bundle and environment
    Doctor {
        /// Model bundle to check
        #[arg(short, long, env = "STRESS_MODEL_PATH")]
        model: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Form fields; unset fields keep their form defaults
#[derive(Args)]
struct FormArgs {
    /// Read the submission from a JSON file (use - for stdin); flags override it
    #[arg(short, long)]
    input: Option<PathBuf>,

    #[arg(long)]
    gender: Option<String>,

    /// Age in years
    #[arg(long)]
    age: Option<String>,

    #[arg(long)]
    occupation: Option<String>,

    /// Sleep duration in hours
    #[arg(long)]
    sleep_duration: Option<String>,

    /// Physical activity in minutes per day
    #[arg(long)]
    physical_activity: Option<String>,

    /// Heart rate in bpm
    #[arg(long)]
    heart_rate: Option<String>,

    /// Steps per day
    #[arg(long)]
    daily_steps: Option<String>,

    /// Sleep quality label or band keyword (poor, average, good, excellent)
    #[arg(long)]
    sleep_quality: Option<String>,

    #[arg(long = "bmi")]
    bmi_category: Option<String>,

    #[arg(long = "disorder")]
    sleep_disorder: Option<String>,
}

impl FormArgs {
    fn into_state(self) -> Result<FormState, CliFailure> {
        let input = match &self.input {
            Some(path) => serde_json::from_str(&read_input(path)?)?,
            None => RawInput::default(),
        };

        let edits = [
            (Field::Gender, self.gender),
            (Field::Age, self.age),
            (Field::Occupation, self.occupation),
            (Field::SleepDuration, self.sleep_duration),
            (Field::PhysicalActivity, self.physical_activity),
            (Field::HeartRate, self.heart_rate),
            (Field::DailySteps, self.daily_steps),
            (Field::SleepQuality, self.sleep_quality),
            (Field::BmiCategory, self.bmi_category),
            (Field::SleepDisorder, self.sleep_disorder),
        ];

        let state = edits
            .into_iter()
            .filter_map(|(field, value)| value.map(|value| FormAction::Edit { field, value }))
            .fold(FormState::with_input(input), FormState::transition);

        Ok(state)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliFailure> {
    match cli.command {
        Commands::Predict { form, model, json } => cmd_predict(form, &model, json),
        Commands::Encode { form } => cmd_encode(form),
        Commands::Batch {
            input,
            output,
            model,
        } => cmd_batch(&input, &output, &model),
        Commands::Validate { input, json } => cmd_validate(&input, json),
        Commands::Options { json } => cmd_options(json),
        Commands::Doctor { model, json } => cmd_doctor(model.as_deref(), json),
    }
}

fn cmd_predict(form: FormArgs, model: &Path, json: bool) -> Result<(), CliFailure> {
    let state = form.into_state()?;
    let predictor = StressPredictor::load(model)?;

    if json {
        let report = predictor.report(state.input())?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let feedback = predict_feedback(predictor.predict(state.input()))?;
    println!("{}", feedback.message());
    Ok(())
}

/// Feedback for a successful prediction; validation failures are rejected
/// submissions, anything else is a model fault
fn predict_feedback(
    result: Result<PredictionResult, PredictError>,
) -> Result<Feedback, CliFailure> {
    match result {
        Ok(prediction) => Ok(Feedback::Success {
            stress_level: prediction.stress_level,
        }),
        Err(PredictError::Validation(e)) => Err(CliFailure::Rejected(Feedback::from(e))),
        Err(e) => Err(CliFailure::Predict(e)),
    }
}

fn cmd_encode(form: FormArgs) -> Result<(), CliFailure> {
    let state = form.into_state()?;
    let features = FeatureEncoder::encode(state.input())?;

    let named: serde_json::Map<String, serde_json::Value> = features
        .named()
        .into_iter()
        .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
        .collect();

    let output = serde_json::json!({
        "features": features,
        "named": named,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_batch(input: &Path, output: &Path, model: &Path) -> Result<(), CliFailure> {
    let input_data = read_input(input)?;
    let predictor = StressPredictor::load(model)?;

    let mut lines: Vec<String> = Vec::new();
    let mut failures = 0usize;

    for (index, line) in submissions(&input_data) {
        let record = serde_json::from_str::<RawInput>(line)
            .map_err(PredictError::from)
            .and_then(|raw| predictor.report(&raw));

        match record {
            Ok(report) => lines.push(serde_json::to_string(&report)?),
            Err(e) => {
                failures += 1;
                debug!(line = index + 1, error = %e, "submission rejected");
                let error = CliError::from(CliFailure::Predict(e));
                lines.push(serde_json::to_string(&serde_json::json!({
                    "line": index + 1,
                    "error": error,
                }))?);
            }
        }
    }

    if lines.is_empty() {
        return Err(CliFailure::NoSubmissions);
    }

    let output_data = lines.join("\n") + "\n";
    if output.to_string_lossy() == "-" {
        let mut stdout = io::stdout();
        stdout.write_all(output_data.as_bytes())?;
        stdout.flush()?;
    } else {
        fs::write(output, output_data)?;
    }

    info!(total = lines.len(), failures, "batch complete");

    if failures > 0 {
        Err(CliFailure::BatchFailed(failures))
    } else {
        Ok(())
    }
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), CliFailure> {
    let input_data = read_input(input)?;

    let mut total = 0usize;
    let mut errors: Vec<ValidationErrorDetail> = Vec::new();

    for (index, line) in submissions(&input_data) {
        total += 1;
        let outcome = serde_json::from_str::<RawInput>(line)
            .map_err(|e| (Vec::new(), format!("Invalid JSON: {e}")))
            .and_then(|raw| {
                FeatureEncoder::encode(&raw)
                    .map(|_| ())
                    .map_err(|e| (e.fields(), e.user_message()))
            });

        if let Err((fields, error)) = outcome {
            errors.push(ValidationErrorDetail {
                line: index + 1,
                fields: fields.iter().map(|f| f.as_str().to_string()).collect(),
                error,
            });
        }
    }

    let report = ValidationReport {
        total_submissions: total,
        valid_submissions: total - errors.len(),
        invalid_submissions: errors.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total submissions:   {}", report.total_submissions);
        println!("Valid submissions:   {}", report.valid_submissions);
        println!("Invalid submissions: {}", report.invalid_submissions);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                if err.fields.is_empty() {
                    println!("  - Line {}: {}", err.line, err.error);
                } else {
                    println!(
                        "  - Line {} ({}): {}",
                        err.line,
                        err.fields.join(", "),
                        err.error
                    );
                }
            }
        }
    }

    if report.invalid_submissions > 0 {
        Err(CliFailure::ValidationFailed(report.invalid_submissions))
    } else {
        Ok(())
    }
}

fn cmd_options(json: bool) -> Result<(), CliFailure> {
    let options = vec![
        field_options::<Gender>(),
        field_options::<Occupation>(),
        field_options::<SleepQuality>(),
        field_options::<BmiCategory>(),
        field_options::<SleepDisorder>(),
    ];

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    for (i, field) in options.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} (--{})", field.display_name, field.flag);
        if let Some(placeholder) = &field.placeholder {
            println!("  placeholder: {placeholder}");
        }
        for option in &field.options {
            println!("  {:>2}  {}", option.code, option.label);
        }
    }
    Ok(())
}

fn cmd_doctor(model: Option<&Path>, json: bool) -> Result<(), CliFailure> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} version {}", PRODUCER_NAME, STRESS_SENSE_VERSION),
    });

    match model {
        Some(path) if path.exists() => match StressPredictor::load(path) {
            Ok(predictor) => {
                // A default submission must be rejected before reaching the model
                let mut blank = FormState::default();
                let feedback = blank.submit(&predictor);
                checks.push(DoctorCheck {
                    name: "model".to_string(),
                    status: CheckStatus::Ok,
                    message: format!("Model bundle valid ({})", path.display()),
                });
                checks.push(DoctorCheck {
                    name: "validation".to_string(),
                    status: if feedback.is_success() {
                        CheckStatus::Error
                    } else {
                        CheckStatus::Ok
                    },
                    message: format!("Empty form rejected: {}", feedback.message()),
                });
            }
            Err(e) => checks.push(DoctorCheck {
                name: "model".to_string(),
                status: CheckStatus::Error,
                message: format!("Invalid model bundle: {e}"),
            }),
        },
        Some(path) => checks.push(DoctorCheck {
            name: "model".to_string(),
            status: CheckStatus::Error,
            message: format!("Model bundle {} does not exist", path.display()),
        }),
        None => checks.push(DoctorCheck {
            name: "model".to_string(),
            status: CheckStatus::Warning,
            message: "No model bundle configured (set --model or STRESS_MODEL_PATH)".to_string(),
        }),
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (batch input ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: STRESS_SENSE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Stress Doctor Report");
        println!("====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CliFailure::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(path: &Path) -> io::Result<String> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}

/// Non-blank NDJSON lines with their zero-based line index
fn submissions(data: &str) -> impl Iterator<Item = (usize, &str)> {
    data.lines()
        .enumerate()
        .map(|(i, line)| (i, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn field_options<T: Categorical>() -> FieldOptions {
    FieldOptions {
        field: T::FIELD.as_str(),
        display_name: T::FIELD.display_name(),
        flag: match T::FIELD {
            Field::BmiCategory => "bmi".to_string(),
            Field::SleepDisorder => "disorder".to_string(),
            field => field.as_str().replace('_', "-"),
        },
        placeholder: T::FIELD.placeholder(),
        options: T::OPTIONS
            .iter()
            .map(|o| OptionEntry {
                label: o.label(),
                code: o.code(),
            })
            .collect(),
    }
}

// Error types

#[derive(Debug)]
enum CliFailure {
    Io(io::Error),
    Json(serde_json::Error),
    Predict(PredictError),
    Rejected(Feedback),
    NoSubmissions,
    BatchFailed(usize),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for CliFailure {
    fn from(e: io::Error) -> Self {
        CliFailure::Io(e)
    }
}

impl From<serde_json::Error> for CliFailure {
    fn from(e: serde_json::Error) -> Self {
        CliFailure::Json(e)
    }
}

impl From<PredictError> for CliFailure {
    fn from(e: PredictError) -> Self {
        CliFailure::Predict(e)
    }
}

impl From<ValidationError> for CliFailure {
    fn from(e: ValidationError) -> Self {
        CliFailure::Predict(PredictError::Validation(e))
    }
}

#[derive(Debug, serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CliFailure> for CliError {
    fn from(e: CliFailure) -> Self {
        match e {
            CliFailure::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CliFailure::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CliFailure::Predict(PredictError::Validation(e)) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.user_message(),
                hint: Some("Run 'stress options' for accepted labels".to_string()),
            },
            CliFailure::Predict(PredictError::Inference(e)) => CliError {
                code: "INFERENCE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'stress doctor' to check the model bundle".to_string()),
            },
            CliFailure::Predict(PredictError::JsonError(e)) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CliFailure::Predict(PredictError::Io(e)) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CliFailure::Rejected(feedback) => CliError {
                code: match feedback {
                    Feedback::Warning { .. } => "INCOMPLETE_INPUT".to_string(),
                    _ => "INVALID_INPUT".to_string(),
                },
                message: feedback.message(),
                hint: Some("Run 'stress options' for accepted labels".to_string()),
            },
            CliFailure::NoSubmissions => CliError {
                code: "NO_SUBMISSIONS".to_string(),
                message: "No submissions found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            CliFailure::BatchFailed(count) => CliError {
                code: "BATCH_FAILED".to_string(),
                message: format!("{} submissions could not be predicted", count),
                hint: Some("See the error records in the output".to_string()),
            },
            CliFailure::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} submissions failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            CliFailure::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_submissions: usize,
    valid_submissions: usize,
    invalid_submissions: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    line: usize,
    fields: Vec<String>,
    error: String,
}

#[derive(serde::Serialize)]
struct FieldOptions {
    field: &'static str,
    display_name: &'static str,
    flag: String,
    placeholder: Option<&'static str>,
    options: Vec<OptionEntry>,
}

#[derive(serde::Serialize)]
struct OptionEntry {
    label: &'static str,
    code: u8,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
