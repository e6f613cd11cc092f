use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use studyflow::cli::{check_pipeline, render_plan, run_pipeline, ClientMode};
use studyflow::config::{ModelPolicy, PipelineSettings};
use studyflow::quiz::QuizConfig;
use studyflow::utils::LoggingConfig;

#[derive(Parser)]
#[command(name = "studyflow", version, about = "Turn a source document into study materials", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every task and write the study materials
    Run {
        #[command(flatten)]
        pipeline: PipelineArgs,
        /// Answer every task with the local echo client instead of a model
        #[arg(long)]
        dry_run: bool,
    },
    /// Load the configuration and print the task plan
    Check {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Print the quiz instruction text
    QuizText {
        #[command(flatten)]
        quiz: QuizArgs,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// Optional YAML file with run settings
    #[arg(long, env = "STUDYFLOW_SETTINGS")]
    settings: Option<PathBuf>,
    #[arg(long, env = "STUDYFLOW_INPUT")]
    input: Option<PathBuf>,
    #[arg(long, env = "STUDYFLOW_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
    #[arg(long, env = "STUDYFLOW_AGENTS")]
    agents: Option<PathBuf>,
    #[arg(long, env = "STUDYFLOW_TASKS")]
    tasks: Option<PathBuf>,
    #[arg(long, value_enum)]
    model_policy: Option<ModelPolicy>,
    #[command(flatten)]
    quiz: QuizArgs,
}

#[derive(Args)]
struct QuizArgs {
    #[arg(long)]
    multiple_choice: Option<u32>,
    #[arg(long)]
    true_false: Option<u32>,
    #[arg(long)]
    short_answer: Option<u32>,
    #[arg(long)]
    scenario: Option<u32>,
}

impl QuizArgs {
    fn apply(&self, quiz: &mut QuizConfig) {
        quiz.multiple_choice_count = self.multiple_choice.or(quiz.multiple_choice_count);
        quiz.true_false_count = self.true_false.or(quiz.true_false_count);
        quiz.short_answer_count = self.short_answer.or(quiz.short_answer_count);
        quiz.scenario_count = self.scenario.or(quiz.scenario_count);
    }
}

impl PipelineArgs {
    fn into_settings(self) -> anyhow::Result<PipelineSettings> {
        let mut settings = match &self.settings {
            Some(path) => PipelineSettings::load(path)?,
            None => PipelineSettings::default(),
        };
        if let Some(input) = self.input {
            settings.input_file = input;
        }
        if let Some(output_dir) = self.output_dir {
            settings.output_dir = output_dir;
        }
        if let Some(agents) = self.agents {
            settings.agents_config = agents;
        }
        if let Some(tasks) = self.tasks {
            settings.tasks_config = tasks;
        }
        if let Some(policy) = self.model_policy {
            settings.model_policy = policy;
        }
        self.quiz.apply(&mut settings.quiz);
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run { pipeline, dry_run } => {
            let settings = pipeline.into_settings()?;
            let mode = if dry_run {
                ClientMode::DryRun
            } else {
                ClientMode::Configured
            };
            let summary = run_pipeline(&settings, mode).await?;

            println!("Completed {} tasks", summary.run.len());
            for path in summary.run.written_files() {
                println!("  {}", path.display());
            }
            println!("Run record: {}", summary.record_path.display());
            match &summary.combined.written {
                Some(path) => println!("Combined document: {}", path.display()),
                None => println!("No artifacts to combine"),
            }
            for path in &summary.combined.missing {
                eprintln!("warning: missing artifact {}", path.display());
            }
        }
        Command::Check { pipeline } => {
            let settings = pipeline.into_settings()?;
            let loaded = check_pipeline(&settings)?;
            println!("{} agents, {} tasks", loaded.agents.len(), loaded.plan.len());
            print!("{}", render_plan(&loaded.plan));
        }
        Command::QuizText { quiz } => {
            let mut config = QuizConfig::default();
            quiz.apply(&mut config);
            println!("{}", config.get_config_text());
        }
    }
    Ok(())
}
