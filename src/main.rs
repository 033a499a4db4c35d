//! Resume matcher: skill gap and similarity between a resume and a job description

use clap::Parser;
use log::{error, info};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction};
use resume_matcher::config::Config;
use resume_matcher::error::{Result, ResumeMatcherError};
use resume_matcher::input::InputManager;
use resume_matcher::output::{
    resolve_save_path, save_report_to_file, AnalysisReport, ReportGenerator,
};
use resume_matcher::processing::analyzer::AnalysisEngine;
use resume_matcher::processing::skill_matcher::Skill;
use std::path::PathBuf;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            output,
            save,
            detailed,
            phrase_matching,
            exclude_failed,
            no_color,
        } => {
            info!("Starting resume analysis");

            // Validate input files
            cli::validate_file_extension(&resume, cli::SUPPORTED_EXTENSIONS)
                .map_err(|e| ResumeMatcherError::InvalidInput(format!("Resume file: {}", e)))?;

            cli::validate_file_extension(&job, cli::SUPPORTED_EXTENSIONS)
                .map_err(|e| ResumeMatcherError::InvalidInput(format!("Job description file: {}", e)))?;

            // CLI flags override the config file for this run
            if let Some(output) = output {
                config.output.format =
                    cli::parse_output_format(&output).map_err(ResumeMatcherError::InvalidInput)?;
            }
            config.output.detailed |= detailed;
            config.output.color_output &= !no_color;
            config.analysis.phrase_matching |= phrase_matching;
            config.analysis.score_failed_extractions &= !exclude_failed;

            let input_manager = InputManager::new();
            let resume_doc = input_manager.load(&resume).await?;
            let job_doc = input_manager.load(&job).await?;
            info!(
                "Loaded {} ({} bytes) and {} ({} bytes)",
                resume_doc.name,
                resume_doc.bytes.len(),
                job_doc.name,
                job_doc.bytes.len()
            );

            let engine = AnalysisEngine::new(&config.analysis)?.with_input_manager(input_manager);
            let outcome = engine.analyze_documents(&resume_doc, &job_doc);

            let report = AnalysisReport::from_outcome(
                &outcome,
                config.output.preview_chars,
                config.analysis.phrase_matching,
            );
            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                config.output.detailed,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, &config.output.format)?;

            match save {
                Some(target) => {
                    let path =
                        resolve_save_path(&target, &config.output.format, &resume_doc.name);
                    save_report_to_file(&rendered, &path)?;
                    println!("✅ Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Skills => {
            println!("🧠 Recognized skills\n");
            for skill in Skill::all() {
                let note = if skill.is_phrase() {
                    " (multi-word: needs --phrase-matching)"
                } else {
                    ""
                };
                println!("  • {}{}", skill, note);
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let default_config = Config::default();
                match &config_path {
                    Some(path) => default_config.save_to(path)?,
                    None => default_config.save()?,
                }
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}
