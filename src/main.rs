//! resume-tailor: resume vs. job description gap analysis and tailoring tool

use clap::Parser;
use log::{debug, error, info};
use resume_tailor::cli::{self, Cli, Commands, ConfigAction, SessionAction, JOB_EXTENSIONS, RESUME_EXTENSIONS};
use resume_tailor::config::{Config, ReportFormat};
use resume_tailor::error::{Result, ResumeTailorError};
use resume_tailor::input::InputManager;
use resume_tailor::output::{save_report_to_file, suggest_filename, ReportGenerator, ReportMetadata, TailorReport};
use resume_tailor::processing::drafting::draft_content;
use resume_tailor::processing::{
    Addition, ComplianceScorer, DocumentComposer, DocumentExtractor, GapAnalyzer, GapReport,
    RequirementCategory, RequirementExtractor, SectionKind,
};
use resume_tailor::session::SessionStore;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(exit_code(&e));
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("{}", exit_message(&e));
        process::exit(exit_code(&e));
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Analysis components built once per command from the loaded configuration
struct Pipeline {
    documents: DocumentExtractor,
    requirements: RequirementExtractor,
    analyzer: GapAnalyzer,
    scorer: ComplianceScorer,
    composer: DocumentComposer,
}

impl Pipeline {
    fn new(config: &Config) -> Result<Self> {
        let documents = DocumentExtractor::new(&config.extraction);
        let composer = DocumentComposer::new(documents.classifier().clone());

        Ok(Self {
            requirements: RequirementExtractor::new(&config.matching)?,
            analyzer: GapAnalyzer::new(&config.matching),
            scorer: ComplianceScorer::new(&config.compliance, &config.matching)?,
            composer,
            documents,
        })
    }

    fn input_manager(&self) -> InputManager {
        InputManager::new(self.documents.clone())
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    let pipeline = Pipeline::new(&config)?;

    match command {
        Commands::Analyze {
            resume,
            job,
            output,
            save,
            detailed,
        } => {
            info!("Starting gap analysis");
            validate_input(&resume, RESUME_EXTENSIONS, "Resume file")?;
            validate_input(&job, JOB_EXTENSIONS, "Job description file")?;
            let format = resolve_format(output.as_deref(), &config)?;

            let started = Instant::now();
            let mut input_manager = pipeline.input_manager();
            let structured = input_manager.load_resume(&resume).await?;
            let job_text = input_manager.load_text(&job).await?;

            let requirements = pipeline.requirements.extract(&job_text);
            debug!("Extracted {} requirements from job description", requirements.len());
            let gap = pipeline.analyzer.analyze(&structured, &requirements);
            let compliance = pipeline.scorer.score(&structured);

            let metadata = ReportMetadata::new(
                resume.to_string_lossy(),
                Some(job.to_string_lossy().to_string()),
                started.elapsed().as_millis() as u64,
            );
            let report = TailorReport::new(&structured, Some(gap), compliance, metadata);
            emit_report(&report, format, save.as_deref(), detailed, &config)?;
        }

        Commands::Score {
            resume,
            output,
            save,
            detailed,
        } => {
            info!("Starting ATS compliance scoring");
            validate_input(&resume, RESUME_EXTENSIONS, "Resume file")?;
            let format = resolve_format(output.as_deref(), &config)?;

            let started = Instant::now();
            let structured = pipeline.input_manager().load_resume(&resume).await?;
            let compliance = pipeline.scorer.score(&structured);

            let metadata = ReportMetadata::new(resume.to_string_lossy(), None, started.elapsed().as_millis() as u64);
            let report = TailorReport::new(&structured, None, compliance, metadata);
            emit_report(&report, format, save.as_deref(), detailed, &config)?;
        }

        Commands::Compose {
            resume,
            additions,
            format,
            save,
        } => {
            validate_input(&resume, RESUME_EXTENSIONS, "Resume file")?;
            let structured = pipeline.input_manager().load_resume(&resume).await?;

            let content = tokio::fs::read_to_string(&additions).await?;
            let additions: Vec<Addition> = serde_json::from_str(&content)?;

            let bytes = pipeline.composer.compose(&structured, &additions, &format)?;
            save_report_to_file(&bytes, &save)?;
            println!("✅ Tailored resume written to {}", save.display());
        }

        Commands::Session { action } => {
            let store = SessionStore::open(config.sessions_dir())?;
            run_session(action, &store, &pipeline, &config).await?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let text = toml::to_string_pretty(&config)
                    .map_err(|e| ResumeTailorError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", text);
            }

            Some(ConfigAction::Reset) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                Config::default().save_to(&path)?;
                println!("✅ Configuration reset: {}", path.display());
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.unwrap_or_else(Config::config_path).display());
            }
        },
    }

    Ok(())
}

async fn run_session(action: SessionAction, store: &SessionStore, pipeline: &Pipeline, config: &Config) -> Result<()> {
    match action {
        SessionAction::New { resume, job } => {
            validate_input(&resume, RESUME_EXTENSIONS, "Resume file")?;
            validate_input(&job, JOB_EXTENSIONS, "Job description file")?;

            let mut input_manager = pipeline.input_manager();
            let structured = input_manager.load_resume(&resume).await?;
            let job_text = input_manager.load_text(&job).await?;

            let requirements = pipeline.requirements.extract(&job_text);
            let gap = pipeline.analyzer.analyze(&structured, &requirements);

            let source_name = resume
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| resume.to_string_lossy().to_string());
            let session = store.create(source_name, structured, Some(gap))?;

            println!("🆕 Session: {}", session.id);
            if let Some(gap) = &session.gap_report {
                print_gap(gap);
            }
        }

        SessionAction::Add {
            id,
            keyword,
            target,
            content,
            context,
            category,
        } => {
            let session = store.load(&id)?;
            let missing = session
                .gap_report
                .as_ref()
                .and_then(|gap| gap.find_missing(&keyword));

            let mut addition = match (content, missing) {
                (Some(content), _) => Addition::new(keyword.as_str(), target.as_str(), content, ""),
                (None, Some(missing)) => Addition::drafted(missing, &target, context.as_deref()),
                (None, None) => Addition::new(
                    keyword.as_str(),
                    target.as_str(),
                    draft_content(&keyword, SectionKind::from_name(&target), context.as_deref()),
                    "",
                ),
            };

            addition.category = match (category, missing) {
                (Some(name), _) => RequirementCategory::from_name(&name)?.as_str().to_string(),
                (None, Some(missing)) => missing.keyword.category.as_str().to_string(),
                (None, None) => RequirementCategory::TechnicalSkill.as_str().to_string(),
            };

            if addition.is_blank() {
                return Err(ResumeTailorError::InvalidInput("Addition content is empty".to_string()));
            }

            let line = addition.rendered();
            let session = store.add_addition(&id, addition)?;
            println!("➕ {} -> {}", line, target);
            println!("   {} pending addition(s)", session.additions.len());
        }

        SessionAction::Show { id } => {
            let session = store.load(&id)?;
            println!("📋 Session {}", session.id);
            println!("Created: {}", session.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("Resume: {}", session.source_name);

            let sections: Vec<String> = session
                .resume
                .sections
                .iter()
                .map(|section| section.display_heading().unwrap_or_else(|| section.kind.to_string()))
                .collect();
            println!("Sections: {}", sections.join(", "));

            if let Some(gap) = &session.gap_report {
                print_gap(gap);
            }

            println!("\nPending additions: {}", session.additions.len());
            for addition in &session.additions {
                println!("  {} -> {}", addition.rendered(), addition.target_section);
            }
        }

        SessionAction::Compose { id, format, save } => {
            let session = store.load(&id)?;
            let bytes = pipeline.composer.compose(&session.resume, &session.additions, &format)?;
            save_report_to_file(&bytes, &save)?;
            println!("✅ Tailored resume written to {}", save.display());
        }

        SessionAction::Clear { id } => {
            store.clear_additions(&id)?;
            println!("🧹 Cleared additions for session {}", id);
        }

        SessionAction::Delete { id } => {
            store.delete(&id)?;
            println!("🗑️  Deleted session {}", id);
        }

        SessionAction::Purge => {
            let max_age = chrono::Duration::hours(config.session.max_age_hours);
            let removed = store.purge_expired(max_age)?;
            println!("🗑️  Removed {} expired session(s)", removed);
        }
    }

    Ok(())
}

fn validate_input(path: &Path, allowed: &[&str], label: &str) -> Result<()> {
    cli::validate_file_extension(path, allowed)
        .map_err(|e| ResumeTailorError::UnsupportedFormat(format!("{}: {}", label, e)))
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<ReportFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(ResumeTailorError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn emit_report(
    report: &TailorReport,
    format: ReportFormat,
    save: Option<&Path>,
    detailed: bool,
    config: &Config,
) -> Result<()> {
    let use_colors = config.output.color_output && save.is_none();
    let generator = ReportGenerator::with_options(use_colors, detailed || config.output.detailed, true, true);
    let content = generator.generate_report(report, format)?;

    match save {
        Some(path) => {
            // A directory gets a generated file name
            let path = if path.is_dir() {
                path.join(suggest_filename(format, &report.metadata.resume_file, true))
            } else {
                path.to_path_buf()
            };
            save_report_to_file(content.as_bytes(), &path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }

    Ok(())
}

fn print_gap(gap: &GapReport) {
    println!("Match score: {:.1}%", gap.match_score);
    if gap.missing.is_empty() {
        println!("No missing requirements");
        return;
    }

    println!("Missing ({}):", gap.missing.len());
    for missing in &gap.missing {
        let sections: Vec<&str> = missing.suggested_sections.iter().map(|s| s.as_str()).collect();
        println!(
            "  • {} [{}, {}] -> {}",
            missing.keyword.term,
            missing.keyword.category.label(),
            missing.keyword.importance,
            sections.join(" / ")
        );
    }
}

fn exit_message(e: &ResumeTailorError) -> String {
    match e {
        ResumeTailorError::UnsupportedFormat(_) => format!("Unsupported file format. {}", e),
        ResumeTailorError::CorruptDocument { .. } => format!("Could not read the document. {}", e),
        ResumeTailorError::EmptyAdditions => "Nothing to compose: add at least one missing point first".to_string(),
        ResumeTailorError::SessionNotFound(id) => format!("No session with id {} (it may have expired)", id),
        ResumeTailorError::Configuration(_) => format!("Configuration problem. {}", e),
        ResumeTailorError::InvalidInput(_) => format!("Invalid input. {}", e),
        _ => format!("Command failed: {}", e),
    }
}

fn exit_code(e: &ResumeTailorError) -> i32 {
    match e {
        ResumeTailorError::InvalidInput(_) => 2,
        ResumeTailorError::UnsupportedFormat(_) => 3,
        ResumeTailorError::CorruptDocument { .. } => 4,
        ResumeTailorError::EmptyAdditions => 5,
        ResumeTailorError::SessionNotFound(_) => 6,
        ResumeTailorError::Configuration(_) => 7,
        _ => 1,
    }
}
