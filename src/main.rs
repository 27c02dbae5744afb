use clap::{Parser, Subcommand};
use colored::*;
use log::warn;
use readmegen::{
    logging, Config, Credentials, GenerationInput, GeneratorError, Language, Orchestrator, Result,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a README (and optionally a LICENSE) for a GitHub repository
    Generate {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,

        /// Output language: en or id
        #[arg(short, long, default_value = "en")]
        language: Language,

        /// License identifier (e.g. mit, apache-2.0); omit for none
        #[arg(long)]
        license: Option<String>,

        /// Free-text context tag; repeat for multiple tags
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Gallery image URL; repeat for multiple images
        #[arg(short, long = "image")]
        images: Vec<String>,

        /// Directory the README.md (and LICENSE) are written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Save API credentials for later runs
    Auth {
        /// GitHub API token (optional; raises rate limits)
        #[arg(long)]
        github_token: Option<String>,

        /// Gemini API key (required for generation)
        #[arg(long)]
        gemini_api_key: Option<String>,
    },

    /// Delete all stored credentials
    AuthClear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    match cli.command {
        Command::Generate {
            url,
            language,
            license,
            tags,
            images,
            output,
        } => {
            let input = GenerationInput {
                repo_url: url,
                image_urls: images,
                tags,
                language,
                license_id: license,
            };
            if let Err(e) = generate(input, &output).await {
                report_failure(&e);
                std::process::exit(1);
            }
        }
        Command::Auth {
            github_token,
            gemini_api_key,
        } => {
            let mut credentials = Credentials::load()?;
            if let Some(token) = github_token {
                credentials.github_token = Some(token);
            }
            if let Some(key) = gemini_api_key {
                credentials.gemini_api_key = Some(key);
            }
            credentials.save()?;
            println!("{}", "Credentials saved.".bright_green());
        }
        Command::AuthClear => {
            Credentials::clear()?;
            println!("{}", "Credentials cleared.".bright_green());
        }
    }

    Ok(())
}

async fn generate(input: GenerationInput, output_dir: &Path) -> Result<()> {
    let config = Config::load()?;
    let credentials = Credentials::load()?;

    if credentials.github_token().is_none() {
        warn!("No GitHub token stored; anonymous API calls are heavily rate-limited");
    }

    let orchestrator = Orchestrator::new(config, credentials);
    let outcome = orchestrator.run(input).await?;

    tokio::fs::create_dir_all(output_dir).await?;
    let readme_path = output_dir.join("README.md");
    tokio::fs::write(&readme_path, &outcome.readme).await?;
    println!(
        "{} {}",
        "[SUCCESS]".bright_green(),
        format!("README written to {}", readme_path.display()).bright_white()
    );

    if let Some(license_text) = &outcome.license_text {
        let license_path = output_dir.join("LICENSE");
        tokio::fs::write(&license_path, license_text).await?;
        println!(
            "{} {}",
            "[SUCCESS]".bright_green(),
            format!("LICENSE written to {}", license_path.display()).bright_white()
        );
    }

    for warning in &outcome.warnings {
        println!("{} {}", "[WARNING]".bright_yellow(), warning.bright_white());
    }

    Ok(())
}

/// Prints the error and a formatted failure placeholder so the failure is
/// visible in the output stream, not just in the log
fn report_failure(error: &GeneratorError) {
    eprintln!(
        "{} {}",
        "[ERROR]".bright_red(),
        error.to_string().bright_red()
    );
    println!("# README Generation Failed\n\n**Error:** {}", error);
}
