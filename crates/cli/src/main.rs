use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use caseforge_engine::catalog::TECHNIQUES;
use caseforge_export::{build_workbook, render_cases_txt, to_csv};
use caseforge_session::{load_session, save_session, Session, SessionState};

#[derive(Parser)]
#[command(name = "caseforge")]
#[command(about = "Deterministic test-case generation from wizard sessions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,

    /// Session file path
    #[arg(long, global = true, default_value = ".caseforge/session.json")]
    session: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a session file with the default wizard configuration
    Init(InitArgs),
    /// Check that the session can generate cases
    Validate,
    /// Run the generation pipeline and export the cases
    Generate(GenerateArgs),
    /// List the supported test-design techniques
    Techniques(TechniquesArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Overwrite an existing session file
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Export format
    #[arg(long, value_enum, default_value_t = Format::Summary)]
    format: Format,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the configured case cap
    #[arg(long)]
    max_cases: Option<u32>,
}

#[derive(Args)]
struct TechniquesArgs {
    /// Emit the catalog as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Summary,
    Json,
    Csv,
    Txt,
    Workbook,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Init(args) => run_init(&cli.session, &args),
        Commands::Validate => run_validate(&cli.session),
        Commands::Generate(args) => run_generate(&cli.session, &args),
        Commands::Techniques(args) => run_techniques(&args),
    }
}

fn run_init(path: &Path, args: &InitArgs) -> Result<()> {
    if path.exists() && !args.force {
        anyhow::bail!(
            "session file {} already exists (use --force to overwrite)",
            path.display()
        );
    }
    save_session(path, &SessionState::default())
        .with_context(|| format!("writing session to {}", path.display()))?;
    println!("session initialized at {}", path.display());
    Ok(())
}

fn run_validate(path: &Path) -> Result<()> {
    let state = load_session(path)
        .with_context(|| format!("loading session from {}", path.display()))?;
    let session = Session::new(state);
    match caseforge_engine::validate(
        &session.state.context,
        &session.state.selections,
        &session.state.configs,
    ) {
        Ok(()) => {
            println!("ok: session can generate cases");
            Ok(())
        }
        Err(e) => anyhow::bail!("invalid session: {e}"),
    }
}

fn run_generate(path: &Path, args: &GenerateArgs) -> Result<()> {
    let state = load_session(path)
        .with_context(|| format!("loading session from {}", path.display()))?;
    let mut session = Session::new(state);
    if let Some(max) = args.max_cases {
        session.state.settings.max_cases = max;
    }
    session.generate().context("generation failed")?;

    let outputs = session.outputs.as_ref().unwrap_or_else(|| unreachable!());
    for warning in &outputs.warnings {
        log::warn!("{warning}");
    }

    let rendered = match args.format {
        Format::Summary => render_summary(&session),
        Format::Json => serde_json::to_string_pretty(&serde_json::json!({
            "cases": session.cases,
            "outputs": outputs,
        }))?,
        Format::Csv => to_csv(&session.cases),
        Format::Txt => render_cases_txt(
            &session.cases,
            Some(&session.state.txt_template),
            Some(&session.state.context),
        ),
        Format::Workbook => serde_json::to_string_pretty(&build_workbook(
            &session.cases,
            Some(&session.state.context),
        ))?,
    };

    match &args.output {
        Some(out) => {
            fs::write(out, rendered)
                .with_context(|| format!("writing output to {}", out.display()))?;
            log::info!("wrote {} cases to {}", session.cases.len(), out.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn render_summary(session: &Session) -> String {
    let mut lines = vec![format!("{} casos gerados", session.cases.len())];
    for case in &session.cases {
        lines.push(format!(
            "  {} [{}/{}] {}",
            case.id,
            case.case_type.as_str(),
            case.priority.as_str(),
            case.title
        ));
    }
    if let Some(outputs) = &session.outputs {
        if let Some(limit) = &outputs.limit_applied {
            lines.push(format!(
                "limite aplicado: {}/{} casos",
                limit.after, limit.before
            ));
        }
        for warning in &outputs.warnings {
            lines.push(format!("aviso: {warning}"));
        }
    }
    lines.join("\n")
}

fn run_techniques(args: &TechniquesArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&*TECHNIQUES)?);
        return Ok(());
    }
    for info in TECHNIQUES.iter() {
        println!("{:<17} {} — {}", info.id.as_str(), info.label, info.blurb);
    }
    Ok(())
}
