use std::io;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use time::OffsetDateTime;

use crate::config::EffectiveConfig;
use crate::core::{Category, ReportSnapshot};
use crate::logs::RenderOutcome;
use crate::model::{ReportModel, ReportView};
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "scansummary",
    version,
    about = "Render severity charts, threshold status and finding tables from scan results"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Render(RenderArgs),
    Check(CheckArgs),
    Sample,
    Completion(CompletionArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[arg(long, short)]
    pub input: PathBuf,
    #[arg(long)]
    pub markdown: bool,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long)]
    pub no_tables: bool,
    #[arg(long)]
    pub log: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(long, short)]
    pub input: PathBuf,
    #[arg(long)]
    pub log: bool,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let stdout_is_tty = io::stdout().is_terminal();

    let home_dir = crate::config::home_dir().map_err(crate::exit::invalid_args_err)?;

    let env_config_path = std::env::var_os("SCANSUMMARY_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(crate::exit::invalid_args_err)?;

    let color = stdout_is_tty && cfg.ui.color && !cli.no_color;

    let mut ui_cfg = UiConfig {
        color,
        max_table_rows: cfg.ui.max_table_rows,
        bar_width: cfg.render.bar_width,
        show_tables: cfg.render.show_tables,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Render(args) => {
            if cli.json && args.markdown {
                return Err(crate::exit::invalid_args(
                    "render: --json and --markdown cannot be combined",
                ));
            }
            if args.no_tables {
                ui_cfg.show_tables = false;
            }

            let started_at = OffsetDateTime::now_utc();
            let result = render_view(&args.input, args.category, &ui_cfg);
            finish_log(
                &home_dir,
                &cfg,
                args.log,
                "render",
                started_at,
                &args.input,
                &result,
                &ui_cfg,
            );
            let view = result?;

            if cli.json {
                write_json(&view)?;
            } else if args.markdown {
                crate::ui::print_markdown(&view, &ui_cfg)?;
            } else {
                crate::ui::print_report(&view, &ui_cfg)?;
            }
        }
        Commands::Check(args) => {
            let started_at = OffsetDateTime::now_utc();
            let result = render_view(&args.input, None, &ui_cfg);
            finish_log(
                &home_dir,
                &cfg,
                args.log,
                "check",
                started_at,
                &args.input,
                &result,
                &ui_cfg,
            );
            let view = result?;

            let exceeded: Vec<&str> = view
                .categories
                .iter()
                .filter(|c| {
                    c.section
                        .as_ref()
                        .is_some_and(|s| s.thresholds.overall_exceeded())
                })
                .map(|c| c.category.as_str())
                .collect();

            if cli.json {
                write_json(&serde_json::json!({
                    "threshold_exceeded": !exceeded.is_empty(),
                    "categories": exceeded,
                }))?;
            } else if !ui_cfg.quiet {
                if exceeded.is_empty() {
                    println!("threshold compliance");
                } else {
                    println!("threshold exceeded: {}", exceeded.join(", "));
                }
            }

            if !exceeded.is_empty() {
                return Err(crate::exit::threshold_exceeded(format!(
                    "threshold exceeded: {}",
                    exceeded.join(", ")
                )));
            }
        }
        Commands::Sample => {
            write_json(&crate::core::sample_snapshot())?;
        }
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            let mut out = std::io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "scansummary", &mut out);
        }
        Commands::Config(args) => {
            if args.show {
                if cli.json {
                    write_json(&cfg)?;
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `scansummary config --show`");
            }
        }
    }

    Ok(())
}

fn render_view(input: &Path, only: Option<Category>, ui_cfg: &UiConfig) -> Result<ReportView> {
    if ui_cfg.verbose {
        eprintln!("input: {}", input.display());
    }
    let snapshot = crate::core::snapshot::load(input).map_err(|e| {
        crate::exit::invalid_args_err(anyhow::Error::new(e).context("failed to load snapshot"))
    })?;
    let snapshot = select_category(snapshot, only)?;

    let model = ReportModel::new(&snapshot);
    let view = model.build_view().context("failed to build report view")?;
    Ok(view)
}

fn select_category(snapshot: ReportSnapshot, only: Option<Category>) -> Result<ReportSnapshot> {
    let Some(category) = only else {
        return Ok(snapshot);
    };
    let mut snapshot = snapshot;
    let Some(section) = snapshot.categories.remove(&category) else {
        return Err(crate::exit::invalid_args(format!(
            "category {category} is not present in the snapshot"
        )));
    };
    Ok(ReportSnapshot::default().with_section(category, section))
}

#[allow(clippy::too_many_arguments)]
fn finish_log(
    home_dir: &Path,
    cfg: &EffectiveConfig,
    requested: bool,
    command: &'static str,
    started_at: OffsetDateTime,
    input: &Path,
    result: &Result<ReportView>,
    ui_cfg: &UiConfig,
) {
    if !(requested || cfg.logs.enabled) {
        return;
    }
    let outcome = match result {
        Ok(view) => RenderOutcome::Rendered(view),
        Err(err) => RenderOutcome::Failed(err),
    };
    let finished_at = OffsetDateTime::now_utc();
    match crate::logs::write_render_log(home_dir, command, started_at, finished_at, input, outcome)
    {
        Ok(path) => {
            if ui_cfg.verbose {
                eprintln!("log: {}", path.display());
            }
        }
        Err(err) => {
            if !ui_cfg.quiet {
                eprintln!("warning: {err:#}");
            }
        }
    }
}

fn write_json<T: serde::Serialize>(value: &T) -> Result<()> {
    use std::io::Write;

    let buf = serde_json::to_vec_pretty(value)?;

    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(&buf) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    match stdout.write_all(b"\n") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "unsupported shell: {other} (expected bash|zsh|fish)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample_snapshot;

    #[test]
    fn select_category_keeps_only_requested_section() {
        let snapshot = select_category(sample_snapshot(), Some(Category::OpenSourceComponent))
            .expect("select");
        assert_eq!(snapshot.categories.len(), 1);
        assert!(snapshot.section(Category::OpenSourceComponent).is_some());
    }

    #[test]
    fn select_category_rejects_missing_section() {
        let snapshot = ReportSnapshot::default();
        let err = select_category(snapshot, Some(Category::StaticAnalysis)).expect_err("missing");
        assert_eq!(crate::exit::exit_code(&err), 2);
    }

    #[test]
    fn parse_shell_rejects_unknown() {
        assert!(parse_shell("Bash").is_ok());
        let err = parse_shell("powershell").expect_err("unsupported");
        assert_eq!(crate::exit::exit_code(&err), 2);
    }
}
