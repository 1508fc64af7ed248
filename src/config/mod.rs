use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub ui: UiConfig,
    pub render: RenderConfig,
    pub logs: LogsConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
    pub max_table_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderConfig {
    pub bar_width: usize,
    pub show_tables: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogsConfig {
    pub enabled: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            ui: UiConfig {
                color: true,
                max_table_rows: 20,
            },
            render: RenderConfig {
                bar_width: 40,
                show_tables: true,
            },
            logs: LogsConfig { enabled: false },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    ui: Option<RawUiConfig>,
    render: Option<RawRenderConfig>,
    logs: Option<RawLogsConfig>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
    max_table_rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawRenderConfig {
    bar_width: Option<usize>,
    show_tables: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawLogsConfig {
    enabled: Option<bool>,
}

pub fn config_dir(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/scansummary")
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    config_dir(home_dir).join("config.toml")
}

pub fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("HOME is not set"))
}

pub fn load(config_path: Option<&Path>, home_dir: &Path) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_config_path(home_dir));

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s).context("failed to parse config file (TOML)")?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;

    if cfg.render.bar_width == 0 {
        anyhow::bail!("render.bar_width must be greater than 0");
    }

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
        if let Some(max_table_rows) = ui.max_table_rows {
            cfg.ui.max_table_rows = max_table_rows;
        }
    }

    if let Some(render) = raw.render {
        if let Some(bar_width) = render.bar_width {
            cfg.render.bar_width = bar_width;
        }
        if let Some(show_tables) = render.show_tables {
            cfg.render.show_tables = show_tables;
        }
    }

    if let Some(logs) = raw.logs {
        if let Some(enabled) = logs.enabled {
            cfg.logs.enabled = enabled;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("SCANSUMMARY_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "SCANSUMMARY_UI_COLOR")?;
    }
    if let Ok(v) = std::env::var("SCANSUMMARY_UI_MAX_TABLE_ROWS") {
        cfg.ui.max_table_rows = v
            .trim()
            .parse::<usize>()
            .with_context(|| "SCANSUMMARY_UI_MAX_TABLE_ROWS")?;
    }
    if let Ok(v) = std::env::var("SCANSUMMARY_RENDER_BAR_WIDTH") {
        cfg.render.bar_width = v
            .trim()
            .parse::<usize>()
            .with_context(|| "SCANSUMMARY_RENDER_BAR_WIDTH")?;
    }
    if let Ok(v) = std::env::var("SCANSUMMARY_RENDER_SHOW_TABLES") {
        cfg.render.show_tables =
            parse_bool(&v).with_context(|| "SCANSUMMARY_RENDER_SHOW_TABLES")?;
    }
    if let Ok(v) = std::env::var("SCANSUMMARY_LOGS_ENABLED") {
        cfg.logs.enabled = parse_bool(&v).with_context(|| "SCANSUMMARY_LOGS_ENABLED")?;
    }

    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}
