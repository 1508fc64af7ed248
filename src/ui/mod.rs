use anyhow::Error;
use std::fmt::Write as _;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

use crate::core::{ScanInfo, SeverityLevel};
use crate::model::{Bars, CategoryView, FindingTable, ReportView, SectionView, ThresholdView};

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub max_table_rows: usize,
    pub bar_width: usize,
    pub show_tables: bool,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "next:");
    let _ = writeln!(
        stderr,
        "  - see `scansummary --help` for available commands and options"
    );
}

pub fn print_report(view: &ReportView, cfg: &UiConfig) -> io::Result<()> {
    if cfg.quiet {
        return Ok(());
    }
    write_stdout(&format_report(view, cfg))
}

pub fn print_markdown(view: &ReportView, cfg: &UiConfig) -> io::Result<()> {
    write_stdout(&format_markdown(view, cfg))
}

fn write_stdout(s: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    match stdout.write_all(s.as_bytes()) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err),
    }
}

pub fn format_report(view: &ReportView, cfg: &UiConfig) -> String {
    let mut out = String::new();
    let mut first = true;
    for category in &view.categories {
        let Some(section) = &category.section else {
            if cfg.verbose {
                let _ = writeln!(out, "({} is disabled)", category.category.title());
            }
            continue;
        };
        if !first {
            let _ = writeln!(out);
        }
        first = false;
        write_section(&mut out, category, section, cfg);
    }
    if first && !cfg.verbose {
        let _ = writeln!(out, "No categories to display.");
    }
    out
}

fn write_section(out: &mut String, category: &CategoryView, section: &SectionView, cfg: &UiConfig) {
    let title = category.category.title();
    match &section.thresholds {
        ThresholdView::NotEvaluated => {
            let _ = writeln!(out, "{title}");
        }
        ThresholdView::Evaluated {
            overall_exceeded, ..
        } => {
            let _ = writeln!(out, "{title}  {}", format_compliance(*overall_exceeded, cfg.color));
        }
    }

    match &section.bars {
        Bars::Empty => {
            let _ = writeln!(out, "  No findings.");
        }
        Bars::Proportions { rounded, .. } => {
            let count_w = section
                .counts
                .iter()
                .map(|(_, c)| c.to_string().len())
                .max()
                .unwrap_or(1);
            for (level, pct) in rounded.iter() {
                let count = *section.counts.get(level);
                let filled = (*pct as usize * cfg.bar_width).div_ceil(100);
                let filled = if count > 0 { filled.max(1) } else { 0 };
                let bar = format!(
                    "{}{}",
                    "█".repeat(filled),
                    "·".repeat(cfg.bar_width.saturating_sub(filled))
                );
                let _ = write!(
                    out,
                    "  {}  {}  {:>count_w$}  {:>3}%",
                    pad_end_display(&format_level(level, cfg.color), 6),
                    bar,
                    count,
                    pct
                );
                if let ThresholdView::Evaluated { levels, .. } = &section.thresholds {
                    let lt = levels.get(level);
                    if let Some(threshold) = lt.threshold {
                        let _ = write!(out, "  threshold {threshold}");
                    }
                    if let Some(marker) = lt.marker_pct {
                        let _ = write!(
                            out,
                            " {} (line at {marker:.1}%)",
                            paint("exceeded", "31", cfg.color)
                        );
                    }
                }
                let _ = writeln!(out);
            }
        }
    }
    let _ = writeln!(out, "  Total: {}", section.total);

    if let Some(libraries) = &section.libraries {
        let _ = writeln!(
            out,
            "  Libraries: {} vulnerable / {} ok",
            libraries.vulnerable, libraries.ok
        );
    }
    if let Some(info) = &section.scan_info {
        let _ = writeln!(out, "  Scan: {}", format_scan_info(info));
    }
    if cfg.verbose && !section.links.is_empty() {
        let _ = writeln!(out, "  Links:");
        for (name, target) in section.links.entries() {
            let _ = writeln!(out, "    - {name}: {target}");
        }
    }

    if cfg.show_tables {
        for table in section.tables.iter().filter(|t| !t.is_empty()) {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "  {} severity ({}):",
                table.level.title(),
                table.rows.len()
            );
            write_table(out, table, cfg.max_table_rows);
        }
    }
}

fn write_table(out: &mut String, table: &FindingTable, max_rows: usize) {
    let rows = table.rows.len().min(max_rows.max(1));
    let widths: Vec<usize> = table
        .header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            table
                .rows
                .iter()
                .take(rows)
                .filter_map(|r| r.get(i))
                .map(|c| visible_width_ansi(c))
                .max()
                .unwrap_or(0)
                .max(visible_width_ansi(h))
        })
        .collect();

    let line = |cells: Vec<String>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad_end_display(c, *w))
            .collect();
        format!("  {}", padded.join("  ").trim_end())
    };

    let _ = writeln!(out, "{}", line(table.header.clone()));
    let _ = writeln!(
        out,
        "{}",
        line(widths.iter().map(|w| "-".repeat(*w)).collect())
    );
    for row in table.rows.iter().take(rows) {
        let _ = writeln!(out, "{}", line(row.clone()));
    }
    if table.rows.len() > rows {
        let _ = writeln!(out, "  ... ({} more)", table.rows.len() - rows);
    }
}

pub fn format_markdown(view: &ReportView, cfg: &UiConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Scan summary");
    for category in &view.categories {
        let _ = writeln!(out);
        let title = category.category.title();
        let Some(section) = &category.section else {
            let _ = writeln!(out, "## {title}");
            let _ = writeln!(out);
            let _ = writeln!(out, "_Disabled._");
            continue;
        };

        let _ = writeln!(out, "## {title}");
        let _ = writeln!(out);
        match &section.thresholds {
            ThresholdView::NotEvaluated => {}
            ThresholdView::Evaluated {
                overall_exceeded: true,
                ..
            } => {
                let _ = writeln!(out, "**Threshold Exceeded**");
                let _ = writeln!(out);
            }
            ThresholdView::Evaluated { .. } => {
                let _ = writeln!(out, "**Threshold Compliance**");
                let _ = writeln!(out);
            }
        }

        let evaluated = matches!(section.thresholds, ThresholdView::Evaluated { .. });
        if evaluated {
            let _ = writeln!(out, "| Severity | Count | Share | Threshold | Status |");
            let _ = writeln!(out, "|---|---:|---:|---:|---|");
        } else {
            let _ = writeln!(out, "| Severity | Count | Share |");
            let _ = writeln!(out, "|---|---:|---:|");
        }
        for (level, count) in section.counts.iter() {
            let share = match &section.bars {
                Bars::Empty => "-".to_string(),
                Bars::Proportions { percent, .. } => format!("{:.2}%", percent.get(level)),
            };
            match &section.thresholds {
                ThresholdView::NotEvaluated => {
                    let _ = writeln!(out, "| {} | {count} | {share} |", level.title());
                }
                ThresholdView::Evaluated { levels, .. } => {
                    let lt = levels.get(level);
                    let threshold = lt
                        .threshold
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    let status = if lt.exceeded { "exceeded" } else { "ok" };
                    let _ = writeln!(
                        out,
                        "| {} | {count} | {share} | {threshold} | {status} |",
                        level.title()
                    );
                }
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "- Total: {}", section.total);
        if let Some(libraries) = &section.libraries {
            let _ = writeln!(
                out,
                "- Libraries: {} vulnerable / {} ok",
                libraries.vulnerable, libraries.ok
            );
        }
        if let Some(info) = &section.scan_info {
            let _ = writeln!(out, "- Scan: {}", format_scan_info(info));
        }
        for (name, target) in section.links.entries() {
            let _ = writeln!(out, "- {name}: `{target}`");
        }

        if !cfg.show_tables {
            continue;
        }
        for table in &section.tables {
            let _ = writeln!(out);
            let _ = writeln!(out, "### {} severity ({})", table.level.title(), table.rows.len());
            let _ = writeln!(out);
            let _ = writeln!(out, "| {} |", table.header.join(" | "));
            let _ = writeln!(out, "|{}", "---|".repeat(table.header.len()));
            for row in &table.rows {
                let cells: Vec<String> = row.iter().map(|c| escape_markdown_cell(c)).collect();
                let _ = writeln!(out, "| {} |", cells.join(" | "));
            }
        }
    }

    out
}

fn escape_markdown_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn format_scan_info(info: &ScanInfo) -> String {
    let mut s = format!(
        "{} - {}, files={}",
        info.start_date, info.end_date, info.files_scanned
    );
    if let Some(loc) = info.lines_of_code {
        let _ = write!(s, ", loc={loc}");
    }
    s
}

fn format_compliance(exceeded: bool, color: bool) -> String {
    if exceeded {
        paint("[Threshold Exceeded]", "31", color)
    } else {
        paint("[Threshold Compliance]", "32", color)
    }
}

fn format_level(level: SeverityLevel, color: bool) -> String {
    let code = match level {
        SeverityLevel::High => "31",
        SeverityLevel::Medium => "33",
        SeverityLevel::Low => "90",
    };
    paint(level.title(), code, color)
}

fn paint(s: &str, code: &str, color: bool) -> String {
    if !color {
        return s.to_string();
    }
    format!("\x1b[{code}m{s}\x1b[0m")
}

fn pad_end_display(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

fn visible_width_ansi(s: &str) -> usize {
    let mut width: usize = 0;
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            for ch2 in chars.by_ref() {
                if ch2 == 'm' {
                    break;
                }
            }
            continue;
        }
        width = width.saturating_add(UnicodeWidthChar::width(ch).unwrap_or(0));
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Category, sample_snapshot};
    use crate::model::ReportModel;

    fn cfg() -> UiConfig {
        UiConfig {
            color: false,
            max_table_rows: 2,
            bar_width: 10,
            show_tables: true,
            quiet: false,
            verbose: false,
        }
    }

    #[test]
    fn visible_width_ignores_ansi_and_counts_wide_chars() {
        assert_eq!(visible_width_ansi("\x1b[31mHigh\x1b[0m"), 4);
        assert_eq!(visible_width_ansi("脆弱性"), 6);
    }

    #[test]
    fn text_report_shows_status_bars_and_truncated_tables() {
        let snapshot = sample_snapshot();
        let view = ReportModel::new(&snapshot).build_view().expect("view");
        let s = format_report(&view, &cfg());

        assert!(s.contains("Static Analysis  [Threshold Exceeded]"), "{s}");
        assert!(s.contains("Open Source Components"), "{s}");
        assert!(s.contains("Libraries: 8 vulnerable / 28 ok"), "{s}");
        assert!(s.contains("High severity (3):"), "{s}");
        assert!(s.contains("Vulnerability Type"), "{s}");
        assert!(s.contains("... (1 more)"), "{s}");
        assert!(!s.contains("\x1b["), "{s}");
    }

    #[test]
    fn text_report_skips_disabled_category() {
        let mut snapshot = sample_snapshot();
        if let Some(section) = snapshot.categories.get_mut(&Category::OpenSourceComponent) {
            section.enabled = false;
        }
        let view = ReportModel::new(&snapshot).build_view().expect("view");
        let s = format_report(&view, &cfg());
        assert!(!s.contains("Open Source Components"), "{s}");
        assert!(!s.contains("Libraries:"), "{s}");
    }

    #[test]
    fn markdown_lists_every_row_and_escapes_pipes() {
        let mut snapshot = sample_snapshot();
        if let Some(bucket) = snapshot
            .categories
            .get_mut(&Category::StaticAnalysis)
            .and_then(|s| s.buckets.get_mut(&SeverityLevel::Low))
        {
            bucket.findings[0].name = "a|b".to_string();
        }
        let view = ReportModel::new(&snapshot).build_view().expect("view");
        let s = format_markdown(&view, &cfg());

        assert!(s.contains("## Static Analysis"), "{s}");
        assert!(s.contains("**Threshold Exceeded**"), "{s}");
        assert!(s.contains("| Vulnerability Type | Publish Date | Library |"), "{s}");
        assert!(s.contains("| a\\|b | 12 |"), "{s}");
        assert!(s.contains("| High | 3 | 33.33% | 0 | exceeded |"), "{s}");
        assert!(s.contains("- pdf: `reports/sast/summary.pdf`"), "{s}");
    }
}
