use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};

fn scansummary_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scansummary"));
    cmd.env("HOME", home);
    cmd.env_remove("SCANSUMMARY_CONFIG");
    cmd.env_remove("SCANSUMMARY_UI_COLOR");
    cmd.env_remove("SCANSUMMARY_UI_MAX_TABLE_ROWS");
    cmd.env_remove("SCANSUMMARY_RENDER_BAR_WIDTH");
    cmd.env_remove("SCANSUMMARY_RENDER_SHOW_TABLES");
    cmd.env_remove("SCANSUMMARY_LOGS_ENABLED");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    scansummary_cmd(home)
        .args(args)
        .output()
        .expect("run scansummary")
}

fn make_temp_home() -> PathBuf {
    static HOME_SEQ: AtomicU64 = AtomicU64::new(0);

    let seq = HOME_SEQ.fetch_add(1, Ordering::Relaxed);
    let uniq = format!("scansummary-config-test-{}-{seq}", std::process::id());
    let home = std::env::temp_dir().join(uniq);
    let _ = std::fs::remove_dir_all(&home);
    std::fs::create_dir_all(&home).expect("create home");
    home
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdirs");
    }
    std::fs::write(path, bytes).expect("write");
}

fn show_config(out: &Output) -> serde_json::Value {
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("parse json")
}

#[test]
fn defaults_apply_without_config_file() {
    let home = make_temp_home();
    let v = show_config(&run(&home, &["config", "--show", "--json"]));
    assert_eq!(v.pointer("/render/bar_width").and_then(|n| n.as_u64()), Some(40));
    assert_eq!(v.pointer("/ui/max_table_rows").and_then(|n| n.as_u64()), Some(20));
    assert_eq!(v.pointer("/logs/enabled").and_then(|b| b.as_bool()), Some(false));
    assert!(v.get("config_path").is_none());
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn config_file_is_read_from_home() {
    let home = make_temp_home();
    write_file(
        home.join(".config/scansummary/config.toml").as_path(),
        br#"
[ui]
max_table_rows = 1

[render]
show_tables = false
"#,
    );
    let v = show_config(&run(&home, &["config", "--show", "--json"]));
    assert_eq!(v.pointer("/ui/max_table_rows").and_then(|n| n.as_u64()), Some(1));
    assert_eq!(
        v.pointer("/render/show_tables").and_then(|b| b.as_bool()),
        Some(false)
    );
    assert!(
        v.get("config_path")
            .and_then(|s| s.as_str())
            .is_some_and(|s| s.ends_with("config.toml"))
    );
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn env_overrides_config_file() {
    let home = make_temp_home();
    write_file(
        home.join(".config/scansummary/config.toml").as_path(),
        br#"
[render]
bar_width = 12
show_tables = false
"#,
    );
    let out = scansummary_cmd(&home)
        .env("SCANSUMMARY_RENDER_BAR_WIDTH", "30")
        .env("SCANSUMMARY_RENDER_SHOW_TABLES", "yes")
        .args(["config", "--show", "--json"])
        .output()
        .expect("run scansummary");
    let v = show_config(&out);
    assert_eq!(v.pointer("/render/bar_width").and_then(|n| n.as_u64()), Some(30));
    assert_eq!(
        v.pointer("/render/show_tables").and_then(|b| b.as_bool()),
        Some(true)
    );
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn explicit_config_flag_wins_over_home_config() {
    let home = make_temp_home();
    write_file(
        home.join(".config/scansummary/config.toml").as_path(),
        b"[render]\nbar_width = 12\n",
    );
    let other = home.join("other.toml");
    write_file(&other, b"[render]\nbar_width = 7\n");

    let v = show_config(&run(
        &home,
        &["config", "--show", "--json", "--config", other.to_str().expect("utf8")],
    ));
    assert_eq!(v.pointer("/render/bar_width").and_then(|n| n.as_u64()), Some(7));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn invalid_env_value_exits_2() {
    let home = make_temp_home();
    let out = scansummary_cmd(&home)
        .env("SCANSUMMARY_UI_COLOR", "sometimes")
        .args(["config", "--show"])
        .output()
        .expect("run scansummary");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("SCANSUMMARY_UI_COLOR"), "stderr={stderr}");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn zero_bar_width_is_rejected() {
    let home = make_temp_home();
    let out = scansummary_cmd(&home)
        .env("SCANSUMMARY_RENDER_BAR_WIDTH", "0")
        .args(["config", "--show"])
        .output()
        .expect("run scansummary");
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn logs_enabled_in_config_writes_render_log() {
    let home = make_temp_home();
    write_file(
        home.join(".config/scansummary/config.toml").as_path(),
        b"[logs]\nenabled = true\n",
    );
    let input = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/compliant.json");

    let out = run(
        &home,
        &["render", "--quiet", "--input", input.to_str().expect("utf8")],
    );
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(out.stdout.is_empty());

    let logs: Vec<PathBuf> = std::fs::read_dir(home.join(".config/scansummary/logs"))
        .expect("logs dir")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    assert_eq!(logs.len(), 1, "logs={logs:?}");
    let v: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&logs[0]).expect("read log")).expect("parse log");
    assert_eq!(v.get("command").and_then(|s| s.as_str()), Some("render"));
    assert_eq!(v.get("status").and_then(|s| s.as_str()), Some("ok"));

    let _ = std::fs::remove_dir_all(&home);
}
