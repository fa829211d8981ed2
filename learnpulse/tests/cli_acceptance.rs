use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).expect("failed to write test file");
        path
    }

    fn write_config(&self, content: &str) -> PathBuf {
        let dir = self.xdg_config.join("learnpulse");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        let path = dir.join("config.toml");
        fs::write(&path, content).expect("failed to write config");
        path
    }
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../learnpulse-core/tests/fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("learnpulse"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("LEARNPULSE_API_TOKEN")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute learnpulse: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "learnpulse {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

#[test]
fn stats_reports_streaks_from_fixture() {
    let env = CliTestEnv::new();
    let file = fixture("attendance.json");
    let args = ["stats", "--file", &file, "--date", "2024-01-10"];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("STREAKS"), "got:\n{stdout}");
    assert!(stdout.contains("Current:  3 days"), "got:\n{stdout}");
    assert!(
        stdout.contains("Longest:  3 days (Jan 01 - Jan 03, 2024)"),
        "got:\n{stdout}"
    );
    assert!(stdout.contains("Active:   7 days"), "got:\n{stdout}");
    assert!(stdout.contains("Last:     today"), "got:\n{stdout}");
    assert!(!stdout.contains("mismatch"), "got:\n{stdout}");
}

#[test]
fn stats_json_export_is_machine_readable() {
    let env = CliTestEnv::new();
    let file = fixture("attendance.json");
    let args = [
        "stats", "--file", &file, "--date", "2024-01-10", "--export", "json",
    ];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["reference_date"], "2024-01-10");
    assert_eq!(json["streaks"]["longest"], 3);
    assert_eq!(json["streaks"]["current"], 3);
    assert_eq!(json["streaks"]["active_days"], 7);
    assert_eq!(json["streaks"]["longest_start"], "2024-01-01");
    assert_eq!(json["server_check"]["matches"], true);
    assert_eq!(json["attendance"]["total"], 8);
    assert_eq!(json["window"]["records"], 7);
}

#[test]
fn stats_timezone_flag_shifts_calendar_days() {
    let env = CliTestEnv::new();
    let file = fixture("attendance.json");
    let args = [
        "stats",
        "--file",
        &file,
        "--date",
        "2024-01-10",
        "--timezone",
        "-05:00",
        "--export",
        "json",
    ];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["streaks"]["active_days"], 6);
    assert_eq!(json["streaks"]["longest_start"], "2024-01-08");
}

#[test]
fn stats_markdown_export_contains_heatmap() {
    let env = CliTestEnv::new();
    let file = fixture("attendance.json");
    let args = [
        "stats", "--file", &file, "--date", "2024-01-10", "--export", "md",
    ];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# Attendance as of 2024-01-10"));
    assert!(stdout.contains("| Longest streak | 3 days |"));
    assert!(stdout.contains("Less"));
}

#[test]
fn stats_rejects_unknown_export_format() {
    let env = CliTestEnv::new();
    let file = fixture("attendance.json");
    let output = run_bin(&env, &["stats", "--file", &file, "--export", "csv"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown export format"), "got:\n{stderr}");
}

#[test]
fn grid_json_has_full_window() {
    let env = CliTestEnv::new();
    let file = fixture("attendance.json");
    let args = [
        "grid", "--file", &file, "--date", "2024-01-10", "--export", "json",
    ];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let days = json["days"].as_array().expect("days array");
    assert_eq!(days.len(), 365);
    assert_eq!(days[364]["date"], "2024-01-10");
    assert_eq!(json["start"], "2023-01-11");

    let jan_first = days
        .iter()
        .find(|d| d["date"] == "2024-01-01")
        .expect("Jan 1 in window");
    assert_eq!(jan_first["count"], 2);
    assert_eq!(jan_first["level"], 2);
}

#[test]
fn grid_terminal_prints_legend() {
    let env = CliTestEnv::new();
    let file = fixture("attendance.json");
    let args = ["grid", "--file", &file, "--date", "2024-01-10"];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("7 records in the last 365 days"));
    assert!(stdout.contains("Mon"));
    assert!(stdout.contains("Less"));
    assert!(stdout.contains("6+"));
}

#[test]
fn verify_passes_when_server_streak_agrees() {
    let env = CliTestEnv::new();
    let file = fixture("attendance.json");
    let args = ["verify", "--file", &file, "--date", "2024-01-10"];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Server streak:   3"));
    assert!(stdout.contains("Local streak:    3"));
    assert!(stdout.contains("OK"));
}

#[test]
fn verify_fails_on_mismatch() {
    let env = CliTestEnv::new();
    let file = env.write_file(
        "snapshot.json",
        r#"{"streak": 5, "records": [{"id": 1, "date": "2024-01-10"}]}"#,
    );
    let file = file.to_string_lossy().into_owned();

    let output = run_bin(&env, &["verify", "--file", &file, "--date", "2024-01-10"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("streak mismatch"), "got:\n{stderr}");
}

#[test]
fn verify_agrees_with_server_when_a_day_is_after_reference() {
    let env = CliTestEnv::new();
    let file = env.write_file(
        "tomorrow.json",
        r#"{"streak": 0, "records": [
            {"id": 1, "date": "2024-01-09"},
            {"id": 2, "date": "2024-01-10"},
            {"id": 3, "date": "2024-01-11"}
        ]}"#,
    );
    let file = file.to_string_lossy().into_owned();
    let args = ["verify", "--file", &file, "--date", "2024-01-10"];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Local streak:    0"), "got:\n{stdout}");
}

#[test]
fn verify_fails_without_server_streak() {
    let env = CliTestEnv::new();
    let file = fixture("malformed.json");

    let output = run_bin(
        &env,
        &["verify", "--file", &file, "--date", "2024-01-10", "--lenient"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("did not report a server streak"),
        "got:\n{stderr}"
    );
}

#[test]
fn malformed_dates_fail_strict_and_warn_lenient() {
    let env = CliTestEnv::new();
    let file = fixture("malformed.json");

    let strict = run_bin(&env, &["stats", "--file", &file, "--date", "2024-01-10"]);
    assert!(!strict.status.success());
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("--lenient"), "got:\n{stderr}");

    let args = [
        "stats", "--file", &file, "--date", "2024-01-10", "--lenient",
    ];
    let lenient = run_bin(&env, &args);
    assert_success(&args, &lenient);

    let stderr = String::from_utf8_lossy(&lenient.stderr);
    assert!(stderr.contains("warning: invalid record #1 (id a2)"), "got:\n{stderr}");
    let stdout = String::from_utf8_lossy(&lenient.stdout);
    assert!(stdout.contains("Active:   2 days"), "got:\n{stdout}");
}

#[test]
fn reference_day_without_full_window_is_rejected() {
    let env = CliTestEnv::new();
    let file = fixture("attendance.json");
    let output = run_bin(&env, &["stats", "--file", &file, "--date=-262143-01-05"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too early"), "got:\n{stderr}");
    assert!(!stderr.contains("panicked"), "got:\n{stderr}");
}

#[test]
fn user_without_api_url_is_an_error() {
    let env = CliTestEnv::new();
    let output = run_bin(&env, &["stats", "--user", "42"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no API base URL for user 42"), "got:\n{stderr}");
}

#[test]
fn missing_source_is_an_error() {
    let env = CliTestEnv::new();
    let output = run_bin(&env, &["stats"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no record source"), "got:\n{stderr}");
}

#[test]
fn config_command_shows_resolved_values() {
    let env = CliTestEnv::new();
    env.write_config(
        r#"
[api]
base_url = "https://lms.example.com"
user_id = "42"

[calendar]
timezone = "+05:30"
"#,
    );

    let output = run_bin(&env, &["config"]);
    assert_success(&["config"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("https://lms.example.com"), "got:\n{stdout}");
    assert!(stdout.contains("User ID:         42"), "got:\n{stdout}");
    assert!(stdout.contains("API token:       <not set>"), "got:\n{stdout}");
    assert!(stdout.contains("+05:30"), "got:\n{stdout}");
    assert!(!stdout.contains("not found"), "got:\n{stdout}");
}

#[test]
fn verbose_writes_log_file() {
    let env = CliTestEnv::new();
    let file = fixture("attendance.json");
    let args = ["--verbose", "stats", "--file", &file, "--date", "2024-01-10"];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let log_dir = env.xdg_state.join("learnpulse");
    let has_log = fs::read_dir(&log_dir)
        .map(|entries| {
            entries
                .flatten()
                .any(|e| e.file_name().to_string_lossy().starts_with("learnpulse.log"))
        })
        .unwrap_or(false);
    assert!(has_log, "expected a log file in {}", log_dir.display());
}
