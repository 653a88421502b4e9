//! End-to-end tests for the `piyo` binary.
//!
//! Tests the full pipeline: text export → import → status → export

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const JA_EXPORT: &str = "\
【ぴよログ】2024年1月
----------
2024/01/15(月)
たろう (0歳1か月3日)

00:10   寝る
06:30   起きる (6時間20分)
07:00   母乳 左10分 ▶ 右5分
08:00   ミルク 120ml
09:15   うんち 少なめ

母乳合計　　 左 10分 / 右 5分

よく笑った
----------
2024/01/16(火)
たろう (0歳1か月4日)

03:00   起きる (!)
05:00   母乳 (60ml)
";

const ZH_EXPORT: &str = "\
【宝宝日志】
----------
2024/03/02(六)
小明 (0岁2月10日)

06:00   起床 (1小时30分钟)
08:00   120ml

----------
";

fn piyo_binary() -> String {
    env!("CARGO_BIN_EXE_piyo").to_string()
}

/// A command isolated from the user's config and data directories.
fn piyo(home: &Path) -> Command {
    let mut command = Command::new(piyo_binary());
    command
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("PIYO_LOCALE")
        .env_remove("PIYO_LOCALE_FILE")
        .env_remove("PIYO_TRAILING_BLOCK")
        .env("PIYO_DATABASE_PATH", home.join("piyo.db"))
        .env_remove("RUST_LOG");
    command
}

fn run(command: &mut Command) -> Output {
    let output = command.output().expect("failed to run piyo");
    assert!(
        output.status.success(),
        "piyo should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_import_status_export() {
    let temp = TempDir::new().unwrap();
    let exports = temp.path().join("exports");
    std::fs::create_dir(&exports).unwrap();
    write(&exports, "2024-01.txt", JA_EXPORT);

    let output = run(piyo(temp.path()).arg("import").arg(&exports));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Imported 1 file(s)"), "{stdout}");
    assert!(stdout.contains("Event index: 0..7"), "{stdout}");
    assert!(stdout.contains("- breastfeeding: 2"), "{stdout}");

    let output = run(piyo(temp.path()).arg("status"));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Next event index: 7"), "{stdout}");
    assert!(stdout.contains("- day: 2"), "{stdout}");
    assert!(stdout.contains("- sleep_end: 2"), "{stdout}");

    let output = run(piyo(temp.path()).arg("export").arg("day"));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let rows: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"], "2024-01-15");
    assert_eq!(rows[0]["comment"], "よく笑った\n");
    assert_eq!(rows[1]["age_days"], 4);
    assert!(rows[1]["comment"].is_null());
}

#[test]
fn test_second_import_continues_index() {
    let temp = TempDir::new().unwrap();
    let first = write(temp.path(), "a.txt", JA_EXPORT);
    run(piyo(temp.path()).arg("import").arg(&first));

    let second = write(
        temp.path(),
        "b.txt",
        &JA_EXPORT.replace("2024/01/15", "2024/01/17").replace("2024/01/16", "2024/01/18"),
    );
    let output = run(piyo(temp.path()).arg("import").arg(&second));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Event index: 7..14"), "{stdout}");

    let output = run(piyo(temp.path()).arg("export").arg("event"));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let indices: Vec<i64> = stdout
        .lines()
        .map(|line| {
            let row: serde_json::Value = serde_json::from_str(line).unwrap();
            row["event_index"].as_i64().unwrap()
        })
        .collect();
    assert_eq!(indices, (0..14).collect::<Vec<_>>());
}

#[test]
fn test_reimporting_same_file_appends_new_rows() {
    let temp = TempDir::new().unwrap();
    let path = write(temp.path(), "a.txt", JA_EXPORT);
    run(piyo(temp.path()).arg("import").arg(&path));

    // Importing again continues the index, so the rows are new, not duplicates.
    run(piyo(temp.path()).arg("import").arg(&path));
    let output = run(piyo(temp.path()).arg("status"));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("- event: 14"), "{stdout}");
}

#[test]
fn test_check_reports_fault_and_exits_nonzero() {
    let temp = TempDir::new().unwrap();
    let path = write(
        temp.path(),
        "bad.txt",
        &JA_EXPORT.replace("07:00   母乳 左10分 ▶ 右5分", "07:00   おしっこ 多め"),
    );

    let output = piyo(temp.path())
        .arg("check")
        .arg(&path)
        .output()
        .expect("failed to run piyo");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.txt"), "{stderr}");
    assert!(stderr.contains("line 8"), "{stderr}");
    assert!(!temp.path().join("piyo.db").exists());
}

#[test]
fn test_locale_from_environment() {
    let temp = TempDir::new().unwrap();
    let path = write(temp.path(), "zh.txt", ZH_EXPORT);

    let output = run(piyo(temp.path()).env("PIYO_LOCALE", "zh").arg("check").arg(&path));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("1 file(s) OK (zh dialect, 2 events)"), "{stdout}");
    assert!(stdout.contains("- expressed_milk: 1"), "{stdout}");
}

#[test]
fn test_config_file_sets_trailing_block_policy() {
    let temp = TempDir::new().unwrap();
    let path = write(temp.path(), "a.txt", JA_EXPORT);
    let config = write(temp.path(), "piyo.toml", "trailing_block = \"drop\"\n");

    let output = run(piyo(temp.path())
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(&path));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("- day: 1\n"), "{stdout}");
    assert!(stdout.contains("- event: 7\n"), "{stdout}");
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = run(&mut piyo(temp.path()));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Usage: piyo"), "{stdout}");
}
