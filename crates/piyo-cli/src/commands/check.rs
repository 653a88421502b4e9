//! Check command: parse exports and report, without a database.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use piyo_core::{BuiltinLocale, ParseOutput};

use crate::Config;
use crate::commands::util::{expand_paths, parse_files, write_table_counts};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Export dialect, overriding the configured locale.
    #[arg(long)]
    pub locale: Option<BuiltinLocale>,

    /// Export files, or directories of `*.txt` exports.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

pub fn run<W: Write>(writer: &mut W, args: &CheckArgs, config: &Config) -> Result<ParseOutput> {
    let files = expand_paths(&args.paths)?;
    let output = parse_files(&files, args.locale, config, 0)?;

    writeln!(
        writer,
        "{} file(s) OK ({} dialect, {} events)",
        files.len(),
        output.tables.dialect(),
        output.next_index
    )?;
    write_table_counts(writer, &output.tables)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    const EXPORT: &str = "\
【宝宝日志】
----------
2024/03/02(六)
小明 (0岁2月10日)

06:00   起床 (1小时30分钟)
08:00   120ml
10:00   疫苗 卡介苗

----------
";

    #[test]
    fn check_command_reports_counts() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("zh.txt");
        std::fs::write(&path, EXPORT).unwrap();
        let config = Config {
            database_path: temp.path().join("unused.db"),
            ..Config::default()
        };
        let args = CheckArgs {
            locale: Some(BuiltinLocale::Zh),
            paths: vec![path],
        };

        let mut output = Vec::new();
        run(&mut output, &args, &config).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        1 file(s) OK (zh dialect, 3 events)
        - day: 1
        - event: 3
        - sleep_start: 0
        - sleep_end: 1
        - height: 0
        - weight: 0
        - head_circumference: 0
        - temperature: 0
        - expressed_milk: 1
        - formula_milk: 0
        - breastfeeding: 0
        - diaper: 0
        - clinic_visit: 0
        - vaccination: 1
        ");
        assert!(!config.database_path.exists());
    }

    #[test]
    fn check_command_reports_fault_location() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ja.txt");
        std::fs::write(&path, "----------\n2024/01/15(月)\nたろう (0歳1か月3日)\n\n07:30   母乳 たくさん\n").unwrap();
        let args = CheckArgs {
            locale: None,
            paths: vec![path],
        };

        let err = run(&mut Vec::new(), &args, &Config::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("ja.txt"), "{message}");
        assert!(message.contains("line 5"), "{message}");
        assert!(message.contains("たくさん"), "{message}");
    }
}
