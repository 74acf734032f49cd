use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use rust_i18n::t;

use trendlens::config::Config;
use trendlens::models::RunMode;
use trendlens::provider::TrendsClient;
use trendlens::session::{SessionReport, TrendsSession};

/// Parameters for the analyze command
pub struct AnalyzeParams {
    pub config: Config,

    /// Preselected mode; the menu is shown when absent
    pub mode: Option<RunMode>,
}

pub async fn analyze(params: AnalyzeParams) -> Result<SessionReport> {
    let AnalyzeParams { config, mode } = params;

    println!(
        "{}",
        t!(
            "menu.banner",
            keyword = &config.query.keyword,
            geo = &config.query.geo
        )
    );

    let mode = match mode {
        Some(mode) => mode,
        None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            prompt_run_mode(&mut stdin.lock(), &mut stdout).context("Failed to read menu choice")?
        }
    };
    tracing::info!(?mode, "Run mode selected");

    let client = TrendsClient::new(&config.provider).context("Failed to create trends client")?;
    let mut session = TrendsSession::new(client, &config);

    Ok(session.run(mode).await)
}

/// Show the analysis menu on `output` and read one answer from `input`
///
/// Unrecognised answers (including end of input) select the weekly analysis.
pub fn prompt_run_mode<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<RunMode> {
    writeln!(output, "\n{}", t!("menu.title"))?;
    for mode in RunMode::ALL {
        writeln!(output, "{}. {}", mode.number(), t!(menu_label(mode)))?;
    }
    write!(output, "\n{} ", t!("menu.prompt"))?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    if !matches!(line.trim(), "1" | "2" | "3") {
        writeln!(output, "{}", t!("menu.invalid"))?;
    }

    Ok(RunMode::from_choice(&line))
}

fn menu_label(mode: RunMode) -> &'static str {
    match mode {
        RunMode::WeeklyMultiYear => "menu.weekly",
        RunMode::DailyYear => "menu.daily_year",
        RunMode::DailyLast12Months => "menu.daily_12m",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(input: &str) -> (RunMode, String) {
        rust_i18n::set_locale("en");
        let mut reader = io::Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let mode = prompt_run_mode(&mut reader, &mut out).unwrap();
        (mode, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_menu_lists_all_modes() {
        let (_, shown) = answer("1\n");
        assert!(shown.contains("1. "));
        assert!(shown.contains("2. "));
        assert!(shown.contains("3. "));
    }

    #[test]
    fn test_menu_choices() {
        assert_eq!(answer("2\n").0, RunMode::DailyYear);
        assert_eq!(answer("3\n").0, RunMode::DailyLast12Months);
        assert_eq!(answer("1\n").0, RunMode::WeeklyMultiYear);
    }

    #[test]
    fn test_invalid_choice_falls_back_to_weekly() {
        let (mode, shown) = answer("7\n");
        assert_eq!(mode, RunMode::WeeklyMultiYear);
        assert!(shown.trim_end().ends_with(&*t!("menu.invalid", locale = "en")));

        assert_eq!(answer("").0, RunMode::WeeklyMultiYear);
    }
}
