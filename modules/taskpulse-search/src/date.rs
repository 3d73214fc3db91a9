//! Relative and absolute date interpretation.

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use regex::Regex;
use serde_json::json;
use tracing::debug;

use taskpulse_core::{format_template, LanguageAnalyzer, PromptRegistry, PromptType};

/// Parses free-text date expressions, preferring the language-analysis
/// collaborator and degrading to rule-based parsing on any failure.
pub struct DateInterpreter {
    analyzer: Arc<dyn LanguageAnalyzer>,
    prompts: Arc<PromptRegistry>,
}

impl DateInterpreter {
    pub fn new(analyzer: Arc<dyn LanguageAnalyzer>, prompts: Arc<PromptRegistry>) -> Self {
        Self { analyzer, prompts }
    }

    /// Resolve a date expression. Never fails: unparseable input is `None`.
    pub async fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let now = Utc::now();
        match self.analyze(trimmed, now).await {
            Ok(date) => Some(date),
            Err(err) => {
                debug!(input = %trimmed, error = %err, "date analysis unavailable, falling back to rules");
                parse_fallback(trimmed, now)
            }
        }
    }

    async fn analyze(&self, input: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
        let template = self.prompts.get(PromptType::DateAnalysis)?;
        let vars = [
            ("dateInput".to_string(), json!(input)),
            (
                "currentDate".to_string(),
                json!(now.format("%Y-%m-%d").to_string()),
            ),
        ]
        .into_iter()
        .collect();
        let prompt = format_template(&template, &vars)?;

        let analysis = self.analyzer.analyze_date(&prompt, input).await?;
        parse_calendar_date(&analysis.target_date).ok_or_else(|| {
            anyhow::anyhow!("analyzer returned invalid date: {}", analysis.target_date)
        })
    }
}

static DAYS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) days? ago").expect("valid regex"));
static WEEKS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) weeks? ago").expect("valid regex"));

/// Rule-based parsing of the supported relative and absolute forms.
/// Deterministic given `now`.
pub fn parse_fallback(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let normalized = input.trim().to_lowercase();

    match normalized.as_str() {
        "today" | "this week" | "this month" => return Some(now),
        "yesterday" => return now.checked_sub_signed(Duration::days(1)),
        "tomorrow" => return now.checked_add_signed(Duration::days(1)),
        "last week" => return now.checked_sub_signed(Duration::days(7)),
        "last month" => return subtract_one_month(now),
        _ => {}
    }

    if let Some(caps) = DAYS_AGO.captures(&normalized) {
        let n: i64 = caps[1].parse().ok()?;
        return now.checked_sub_signed(Duration::try_days(n)?);
    }

    if let Some(caps) = WEEKS_AGO.captures(&normalized) {
        let n: i64 = caps[1].parse().ok()?;
        return now.checked_sub_signed(Duration::try_days(n.checked_mul(7)?)?);
    }

    parse_calendar_date(input.trim())
}

/// Direct calendar-date parsing: RFC 3339, `YYYY-MM-DD`, or `MM/DD/YYYY`.
fn parse_calendar_date(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| Utc.from_utc_datetime(&dt));
        }
    }

    None
}

/// Calendar-month field subtraction, preserving the day-of-month.
/// Reproduces the upstream quirk: when the previous month is shorter, the
/// overflow spills into the following month (Mar 31 -> "Feb 31" -> Mar 3).
fn subtract_one_month(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (year, month) = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };

    let day = now.day();
    let month_len = days_in_month(year, month)?;

    let date = if day <= month_len {
        NaiveDate::from_ymd_opt(year, month, day)?
    } else {
        NaiveDate::from_ymd_opt(year, month, month_len)?
            .checked_add_signed(Duration::days((day - month_len) as i64))?
    };

    Some(Utc.from_utc_datetime(&date.and_time(now.time())))
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}
