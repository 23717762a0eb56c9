//! Report / Result Assembly (C13, §4.11): renders the fixed human-readable
//! report sections from a finished `AgentResult`, and an optional
//! incremental plain-text run log (SPEC_FULL.md §A "persisted state",
//! spec §6 "Persisted state").

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use auspex_core_types::{
    truncate_for_report, AgentAction, AgentResult, ResultData, Tier,
};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::warn;

/// A short, human-readable description of an action, used both for the
/// interactive loop's history lines and for the final report's
/// step-by-step section.
pub fn describe_action(action: &AgentAction) -> String {
    match action {
        AgentAction::Click { selector } => format!("click {}", selector.as_str()),
        AgentAction::Hover { selector } => format!("hover {}", selector.as_str()),
        AgentAction::Type { selector, text } => format!("type \"{text}\" into {}", selector.as_str()),
        AgentAction::Select { selector, value } => format!("select \"{value}\" in {}", selector.as_str()),
        AgentAction::PressKey { key } => format!("press {}", key.as_str()),
        AgentAction::Goto { url } => format!("goto {url}"),
        AgentAction::Wait { ms } => format!("wait {ms}ms"),
        AgentAction::Scroll { direction, amount } => {
            let amount = amount.unwrap_or_else(auspex_action_schema::default_scroll_amount);
            format!("scroll {direction:?} {amount}px").to_lowercase()
        }
        AgentAction::Done { result } => format!("done: {}", truncate_for_report(result)),
    }
}

/// Render the fixed-section human-readable report (§4.11).
pub fn render_report(result: &AgentResult, url: &str, prompt: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Auspex Run ===");
    let _ = writeln!(out, "URL: {url}");
    let _ = writeln!(out, "Prompt: {prompt}");
    let _ = writeln!(out, "Status: {:?}", result.status);
    let _ = writeln!(out, "Method: {}", tier_name(result.tier));
    let _ = writeln!(out, "Duration: {}ms", result.duration_ms);
    out.push('\n');

    let _ = writeln!(out, "Actions ({}):", result.actions.len());
    for record in &result.actions {
        let _ = writeln!(out, "  [{}] {}", record.iteration, describe_action(&record.action));
    }
    out.push('\n');

    let _ = writeln!(out, "Result:");
    match &result.data {
        Some(ResultData::Text(text)) => {
            let _ = writeln!(out, "  {}", truncate_for_report(text));
        }
        Some(ResultData::Structured(value)) => {
            let rendered = serde_json::to_string_pretty(value).unwrap_or_default();
            let _ = writeln!(out, "  {}", truncate_for_report(&rendered));
        }
        None => {
            let _ = writeln!(out, "  (none)");
        }
    }
    if let Some(error) = &result.error {
        let _ = writeln!(out, "Error: {error}");
    }
    out.push('\n');

    let _ = writeln!(out, "Resource Usage:");
    let _ = writeln!(out, "  LLM calls: {}", result.usage.calls);
    let _ = writeln!(
        out,
        "  Tokens: {} prompt + {} completion = {} total",
        result.usage.prompt_tokens, result.usage.completion_tokens, result.usage.total_tokens
    );
    let _ = writeln!(
        out,
        "  Browser RSS: {}",
        match (result.tier, result.memory.peak_browser_rss_kb) {
            (Tier::Http, _) => "not used".to_string(),
            (Tier::Playwright, None) => "not available".to_string(),
            (Tier::Playwright, Some(kb)) => format!("{kb} kB peak"),
        }
    );
    let _ = writeln!(
        out,
        "  Node heap: {}",
        match result.memory.node_heap_mb {
            Some(mb) => format!("{mb:.1} MB"),
            None => "not available".to_string(),
        }
    );

    out
}

fn tier_name(tier: Tier) -> &'static str {
    match tier {
        Tier::Http => "http",
        Tier::Playwright => "playwright",
    }
}

/// An incremental plain-text run log, mirroring the report's section
/// structure as the run progresses (spec §6 "Persisted state"). Writes to
/// `logs/auspex-<iso-timestamp>.txt` under the configured directory.
pub struct RunLogWriter {
    file: BufWriter<File>,
}

impl RunLogWriter {
    pub async fn create(log_dir: &Path, started_at_iso: &str, url: &str, prompt: &str) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(log_dir).await?;
        let path = log_path(log_dir, started_at_iso);
        let file = File::create(&path).await?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(format!("=== Auspex Run — {started_at_iso} ===\n").as_bytes())
            .await?;
        writer.write_all(format!("URL: {url}\n").as_bytes()).await?;
        writer.write_all(format!("Prompt: {prompt}\n").as_bytes()).await?;
        Ok(Self { file: writer })
    }

    pub async fn log_tier(&mut self, tier: Tier) {
        self.write_line(&format!("[{}]", tier_name(tier))).await;
    }

    pub async fn log_iteration(&mut self, iteration: u32, url: &str) {
        self.write_line(&format!("[iter {iteration}] {url}")).await;
    }

    pub async fn log_snapshot_meta(&mut self, title: &str, text_chars: usize, links: usize, forms: usize) {
        self.write_line(&format!("  title: {title}")).await;
        self.write_line(&format!("  text ({text_chars} chars) | {links} links | {forms} forms"))
            .await;
    }

    pub async fn log_action(&mut self, iteration: u32, description: &str) {
        self.write_line(&format!("  [action {iteration}] {description}")).await;
    }

    pub async fn log_action_result(&mut self, iteration: u32, outcome: Result<(), &str>) {
        match outcome {
            Ok(()) => self.write_line(&format!("  [action {iteration}] -> OK")).await,
            Err(msg) => self.write_line(&format!("  [action {iteration}] -> ERROR: {msg}")).await,
        }
    }

    pub async fn finish(mut self, result: &AgentResult) {
        let _ = self.write_line("").await;
        self.write_line(&format!("Status: {:?}", result.status)).await;
        self.write_line(&format!("Duration: {}ms", result.duration_ms)).await;
        self.write_line(&format!("Tokens: {}", result.usage.total_tokens)).await;
        self.write_line(&format!("Actions: {}", result.actions.len())).await;
        let data = match &result.data {
            Some(ResultData::Text(text)) => truncate_for_report(text),
            Some(ResultData::Structured(value)) => {
                truncate_for_report(&serde_json::to_string(value).unwrap_or_default())
            }
            None => "(none)".to_string(),
        };
        self.write_line(&format!("Data: {data}")).await;
        if let Err(e) = self.file.flush().await {
            warn!(error = %e, "failed to flush run log");
        }
    }

    async fn write_line(&mut self, line: &str) {
        if let Err(e) = self.file.write_all(format!("{line}\n").as_bytes()).await {
            warn!(error = %e, "failed to write run log line");
        }
    }
}

fn log_path(dir: &Path, started_at_iso: &str) -> PathBuf {
    let sanitized: String = started_at_iso
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    dir.join(format!("auspex-{sanitized}.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use auspex_core_types::{ActionRecord, LlmUsage, MemoryUsage, RunStatus, Selector};

    fn sample_result() -> AgentResult {
        AgentResult {
            status: RunStatus::Done,
            tier: Tier::Http,
            data: Some(ResultData::Text("Top story: Solar flare observed".into())),
            report: String::new(),
            duration_ms: 1234,
            actions: vec![ActionRecord {
                action: AgentAction::Done { result: "Top story: Solar flare observed".into() },
                iteration: 0,
                timestamp_ms: 0,
            }],
            usage: LlmUsage { prompt_tokens: 10, completion_tokens: 5, total_tokens: 15, calls: 1 },
            memory: MemoryUsage::default(),
            error: None,
        }
    }

    #[test]
    fn describes_each_action_kind_readably() {
        assert_eq!(describe_action(&AgentAction::Click { selector: Selector("#go".into()) }), "click #go");
        assert_eq!(describe_action(&AgentAction::Wait { ms: 500 }), "wait 500ms");
    }

    #[test]
    fn renders_every_fixed_section() {
        let result = sample_result();
        let report = render_report(&result, "https://example.com/", "Return the top story.");
        assert!(report.contains("Status: Done"));
        assert!(report.contains("Method: http"));
        assert!(report.contains("Browser RSS: not used"));
        assert!(report.contains("Result:"));
        assert!(report.contains("Resource Usage:"));
    }

    #[test]
    fn playwright_tier_with_no_rss_sample_reports_unavailable() {
        let mut result = sample_result();
        result.tier = Tier::Playwright;
        let report = render_report(&result, "https://example.com/", "task");
        assert!(report.contains("Browser RSS: not available"));
    }
}
