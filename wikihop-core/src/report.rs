// Report generation for finished searches

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use wikihop_crawler::{ArticleTitle, SearchOutcome, SearchStats};

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    pub start: String,
    pub target: String,
    /// `found`, `no_path`, `timed_out` or `cancelled`.
    pub outcome: String,
    pub path: Option<Vec<String>>,
    pub hops: Option<usize>,
    pub stats: SearchStats,
}

impl SearchReport {
    pub fn from_outcome(start: &ArticleTitle, target: &ArticleTitle, outcome: &SearchOutcome) -> Self {
        let path = outcome.path();
        Self {
            start: start.to_string(),
            target: target.to_string(),
            outcome: outcome.label().to_string(),
            path: path.map(|p| p.to_strings()),
            hops: path.map(|p| p.hops()),
            stats: outcome.stats().clone(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }

    fn headline(&self) -> String {
        match (self.outcome.as_str(), self.hops) {
            ("found", Some(1)) => format!("{} is 1 hop from {}", self.start, self.target),
            ("found", Some(hops)) => {
                format!("{} is {} hops from {}", self.start, hops, self.target)
            }
            ("timed_out", _) => format!(
                "Ran out of time before reaching {} from {}",
                self.target, self.start
            ),
            ("cancelled", _) => format!("Search from {} was cancelled", self.start),
            _ => format!("Could not reach {} from {}", self.target, self.start),
        }
    }
}

pub fn generate_report(report: &SearchReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Json => generate_json_report(report),
        ReportFormat::Markdown => Ok(generate_markdown_report(report)),
    }
}

pub fn generate_text_report(report: &SearchReport) -> String {
    let mut out = String::new();

    out.push_str(DIVIDER);
    out.push_str("\n\n");
    out.push_str(&format!("{}\n\n", report.headline()));

    out.push_str("# Summary:\n");
    out.push_str(&format!("  Start:           {}\n", report.start));
    out.push_str(&format!("  Target:          {}\n", report.target));
    out.push_str(&format!("  Outcome:         {}\n", report.outcome));
    out.push_str(&format!("  Pages fetched:   {}\n", report.stats.pages_fetched));
    out.push_str(&format!("  Failed fetches:  {}\n", report.stats.fetch_failures));
    out.push_str(&format!("  Titles seen:     {}\n", report.stats.discovered));
    out.push_str(&format!("  Elapsed:         {}ms\n", report.stats.elapsed_ms));

    if let Some(ref path) = report.path {
        out.push_str(&format!("\n{}\n\n", DIVIDER));
        out.push_str("# Path:\n");
        for (idx, title) in path.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", idx, title));
        }
    }
    out.push('\n');

    out
}

pub fn generate_json_report(report: &SearchReport) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Wikihop",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
            },
            "search": report,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(report: &SearchReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", report.headline()));

    out.push_str("| Field | Value |\n");
    out.push_str("|-------|-------|\n");
    out.push_str(&format!("| Start | `{}` |\n", report.start));
    out.push_str(&format!("| Target | `{}` |\n", report.target));
    out.push_str(&format!("| Outcome | {} |\n", report.outcome));
    if let Some(hops) = report.hops {
        out.push_str(&format!("| Hops | {} |\n", hops));
    }
    out.push_str(&format!("| Pages fetched | {} |\n", report.stats.pages_fetched));
    out.push_str(&format!("| Failed fetches | {} |\n", report.stats.fetch_failures));
    out.push_str(&format!("| Elapsed | {}ms |\n", report.stats.elapsed_ms));

    if let Some(ref path) = report.path {
        out.push_str("\n## Path\n\n");
        for (idx, title) in path.iter().enumerate() {
            out.push_str(&format!(
                "{}. [{}](https://en.wikipedia.org/wiki/{})\n",
                idx + 1,
                title.replace('_', " "),
                title
            ));
        }
    }

    out
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
