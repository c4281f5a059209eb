// ABOUTME: Persisted suite report: JSON results document and an HTML page.
// ABOUTME: Carries per-ecosystem tallies and each project's outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::aggregate::EcosystemTally;
use crate::error::Result;
use crate::pipeline::ExecutionOutcome;
use crate::types::EcosystemId;

pub const JSON_REPORT_FILENAME: &str = "test_results.json";
pub const HTML_REPORT_FILENAME: &str = "report.html";

/// Outcome of one case, tagged with the ecosystem it counted towards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub ecosystem: EcosystemId,
    #[serde(flatten)]
    pub outcome: ExecutionOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    pub timestamp: DateTime<Utc>,
    pub host: String,
    pub per_ecosystem: BTreeMap<EcosystemId, EcosystemTally>,
    pub per_project: BTreeMap<String, ProjectRecord>,
}

impl AggregateReport {
    pub fn new(
        per_ecosystem: BTreeMap<EcosystemId, EcosystemTally>,
        per_project: BTreeMap<String, ProjectRecord>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            host: gethostname::gethostname().to_string_lossy().into_owned(),
            per_ecosystem,
            per_project,
        }
    }

    /// Every ecosystem passed all of its cases.
    pub fn succeeded(&self) -> bool {
        self.per_ecosystem.values().all(EcosystemTally::is_green)
    }

    pub fn total(&self) -> usize {
        self.per_ecosystem.values().map(|t| t.total).sum()
    }

    pub fn failed(&self) -> usize {
        self.per_ecosystem.values().map(EcosystemTally::failed).sum()
    }

    /// Failed cases of `ecosystem`, in project order.
    pub fn failures<'a>(
        &'a self,
        ecosystem: &'a EcosystemId,
    ) -> impl Iterator<Item = (&'a str, &'a ProjectRecord)> + 'a {
        self.per_project
            .iter()
            .filter(move |(_, r)| &r.ecosystem == ecosystem && !r.outcome.succeeded)
            .map(|(id, r)| (id.as_str(), r))
    }

    /// Write both renderings into `dir`, creating it if needed.
    pub fn persist(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir)?;

        let json_path = dir.join(JSON_REPORT_FILENAME);
        std::fs::write(&json_path, serde_json::to_string_pretty(self)?)?;

        let html_path = dir.join(HTML_REPORT_FILENAME);
        std::fs::write(&html_path, self.render_html())?;

        tracing::info!(dir = %dir.display(), "Wrote suite report");
        Ok((json_path, html_path))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn render_html(&self) -> String {
        let mut html = String::new();
        let verdict = if self.succeeded() { "PASSED" } else { "FAILED" };

        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>boxrun suite report</title>\n<style>\n\
             body {{ font-family: sans-serif; margin: 2em; }}\n\
             table {{ border-collapse: collapse; margin-bottom: 2em; }}\n\
             td, th {{ border: 1px solid #ccc; padding: 4px 8px; text-align: left; }}\n\
             .pass {{ color: #1a7f37; }}\n.fail {{ color: #cf222e; }}\n\
             pre {{ max-height: 20em; overflow: auto; background: #f6f8fa; }}\n\
             </style>\n</head>\n<body>\n\
             <h1>Suite {verdict}</h1>\n<p>{} on {}</p>\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            escape(&self.host),
        );

        html.push_str("<h2>Ecosystems</h2>\n<table>\n<tr><th>Ecosystem</th><th>Passed</th><th>Total</th></tr>\n");
        for (ecosystem, tally) in &self.per_ecosystem {
            let class = if tally.is_green() { "pass" } else { "fail" };
            let _ = writeln!(
                html,
                "<tr class=\"{class}\"><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(ecosystem.as_str()),
                tally.passed,
                tally.total
            );
        }
        html.push_str("</table>\n");

        html.push_str("<h2>Projects</h2>\n<table>\n<tr><th>Project</th><th>Result</th><th>Details</th></tr>\n");
        for (id, record) in &self.per_project {
            let outcome = &record.outcome;
            let (class, result) = match outcome.error_kind {
                None if outcome.succeeded => ("pass", "OK".to_string()),
                Some(kind) => ("fail", kind.to_string()),
                None => ("fail", "FAILED".to_string()),
            };
            let mut details = String::new();
            if let Some(diagnostic) = &outcome.diagnostic {
                let _ = write!(details, "<p>{}</p>", escape(diagnostic));
            }
            let captured = if outcome.succeeded {
                &outcome.stdout
            } else if !outcome.stderr.is_empty() {
                &outcome.stderr
            } else {
                &outcome.stdout
            };
            if !captured.is_empty() {
                let _ = write!(details, "<pre>{}</pre>", escape(captured));
            }
            let _ = writeln!(
                html,
                "<tr class=\"{class}\"><td>{}</td><td>{result}</td><td>{details}</td></tr>",
                escape(id)
            );
        }
        html.push_str("</table>\n</body>\n</html>\n");
        html
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
