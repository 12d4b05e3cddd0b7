//! Screenshot capture and run results
//!
//! Screenshots are purely observational; a capture failure is logged by the
//! caller and never changes control flow. The run summary is written as
//! JSON for downstream tooling; rendering it into HTML is out of scope.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::HarnessResult;
use nsb_webdriver::Session;

/// One captured screenshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotRecord {
    pub name: String,
    pub description: String,
    pub path: PathBuf,
}

/// Writes PNG screenshots into a directory and remembers what was taken
pub struct ScreenshotSink {
    dir: PathBuf,
    records: Vec<ScreenshotRecord>,
}

impl ScreenshotSink {
    pub fn new(dir: impl Into<PathBuf>) -> HarnessResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            records: Vec::new(),
        })
    }

    /// Capture the current window as `<name>.png`
    pub async fn capture(
        &mut self,
        session: &Session,
        name: &str,
        description: &str,
    ) -> HarnessResult<PathBuf> {
        let png = session.screenshot_png().await?;
        let path = self.dir.join(format!("{}.png", name));
        std::fs::write(&path, png)?;
        info!("Captured screenshot '{}' ({})", name, description);
        self.records.push(ScreenshotRecord {
            name: name.to_string(),
            description: description.to_string(),
            path: path.clone(),
        });
        Ok(path)
    }

    pub fn records(&self) -> &[ScreenshotRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ScreenshotRecord> {
        self.records
    }
}

/// Result of one harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub name: String,
    pub target_url: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
    pub screenshots: Vec<ScreenshotRecord>,
}

impl RunReport {
    /// Write the report to `<output_dir>/test-results.json`
    pub fn write_json(&self, output_dir: &Path) -> HarnessResult<PathBuf> {
        std::fs::create_dir_all(output_dir)?;

        let path = output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_json_creates_results_file() {
        let report = RunReport {
            name: "init-process".to_string(),
            target_url: "http://127.0.0.1:8080".to_string(),
            success: false,
            duration_ms: 1234,
            error: Some("tree loaded with root but no children".to_string()),
            finished_at: Utc::now(),
            screenshots: vec![ScreenshotRecord {
                name: "after-loading".to_string(),
                description: "After namespace loading".to_string(),
                path: PathBuf::from("test-results/screenshots/after-loading.png"),
            }],
        };

        let dir = std::env::temp_dir().join(format!("nsb-report-{}", std::process::id()));
        let path = report.write_json(&dir).unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("tree loaded with root but no children"));
        assert!(json.contains("after-loading"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
