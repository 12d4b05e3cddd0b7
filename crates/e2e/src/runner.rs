//! Test runner that owns chromedriver, the session, and the report

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::error::HarnessResult;
use crate::expect::TreeExpectation;
use crate::flow::{FlowConfig, InitFlow};
use crate::oauth::OauthCredentials;
use crate::report::{RunReport, ScreenshotSink};
use nsb_webdriver::{ChromedriverConfig, ChromedriverHandle, Session, SessionConfig};

/// Name under which the initialization run is reported
pub const INIT_PROCESS_TEST_NAME: &str = "namespace-browser-init-process";

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub chromedriver: ChromedriverConfig,
    pub session: SessionConfig,
    pub flow: FlowConfig,

    /// YAML file overriding the expected tree shape (None = defaults)
    pub expectation_file: Option<PathBuf>,

    /// Credentials for the OAuth-protected deployments
    pub oauth: Option<OauthCredentials>,

    /// Directory for captured screenshots
    pub screenshot_dir: PathBuf,

    /// Output directory for results
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            chromedriver: ChromedriverConfig::default(),
            session: SessionConfig::default(),
            flow: FlowConfig::default(),
            expectation_file: None,
            oauth: None,
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Runs the initialization process end to end
pub struct TestRunner {
    config: RunnerConfig,
}

impl TestRunner {
    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run the flow once and produce a report.
    ///
    /// A categorized verification failure still yields `Ok` with
    /// `success = false` in the report; only infrastructure failures
    /// (chromedriver startup, session creation) are returned as `Err`.
    pub async fn run(&self) -> HarnessResult<RunReport> {
        let start = Instant::now();

        let expectation = TreeExpectation::load(self.config.expectation_file.as_deref())?;
        info!(
            "Running {} against {}",
            INIT_PROCESS_TEST_NAME, self.config.flow.target_url
        );

        let mut chromedriver = ChromedriverHandle::spawn(self.config.chromedriver.clone()).await?;
        let session_config = SessionConfig {
            webdriver_url: chromedriver.url().to_string(),
            ..self.config.session.clone()
        };
        let session = Session::start(session_config).await?;
        let mut screenshots = ScreenshotSink::new(&self.config.screenshot_dir)?;

        let outcome = InitFlow::new(
            &session,
            &mut screenshots,
            &self.config.flow,
            &expectation,
            self.config.oauth.as_ref(),
        )
        .run()
        .await;

        if let Err(e) = session.close().await {
            warn!("Failed to close session cleanly: {}", e);
        }
        chromedriver.stop()?;

        let duration_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            Ok(()) => info!("✓ {} ({} ms)", INIT_PROCESS_TEST_NAME, duration_ms),
            Err(e) => error!("✗ {} - {}", INIT_PROCESS_TEST_NAME, e),
        }

        Ok(RunReport {
            name: INIT_PROCESS_TEST_NAME.to_string(),
            target_url: self.config.flow.target_url.clone(),
            success: outcome.is_ok(),
            duration_ms,
            error: outcome.err().map(|e| e.to_string()),
            finished_at: Utc::now(),
            screenshots: screenshots.into_records(),
        })
    }

    /// Write the report to the configured output directory
    pub fn write_results(&self, report: &RunReport) -> HarnessResult<PathBuf> {
        report.write_json(&self.config.output_dir)
    }
}
