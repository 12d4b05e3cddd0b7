//! Page flow controller for the initialization process
//!
//! Sequences the steps needed before the tree-load checker can meaningfully
//! run: navigate, optional OAuth login, handle the consent tab the
//! companion extension opens, then verify the namespace tree under its wait
//! budget. The steps are linear; nothing branches back.

use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::checker::{TreeChecker, TreeFailure, LABEL_ATTRIBUTE, TREE_NODE_SELECTOR};
use crate::error::{HarnessError, HarnessResult};
use crate::expect::TreeExpectation;
use crate::oauth::{self, OauthCredentials};
use crate::report::ScreenshotSink;
use nsb_webdriver::wait::wait_until;
use nsb_webdriver::{DriverError, Session, WindowHandle};

/// Hosts that sit behind OAuth and require a login before the page loads
pub const OAUTH_PROTECTED_URLS: [&str; 2] =
    ["https://browser.v.io", "https://browser.staging.v.io"];

/// Confirmation control on the extension's caveat-selection page
pub const DEFAULT_CONFIRM_SELECTOR: &str = "#submit-caveats";

/// Whether `url` is one of the OAuth-protected deployments. The match is
/// exact; variants such as a trailing slash skip the login branch.
pub fn requires_oauth_login(url: &str) -> bool {
    OAUTH_PROTECTED_URLS.contains(&url)
}

/// The handle in `handles` that is not the already-known `original`.
///
/// Window handles carry no ordering or naming, so the consent tab can only
/// be identified by exclusion.
pub fn newly_opened<H: PartialEq + Clone>(handles: &[H], original: &H) -> Option<H> {
    handles.iter().find(|handle| *handle != original).cloned()
}

/// Configuration for one flow run
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// The page under test
    pub target_url: String,

    /// Whether to expect and confirm the extension's consent tab
    pub caveat_confirmation: bool,

    /// Selector of the caveat confirmation control
    pub confirm_selector: String,

    /// How long the consent tab may take to appear
    pub tab_timeout: Duration,
    pub tab_poll_interval: Duration,

    /// How long the confirmation control may take to become clickable
    pub clickable_timeout: Duration,
    pub clickable_poll_interval: Duration,

    /// Interval between tree polls (the budget comes from the expectation)
    pub tree_poll_interval: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            target_url: "https://browser.staging.v.io".to_string(),
            caveat_confirmation: true,
            confirm_selector: DEFAULT_CONFIRM_SELECTOR.to_string(),
            tab_timeout: Duration::from_secs(30),
            tab_poll_interval: Duration::from_millis(250),
            clickable_timeout: Duration::from_secs(10),
            clickable_poll_interval: Duration::from_millis(250),
            tree_poll_interval: Duration::from_millis(500),
        }
    }
}

/// Drives one initialization run against a live session
pub struct InitFlow<'a> {
    session: &'a Session,
    screenshots: &'a mut ScreenshotSink,
    config: &'a FlowConfig,
    credentials: Option<&'a OauthCredentials>,
    checker: TreeChecker,
    tree_timeout: Duration,
}

impl<'a> InitFlow<'a> {
    pub fn new(
        session: &'a Session,
        screenshots: &'a mut ScreenshotSink,
        config: &'a FlowConfig,
        expectation: &TreeExpectation,
        credentials: Option<&'a OauthCredentials>,
    ) -> Self {
        Self {
            session,
            screenshots,
            config,
            credentials,
            checker: expectation.checker(),
            tree_timeout: expectation.timeout(),
        }
    }

    /// Run the whole flow: navigate, login if needed, confirm caveats,
    /// verify the tree, and capture the final screenshot.
    pub async fn run(&mut self) -> HarnessResult<()> {
        self.session.goto(&self.config.target_url).await?;
        let main_window = self.session.window().await?;

        if requires_oauth_login(&self.config.target_url) {
            let credentials = self.credentials.ok_or_else(|| {
                HarnessError::MissingCredentials(self.config.target_url.clone())
            })?;
            oauth::login(self.session, credentials).await?;
        }

        if self.config.caveat_confirmation {
            let consent_tab = self.await_consent_tab(&main_window).await?;
            self.confirm_caveats(&consent_tab).await?;
            self.session.switch_to(&main_window).await?;
        }

        let verdict = self.verify_tree().await;

        // Diagnostic capture happens for success and failure alike.
        if let Err(e) = self
            .screenshots
            .capture(self.session, "after-loading", "After namespace loading")
            .await
        {
            warn!("Could not capture final screenshot: {}", e);
        }

        verdict
    }

    /// Wait for the extension to open its consent tab and identify it by
    /// exclusion against the main window's handle.
    async fn await_consent_tab(&self, original: &WindowHandle) -> HarnessResult<WindowHandle> {
        debug!("Waiting for the consent tab to open");
        let session = self.session;
        let appeared = wait_until(
            self.config.tab_timeout,
            self.config.tab_poll_interval,
            || async move { Ok::<_, DriverError>(session.windows().await?.len() == 2) },
        )
        .await?;

        let timeout = HarnessError::ConsentTabTimeout {
            waited_ms: self.config.tab_timeout.as_millis() as u64,
        };
        if !appeared {
            return Err(timeout);
        }

        let handles = self.session.windows().await?;
        newly_opened(&handles, original).ok_or(timeout)
    }

    /// Switch to the consent tab, wait for its confirmation control, and
    /// accept the caveats.
    async fn confirm_caveats(&mut self, consent_tab: &WindowHandle) -> HarnessResult<()> {
        info!("Confirming caveats on the consent tab");
        self.session.switch_to(consent_tab).await?;
        self.session
            .wait_clickable(
                &self.config.confirm_selector,
                self.config.clickable_timeout,
                self.config.clickable_poll_interval,
            )
            .await?;
        // Screenshots are observational; a failed capture must not keep
        // the caveats from being confirmed.
        if let Err(e) = self
            .screenshots
            .capture(
                self.session,
                "before-caveat-confirmation",
                "Before caveat confirmation",
            )
            .await
        {
            warn!("Could not capture caveat screenshot: {}", e);
        }
        self.session.click(&self.config.confirm_selector).await?;
        Ok(())
    }

    /// Poll the tree until the expected root and children are all visible
    /// or the budget runs out, then classify a timeout from the last
    /// observation.
    async fn verify_tree(&mut self) -> HarnessResult<()> {
        info!("Checking the main page");
        let deadline = Instant::now() + self.tree_timeout;
        loop {
            let labels = self
                .session
                .attribute_values(TREE_NODE_SELECTOR, LABEL_ATTRIBUTE)
                .await?;
            if self.checker.evaluate(labels.iter().map(String::as_str)) {
                info!("Namespace tree loaded");
                return Ok(());
            }
            if Instant::now() >= deadline {
                break;
            }
            sleep(self.config.tree_poll_interval).await;
        }

        let (root_ok, children_ok) = self
            .checker
            .last()
            .map(|obs| (obs.root_ok(), obs.children_ok()))
            .unwrap_or((false, false));
        match TreeFailure::classify(root_ok, children_ok) {
            Some(failure) => Err(HarnessError::TreeTimeout(failure)),
            // The final poll completed right on the deadline.
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://browser.v.io", true)]
    #[test_case("https://browser.staging.v.io", true)]
    // The literals match exactly; near misses skip the login branch.
    #[test_case("https://browser.staging.v.io/", false)]
    #[test_case("http://browser.v.io", false)]
    #[test_case("http://127.0.0.1:8080", false)]
    #[test_case("https://browser.example.com", false)]
    fn oauth_gating(url: &str, expected: bool) {
        assert_eq!(requires_oauth_login(url), expected);
    }

    #[test]
    fn consent_tab_identified_by_exclusion() {
        let handles = vec!["A".to_string(), "B".to_string()];
        let original = "A".to_string();
        assert_eq!(newly_opened(&handles, &original), Some("B".to_string()));
    }

    #[test]
    fn no_new_tab_when_only_original_exists() {
        let handles = vec!["A".to_string()];
        let original = "A".to_string();
        assert_eq!(newly_opened(&handles, &original), None);
    }

    #[test]
    fn order_of_handles_does_not_matter() {
        let handles = vec!["B".to_string(), "A".to_string()];
        let original = "A".to_string();
        assert_eq!(newly_opened(&handles, &original), Some("B".to_string()));
    }

    #[test]
    fn flow_config_defaults() {
        let config = FlowConfig::default();
        assert!(config.caveat_confirmation);
        assert_eq!(config.confirm_selector, DEFAULT_CONFIRM_SELECTOR);
        assert_eq!(config.tab_timeout, Duration::from_secs(30));
    }
}
