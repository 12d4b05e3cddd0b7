//! WebDriver session wrapper
//!
//! Opens a Chrome session with a throwaway profile directory and, when
//! configured, an unpacked companion extension loaded at startup. The
//! profile directory lives as long as the session and is removed with it.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use fantoccini::{Client, ClientBuilder, Locator};
use fantoccini::elements::Element;
use fantoccini::wd::WindowHandle;
use tempfile::TempDir;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::{DriverError, DriverResult};

/// A live browser session
pub struct Session {
    client: Client,
    // Kept only so the profile directory outlives the session.
    _profile: TempDir,
}

impl Session {
    /// Open a new session against a running WebDriver endpoint
    pub async fn start(config: SessionConfig) -> DriverResult<Self> {
        let profile = tempfile::tempdir()?;

        let mut args = vec![
            format!("--user-data-dir={}", profile.path().display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
        ];
        if config.headless {
            // The "new" headless mode supports extensions.
            args.push("--headless=new".to_string());
        }
        if let Some(extension_dir) = &config.extension_dir {
            args.push(format!("--load-extension={}", extension_dir.display()));
        }

        let mut chrome_options = serde_json::Map::new();
        chrome_options.insert("args".to_string(), serde_json::json!(args));
        if let Some(binary) = &config.chrome_binary {
            chrome_options.insert("binary".to_string(), serde_json::json!(binary));
        }

        let mut capabilities = serde_json::Map::new();
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            serde_json::Value::Object(chrome_options),
        );

        info!("Opening WebDriver session at {}", config.webdriver_url);
        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(&config.webdriver_url)
            .await?;

        Ok(Self {
            client,
            _profile: profile,
        })
    }

    /// Navigate the current window to `url`
    pub async fn goto(&self, url: &str) -> DriverResult<()> {
        debug!("Navigating to {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    /// Handle of the currently focused window
    pub async fn window(&self) -> DriverResult<WindowHandle> {
        Ok(self.client.window().await?)
    }

    /// Handles of all open windows and tabs
    pub async fn windows(&self) -> DriverResult<Vec<WindowHandle>> {
        Ok(self.client.windows().await?)
    }

    /// Switch rendering context to another window
    pub async fn switch_to(&self, handle: &WindowHandle) -> DriverResult<()> {
        self.client.switch_to_window(handle.clone()).await?;
        Ok(())
    }

    /// Collect one attribute from every element matching `selector`.
    ///
    /// Elements without the attribute are skipped. The scan reflects the
    /// page as rendered right now; callers re-run it on every poll.
    pub async fn attribute_values(
        &self,
        selector: &str,
        attribute: &str,
    ) -> DriverResult<Vec<String>> {
        let mut values = Vec::new();
        for element in self.client.find_all(Locator::Css(selector)).await? {
            if let Some(value) = element.attr(attribute).await? {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// First element matching `selector`
    pub async fn find(&self, selector: &str) -> DriverResult<Element> {
        Ok(self.client.find(Locator::Css(selector)).await?)
    }

    /// Click the first element matching `selector`
    pub async fn click(&self, selector: &str) -> DriverResult<()> {
        self.find(selector).await?.click().await?;
        Ok(())
    }

    /// Click a field, clear it, and type `value` into it
    pub async fn fill(&self, selector: &str, value: &str) -> DriverResult<()> {
        let field = self.find(selector).await?;
        field.click().await?;
        field.clear().await?;
        field.send_keys(value).await?;
        Ok(())
    }

    /// Wait until the first element matching `selector` is displayed and
    /// enabled, then return it
    pub async fn wait_clickable(
        &self,
        selector: &str,
        timeout: Duration,
        interval: Duration,
    ) -> DriverResult<Element> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(element) = self.clickable(selector).await? {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                break;
            }
            sleep(interval).await;
        }
        Err(DriverError::ClickableTimeout {
            selector: selector.to_string(),
            waited_ms: timeout.as_millis() as u64,
        })
    }

    async fn clickable(&self, selector: &str) -> DriverResult<Option<Element>> {
        let found = self.client.find_all(Locator::Css(selector)).await?;
        if let Some(element) = found.into_iter().next() {
            if element.is_displayed().await? && element.is_enabled().await? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    /// PNG screenshot of the current window
    pub async fn screenshot_png(&self) -> DriverResult<Vec<u8>> {
        Ok(self.client.screenshot().await?)
    }

    /// Close the browser and end the session
    pub async fn close(self) -> DriverResult<()> {
        self.client.close().await?;
        Ok(())
    }
}

/// Configuration for opening a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebDriver endpoint URL (a running chromedriver)
    pub webdriver_url: String,

    /// Chrome binary to use (None = chromedriver default)
    pub chrome_binary: Option<PathBuf>,

    /// Unpacked extension to load at startup
    pub extension_dir: Option<PathBuf>,

    /// Run headless
    pub headless: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://127.0.0.1:9515".to_string(),
            chrome_binary: None,
            extension_dir: None,
            headless: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert!(config.headless);
        assert!(config.extension_dir.is_none());
    }
}
