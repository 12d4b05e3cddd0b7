//! Chromedriver process management - spawning and readiness checking

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{DriverError, DriverResult};

/// Handle to a running chromedriver process
pub struct ChromedriverHandle {
    child: Child,
    base_url: String,
    port: u16,
}

impl ChromedriverHandle {
    /// Spawn chromedriver and wait until it accepts new sessions
    pub async fn spawn(config: ChromedriverConfig) -> DriverResult<Self> {
        let port = config.port.unwrap_or_else(find_free_port);
        let base_url = format!("http://127.0.0.1:{}", port);

        info!("Spawning chromedriver on port {}", port);

        let mut cmd = Command::new(&config.binary_path);
        cmd.arg(format!("--port={}", port));
        if config.verbose {
            cmd.arg("--verbose");
        }

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let child = cmd.spawn().map_err(|e| {
            DriverError::ChromedriverStartup(format!(
                "Failed to spawn {}: {}",
                config.binary_path.display(),
                e
            ))
        })?;

        let handle = ChromedriverHandle {
            child,
            base_url,
            port,
        };

        handle.wait_for_ready(config.startup_timeout).await?;

        info!("chromedriver is ready at {}", handle.base_url);
        Ok(handle)
    }

    /// Poll the WebDriver `/status` endpoint until it reports ready
    async fn wait_for_ready(&self, timeout_duration: Duration) -> DriverResult<()> {
        let status_url = format!("{}/status", self.base_url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            match client.get(&status_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    let body: serde_json::Value = resp.json().await.unwrap_or_default();
                    if body
                        .pointer("/value/ready")
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false)
                    {
                        return Ok(());
                    }
                }
                Ok(resp) => {
                    warn!("chromedriver status returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for chromedriver to start...");
                    }
                    // Connection refused is expected while chromedriver is starting
                    if !e.is_connect() {
                        warn!("chromedriver status error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(100)).await;
        }

        Err(DriverError::ChromedriverReadiness(attempts))
    }

    /// WebDriver endpoint URL for this process
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Port the process is listening on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stop the process
    pub fn stop(&mut self) -> DriverResult<()> {
        info!("Stopping chromedriver (pid: {})", self.child.id());

        // Try graceful shutdown first
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                // Give it a moment to shut down gracefully
                std::thread::sleep(Duration::from_millis(500));
            }
        }

        // Force kill if still running
        let _ = self.child.kill();
        let _ = self.child.wait();

        Ok(())
    }
}

impl Drop for ChromedriverHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Configuration for spawning chromedriver
#[derive(Debug, Clone)]
pub struct ChromedriverConfig {
    /// Path to the chromedriver binary
    pub binary_path: PathBuf,

    /// Port to listen on (None = find free port)
    pub port: Option<u16>,

    /// Timeout for process startup
    pub startup_timeout: Duration,

    /// Pass --verbose to chromedriver
    pub verbose: bool,
}

impl Default for ChromedriverConfig {
    fn default() -> Self {
        Self {
            binary_path: PathBuf::from("chromedriver"),
            port: None,
            startup_timeout: Duration::from_secs(30),
            verbose: false,
        }
    }
}

/// Find a free port to use
fn find_free_port() -> u16 {
    use std::net::TcpListener;

    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to find free port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}
