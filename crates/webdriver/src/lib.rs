//! WebDriver glue for the namespace browser UI tests
//!
//! This crate owns everything between the test harness and the browser:
//!
//! - [`ChromedriverHandle`] spawns a chromedriver process and polls its
//!   `/status` endpoint until it is ready to accept sessions.
//! - [`Session`] opens a WebDriver session against that process with a
//!   throwaway Chrome profile (and optionally an unpacked companion
//!   extension) and exposes the narrow command surface the harness uses:
//!   navigation, tree-node label scans, window handles, clickable waits,
//!   clicks, and screenshots.
//! - [`wait::wait_until`] is the shared poll-with-deadline utility. Every
//!   wait in this workspace threads its timeout and poll interval through
//!   explicitly; there is no implicit default wait anywhere.

pub mod chromedriver;
pub mod error;
pub mod session;
pub mod wait;

pub use chromedriver::{ChromedriverConfig, ChromedriverHandle};
pub use error::{DriverError, DriverResult};
pub use session::{Session, SessionConfig};

// The harness compares and stores window handles; re-export the type so
// callers do not need a direct fantoccini dependency for it.
pub use fantoccini::elements::Element;
pub use fantoccini::wd::WindowHandle;
