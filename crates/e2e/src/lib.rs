//! Namespace Browser UI Test Harness
//!
//! Drives a real browser through the namespace browser's initialization
//! process and verifies that the namespace tree renders with the expected
//! root and child entries.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Init Test Runner (Rust)                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── ChromedriverHandle::spawn()   (nsb-webdriver)        │
//! │    ├── Session::start()              (nsb-webdriver)        │
//! │    ├── InitFlow::run()                                      │
//! │    │     ├── navigate to target URL                         │
//! │    │     ├── OAuth login        (protected hosts only)      │
//! │    │     ├── await consent tab, confirm caveats             │
//! │    │     └── verify namespace tree (TreeChecker poll)       │
//! │    └── write_results() -> test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TreeExpectation (YAML)                                     │
//! │    ├── root: ns.dev.v.io:8101                               │
//! │    ├── children: [applications, binaries, proxy]            │
//! │    └── timeout_secs: 20                                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The checker re-scans the full set of visible tree nodes on every poll;
//! nothing is carried over between polls, so nodes that disappear between
//! polls are correctly re-flagged absent. On timeout the last observation
//! classifies the failure into one of three shapes: page never loaded,
//! root without children, or children without root.

pub mod checker;
pub mod error;
pub mod expect;
pub mod flow;
pub mod oauth;
pub mod report;
pub mod runner;

pub use checker::{TreeChecker, TreeFailure, TreeObservation};
pub use error::{HarnessError, HarnessResult};
pub use expect::TreeExpectation;
pub use flow::{FlowConfig, InitFlow};
pub use runner::{RunnerConfig, TestRunner};
