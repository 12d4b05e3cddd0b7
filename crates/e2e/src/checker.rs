//! Tree-load checker
//!
//! A polling predicate over the labels of the currently visible tree-node
//! elements. Every call rebuilds its observation from scratch; the checker
//! keeps only the most recent observation so a timed-out wait can still be
//! classified afterwards.

use std::collections::{BTreeMap, BTreeSet};

/// CSS selector matching one entry of the namespace tree
pub const TREE_NODE_SELECTOR: &str = "tree-node";

/// Attribute carrying a tree node's display label
pub const LABEL_ATTRIBUTE: &str = "label";

/// What one poll saw, recomputed from scratch each tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeObservation {
    root_seen: bool,
    children_seen: BTreeMap<String, bool>,
}

impl TreeObservation {
    fn scan<'a>(
        root: &str,
        children: &BTreeSet<String>,
        labels: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut children_seen: BTreeMap<String, bool> =
            children.iter().map(|c| (c.clone(), false)).collect();
        let mut root_seen = false;
        for label in labels {
            if let Some(seen) = children_seen.get_mut(label) {
                *seen = true;
            }
            if label == root {
                root_seen = true;
            }
        }
        Self {
            root_seen,
            children_seen,
        }
    }

    /// Whether the expected root label was present
    pub fn root_ok(&self) -> bool {
        self.root_seen
    }

    /// Whether every expected child label was present
    pub fn children_ok(&self) -> bool {
        self.children_seen.values().all(|seen| *seen)
    }

    pub fn complete(&self) -> bool {
        self.root_ok() && self.children_ok()
    }

    /// Expected children that were not seen in this poll
    pub fn missing_children(&self) -> Vec<&str> {
        self.children_seen
            .iter()
            .filter(|(_, seen)| !**seen)
            .map(|(label, _)| label.as_str())
            .collect()
    }
}

/// Checks whether the namespace tree has loaded with the expected root and
/// children
#[derive(Debug, Clone)]
pub struct TreeChecker {
    root: String,
    children: BTreeSet<String>,
    last: Option<TreeObservation>,
}

impl TreeChecker {
    pub fn new(root: impl Into<String>, children: impl IntoIterator<Item = String>) -> Self {
        Self {
            root: root.into(),
            children: children.into_iter().collect(),
            last: None,
        }
    }

    /// Evaluate the checker against the labels visible right now.
    ///
    /// Returns true when the root and all expected children are present.
    /// Duplicate labels are idempotent and unrecognized labels are ignored;
    /// an empty scan leaves both aggregate flags false.
    pub fn evaluate<'a>(&mut self, labels: impl IntoIterator<Item = &'a str>) -> bool {
        let observation = TreeObservation::scan(&self.root, &self.children, labels);
        let complete = observation.complete();
        self.last = Some(observation);
        complete
    }

    /// The most recent observation, for post-timeout diagnosis
    pub fn last(&self) -> Option<&TreeObservation> {
        self.last.as_ref()
    }
}

/// The three distinguishable shapes of a tree-load timeout.
///
/// The root node and the child listing come from separate data paths, so
/// keeping them apart tells an operator which backend dependency is
/// unhealthy instead of collapsing everything into one generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFailure {
    /// Neither the root nor any complete child set appeared.
    PageNotLoaded,
    /// The root rendered but at least one expected child is missing.
    RootWithoutChildren,
    /// Every expected child rendered but the root is missing.
    ChildrenWithoutRoot,
}

impl TreeFailure {
    /// Classify a timed-out wait from the last observation's aggregate
    /// flags. Returns None when both flags are true, which means the tree
    /// actually completed.
    pub fn classify(root_ok: bool, children_ok: bool) -> Option<Self> {
        match (root_ok, children_ok) {
            (false, false) => Some(TreeFailure::PageNotLoaded),
            (true, false) => Some(TreeFailure::RootWithoutChildren),
            (false, true) => Some(TreeFailure::ChildrenWithoutRoot),
            (true, true) => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            TreeFailure::PageNotLoaded => "failed to load main page",
            TreeFailure::RootWithoutChildren => "tree loaded with root but no children",
            TreeFailure::ChildrenWithoutRoot => "tree loaded with children but no root",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const ROOT: &str = "ns.dev.v.io:8101";

    fn checker() -> TreeChecker {
        TreeChecker::new(
            ROOT,
            ["applications", "binaries", "proxy"]
                .into_iter()
                .map(String::from),
        )
    }

    #[test]
    fn full_set_evaluates_true() {
        let mut c = checker();
        assert!(c.evaluate([ROOT, "applications", "binaries", "proxy"]));
        let obs = c.last().unwrap();
        assert!(obs.root_ok());
        assert!(obs.children_ok());
    }

    #[test]
    fn missing_root_with_all_children() {
        let mut c = checker();
        assert!(!c.evaluate(["applications", "binaries", "proxy"]));
        let obs = c.last().unwrap();
        assert!(!obs.root_ok());
        assert!(obs.children_ok());
    }

    #[test]
    fn missing_one_child_with_root() {
        // proxy missing
        let mut c = checker();
        assert!(!c.evaluate([ROOT, "applications", "binaries"]));
        let obs = c.last().unwrap();
        assert!(obs.root_ok());
        assert!(!obs.children_ok());
        assert_eq!(obs.missing_children(), vec!["proxy"]);
    }

    #[test]
    fn missing_root_and_child() {
        let mut c = checker();
        assert!(!c.evaluate(["applications", "binaries"]));
        let obs = c.last().unwrap();
        assert!(!obs.root_ok());
        assert!(!obs.children_ok());
    }

    #[test]
    fn empty_scan_leaves_both_flags_false() {
        let mut c = checker();
        let no_nodes: [&str; 0] = [];
        assert!(!c.evaluate(no_nodes));
        let obs = c.last().unwrap();
        assert!(!obs.root_ok());
        assert!(!obs.children_ok());
    }

    #[test]
    fn duplicate_labels_are_idempotent() {
        let mut c = checker();
        assert!(c.evaluate([
            ROOT,
            "applications",
            "applications",
            "binaries",
            "proxy",
            "proxy",
        ]));
    }

    #[test]
    fn unrecognized_labels_are_ignored() {
        let mut c = checker();
        assert!(!c.evaluate(["mounttable", "identity", ROOT]));
        let obs = c.last().unwrap();
        assert!(obs.root_ok());
        assert!(!obs.children_ok());
    }

    #[test]
    fn evaluate_is_idempotent_for_unchanged_input() {
        let mut c = checker();
        let input = [ROOT, "applications", "binaries"];
        assert!(!c.evaluate(input));
        let first = c.last().unwrap().clone();
        assert!(!c.evaluate(input));
        assert_eq!(&first, c.last().unwrap());
    }

    #[test]
    fn stale_results_do_not_carry_over() {
        // A node set that disappears between polls must be re-flagged
        // absent on the next poll.
        let mut c = checker();
        assert!(c.evaluate([ROOT, "applications", "binaries", "proxy"]));
        let no_nodes: [&str; 0] = [];
        assert!(!c.evaluate(no_nodes));
        let obs = c.last().unwrap();
        assert!(!obs.root_ok());
        assert!(!obs.children_ok());
    }

    #[test_case(false, false, Some(TreeFailure::PageNotLoaded))]
    #[test_case(true, false, Some(TreeFailure::RootWithoutChildren))]
    #[test_case(false, true, Some(TreeFailure::ChildrenWithoutRoot))]
    #[test_case(true, true, None)]
    fn classification_table(root_ok: bool, children_ok: bool, expected: Option<TreeFailure>) {
        assert_eq!(TreeFailure::classify(root_ok, children_ok), expected);
    }

    #[test]
    fn classified_messages() {
        assert_eq!(
            TreeFailure::PageNotLoaded.message(),
            "failed to load main page"
        );
        assert_eq!(
            TreeFailure::RootWithoutChildren.message(),
            "tree loaded with root but no children"
        );
        assert_eq!(
            TreeFailure::ChildrenWithoutRoot.message(),
            "tree loaded with children but no root"
        );
    }
}
