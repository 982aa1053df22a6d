//! Per-locale resource bundles and the reconciliation of observed labels
//! against what each bundle already contained.
//!
//! A bundle goes through three stages during a run:
//!
//! 1. **Loaded**: `baseline` holds the file content, all buckets are empty.
//! 2. **Observing**: every extracted label is fed to every bundle via
//!    [`LabelSink::observe`], filling `new_entries` and `reused_entries`.
//! 3. **Finalized**: once every template was walked, [`ResourceBundle::finalize`]
//!    derives `stale_entries` and adds the default entries. Only then is it written.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use tracing::debug;

use super::label::DATE_TIME_FORMAT_KEY;

/// Value forced into every bundle that lacks a `date_time_format` entry.
pub const DEFAULT_DATE_TIME_FORMAT: &str = "yyyy-MM-dd HH:mm:ss z";

/// Sorted key/value entries of a bundle bucket.
pub type Entries = BTreeMap<String, String>;

/// Receiver of `(label, value)` pairs emitted by the document walker.
pub trait LabelSink {
    fn observe(&mut self, label: &str, value: &str);
}

/// One locale's message file and the buckets derived from it during a run.
#[derive(Debug, Clone)]
pub struct ResourceBundle {
    locale: String,
    source_path: PathBuf,
    baseline: Entries,
    new_entries: Entries,
    reused_entries: Entries,
    stale_entries: Entries,
    conflicts: Vec<String>,
    finalized: bool,
}

impl ResourceBundle {
    pub fn new(locale: impl Into<String>, source_path: impl Into<PathBuf>, baseline: Entries) -> Self {
        Self {
            locale: locale.into(),
            source_path: source_path.into(),
            baseline,
            new_entries: Entries::new(),
            reused_entries: Entries::new(),
            stale_entries: Entries::new(),
            conflicts: Vec::new(),
            finalized: false,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Entries loaded from disk before the run.
    pub fn baseline(&self) -> &Entries {
        &self.baseline
    }

    /// Observed labels that the baseline did not contain.
    pub fn new_entries(&self) -> &Entries {
        &self.new_entries
    }

    /// Observed labels already present in the baseline, with their observed value.
    pub fn reused_entries(&self) -> &Entries {
        &self.reused_entries
    }

    /// Baseline entries nobody observed. Empty until [`finalize`](Self::finalize).
    pub fn stale_entries(&self) -> &Entries {
        &self.stale_entries
    }

    /// One message per label whose observed value differs from the baseline.
    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Derives the stale bucket and adds the default entries.
    ///
    /// Must run after every template was walked; later calls are no-ops.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }

        self.stale_entries = self
            .baseline
            .iter()
            .filter(|(key, _)| !self.reused_entries.contains_key(*key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if !self.baseline.contains_key(DATE_TIME_FORMAT_KEY) {
            self.new_entries.insert(
                DATE_TIME_FORMAT_KEY.to_string(),
                DEFAULT_DATE_TIME_FORMAT.to_string(),
            );
        }

        self.finalized = true;
    }
}

impl LabelSink for ResourceBundle {
    fn observe(&mut self, label: &str, value: &str) {
        let Some(baseline_value) = self.baseline.get(label) else {
            self.new_entries.insert(label.to_string(), value.to_string());
            return;
        };

        let first_reuse = self
            .reused_entries
            .insert(label.to_string(), value.to_string())
            .is_none();

        if first_reuse && baseline_value != value {
            debug!(locale = %self.locale, label, "value differs from existing entry");
            self.conflicts.push(conflict_message(label, baseline_value, value));
        }
    }
}

/// Feeds every observation to all bundles, so all locales track the same labels.
impl LabelSink for [ResourceBundle] {
    fn observe(&mut self, label: &str, value: &str) {
        for bundle in self.iter_mut() {
            bundle.observe(label, value);
        }
    }
}

impl LabelSink for Vec<ResourceBundle> {
    fn observe(&mut self, label: &str, value: &str) {
        self.as_mut_slice().observe(label, value);
    }
}

/// Observations held back until their template was written successfully.
#[derive(Debug, Default)]
pub struct PendingLabels {
    labels: Vec<(String, String)>,
}

impl PendingLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct labels among the pending observations.
    pub fn distinct_labels(&self) -> usize {
        self.labels
            .iter()
            .map(|(label, _)| label.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Replays the observations, in order, into `sink`.
    pub fn commit<S: LabelSink + ?Sized>(self, sink: &mut S) {
        for (label, value) in self.labels {
            sink.observe(&label, &value);
        }
    }
}

impl LabelSink for PendingLabels {
    fn observe(&mut self, label: &str, value: &str) {
        self.labels.push((label.to_string(), value.to_string()));
    }
}

fn conflict_message(label: &str, existing: &str, observed: &str) -> String {
    format!(
        "Property: \"{}\" already exist with value: \"{}\", the new value would have been: \"{}\"",
        label, existing, observed
    )
}
