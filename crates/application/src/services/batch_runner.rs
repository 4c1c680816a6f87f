//! Sequential, paced batch resolution
//!
//! Processes one partition (`offset`/`limit`) of the input in order, waits a
//! fixed delay after every item that touched the network, and renews routing
//! credentials every `token_refresh_interval` resolved items. Flagged and
//! failed items are tallied and never stop the run.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use domain::entities::{PointOfInterest, ResolvedLocation};
use domain::value_objects::DistanceSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::ResolvedLocationStorePort;
use crate::services::location_resolver::{LocationResolver, Resolution};
use crate::services::name_index::{ResumeIndex, names_match};

/// Batch pacing and partitioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Pause after each processed item in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Index of the first item of this partition
    #[serde(default)]
    pub offset: usize,

    /// Maximum number of items in this partition (all remaining when unset)
    #[serde(default)]
    pub limit: Option<usize>,

    /// Renew routing credentials after this many resolved items (0 disables)
    #[serde(default = "default_token_refresh_interval")]
    pub token_refresh_interval: usize,

    /// Skip items already present in the output store
    #[serde(default = "default_skip_existing")]
    pub skip_existing: bool,
}

const fn default_delay_ms() -> u64 {
    200
}

const fn default_token_refresh_interval() -> usize {
    200
}

const fn default_skip_existing() -> bool {
    true
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            offset: 0,
            limit: None,
            token_refresh_interval: default_token_refresh_interval(),
            skip_existing: default_skip_existing(),
        }
    }
}

impl BatchConfig {
    /// Create a configuration suitable for testing (no pacing)
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            delay_ms: 0,
            ..Default::default()
        }
    }

    /// Pause after each item
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// The slice of `items` this partition covers
    #[must_use]
    pub fn partition<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = self
            .limit
            .map_or(items.len(), |limit| start.saturating_add(limit).min(items.len()));
        &items[start..end]
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.limit == Some(0) {
            return Err("limit must be greater than 0 when set".to_string());
        }
        if self.delay_ms > 60_000 {
            return Err("delay_ms must not exceed 60000".to_string());
        }
        Ok(())
    }
}

/// Category of a failed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Malformed input item
    Input,
    /// Lookup service fault after retries
    Lookup,
    /// Writing the result failed
    Persistence,
}

impl FailureKind {
    fn of(error: &ApplicationError) -> Self {
        if error.is_persistence() {
            Self::Persistence
        } else if error.is_input_error() {
            Self::Input
        } else {
            Self::Lookup
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "input",
            Self::Lookup => "lookup",
            Self::Persistence => "persistence",
        })
    }
}

/// An item that was flagged for manual attention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedItem {
    /// Point-of-interest identifier
    pub poi_id: String,
    /// Point-of-interest name
    pub name: String,
    /// Reason text
    pub reason: String,
}

/// An item that failed with an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErroredItem {
    /// Point-of-interest identifier
    pub poi_id: String,
    /// Point-of-interest name
    pub name: String,
    /// Error category
    pub kind: FailureKind,
    /// Error message
    pub reason: String,
}

/// Resolved item whose provider name differs from the input name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMismatch {
    /// Point-of-interest identifier
    pub poi_id: String,
    /// Name from the input
    pub name: String,
    /// Name reported by the geocoding provider
    pub provider_name: String,
}

/// Tally of a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Items in this partition
    pub total: usize,
    /// Items resolved and persisted
    pub resolved: usize,
    /// Resolved items with a routed distance
    pub routed: usize,
    /// Resolved items with an estimated distance
    pub estimated: usize,
    /// Items flagged for manual attention
    pub flagged: usize,
    /// Items that failed with an error
    pub errored: usize,
    /// Items skipped because they were already resolved
    pub skipped: usize,
    /// Flagged items with reasons
    pub flagged_items: Vec<FlaggedItem>,
    /// Errored items with reasons
    pub errored_items: Vec<ErroredItem>,
    /// Resolved items whose provider name looks different
    pub name_mismatches: Vec<NameMismatch>,
    /// Start of the run
    pub started_at: DateTime<Utc>,
    /// End of the run
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    fn new(total: usize) -> Self {
        let now = Utc::now();
        Self {
            total,
            resolved: 0,
            routed: 0,
            estimated: 0,
            flagged: 0,
            errored: 0,
            skipped: 0,
            flagged_items: Vec::new(),
            errored_items: Vec::new(),
            name_mismatches: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Number of items handled so far
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.resolved + self.flagged + self.errored + self.skipped
    }

    /// Whether any item needs attention
    #[must_use]
    pub const fn has_problems(&self) -> bool {
        self.flagged > 0 || self.errored > 0
    }

    /// Number of errored items caused by the output store
    #[must_use]
    pub fn persistence_failures(&self) -> usize {
        self.errored_items
            .iter()
            .filter(|item| item.kind == FailureKind::Persistence)
            .count()
    }

    /// One-line tally
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{} items: {} resolved ({} routed, {} estimated), {} flagged, {} errored, {} skipped",
            self.total,
            self.resolved,
            self.routed,
            self.estimated,
            self.flagged,
            self.errored,
            self.skipped
        )
    }

    fn record_resolved(&mut self, location: &ResolvedLocation) {
        self.resolved += 1;
        match location.source {
            DistanceSource::Routed => self.routed += 1,
            DistanceSource::Estimated => self.estimated += 1,
        }
    }

    fn record_flagged(&mut self, poi: &PointOfInterest, reason: impl Into<String>) {
        self.flagged += 1;
        self.flagged_items.push(FlaggedItem {
            poi_id: poi.id.clone(),
            name: poi.name.clone(),
            reason: reason.into(),
        });
    }

    fn record_error(&mut self, poi: &PointOfInterest, error: &ApplicationError) {
        self.errored += 1;
        self.errored_items.push(ErroredItem {
            poi_id: poi.id.clone(),
            name: poi.name.clone(),
            kind: FailureKind::of(error),
            reason: error.to_string(),
        });
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary_line())?;

        if !self.flagged_items.is_empty() {
            writeln!(f, "\nFlagged:")?;
            for item in &self.flagged_items {
                writeln!(f, "  - {} ({}): {}", item.name, item.poi_id, item.reason)?;
            }
        }

        if !self.errored_items.is_empty() {
            writeln!(f, "\nErrored:")?;
            for item in &self.errored_items {
                writeln!(
                    f,
                    "  - {} ({}) [{}]: {}",
                    item.name, item.poi_id, item.kind, item.reason
                )?;
            }
        }

        if !self.name_mismatches.is_empty() {
            writeln!(f, "\nName mismatches (check manually):")?;
            for item in &self.name_mismatches {
                writeln!(
                    f,
                    "  - {} ({}): provider says \"{}\"",
                    item.name, item.poi_id, item.provider_name
                )?;
            }
        }

        Ok(())
    }
}

/// Runs the resolver over a partition of points of interest
pub struct BatchRunner {
    resolver: LocationResolver,
    store: Arc<dyn ResolvedLocationStorePort>,
    config: BatchConfig,
}

impl fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchRunner")
            .field("resolver", &self.resolver)
            .field("store", &"<ResolvedLocationStorePort>")
            .field("config", &self.config)
            .finish()
    }
}

impl BatchRunner {
    /// Create a batch runner
    #[must_use]
    pub fn new(resolver: LocationResolver, store: Arc<dyn ResolvedLocationStorePort>) -> Self {
        Self {
            resolver,
            store,
            config: BatchConfig::default(),
        }
    }

    /// Override the batch configuration
    #[must_use]
    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Batch configuration in use
    #[must_use]
    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process this runner's partition of `items`
    ///
    /// # Errors
    ///
    /// Only fails when the bulk pre-read of existing rows fails; per-item
    /// failures are recorded in the report.
    #[instrument(skip(self, items), fields(input = items.len(), offset = self.config.offset))]
    pub async fn run(&self, items: &[PointOfInterest]) -> Result<BatchReport, ApplicationError> {
        let partition = self.config.partition(items);
        let mut report = BatchReport::new(partition.len());

        let mut index = if self.config.skip_existing {
            let existing = self.store.load_existing().await?;
            debug!(existing = existing.len(), "Loaded existing rows");
            ResumeIndex::from_entries(existing)
        } else {
            ResumeIndex::new()
        };

        info!(
            items = partition.len(),
            stations = self.resolver.locator().located_count(),
            "Starting batch"
        );

        let mut since_refresh = 0usize;

        for (position, poi) in partition.iter().enumerate() {
            if self.config.skip_existing && index.contains(poi) {
                if let Some(stored_name) = index.renamed_from(poi) {
                    warn!(
                        poi_id = %poi.id,
                        name = %poi.name,
                        %stored_name,
                        "Stored row has a different name"
                    );
                }
                debug!(poi_id = %poi.id, name = %poi.name, "Already resolved, skipping");
                report.skipped += 1;
                continue;
            }

            let interval = self.config.token_refresh_interval;
            if interval > 0 && since_refresh >= interval {
                match self.resolver.refresh_credentials().await {
                    Ok(()) => info!(after = since_refresh, "Routing credentials renewed"),
                    Err(e) => warn!(error = %e, "Routing credential renewal failed"),
                }
                since_refresh = 0;
            }

            match self.resolver.resolve(poi).await {
                Ok(Resolution::Resolved(location)) => {
                    since_refresh += 1;

                    match self.store.save(&location).await {
                        Ok(()) => {
                            check_name(poi, &location, &mut report);
                            info!(
                                poi_id = %poi.id,
                                name = %poi.name,
                                summary = %location.summary(),
                                "Resolved"
                            );
                            report.record_resolved(&location);
                            index.insert_resolved(&location);
                        },
                        Err(e) => {
                            error!(poi_id = %poi.id, name = %poi.name, error = %e, "Failed to save");
                            report.record_error(poi, &e);
                        },
                    }
                },
                Ok(Resolution::Flagged { reason }) => {
                    warn!(poi_id = %poi.id, name = %poi.name, %reason, "Flagged");
                    report.record_flagged(poi, reason.as_str());
                },
                Err(e) => {
                    warn!(poi_id = %poi.id, name = %poi.name, error = %e, "Failed to resolve");
                    report.record_error(poi, &e);
                },
            }

            debug!(
                processed = report.processed(),
                total = report.total,
                "Progress"
            );

            if self.config.delay_ms > 0 && position + 1 < partition.len() {
                tokio::time::sleep(self.config.delay()).await;
            }
        }

        report.finished_at = Utc::now();
        info!(
            resolved = report.resolved,
            flagged = report.flagged,
            errored = report.errored,
            skipped = report.skipped,
            "Batch finished"
        );

        Ok(report)
    }
}

/// Record a mismatch between the input name and the provider's name
fn check_name(poi: &PointOfInterest, location: &ResolvedLocation, report: &mut BatchReport) {
    let Some(provider_name) = &location.provider_name else {
        return;
    };
    if !names_match(&poi.name, provider_name) {
        warn!(
            poi_id = %poi.id,
            name = %poi.name,
            %provider_name,
            "Provider name differs from input"
        );
        report.name_mismatches.push(NameMismatch {
            poi_id: poi.id.clone(),
            name: poi.name.clone(),
            provider_name: provider_name.clone(),
        });
    }
}
