//! Verification pipeline
//!
//! ingest -> fan out to check runners -> aggregate -> (persist, timeline)
//!
//! Every enabled runner runs as its own tokio task with its own time
//! budget. A runner that errors, panics or overruns becomes a warning for
//! that check; the rest of the verification carries on. When the request
//! budget runs out the remaining runners are aborted and the outcome is
//! sent to manual review.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info, warn};
use tokio::task::JoinSet;

use super::aggregator::Aggregator;
use super::checks::{
    CategoryCheck, CheckRunner, DuplicateCheck, FakeImageCheck, InternetSearchCheck,
    LocationCheck, MetadataCheck,
};
use super::ingest;
use crate::config::Config;
use crate::core::error::{CheckExecutionError, ValidationError};
use crate::core::models::{
    CheckKind, CheckResult, ExtraData, TimelineEvent, VerificationOutcome, VerificationRecord,
    VerificationRequest, VerificationStatus, VerificationSubmission,
};
use crate::core::ports::{
    HashRegistry, ImageSource, OutcomeStore, ReverseImageSearch, TimelineStore,
};

/// Confidence given to a check that could not complete
pub const DEGRADED_CONFIDENCE: f64 = 0.5;

/// Runs the checks for one request and decides
pub struct Verifier {
    config: Arc<Config>,
    runners: Vec<Arc<dyn CheckRunner>>,
    aggregator: Aggregator,
    store: Option<Arc<dyn OutcomeStore>>,
    timeline: Option<Arc<dyn TimelineStore>>,
    check_timeout: Duration,
    request_timeout: Duration,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("runners", &self.runners.iter().map(|r| r.kind()).collect::<Vec<_>>())
            .field("store", &self.store.is_some())
            .field("timeline", &self.timeline.is_some())
            .field("check_timeout", &self.check_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl Verifier {
    /// A verifier with no runners; add them with [`Verifier::with_runner`]
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        let aggregator = Aggregator::new(config.thresholds, config.checks.clone());
        let check_timeout = config.limits.check_timeout();
        let request_timeout = config.limits.request_timeout();
        Self {
            config,
            runners: Vec::new(),
            aggregator,
            store: None,
            timeline: None,
            check_timeout,
            request_timeout,
        }
    }

    /// A verifier with the standard heuristic runners
    #[must_use]
    pub fn with_default_runners(
        config: Arc<Config>,
        images: Arc<dyn ImageSource>,
        registry: Arc<dyn HashRegistry>,
        search: Arc<dyn ReverseImageSearch>,
    ) -> Self {
        if !config.features.mock_ai {
            warn!("No inference model is available; using heuristic checks");
        }
        let thresholds = config.thresholds;
        Self::new(config)
            .with_runner(Arc::new(FakeImageCheck::new(Arc::clone(&images))))
            .with_runner(Arc::new(DuplicateCheck::new(
                Arc::clone(&images),
                registry,
                thresholds.duplicate,
            )))
            .with_runner(Arc::new(MetadataCheck::new(Arc::clone(&images))))
            .with_runner(Arc::new(LocationCheck::new(
                Arc::clone(&images),
                thresholds.location_radius_meters,
            )))
            .with_runner(Arc::new(CategoryCheck))
            .with_runner(Arc::new(InternetSearchCheck::new(images, search)))
    }

    /// Register a runner; a later runner of the same kind replaces an earlier one
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn CheckRunner>) -> Self {
        let kind = runner.kind();
        self.runners.retain(|r| r.kind() != kind);
        self.runners.push(runner);
        self
    }

    /// Persist every outcome to this store
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn OutcomeStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Append a timeline event for every outcome
    #[must_use]
    pub fn with_timeline(mut self, timeline: Arc<dyn TimelineStore>) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Override the per-check and per-request budgets
    #[must_use]
    pub const fn with_timeouts(mut self, check: Duration, request: Duration) -> Self {
        self.check_timeout = check;
        self.request_timeout = request;
        self
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ingest and verify a raw submission
    pub async fn verify_submission(
        &self,
        submission: VerificationSubmission,
    ) -> Result<VerificationOutcome, ValidationError> {
        let request = ingest::ingest(submission, &self.config.limits)?;
        Ok(self.verify(&request).await)
    }

    /// Verify a validated request
    pub async fn verify(&self, request: &VerificationRequest) -> VerificationOutcome {
        let started = Instant::now();
        let issue_id = request.issue_id();
        let shared = Arc::new(request.clone());

        let mut results = Vec::with_capacity(CheckKind::ALL.len());
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::new();

        for kind in CheckKind::ALL {
            if !self.config.checks.is_enabled(kind, &self.config.features) {
                results.push(CheckResult::skipped(kind));
                continue;
            }
            let Some(runner) = self.runners.iter().find(|r| r.kind() == kind) else {
                debug!("issue {issue_id}: no runner registered for {kind}");
                results.push(CheckResult::skipped(kind));
                continue;
            };

            let runner = Arc::clone(runner);
            let request = Arc::clone(&shared);
            let budget = self.check_timeout;
            let handle = tasks.spawn(async move {
                tokio::time::timeout(budget, runner.evaluate(&request))
                    .await
                    .unwrap_or(Err(CheckExecutionError::Timeout {
                        check: kind,
                        after: budget,
                    }))
            });
            pending.insert(handle.id(), kind);
        }

        let deadline = tokio::time::Instant::now() + self.request_timeout;
        let mut timed_out = false;
        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next_with_id()).await {
                Ok(None) => break,
                Ok(Some(Ok((id, result)))) => {
                    let Some(kind) = pending.remove(&id) else { continue };
                    results.push(settle(issue_id, kind, result));
                }
                Ok(Some(Err(join_error))) => {
                    let Some(kind) = pending.remove(&join_error.id()) else { continue };
                    let err = CheckExecutionError::Aborted {
                        check: kind,
                        reason: join_error.to_string(),
                    };
                    results.push(settle(issue_id, kind, Err(err)));
                }
                Err(_) => {
                    timed_out = true;
                    tasks.abort_all();
                    break;
                }
            }
        }

        let unfinished = pending.len();
        for kind in pending.into_values() {
            let err = CheckExecutionError::Timeout {
                check: kind,
                after: self.request_timeout,
            };
            results.push(settle(issue_id, kind, Err(err)));
        }

        let mut outcome =
            self.aggregator.aggregate(issue_id, results, started.elapsed(), Utc::now());
        if timed_out {
            warn!("issue {issue_id}: request budget exhausted with {unfinished} check(s) unfinished");
            // a failure that already arrived still rejects
            if outcome.rejection_reasons.is_empty() {
                outcome.status = VerificationStatus::NeedsReview;
            }
            outcome.warnings.push(format!(
                "Verification timed out after {}s; {unfinished} check(s) did not finish",
                self.request_timeout.as_secs_f64()
            ));
        }

        info!(
            "issue {issue_id}: {} (confidence {:.2}, {}ms)",
            outcome.status, outcome.confidence_score, outcome.processing_time_ms
        );
        let mut record = VerificationRecord::from(&outcome);
        attach_context(&mut record, request.extra_data());
        self.persist(&record);
        if let Some(timeline) = &self.timeline {
            let mut event = TimelineEvent::from(&outcome);
            event.image_urls = request.image_urls().to_vec();
            append_event(timeline.as_ref(), &event);
        }
        outcome
    }

    fn persist(&self, record: &VerificationRecord) {
        if let Some(store) = &self.store
            && let Err(e) = store.save(record)
        {
            warn!("issue {}: failed to persist verification: {e:#}", record.issue_id);
        }
    }
}

/// Carry caller-supplied context into the persisted record
pub(crate) fn attach_context(record: &mut VerificationRecord, context: &ExtraData) {
    if !context.is_empty() {
        let object = context.clone().into_iter().collect::<serde_json::Map<_, _>>();
        record.extra_data.insert("context".into(), serde_json::Value::Object(object));
    }
}

/// Record a timeline event; a failed write only costs the event
pub(crate) fn append_event(timeline: &dyn TimelineStore, event: &TimelineEvent) {
    if let Err(e) = timeline.append(event) {
        warn!("issue {}: failed to record {}: {e:#}", event.issue_id, event.event_type);
    }
}

/// Turn a runner's return value into a result, degrading errors to warnings
fn settle(
    issue_id: u64,
    kind: CheckKind,
    result: Result<CheckResult, CheckExecutionError>,
) -> CheckResult {
    match result {
        Ok(mut r) => {
            // a runner may only speak for itself
            r.check = kind;
            debug!("issue {issue_id}: {kind} -> {} ({:.2})", r.status, r.confidence);
            r
        }
        Err(err) => {
            warn!("issue {issue_id}: {err}");
            CheckResult::warning(kind, DEGRADED_CONFIDENCE, format!("{kind} could not complete: {err}"))
                .with_extra("error", err.to_string())
        }
    }
}
