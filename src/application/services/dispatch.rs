//! # Report Dispatcher
//!
//! Accepts report and fare-estimate submissions and runs them as background
//! jobs.
//!
//! Submission validates the request, records a `Queued` job, spawns the work
//! and returns a [`JobAcknowledgement`] before any data is fetched. A
//! semaphore bounds how many jobs execute at once; waiting jobs stay queued
//! and submission never blocks on it.
//!
//! Every stage transition is written to the [`JobRepository`]. An error in
//! any stage fails the job at that stage; nothing is retried and nothing is
//! reported back to the submitter except through the job record.
//!
//! ```text
//! report:  Queued → Fetching → Aggregating → Rendering → Notifying → Completed
//! fares:   Queued ───────────→ Aggregating → Rendering → Notifying → Completed
//! ```

use crate::application::error::{ApplicationError, ApplicationResult, InfrastructureError};
use crate::application::services::fare_fanout::{FareFanoutClient, fare_estimates_table};
use crate::application::services::report_strategy::strategy_for;
use crate::domain::entities::{ArtifactKind, JobRecord, JobStatus, ReportArtifact, ReportTable};
use crate::domain::services::area_alias::AreaAliasMap;
use crate::domain::value_objects::{DateRange, GeoPoint, JobId, ReportKind};
use crate::infrastructure::geography::GeographyCatalog;
use crate::infrastructure::notification::{EmailAttachment, Notifier};
use crate::infrastructure::persistence::JobRepository;
use crate::infrastructure::rendering::{ArtifactStore, ReportRenderer};
use crate::infrastructure::transactions::{TransactionQuery, TransactionSource};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{Instrument, error, info, info_span, warn};

/// Default number of jobs executing at once.
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 8;

/// A request for one aggregation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    /// Report selector, e.g. `hourly_orders`.
    pub task_function: String,
    /// Filter key forwarded to the transaction source.
    pub filter_by: String,
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`, inclusive.
    pub end_date: String,
    /// Client the report is generated for.
    pub client_name: String,
}

/// A request for a fare fan-out sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FareEstimateRequest {
    /// Pickup latitude.
    pub pickup_lat: f64,
    /// Pickup longitude.
    pub pickup_lng: f64,
    /// Pricing template identifier.
    pub template: String,
    /// Client the sheet is generated for.
    pub client_name: String,
}

/// Returned to the submitter as soon as a job is queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAcknowledgement {
    /// Identifier to poll.
    pub job_id: JobId,
    /// Human readable status line.
    pub message: String,
}

/// Dispatcher settings.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Jobs executing at once.
    pub max_concurrent: usize,
    /// Address every report is mailed to.
    pub recipient: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT_JOBS,
            recipient: String::new(),
        }
    }
}

/// Collaborators a dispatcher drives.
#[derive(Debug, Clone)]
pub struct PipelinePorts {
    /// Transaction data.
    pub transactions: Arc<dyn TransactionSource>,
    /// Neighborhood catalog for pickup-area reports.
    pub geography: Arc<dyn GeographyCatalog>,
    /// Fare fan-out client.
    pub fares: FareFanoutClient,
    /// Spreadsheet renderer.
    pub renderer: Arc<dyn ReportRenderer>,
    /// Artifact storage.
    pub store: Arc<dyn ArtifactStore>,
    /// Delivery channel.
    pub notifier: Arc<dyn Notifier>,
    /// Job-status store.
    pub jobs: Arc<dyn JobRepository>,
}

#[derive(Debug)]
struct Pipeline {
    ports: PipelinePorts,
    recipient: String,
    slots: Arc<Semaphore>,
}

/// Runs report and fare-estimate jobs in the background.
#[derive(Debug, Clone)]
pub struct ReportDispatcher {
    pipeline: Arc<Pipeline>,
}

impl ReportDispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(ports: PipelinePorts, settings: DispatchSettings) -> Self {
        let slots = Arc::new(Semaphore::new(settings.max_concurrent.max(1)));
        Self {
            pipeline: Arc::new(Pipeline {
                ports,
                recipient: settings.recipient,
                slots,
            }),
        }
    }

    /// Validates and queues a report job.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::UnknownReportKind` if `task_function` names no
    ///   report; no job is recorded
    /// - `ApplicationError::Validation` for malformed dates or
    ///   `start_date > end_date`
    /// - `ApplicationError::Infrastructure` if the job cannot be recorded
    pub async fn submit_report(
        &self,
        request: ReportRequest,
    ) -> ApplicationResult<JobAcknowledgement> {
        let kind: ReportKind = request
            .task_function
            .parse()
            .map_err(|_| ApplicationError::unknown_report_kind(request.task_function.clone()))?;
        let range = parse_range(&request.start_date, &request.end_date)?;
        let query = TransactionQuery::new(request.filter_by, range);

        let job = JobRecord::queued(
            JobId::new_v4(),
            ArtifactKind::Report(kind),
            request.client_name,
        );
        self.pipeline.ports.jobs.insert(&job).await?;
        let job_id = job.job_id();

        let span = info_span!("report_job", %job_id, %kind, client = %job.client_name());
        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(
            async move {
                pipeline.run_report(job, kind, query).await;
            }
            .instrument(span),
        );

        info!(%job_id, %kind, "report job queued");
        Ok(JobAcknowledgement {
            job_id,
            message: format!("{} report is being generated", kind.title()),
        })
    }

    /// Validates and queues a fare fan-out job.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Domain` if the pickup coordinates are out of range
    /// - `ApplicationError::Validation` for an empty template
    /// - `ApplicationError::Infrastructure` if the job cannot be recorded
    pub async fn submit_fare_estimate(
        &self,
        request: FareEstimateRequest,
    ) -> ApplicationResult<JobAcknowledgement> {
        let pickup = GeoPoint::new(request.pickup_lat, request.pickup_lng)?;
        let template = request.template.trim().to_string();
        if template.is_empty() {
            return Err(ApplicationError::validation("template must not be empty"));
        }

        let job = JobRecord::queued(
            JobId::new_v4(),
            ArtifactKind::FareEstimates,
            request.client_name,
        );
        self.pipeline.ports.jobs.insert(&job).await?;
        let job_id = job.job_id();

        let span = info_span!("fare_job", %job_id, client = %job.client_name());
        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(
            async move {
                pipeline.run_fares(job, pickup, template).await;
            }
            .instrument(span),
        );

        info!(%job_id, "fare estimate job queued");
        Ok(JobAcknowledgement {
            job_id,
            message: "Fare estimates are being generated".to_string(),
        })
    }

    /// Returns the current state of a job.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown id.
    pub async fn job(&self, job_id: &JobId) -> ApplicationResult<JobRecord> {
        self.pipeline
            .ports
            .jobs
            .get(job_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Job", job_id.to_string()))
    }

    /// Number of jobs that could start right now.
    #[must_use]
    pub fn available_slots(&self) -> usize {
        self.pipeline.slots.available_permits()
    }
}

impl Pipeline {
    async fn run_report(&self, mut job: JobRecord, kind: ReportKind, query: TransactionQuery) {
        let Ok(_permit) = Arc::clone(&self.slots).acquire_owned().await else {
            self.finish(job, Err(InfrastructureError::task("dispatcher closed").into()))
                .await;
            return;
        };
        let outcome = self.execute_report(&mut job, kind, &query).await;
        self.finish(job, outcome).await;
    }

    async fn run_fares(&self, mut job: JobRecord, pickup: GeoPoint, template: String) {
        let Ok(_permit) = Arc::clone(&self.slots).acquire_owned().await else {
            self.finish(job, Err(InfrastructureError::task("dispatcher closed").into()))
                .await;
            return;
        };
        let outcome = self.execute_fares(&mut job, pickup, &template).await;
        self.finish(job, outcome).await;
    }

    async fn execute_report(
        &self,
        job: &mut JobRecord,
        kind: ReportKind,
        query: &TransactionQuery,
    ) -> ApplicationResult<ReportArtifact> {
        self.transition(job, JobStatus::Fetching).await;
        let records = self.ports.transactions.fetch(query).await?;

        self.transition(job, JobStatus::Aggregating).await;
        let aliases = if kind.uses_pickup_areas() {
            AreaAliasMap::build(&self.ports.geography.load().await?)
        } else {
            AreaAliasMap::default()
        };
        let table = strategy_for(kind, aliases).aggregate(&records);
        info!(records = records.len(), rows = table.len(), "aggregated");

        self.deliver(job, table).await
    }

    async fn execute_fares(
        &self,
        job: &mut JobRecord,
        pickup: GeoPoint,
        template: &str,
    ) -> ApplicationResult<ReportArtifact> {
        self.transition(job, JobStatus::Aggregating).await;
        let results = self.ports.fares.estimate(pickup, template).await;
        let table = fare_estimates_table(&results);

        self.deliver(job, table).await
    }

    /// Renders, persists and sends `table` for `job`.
    async fn deliver(
        &self,
        job: &mut JobRecord,
        table: ReportTable,
    ) -> ApplicationResult<ReportArtifact> {
        self.transition(job, JobStatus::Rendering).await;
        let renderer = Arc::clone(&self.ports.renderer);
        let bytes = tokio::task::spawn_blocking(move || renderer.render(&table))
            .await
            .map_err(|e| InfrastructureError::task(format!("render task failed: {}", e)))??;

        let artifact = self
            .ports
            .store
            .persist(job.job_id(), job.kind(), job.client_name(), &bytes)
            .await?;
        if let Some(name) = artifact.path.file_name() {
            job.attach_artifact(name.to_string_lossy());
        }

        self.transition(job, JobStatus::Notifying).await;
        let attachment = EmailAttachment {
            bytes,
            filename: artifact.attachment_name.clone(),
            subject: format!("{} report for {}", job.kind().title(), job.client_name()),
            recipient: self.recipient.clone(),
        };
        self.ports.notifier.send(&attachment).await?;

        Ok(artifact)
    }

    async fn transition(&self, job: &mut JobRecord, status: JobStatus) {
        job.advance(status);
        self.record(job).await;
    }

    async fn finish(&self, mut job: JobRecord, outcome: ApplicationResult<ReportArtifact>) {
        match outcome {
            Ok(artifact) => {
                job.complete();
                info!(
                    path = %artifact.path.display(),
                    size = artifact.size_bytes,
                    "job completed"
                );
            }
            Err(e) => {
                error!(
                    stage = %job.status(),
                    retryable = e.is_retryable(),
                    error = %e,
                    "job failed"
                );
                job.fail(e.to_string());
            }
        }
        self.record(&job).await;
    }

    /// Job-status writes never abort the pipeline.
    async fn record(&self, job: &JobRecord) {
        if let Err(e) = self.ports.jobs.update(job).await {
            warn!(job_id = %job.job_id(), error = %e, "failed to record job state");
        }
    }
}

fn parse_range(start: &str, end: &str) -> ApplicationResult<DateRange> {
    let parse = |field: &str, value: &str| {
        NaiveDate::parse_from_str(value.trim(), DateRange::FORMAT).map_err(|_| {
            ApplicationError::validation(format!(
                "{} must be YYYY-MM-DD, got '{}'",
                field, value
            ))
        })
    };
    let start = parse("start_date", start)?;
    let end = parse("end_date", end)?;
    DateRange::new(start, end).map_err(|e| ApplicationError::validation(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::fare_fanout::FareFanoutConfig;
    use crate::domain::entities::{FareArea, TransactionRecord};
    use crate::domain::services::area_alias::CatalogEntry;
    use crate::domain::value_objects::ArtifactNaming;
    use crate::infrastructure::geography::StaticGeographyCatalog;
    use crate::infrastructure::http::{UpstreamError, UpstreamResult};
    use crate::infrastructure::notification::{NotificationError, NotificationResult};
    use crate::infrastructure::persistence::InMemoryJobRepository;
    use crate::infrastructure::pricing::{FareEstimator, FareQuote, FareRequest};
    use crate::infrastructure::rendering::{FileSystemArtifactStore, XlsxReportRenderer};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Debug)]
    struct StubSource {
        result: Result<Vec<TransactionRecord>, UpstreamError>,
        gate: Option<Arc<Semaphore>>,
    }

    #[async_trait]
    impl TransactionSource for StubSource {
        async fn fetch(&self, _query: &TransactionQuery) -> UpstreamResult<Vec<TransactionRecord>> {
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await.unwrap();
            }
            self.result.clone()
        }
    }

    #[derive(Debug)]
    struct StubEstimator;

    #[async_trait]
    impl FareEstimator for StubEstimator {
        async fn estimate(&self, request: &FareRequest) -> UpstreamResult<FareQuote> {
            if request.dropoff.lat() > 29.3 {
                Ok(FareQuote {
                    estimated_fare: 1.75,
                    distance: 4200.0,
                })
            } else {
                Err(UpstreamError::server(503, "unavailable"))
            }
        }
    }

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<EmailAttachment>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, attachment: &EmailAttachment) -> NotificationResult<()> {
            if self.fail {
                return Err(NotificationError::transport("relay refused"));
            }
            self.sent.lock().unwrap().push(attachment.clone());
            Ok(())
        }
    }

    struct Harness {
        dispatcher: ReportDispatcher,
        notifier: Arc<RecordingNotifier>,
        _dir: TempDir,
    }

    fn records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new("A", "2025-01-01 09:15:00", json!("1.10"))
                .with_pickup_address("Salmiya block 2"),
            TransactionRecord::new("A", "2025-01-01 09:40:00", json!("bad")),
            TransactionRecord::new("B", "2025-01-01 23:50:00", json!("2.90")),
        ]
    }

    fn harness(source: StubSource, notifier: RecordingNotifier, max_concurrent: usize) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let notifier = Arc::new(notifier);
        let ports = PipelinePorts {
            transactions: Arc::new(source),
            geography: Arc::new(StaticGeographyCatalog::new(vec![
                CatalogEntry::with_aliases("Salmiya"),
            ])),
            fares: FareFanoutClient::new(
                Arc::new(StubEstimator),
                vec![
                    FareArea::new("Kuwait City", "3", GeoPoint::new(29.3759, 47.9774).unwrap()),
                    FareArea::new("Fahaheel", "5", GeoPoint::new(29.0825, 48.1303).unwrap()),
                ],
                FareFanoutConfig::default().with_per_area_timeout(1000),
            ),
            renderer: Arc::new(XlsxReportRenderer::new()),
            store: Arc::new(FileSystemArtifactStore::new(dir.path(), ArtifactNaming::PerJob)),
            notifier: notifier.clone(),
            jobs: Arc::new(InMemoryJobRepository::new()),
        };
        let settings = DispatchSettings {
            max_concurrent,
            recipient: "ops@example.com".to_string(),
        };
        Harness {
            dispatcher: ReportDispatcher::new(ports, settings),
            notifier,
            _dir: dir,
        }
    }

    fn ok_source() -> StubSource {
        StubSource {
            result: Ok(records()),
            gate: None,
        }
    }

    fn report(task: &str) -> ReportRequest {
        ReportRequest {
            task_function: task.to_string(),
            filter_by: "merchant-1".to_string(),
            start_date: "2025-01-01".to_string(),
            end_date: "2025-01-31".to_string(),
            client_name: "acme".to_string(),
        }
    }

    async fn wait_terminal(dispatcher: &ReportDispatcher, job_id: &JobId) -> JobRecord {
        for _ in 0..200 {
            let job = dispatcher.job(job_id).await.unwrap();
            if job.status().is_terminal() {
                return job;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {job_id} did not finish");
    }

    mod submission {
        use super::*;

        #[tokio::test]
        async fn unknown_selector_is_rejected_without_a_job() {
            let h = harness(ok_source(), RecordingNotifier::default(), 2);
            let err = h.dispatcher.submit_report(report("fly_me_to_the_moon")).await.unwrap_err();
            assert!(err.is_unknown_report_kind());
            assert_eq!(h.dispatcher.pipeline.ports.jobs.count().await.unwrap(), 0);
        }

        #[tokio::test]
        async fn inverted_dates_are_rejected() {
            let h = harness(ok_source(), RecordingNotifier::default(), 2);
            let mut request = report("total_fare");
            request.start_date = "2025-02-01".to_string();
            let err = h.dispatcher.submit_report(request).await.unwrap_err();
            assert!(err.is_validation());
        }

        #[tokio::test]
        async fn malformed_dates_are_rejected() {
            let h = harness(ok_source(), RecordingNotifier::default(), 2);
            let mut request = report("total_fare");
            request.end_date = "31/01/2025".to_string();
            assert!(h.dispatcher.submit_report(request).await.unwrap_err().is_validation());
        }

        #[tokio::test]
        async fn out_of_range_pickup_is_rejected() {
            let h = harness(ok_source(), RecordingNotifier::default(), 2);
            let err = h
                .dispatcher
                .submit_fare_estimate(FareEstimateRequest {
                    pickup_lat: 95.0,
                    pickup_lng: 47.0,
                    template: "tpl".to_string(),
                    client_name: "acme".to_string(),
                })
                .await
                .unwrap_err();
            assert!(err.is_validation());
        }

        #[tokio::test]
        async fn unknown_job_is_not_found() {
            let h = harness(ok_source(), RecordingNotifier::default(), 2);
            assert!(h.dispatcher.job(&JobId::new_v4()).await.unwrap_err().is_not_found());
        }
    }

    mod pipeline {
        use super::*;

        #[tokio::test]
        async fn report_job_completes_and_notifies() {
            let h = harness(ok_source(), RecordingNotifier::default(), 2);
            let ack = h.dispatcher.submit_report(report("Hourly-Orders")).await.unwrap();

            let job = wait_terminal(&h.dispatcher, &ack.job_id).await;
            assert_eq!(job.status(), JobStatus::Completed);
            assert!(job.artifact_file().unwrap().contains(&ack.job_id.simple()));

            let sent = h.notifier.sent.lock().unwrap();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].filename, "acme_hourly_orders.xlsx");
            assert_eq!(sent[0].recipient, "ops@example.com");
            assert!(sent[0].bytes.starts_with(b"PK"));
        }

        #[tokio::test]
        async fn pickup_report_loads_catalog() {
            let h = harness(ok_source(), RecordingNotifier::default(), 2);
            let ack = h
                .dispatcher
                .submit_report(report("pickup_counts_per_area"))
                .await
                .unwrap();
            let job = wait_terminal(&h.dispatcher, &ack.job_id).await;
            assert_eq!(job.status(), JobStatus::Completed);
        }

        #[tokio::test]
        async fn fetch_failure_fails_at_fetching() {
            let source = StubSource {
                result: Err(UpstreamError::server(500, "boom")),
                gate: None,
            };
            let h = harness(source, RecordingNotifier::default(), 2);
            let ack = h.dispatcher.submit_report(report("average_fare")).await.unwrap();

            let job = wait_terminal(&h.dispatcher, &ack.job_id).await;
            assert_eq!(job.status(), JobStatus::Failed);
            let failure = job.failure().unwrap();
            assert_eq!(failure.stage, JobStatus::Fetching);
            assert!(failure.reason.contains("500"));
            assert!(h.notifier.sent.lock().unwrap().is_empty());
        }

        #[tokio::test]
        async fn notification_failure_fails_at_notifying() {
            let notifier = RecordingNotifier {
                fail: true,
                ..Default::default()
            };
            let h = harness(ok_source(), notifier, 2);
            let ack = h.dispatcher.submit_report(report("amount_ranges")).await.unwrap();

            let job = wait_terminal(&h.dispatcher, &ack.job_id).await;
            assert_eq!(job.status(), JobStatus::Failed);
            assert_eq!(job.failure().unwrap().stage, JobStatus::Notifying);
            assert!(job.artifact_file().is_some());
        }

        #[tokio::test]
        async fn fare_job_tolerates_failed_areas() {
            let h = harness(ok_source(), RecordingNotifier::default(), 2);
            let ack = h
                .dispatcher
                .submit_fare_estimate(FareEstimateRequest {
                    pickup_lat: 29.33,
                    pickup_lng: 48.07,
                    template: "tpl-1".to_string(),
                    client_name: "acme".to_string(),
                })
                .await
                .unwrap();

            let job = wait_terminal(&h.dispatcher, &ack.job_id).await;
            assert_eq!(job.status(), JobStatus::Completed);
            assert_eq!(job.kind(), ArtifactKind::FareEstimates);
            let sent = h.notifier.sent.lock().unwrap();
            assert_eq!(sent[0].filename, "acme_fare_estimates.xlsx");
        }

        #[tokio::test]
        async fn semaphore_keeps_excess_jobs_queued() {
            let gate = Arc::new(Semaphore::new(0));
            let source = StubSource {
                result: Ok(records()),
                gate: Some(gate.clone()),
            };
            let h = harness(source, RecordingNotifier::default(), 1);

            let first = h.dispatcher.submit_report(report("total_fare")).await.unwrap();
            let second = h.dispatcher.submit_report(report("total_fare")).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;

            let states = [
                h.dispatcher.job(&first.job_id).await.unwrap().status(),
                h.dispatcher.job(&second.job_id).await.unwrap().status(),
            ];
            assert!(states.contains(&JobStatus::Fetching));
            assert!(states.contains(&JobStatus::Queued));
            assert_eq!(h.dispatcher.available_slots(), 0);

            gate.add_permits(2);
            assert_eq!(
                wait_terminal(&h.dispatcher, &first.job_id).await.status(),
                JobStatus::Completed
            );
            assert_eq!(
                wait_terminal(&h.dispatcher, &second.job_id).await.status(),
                JobStatus::Completed
            );
        }
    }

    #[test]
    fn parse_range_accepts_single_day() {
        let range = parse_range("2025-01-05", " 2025-01-05 ").unwrap();
        assert_eq!(range.start(), range.end());
    }
}
