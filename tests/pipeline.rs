//! End-to-end pipeline tests against mocked upstream services.

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use delivery_reports::application::services::{
    DispatchSettings, FareEstimateRequest, FareFanoutClient, FareFanoutConfig, PipelinePorts,
    ReportDispatcher, ReportRequest,
};
use delivery_reports::domain::entities::{FareArea, JobRecord, JobStatus};
use delivery_reports::domain::value_objects::{ArtifactNaming, GeoPoint, JobId};
use delivery_reports::infrastructure::geography::FileGeographyCatalog;
use delivery_reports::infrastructure::http::HttpClient;
use delivery_reports::infrastructure::notification::{
    EmailAttachment, NotificationResult, Notifier,
};
use delivery_reports::infrastructure::persistence::InMemoryJobRepository;
use delivery_reports::infrastructure::pricing::HttpFareEstimator;
use delivery_reports::infrastructure::rendering::{FileSystemArtifactStore, XlsxReportRenderer};
use delivery_reports::infrastructure::transactions::HttpTransactionSource;
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Default)]
struct Outbox {
    sent: Mutex<Vec<EmailAttachment>>,
}

#[async_trait]
impl Notifier for Outbox {
    async fn send(&self, attachment: &EmailAttachment) -> NotificationResult<()> {
        self.sent.lock().unwrap().push(attachment.clone());
        Ok(())
    }
}

struct Service {
    dispatcher: ReportDispatcher,
    outbox: Arc<Outbox>,
    output_dir: PathBuf,
    _dir: TempDir,
}

async fn service(server: &MockServer) -> Service {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("geography.json");
    std::fs::write(
        &catalog,
        json!([
            {"name": "Salmiya", "aliases": "Salmiya, Salmiyah"},
            {"name": "Hawally", "aliases": "Hawally, Hawalli"},
            {"name": "Jabriya"}
        ])
        .to_string(),
    )
    .unwrap();
    let output_dir = dir.path().join("reports");
    let outbox = Arc::new(Outbox::default());

    let ports = PipelinePorts {
        transactions: Arc::new(HttpTransactionSource::new(
            HttpClient::new(2000).unwrap(),
            format!("{}/api/transactions", server.uri()),
        )),
        geography: Arc::new(FileGeographyCatalog::new(catalog)),
        fares: FareFanoutClient::new(
            Arc::new(
                HttpFareEstimator::new(format!("{}/api/fare/estimate", server.uri()), "secret", 2000)
                    .unwrap(),
            ),
            vec![
                FareArea::new("Salmiya", "1", GeoPoint::new(29.3339, 48.0753).unwrap()),
                FareArea::new("Jahra", "2", GeoPoint::new(29.3375, 47.6581).unwrap()),
            ],
            FareFanoutConfig::default().with_per_area_timeout(1000),
        ),
        renderer: Arc::new(XlsxReportRenderer::new()),
        store: Arc::new(FileSystemArtifactStore::new(&output_dir, ArtifactNaming::PerJob)),
        notifier: outbox.clone(),
        jobs: Arc::new(InMemoryJobRepository::new()),
    };
    let dispatcher = ReportDispatcher::new(
        ports,
        DispatchSettings {
            max_concurrent: 2,
            recipient: "ops@example.com".to_string(),
        },
    );
    Service {
        dispatcher,
        outbox,
        output_dir,
        _dir: dir,
    }
}

async fn mount_transactions(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/transactions"))
        .and(query_param("filter_by", "merchant-7"))
        .and(query_param("start_date", "2025-02-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"user_name": "alice", "created_at": "2025-02-01 08:05:00", "amount": "1.500",
             "pickup_task": {"address": "Block 4, SALMIYAH"}},
            {"user_name": "alice", "created_at": "2025-02-01 08:45:00", "amount": 2.5,
             "pickup_task": {"address": "Hawalli street 9"}},
            {"user_name": "bob", "created_at": "2025-02-02 19:10:00", "amount": "7"},
            {"user_name": "carol", "created_at": null, "amount": "3.25"},
            {"created_at": "2025-02-03 10:00:00", "amount": "1"}
        ])))
        .mount(server)
        .await;
}

fn report(task: &str) -> ReportRequest {
    ReportRequest {
        task_function: task.to_string(),
        filter_by: "merchant-7".to_string(),
        start_date: "2025-02-01".to_string(),
        end_date: "2025-02-28".to_string(),
        client_name: "Acme Foods".to_string(),
    }
}

async fn wait_terminal(dispatcher: &ReportDispatcher, job_id: &JobId) -> JobRecord {
    for _ in 0..300 {
        let job = dispatcher.job(job_id).await.unwrap();
        if job.status().is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not finish", job_id);
}

#[tokio::test]
async fn report_is_rendered_stored_and_mailed() {
    let server = MockServer::start().await;
    mount_transactions(&server).await;
    let svc = service(&server).await;

    let ack = svc
        .dispatcher
        .submit_report(report("pickup_counts_per_area"))
        .await
        .unwrap();
    let job = wait_terminal(&svc.dispatcher, &ack.job_id).await;

    assert_eq!(job.status(), JobStatus::Completed, "{:?}", job.failure());
    let file = job.artifact_file().unwrap();
    assert!(file.starts_with("Acme_Foods_pickup_counts_per_area_"));
    let on_disk = std::fs::read(svc.output_dir.join(file)).unwrap();
    assert!(on_disk.starts_with(b"PK\x03\x04"));

    let sent = svc.outbox.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "ops@example.com");
    assert_eq!(sent[0].filename, "Acme_Foods_pickup_counts_per_area.xlsx");
    assert_eq!(sent[0].bytes.as_ref(), on_disk.as_slice());
}

#[tokio::test]
async fn concurrent_jobs_for_one_client_do_not_collide() {
    let server = MockServer::start().await;
    mount_transactions(&server).await;
    let svc = service(&server).await;

    let first = svc.dispatcher.submit_report(report("total_fare")).await.unwrap();
    let second = svc.dispatcher.submit_report(report("total_fare")).await.unwrap();
    let a = wait_terminal(&svc.dispatcher, &first.job_id).await;
    let b = wait_terminal(&svc.dispatcher, &second.job_id).await;

    assert_eq!(a.status(), JobStatus::Completed);
    assert_eq!(b.status(), JobStatus::Completed);
    assert_ne!(a.artifact_file(), b.artifact_file());
    assert_eq!(std::fs::read_dir(&svc.output_dir).unwrap().count(), 2);
}

#[tokio::test]
async fn upstream_failure_fails_job_at_fetching() {
    let server = MockServer::start().await;
    Mock::given(path("/api/transactions"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let svc = service(&server).await;

    let ack = svc.dispatcher.submit_report(report("hourly_orders")).await.unwrap();
    let job = wait_terminal(&svc.dispatcher, &ack.job_id).await;

    assert_eq!(job.status(), JobStatus::Failed);
    assert_eq!(job.failure().unwrap().stage, JobStatus::Fetching);
    assert!(svc.outbox.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fare_sheet_keeps_failed_areas() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/fare/estimate"))
        .and(body_partial_json(json!({"template_id": "std", "dropoff": {"lat": 29.3339}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"estimated_fare": 1.25, "distance": 5300.0})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/fare/estimate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let svc = service(&server).await;

    let ack = svc
        .dispatcher
        .submit_fare_estimate(FareEstimateRequest {
            pickup_lat: 29.37,
            pickup_lng: 47.97,
            template: "std".to_string(),
            client_name: "Acme Foods".to_string(),
        })
        .await
        .unwrap();
    let job = wait_terminal(&svc.dispatcher, &ack.job_id).await;

    assert_eq!(job.status(), JobStatus::Completed, "{:?}", job.failure());
    let sent = svc.outbox.sent.lock().unwrap();
    assert_eq!(sent[0].filename, "Acme_Foods_fare_estimates.xlsx");
}
