//! Job lifecycle through `ScrapeService` with a scripted lane pool

use kodegen_tools_screener::{JobError, JobStatus, ScrapeConfig, ScrapeService};
use std::time::Duration;

mod common;
use common::{FakeLauncher, PageScript, test_config, wait_for_terminal};

#[tokio::test(start_paused = true)]
async fn two_pages_merge_into_three_lines() {
    let launcher = FakeLauncher::new([
        (1, PageScript::Identifiers(vec!["AAA", "BBB"])),
        (21, PageScript::Identifiers(vec!["BBB", "CCC"])),
    ]);
    let log = launcher.log.clone();
    let service = ScrapeService::new(test_config(40, 20, 2), launcher);

    let id = service.start("nyse").await.to_string();
    let snapshot = wait_for_terminal(&service, &id).await;
    assert_eq!(snapshot.status, JobStatus::Done);
    assert_eq!(snapshot.progress, 100);
    assert!(snapshot.error.is_none());

    // One batch, both offsets, one per lane
    let mut fetches = log.fetches();
    fetches.sort();
    assert_eq!(fetches, vec![(0, 1), (1, 21)]);

    let download = service.download(&id).await.unwrap();
    assert_eq!(download.body, "AAA\nBBB\nCCC");
    assert_eq!(download.file_name(), "nyse-tickers.csv");

    // Download consumes the job
    assert_eq!(service.status(&id).await, Err(JobError::NotFound));
    assert_eq!(service.download(&id).await, Err(JobError::NotFound));
}

#[tokio::test(start_paused = true)]
async fn timed_out_page_is_isolated() {
    let launcher = FakeLauncher::new([
        (1, PageScript::Hang),
        (21, PageScript::Identifiers(vec!["X"])),
    ]);
    let service = ScrapeService::new(test_config(40, 20, 2), launcher);

    let id = service.start("nyse").await.to_string();
    let snapshot = wait_for_terminal(&service, &id).await;
    assert_eq!(snapshot.status, JobStatus::Done);

    let download = service.download(&id).await.unwrap();
    assert_eq!(download.body, "X");
}

#[tokio::test(start_paused = true)]
async fn failed_pages_still_complete_the_job() {
    let launcher = FakeLauncher::new([
        (1, PageScript::Fail("net::ERR_CONNECTION_RESET")),
        (21, PageScript::Fail("navigation refused")),
    ]);
    let service = ScrapeService::new(test_config(40, 20, 2), launcher);

    let id = service.start("nyse").await.to_string();
    let snapshot = wait_for_terminal(&service, &id).await;
    assert_eq!(snapshot.status, JobStatus::Done);
    assert_eq!(snapshot.progress, 100);

    let download = service.download(&id).await.unwrap();
    assert_eq!(download.body, "");
}

#[tokio::test(start_paused = true)]
async fn pool_launch_failure_ends_in_error() {
    let service = ScrapeService::new(
        test_config(40, 20, 2),
        FakeLauncher::failing("chrome not found"),
    );

    let id = service.start("nyse").await.to_string();
    let snapshot = wait_for_terminal(&service, &id).await;
    assert_eq!(snapshot.status, JobStatus::Error);
    let error = snapshot.error.expect("error description");
    assert!(error.contains("chrome not found"), "{error}");

    // Record stays until reaped, and never has a result
    assert_eq!(service.download(&id).await, Err(JobError::NotReady));
    assert!(service.status(&id).await.is_ok());
    let record = service.registry().get(&id.parse().unwrap()).await.unwrap();
    assert!(record.result.is_none());
}

#[tokio::test(start_paused = true)]
async fn panicking_lane_is_captured_as_error() {
    let launcher = FakeLauncher::new([(1, PageScript::Panic)]);
    let service = ScrapeService::new(test_config(20, 20, 1), launcher);

    let id = service.start("nyse").await.to_string();
    let snapshot = wait_for_terminal(&service, &id).await;
    assert_eq!(snapshot.status, JobStatus::Error);
    assert!(snapshot.error.unwrap().contains("panicked"));
}

#[tokio::test(start_paused = true)]
async fn download_before_done_is_not_ready() {
    let launcher = FakeLauncher::new([(1, PageScript::Identifiers(vec!["AAA"]))])
        .with_latency(Duration::from_secs(5));
    let service = ScrapeService::new(test_config(20, 20, 1), launcher);

    let id = service.start("nyse").await.to_string();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(
        service.status(&id).await.unwrap().status,
        JobStatus::Processing
    );
    assert_eq!(service.download(&id).await, Err(JobError::NotReady));

    wait_for_terminal(&service, &id).await;
    assert_eq!(service.download(&id).await.unwrap().body, "AAA");
}

#[tokio::test(start_paused = true)]
async fn progress_never_decreases() {
    let launcher = FakeLauncher::default().with_latency(Duration::from_millis(700));
    let service = ScrapeService::new(test_config(100, 10, 2), launcher);

    let id = service.start("nyse").await.to_string();
    let mut seen = Vec::new();
    loop {
        let snapshot = service.status(&id).await.unwrap();
        seen.push(snapshot.progress);
        if snapshot.status == JobStatus::Done {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert_eq!(seen.last(), Some(&100));
    // Intermediate batch boundaries were observed
    assert!(seen.iter().any(|p| *p > 0 && *p < 100), "{seen:?}");
}

#[tokio::test(start_paused = true)]
async fn unknown_ids_are_not_found() {
    let service = ScrapeService::new(test_config(20, 20, 1), FakeLauncher::default());
    assert_eq!(service.status("nope").await, Err(JobError::NotFound));
    assert_eq!(
        service.download("6f1c1f0e-8d4b-4b8e-9a57-2f7f4d1f9f11").await,
        Err(JobError::NotFound)
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_selector_uses_default_source() {
    let launcher = FakeLauncher::new([(1, PageScript::Identifiers(vec!["AAA"]))]);
    let service = ScrapeService::new(test_config(20, 20, 1), launcher);

    let id = service.start("lse").await.to_string();
    wait_for_terminal(&service, &id).await;
    assert_eq!(
        service.download(&id).await.unwrap().file_name(),
        "nyse-tickers.csv"
    );
}

#[tokio::test(start_paused = true)]
async fn deleted_job_runner_finishes_silently() {
    let launcher = FakeLauncher::new([(1, PageScript::Identifiers(vec!["AAA"]))])
        .with_latency(Duration::from_secs(5));
    let log = launcher.log.clone();
    let service = ScrapeService::new(test_config(20, 20, 1), launcher);

    let id = service.start("nyse").await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(service.registry().delete(&id).await.is_some());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(service.registry().is_empty().await);
    assert_eq!(log.released.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn scrape_now_returns_result_and_forgets_job() {
    let launcher = FakeLauncher::new([
        (1, PageScript::Identifiers(vec!["MSFT", "USA"])),
        (21, PageScript::Identifiers(vec!["AAPL"])),
    ]);
    let service = ScrapeService::new(test_config(40, 20, 2), launcher);

    let download = service.scrape_now("NASDAQ").await.unwrap();
    assert_eq!(download.body, "AAPL\nMSFT");
    assert_eq!(download.file_name(), "nasdaq-tickers.csv");
    assert!(service.registry().is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn scrape_now_failure_forgets_job() {
    let service = ScrapeService::new(
        test_config(40, 20, 2),
        FakeLauncher::failing("chrome not found"),
    );

    match service.scrape_now("nyse").await {
        Err(JobError::Failed(msg)) => assert!(msg.contains("chrome not found"), "{msg}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(service.registry().is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn abandoned_scrape_now_forgets_job() {
    let launcher = FakeLauncher::new([(1, PageScript::Identifiers(vec!["IBM"]))])
        .with_latency(Duration::from_secs(5));
    let service = ScrapeService::new(test_config(20, 20, 1), launcher);

    let outcome = tokio::time::timeout(Duration::from_secs(1), service.scrape_now("nyse")).await;
    assert!(outcome.is_err(), "scrape should still be running");

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(service.registry().len().await, 0);
}

#[tokio::test(start_paused = true)]
async fn reaper_evicts_jobs_past_ttl() {
    let config = ScrapeConfig::builder()
        .total_items(20)
        .job_ttl_secs(30 * 60)
        .reaper_interval_secs(10 * 60)
        .build()
        .unwrap();
    let service = ScrapeService::new(config, FakeLauncher::failing("no browser"));
    service.start_cleanup_task();

    let id = service.start("nyse").await.to_string();
    wait_for_terminal(&service, &id).await;

    tokio::time::sleep(Duration::from_secs(25 * 60)).await;
    assert!(service.status(&id).await.is_ok());

    tokio::time::sleep(Duration::from_secs(20 * 60)).await;
    assert_eq!(service.status(&id).await, Err(JobError::NotFound));

    service.shutdown().await;
}
