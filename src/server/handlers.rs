//! Route handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::response::csv_attachment;
use crate::browser_pool::PoolLauncher;
use crate::jobs::{Health, JobError, JobId, JobSnapshot, ScrapeService};

type Service<L> = State<Arc<ScrapeService<L>>>;

/// `?exchange=` selector; missing means the default source
#[derive(Debug, Default, Deserialize)]
pub struct ExchangeQuery {
    #[serde(default)]
    pub exchange: Option<String>,
}

impl ExchangeQuery {
    fn selector(&self) -> &str {
        self.exchange.as_deref().unwrap_or_default()
    }
}

/// `?jobId=`
#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    #[serde(rename = "jobId", default)]
    pub job_id: Option<String>,
}

impl JobQuery {
    fn job_id(&self) -> Result<&str, JobError> {
        self.job_id.as_deref().ok_or(JobError::NotFound)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartResponse {
    #[serde(rename = "jobId")]
    pub job_id: JobId,
}

pub async fn start<L: PoolLauncher>(
    State(service): Service<L>,
    Query(query): Query<ExchangeQuery>,
) -> Json<StartResponse> {
    let job_id = service.start(query.selector()).await;
    Json(StartResponse { job_id })
}

pub async fn status<L: PoolLauncher>(
    State(service): Service<L>,
    Query(query): Query<JobQuery>,
) -> Result<Json<JobSnapshot>, JobError> {
    let snapshot = service.status(query.job_id()?).await?;
    Ok(Json(snapshot))
}

pub async fn download<L: PoolLauncher>(
    State(service): Service<L>,
    Query(query): Query<JobQuery>,
) -> Result<Response, JobError> {
    let download = service.download(query.job_id()?).await?;
    Ok(csv_attachment(download))
}

pub async fn scrape_now<L: PoolLauncher>(
    State(service): Service<L>,
    Query(query): Query<ExchangeQuery>,
) -> Result<Response, JobError> {
    let download = service.scrape_now(query.selector()).await?;
    Ok(csv_attachment(download))
}

pub async fn health<L: PoolLauncher>(State(service): Service<L>) -> Json<Health> {
    Json(service.health())
}
