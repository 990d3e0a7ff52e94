//! Export orchestration: authenticate, fetch concurrently, transform.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use crate::domain::ExportData;
use crate::lookup::build_lookup;
use crate::logs::fetch_all_logs;
use crate::transform::transform_logs;
use crate::{Credentials, SetgraphApi, SetgraphError};

/// The sole public entry point of the export pipeline.
pub struct ExportService {
    api: Arc<dyn SetgraphApi>,
}

impl ExportService {
    pub fn new(api: Arc<dyn SetgraphApi>) -> Self {
        Self { api }
    }

    /// Run one complete export.
    ///
    /// Authentication failure is terminal; no step is retried. The
    /// measurement lookup and the log fetch run as two concurrent tasks
    /// sharing the token, and both must finish before transformation.
    pub async fn run(&self, credentials: &Credentials) -> Result<ExportData, SetgraphError> {
        tracing::info!("authenticating");
        let token = self.api.login(credentials).await?;
        tracing::info!(user_id = %token.user_id, "authenticated");

        let lookup_task = tokio::spawn(build_lookup(self.api.clone(), token.clone()));
        let logs_task = tokio::spawn(fetch_all_logs(self.api.clone(), token));
        let (lookup, logs) = match tokio::try_join!(lookup_task, logs_task) {
            Ok((lookup, logs)) => (lookup?, logs?),
            Err(join_err) => {
                return Err(SetgraphError::Api {
                    status: None,
                    message: format!("fetch task failed: {join_err}"),
                });
            }
        };
        tracing::info!(
            measurements = lookup.len(),
            logs = logs.len(),
            "fetch complete"
        );

        let workouts = transform_logs(&logs, &lookup);
        tracing::info!(workouts = workouts.len(), "transform complete");
        Ok(ExportData {
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            total_workouts: workouts.len(),
            workouts,
        })
    }
}
