//! Client library for exporting workout history from the SetGraph API.
//!
//! [`ExportService`](crate::export::ExportService) is the entry point: it
//! authenticates, fetches the measurement catalogs and the raw log feed
//! concurrently, and reconciles both into denormalized [`Workout`] records
//! ready for the CSV/JSON serializers in [`serialize`].

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

pub mod config;
pub mod decode;
pub mod domain;
pub mod export;
pub mod http_client;
pub mod lookup;
pub mod logs;
pub mod models;
pub mod serialize;
pub mod transform;

pub use domain::{ExportData, Workout, WorkoutExercise, WorkoutSet};
pub use export::ExportService;
pub use models::{LogPage, MeasurementPage, RawLog};
pub use serialize::DateRange;

/// Failures surfaced by the export pipeline.
///
/// Authentication failures are terminal and reported distinctly from API
/// failures; neither kind is retried.
#[derive(Debug, Error)]
pub enum SetgraphError {
    /// Bad credentials, a non-200 login status, or a malformed login response.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Any other remote-call failure. `status` is absent for transport errors.
    #[error("API request failed: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },
}

impl From<reqwest::Error> for SetgraphError {
    fn from(err: reqwest::Error) -> Self {
        SetgraphError::Api {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Account credentials. Ephemeral; never persisted.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username_or_email: String,
    pub password: SecretString,
}

/// Tokens returned by the login endpoint, owned for the duration of one
/// export run. Not cached across runs; no refresh is attempted.
#[derive(Clone, Debug)]
pub struct AuthToken {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub user_id: String,
}

/// The remote endpoints the export pipeline depends on.
#[async_trait]
pub trait SetgraphApi: Send + Sync + 'static {
    /// Exchange credentials for tokens.
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, SetgraphError>;

    /// One page of the global measurement catalog. Pages are numbered from 0.
    async fn global_measurement_page(
        &self,
        token: &AuthToken,
        page: u32,
    ) -> Result<MeasurementPage, SetgraphError>;

    /// One page of the user-scoped measurement catalog.
    async fn user_measurement_page(
        &self,
        token: &AuthToken,
        page: u32,
    ) -> Result<MeasurementPage, SetgraphError>;

    /// One batch of raw workout logs, addressed by continuation token.
    async fn log_page(
        &self,
        token: &AuthToken,
        limit: u32,
        continuation: Option<&str>,
    ) -> Result<LogPage, SetgraphError>;
}
