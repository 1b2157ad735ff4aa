use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::auth::SessionVerifier;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::video_search::VideoSearch;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Stores uploaded resume PDFs.
    pub s3: S3Client,
    pub s3_bucket: String,
    pub llm: LlmClient,
    pub sessions: SessionVerifier,
    /// Pluggable video backend. YouTube when a key is configured, otherwise disabled.
    pub videos: Arc<dyn VideoSearch>,
}

impl AppState {
    pub fn new(
        config: &Config,
        db: PgPool,
        s3: S3Client,
        llm: LlmClient,
        videos: Arc<dyn VideoSearch>,
    ) -> Self {
        Self {
            db,
            s3,
            s3_bucket: config.s3_bucket.clone(),
            llm,
            sessions: SessionVerifier::new(&config.session_jwt_secret),
            videos,
        }
    }
}
