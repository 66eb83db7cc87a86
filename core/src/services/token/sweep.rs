//! Periodic sweep of expired credential records.
//!
//! The cadence is owned by the deployment; this module just provides the
//! single-cycle hook and an optional background loop around it.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::{CredentialRepository, IdentityRepository};

use super::service::TokenService;

/// Configuration for the credential sweeper.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// How often to run the sweep (in seconds).
    pub interval_seconds: u64,
    /// Whether the background sweep is enabled.
    pub enabled: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

/// Bulk deletion of expired credential records on a periodic trigger.
pub struct CredentialSweeper<R: CredentialRepository + 'static, I: IdentityRepository + 'static> {
    tokens: Arc<TokenService<R, I>>,
    config: SweepConfig,
}

impl<R: CredentialRepository, I: IdentityRepository> CredentialSweeper<R, I> {
    pub fn new(tokens: Arc<TokenService<R, I>>, config: SweepConfig) -> Self {
        Self { tokens, config }
    }

    /// Runs a single sweep cycle, returning the number of records
    /// removed across all persisted classes.
    pub async fn run_sweep(&self) -> DomainResult<usize> {
        if !self.config.enabled {
            return Ok(0);
        }

        info!("starting credential sweep cycle");
        let deleted = self.tokens.sweep_expired().await?;
        info!(deleted, "credential sweep cycle completed");
        Ok(deleted)
    }

    /// Spawns the sweep as a background task on a fixed interval.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("credential sweeper is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "credential sweeper started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_sweep().await {
                    // Transient store failures are expected here; the
                    // next cycle retries.
                    error!("credential sweep cycle failed: {}", e);
                }
            }
        });
    }
}
