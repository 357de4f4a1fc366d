use crate::domain_port::*;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Background loop that drops password reset tokens past their expiry.
///
/// Expired tokens are already rejected at verification time; the sweeper only
/// keeps the credential table from accumulating stale digests.
pub struct ResetTokenSweeper {
    auth_repo: Arc<dyn AuthRepo>,
    interval: Duration,
    cancellation_token: CancellationToken,
}

impl ResetTokenSweeper {
    pub fn new(
        auth_repo: Arc<dyn AuthRepo>,
        interval: Duration,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            auth_repo,
            interval,
            cancellation_token,
        }
    }

    async fn tick_once(&self) -> anyhow::Result<()> {
        let cleared = self.auth_repo.clear_expired_reset_tokens(Utc::now()).await?;
        if cleared > 0 {
            tracing::info!(cleared, "expired reset tokens swept");
        }
        tokio::time::sleep(self.interval).await;
        Ok(())
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Reset token sweeper shutting down...");
                    break;
                }
                result = self.tick_once() => {
                    if let Err(e) = result {
                        tracing::error!("Reset token sweeper error: {:#?}", e);
                    }
                }
            }
        }
        Ok(())
    }
}
