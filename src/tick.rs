//! One fetch-then-publish cycle

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::client::{ClientError, TickerClient};
use crate::credentials::{CredentialError, CredentialSource};

#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("credential lookup task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub struct Ticker {
    source: Arc<dyn CredentialSource>,
    client: TickerClient,
}

impl Ticker {
    pub fn new(source: Arc<dyn CredentialSource>, client: TickerClient) -> Self {
        Self { source, client }
    }

    /// Runs one tick: token, usage, publish, confirmation line. The
    /// token is re-read from the store every time and dropped when
    /// this call returns. Any failure aborts the rest of the tick and
    /// surfaces to the caller.
    pub async fn run(&self) -> Result<(), TickError> {
        let source = Arc::clone(&self.source);
        // The store lookup blocks on an external process; keep it off
        // the scheduler's timer.
        let token = tokio::task::spawn_blocking(move || source.fetch()).await??;

        let usage = self.client.fetch_usage(&token).await?;
        self.client.post_update(&usage).await?;

        log::info!(
            "{}",
            confirmation_line(self.client.update_url(), Local::now())
        );
        Ok(())
    }
}

fn confirmation_line(url: &str, at: DateTime<Local>) -> String {
    format!("Update sent to {} at {}", url, at.format("%H:%M:%S"))
}
