//! Postgres-backed implementation of the engine's repository trait.

use sqlx::PgPool;
use uuid::Uuid;

use dropscout_engine::{CompetitorRepo, EngineError, ScanCommit};

use crate::DbError;

fn storage_error(context: &str, err: &DbError) -> EngineError {
    EngineError::Storage {
        context: context.to_owned(),
        reason: err.to_string(),
    }
}

/// [`CompetitorRepo`] backed by the `competitor_stores` and
/// `competitor_alerts` tables.
#[derive(Clone)]
pub struct PgCompetitorRepo {
    pool: PgPool,
}

impl PgCompetitorRepo {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CompetitorRepo for PgCompetitorRepo {
    async fn begin_scan(&self, competitor_id: Uuid) -> Result<(), EngineError> {
        crate::competitors::set_scanning(&self.pool, competitor_id)
            .await
            .map_err(|e| storage_error("begin scan", &e))
    }

    async fn commit_scan(&self, competitor_id: Uuid, commit: ScanCommit) -> Result<(), EngineError> {
        crate::competitors::commit_scan(&self.pool, competitor_id, &commit)
            .await
            .map_err(|e| storage_error("commit scan", &e))
    }

    async fn record_scan_failure(&self, competitor_id: Uuid) -> Result<(), EngineError> {
        crate::competitors::record_scan_failure(&self.pool, competitor_id)
            .await
            .map_err(|e| storage_error("record scan failure", &e))
    }
}
