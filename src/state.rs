use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::pricing::PricingPolicy;

/// Source of "today" for stay rules and status transitions.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub pricing: PricingPolicy,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(pool: SqlitePool, pricing: PricingPolicy) -> Self {
        Self::with_clock(pool, pricing, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: SqlitePool, pricing: PricingPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            pricing,
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
