//! Observability hooks
//!
//! - `metrics` feature: OpenTelemetry instruments in [`METRICS`]. The crate
//!   only uses the global meter; installing an exporter is up to the
//!   application.
//! - `tracing` feature: spans around queries and transaction boundaries.

#[cfg(feature = "metrics")]
pub use otel::{BuoyMetrics, METRICS};

#[cfg(feature = "metrics")]
mod otel {
    use once_cell::sync::Lazy;
    use opentelemetry::{
        global,
        metrics::{Counter, Histogram},
    };
    use std::time::Duration;

    pub static METRICS: Lazy<BuoyMetrics> = Lazy::new(BuoyMetrics::init);

    pub struct BuoyMetrics {
        pub queries_total: Counter<u64>,
        pub query_duration: Histogram<f64>,
        pub query_errors: Counter<u64>,
        pub rollbacks: Counter<u64>,
    }

    impl BuoyMetrics {
        pub fn init() -> Self {
            let meter = global::meter("lifebuoy");

            let queries_total = meter
                .u64_counter("lifebuoy_queries_total")
                .with_description("Total statements executed")
                .build();

            let query_duration = meter
                .f64_histogram("lifebuoy_query_duration_seconds")
                .with_description("Duration of statements")
                .build();

            let query_errors = meter
                .u64_counter("lifebuoy_query_errors_total")
                .with_description("Statements that returned an error")
                .build();

            let rollbacks = meter
                .u64_counter("lifebuoy_rollbacks_total")
                .with_description("Transactions rolled back")
                .build();

            Self {
                queries_total,
                query_duration,
                query_errors,
                rollbacks,
            }
        }

        pub fn record_query_duration(&self, elapsed: Duration) {
            self.queries_total.add(1, &[]);
            self.query_duration.record(elapsed.as_secs_f64(), &[]);
        }

        pub fn record_query_error(&self) {
            self.query_errors.add(1, &[]);
        }

        pub fn record_rollback(&self) {
            self.rollbacks.add(1, &[]);
        }
    }
}

/// Span constructors used by the executor, connector and transaction code
#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::{info_span, Span};

    const MAX_SQL_IN_SPAN: usize = 256;

    pub fn execute_query_span(sql: &str) -> Span {
        let sql = match sql.char_indices().nth(MAX_SQL_IN_SPAN) {
            Some((cut, _)) => &sql[..cut],
            None => sql,
        };
        info_span!("lifebuoy.execute_query", db.statement = sql)
    }

    pub fn acquire_connection_span() -> Span {
        info_span!("lifebuoy.acquire_connection")
    }

    pub fn begin_transaction_span() -> Span {
        info_span!("lifebuoy.begin_transaction")
    }

    pub fn commit_transaction_span() -> Span {
        info_span!("lifebuoy.commit_transaction")
    }

    pub fn rollback_transaction_span() -> Span {
        info_span!("lifebuoy.rollback_transaction")
    }

}
