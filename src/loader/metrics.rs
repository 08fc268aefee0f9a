// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Prometheus metrics for the load generator.
//!
//! One counter family, `db_operations_total{type}`, counts INSERTs and
//! SELECTs executed against the backing store. Counters only ever increase;
//! the scrape endpoint is the loader's sole external contract.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prometheus::{core::Collector, Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::error;

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct LoaderMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,
    db_operations_total: IntCounterVec,
}

impl LoaderMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let db_operations_total = IntCounterVec::new(
            Opts::new("db_operations_total", "Number of DB operations"),
            &["type"],
        )
        .expect("metric can be created");

        registry
            .register(Box::new(db_operations_total.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                db_operations_total,
            }),
        }
    }

    /// Count one executed INSERT.
    pub fn record_insert(&self) {
        self.inner
            .db_operations_total
            .with_label_values(&["insert"])
            .inc();
    }

    /// Count one executed SELECT.
    pub fn record_select(&self) {
        self.inner
            .db_operations_total
            .with_label_values(&["select"])
            .inc();
    }

    /// Current operation count summed across labels.
    pub fn operations(&self) -> u64 {
        let mut total = 0u64;
        let families = self.inner.db_operations_total.collect();
        for mf in &families {
            for m in mf.get_metric() {
                total += m.get_counter().get_value() as u64;
            }
        }
        total
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer)
            .map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

impl Default for LoaderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoaderMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderMetrics")
            .field("operations", &self.operations())
            .finish()
    }
}

/// Router serving the scrape endpoint.
pub fn router(metrics: LoaderMetrics) -> Router {
    Router::new()
        .route("/metrics", get(serve_metrics))
        .with_state(metrics)
}

async fn serve_metrics(State(metrics): State<LoaderMetrics>) -> Response {
    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[test]
    fn counters_start_at_zero() {
        let metrics = LoaderMetrics::new();
        assert_eq!(metrics.operations(), 0);
    }

    #[test]
    fn insert_and_select_increment_their_labels() {
        let metrics = LoaderMetrics::new();
        metrics.record_insert();
        metrics.record_insert();
        metrics.record_select();
        assert_eq!(metrics.operations(), 3);

        let output = metrics.gather_and_encode().unwrap();
        assert!(output.contains(r#"db_operations_total{type="insert"} 2"#));
        assert!(output.contains(r#"db_operations_total{type="select"} 1"#));
    }

    #[test]
    fn clone_shares_underlying_counters() {
        let metrics = LoaderMetrics::new();
        let clone = metrics.clone();
        metrics.record_insert();
        assert_eq!(clone.operations(), 1);
    }

    #[tokio::test]
    async fn scrape_endpoint_serves_the_text_format() {
        let metrics = LoaderMetrics::new();
        metrics.record_insert();
        let app = router(metrics);

        let resp = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; version=0.0.4; charset=utf-8"
        );

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("db_operations_total"));
    }
}
