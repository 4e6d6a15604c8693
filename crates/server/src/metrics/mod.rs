use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the global Prometheus recorder and return the `/metrics` router.
pub fn setup_metrics() -> anyhow::Result<Router> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    let app = Router::new().route("/metrics", get(move || async move { handle.render() }));
    Ok(app)
}
