//! Live pool metrics over HTTP: Prometheus text on `/metrics`, a JSON
//! snapshot on `/stats`, and a liveness probe on `/healthz`.
mod exposition;
mod http;
mod server;


pub use exposition::render_prometheus;
pub use server::MetricsServer;
