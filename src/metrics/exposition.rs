use std::fmt::Write as _;

use crate::error::{AppError, AppResult, MetricsError};
use crate::pool::PoolStats;

pub(super) const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Clone, Copy)]
enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    const fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

struct MetricFamily {
    name: &'static str,
    help: &'static str,
    kind: MetricKind,
    value: fn(&PoolStats) -> u64,
}

const fn as_u64(value: usize) -> u64 {
    value as u64
}

const METRIC_FAMILIES: [MetricFamily; 7] = [
    MetricFamily {
        name: "pool_workers_running",
        help: "Number of running worker goroutines",
        kind: MetricKind::Gauge,
        value: |stats| as_u64(stats.running_workers),
    },
    MetricFamily {
        name: "pool_workers_idle",
        help: "Number of idle worker goroutines",
        kind: MetricKind::Gauge,
        value: |stats| as_u64(stats.idle_workers),
    },
    MetricFamily {
        name: "pool_tasks_submitted_total",
        help: "Number of tasks submitted",
        kind: MetricKind::Counter,
        value: |stats| stats.submitted_tasks,
    },
    MetricFamily {
        name: "pool_tasks_waiting_total",
        help: "Number of tasks waiting in the queue",
        kind: MetricKind::Gauge,
        value: |stats| as_u64(stats.waiting_tasks),
    },
    MetricFamily {
        name: "pool_tasks_successful_total",
        help: "Number of tasks that completed successfully",
        kind: MetricKind::Counter,
        value: |stats| stats.successful_tasks,
    },
    MetricFamily {
        name: "pool_tasks_failed_total",
        help: "Number of tasks that completed with panic",
        kind: MetricKind::Counter,
        value: |stats| stats.failed_tasks,
    },
    MetricFamily {
        name: "pool_tasks_completed_total",
        help: "Number of tasks that completed either successfully or with panic",
        kind: MetricKind::Counter,
        value: |stats| stats.completed_tasks,
    },
];

fn write_line(output: &mut String, line: &str) -> AppResult<()> {
    writeln!(output, "{}", line)
        .map_err(|err| AppError::metrics(MetricsError::WriteLine { source: err }))
}

/// Renders a stats snapshot in the Prometheus text exposition format.
///
/// # Errors
///
/// Returns an error if writing to the output buffer fails.
pub fn render_prometheus(stats: &PoolStats) -> AppResult<String> {
    let mut output = String::new();
    for family in &METRIC_FAMILIES {
        write_line(&mut output, &format!("# HELP {} {}", family.name, family.help))?;
        write_line(
            &mut output,
            &format!("# TYPE {} {}", family.name, family.kind.as_str()),
        )?;
        write_line(
            &mut output,
            &format!("{} {}", family.name, (family.value)(stats)),
        )?;
    }
    Ok(output)
}
