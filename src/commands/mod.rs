pub mod poll;
pub mod run;
pub mod serve;

use crate::collector::PollSummary;

pub(crate) fn log_summary(summary: &PollSummary) {
    tracing::info!(
        entries = summary.total_entries,
        polled = summary.polled_devices,
        skipped = summary.skipped_entries,
        failed = summary.failed_queries,
        metrics = summary.total_metrics,
        absent = summary.absent_metrics,
        "Опрос завершён"
    );
}
