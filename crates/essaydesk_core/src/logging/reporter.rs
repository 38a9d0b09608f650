//! Failure reporter used by repositories.

use crate::outcome::ErrorDescriptor;
use log::error;
use std::sync::atomic::{AtomicBool, Ordering};

const DETAIL_LIMIT: usize = 240;

/// Reporter settings chosen by the composition root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Skip logging the next reported failure, once.
    pub omit_next_error: bool,
}

/// Logs store failures as `event=store_failure` records.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    omit_next: AtomicBool,
}

impl ErrorReporter {
    pub fn new(config: ReporterConfig) -> Self {
        Self {
            omit_next: AtomicBool::new(config.omit_next_error),
        }
    }

    /// Records a failure of `operation` on `entity`.
    ///
    /// Returns `false` when the record was suppressed by `omit_next_error`.
    pub fn report(
        &self,
        entity: &str,
        operation: &str,
        descriptor: &ErrorDescriptor,
        detail: &dyn std::fmt::Display,
    ) -> bool {
        if self.omit_next.swap(false, Ordering::Relaxed) {
            return false;
        }
        error!(
            "event=store_failure module=repo entity={entity} op={operation} status=error \
             error_code={} error={}",
            descriptor.code,
            super::single_line(&detail.to_string(), DETAIL_LIMIT)
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorReporter, ReporterConfig};
    use crate::model::user::USER_ERRORS;

    #[test]
    fn omit_next_error_suppresses_exactly_one_report() {
        let reporter = ErrorReporter::new(ReporterConfig {
            omit_next_error: true,
        });
        assert!(!reporter.report("user", "list", &USER_ERRORS.list, &"boom"));
        assert!(reporter.report("user", "list", &USER_ERRORS.list, &"boom"));
    }

    #[test]
    fn default_reporter_always_logs() {
        let reporter = ErrorReporter::default();
        assert!(reporter.report("user", "count", &USER_ERRORS.count, &"boom"));
    }
}
