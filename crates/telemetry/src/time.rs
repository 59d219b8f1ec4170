// Path: crates/telemetry/src/time.rs
use crate::sinks::ArithmeticMetricsSink;
use std::time::Instant;

/// Observes the elapsed time of one engine operation when dropped.
pub struct OperationTimer<'a> {
    sink: &'a dyn ArithmeticMetricsSink,
    op: &'static str,
    start: Instant,
}

impl<'a> OperationTimer<'a> {
    /// Starts timing `op`.
    pub fn new(sink: &'a dyn ArithmeticMetricsSink, op: &'static str) -> Self {
        Self {
            sink,
            op,
            start: Instant::now(),
        }
    }
}

impl Drop for OperationTimer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_operation_duration(self.op, self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recording(Mutex<Vec<(&'static str, f64)>>);

    impl ArithmeticMetricsSink for Recording {
        fn inc_operations(&self, _op: &'static str) {}
        fn observe_operation_duration(&self, op: &'static str, duration_secs: f64) {
            self.0.lock().unwrap().push((op, duration_secs));
        }
        fn inc_cache_lookup(&self, _hit: bool) {}
    }

    #[test]
    fn test_timer_observes_on_drop() {
        let sink = Recording::default();
        {
            let _timer = OperationTimer::new(&sink, "divide");
        }
        let seen = sink.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "divide");
        assert!(seen[0].1 >= 0.0);
    }
}
