// ==========================================
// 热轧精整排产系统 - 性能埋点
// ==========================================
// 输出: target = "perf", 字段 op / elapsed_ms
// 超过慢操作阈值时升级为 warn
// ==========================================

use std::time::Instant;

/// 慢操作阈值（毫秒）
pub const SLOW_OP_THRESHOLD_MS: u64 = 1_000;

/// 性能统计 Guard：离开作用域时记录 elapsed_ms
///
/// ```ignore
/// let _perf = hot_rolling_aps_compare::perf::PerfGuard::new("compare_versions");
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    slow_threshold_ms: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self::with_threshold(op, SLOW_OP_THRESHOLD_MS)
    }

    pub fn with_threshold(op: &'static str, slow_threshold_ms: u64) -> Self {
        Self {
            op,
            start: Instant::now(),
            slow_threshold_ms,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn exceeds_threshold(&self, elapsed_ms: u64) -> bool {
        elapsed_ms > self.slow_threshold_ms
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        if self.exceeds_threshold(elapsed_ms) {
            tracing::warn!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                threshold_ms = self.slow_threshold_ms,
                "slow"
            );
        } else {
            tracing::info!(target: "perf", op = self.op, elapsed_ms, "done");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_threshold() {
        let guard = PerfGuard::with_threshold("compare_versions", 100);
        assert!(!guard.exceeds_threshold(100));
        assert!(guard.exceeds_threshold(101));

        let guard = PerfGuard::with_threshold("export_view", 0);
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(guard.exceeds_threshold(guard.elapsed_ms()));
    }
}
