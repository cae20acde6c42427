//! Per-run execution metrics.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct AgentMetrics {
    pub steps: usize,
    pub tool_calls: usize,
    pub deferred_tool_calls: usize,
    pub errors: usize,
    pub backend_calls: usize,
    pub backend_time_ms: u64,
    pub execution_time_ms: u64,
    pub tool_stats: HashMap<String, ToolStats>,
}

#[derive(Debug, Clone, Default)]
pub struct ToolStats {
    pub calls: usize,
    pub total_time_ms: u64,
    pub errors: usize,
}

impl AgentMetrics {
    pub fn record_tool(&mut self, name: &str, duration_ms: u64, is_error: bool) {
        self.tool_calls += 1;
        let stats = self.tool_stats.entry(name.to_string()).or_default();
        stats.calls += 1;
        stats.total_time_ms += duration_ms;
        if is_error {
            stats.errors += 1;
            self.errors += 1;
        }
    }

    pub fn record_deferred(&mut self) {
        self.deferred_tool_calls += 1;
    }

    pub fn record_backend_call(&mut self, duration_ms: u64) {
        self.backend_calls += 1;
        self.backend_time_ms += duration_ms;
    }

    pub fn avg_tool_time_ms(&self) -> f64 {
        if self.tool_calls == 0 {
            return 0.0;
        }
        let total: u64 = self.tool_stats.values().map(|s| s.total_time_ms).sum();
        total as f64 / self.tool_calls as f64
    }
}
