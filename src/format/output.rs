use serde::Serialize;
use tasklist_lib::{PriorityBreakdown, TaskStats};

/// Aggregate statistics for the stats view and `tl stats --json`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    #[serde(flatten)]
    pub stats: TaskStats,
    pub completion_rate: f64,
    pub by_priority: PriorityBreakdown,
}

impl StatsOutput {
    #[must_use]
    pub fn new(stats: TaskStats, by_priority: PriorityBreakdown) -> Self {
        Self {
            stats,
            completion_rate: stats.completion_rate(),
            by_priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_output_json_shape() {
        let stats = TaskStats {
            total: 4,
            completed: 1,
            pending: 3,
        };
        let by_priority = PriorityBreakdown {
            high: 2,
            medium: 1,
            low: 1,
        };
        let json = serde_json::to_value(StatsOutput::new(stats, by_priority)).unwrap();
        assert_eq!(json["total"], 4);
        assert_eq!(json["pending"], 3);
        assert_eq!(json["completion_rate"], 0.25);
        assert_eq!(json["by_priority"]["high"], 2);
    }
}
