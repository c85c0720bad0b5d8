/// Counters kept by the polling loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub cycles: u64,
    pub read_failures: u64,
    pub send_failures: u64,
}

impl LoopStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cycles whose reading reached the reporter
    pub fn delivered(&self) -> u64 {
        self.cycles - self.send_failures
    }

    /// Check if every cycle read and reported cleanly
    pub fn is_clean(&self) -> bool {
        self.read_failures == 0 && self.send_failures == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = LoopStats::new();

        assert_eq!(stats.cycles, 0);
        assert_eq!(stats.delivered(), 0);
        assert!(stats.is_clean());
    }

    #[test]
    fn test_delivered_excludes_send_failures() {
        let stats = LoopStats {
            cycles: 10,
            read_failures: 1,
            send_failures: 3,
        };

        assert_eq!(stats.delivered(), 7);
        assert!(!stats.is_clean());
    }
}
