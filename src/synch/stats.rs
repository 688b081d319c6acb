//! Counters collected by the intersection monitor

/// Running totals for one monitor, updated under the intersection lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Vehicles admitted into the intersection
    pub admitted: u64,
    /// Vehicles that left the intersection
    pub departed: u64,
    /// Requests that had to wait at least once before entering
    pub blocked_requests: u64,
    /// Times a waiting thread woke up and re-checked the admission rule
    pub wakeups: u64,
    /// Times a path emptied and waiters were notified
    pub wake_rounds: u64,
    /// Individual wait queues notified across all wake rounds
    pub queues_notified: u64,
    /// Largest number of vehicles inside at once
    pub peak_occupancy: u32,
}

impl MonitorStats {
    /// Vehicles admitted but not yet departed
    pub fn inside(&self) -> u64 {
        self.admitted - self.departed
    }

    /// Fraction of requests that had to wait, as a percentage
    pub fn blocked_percent(&self) -> f64 {
        if self.admitted > 0 {
            self.blocked_requests as f64 / self.admitted as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Admitted: {} | Departed: {} | Blocked: {} ({:.1}%) | Wakeups: {} | Peak: {}",
            self.admitted,
            self.departed,
            self.blocked_requests,
            self.blocked_percent(),
            self.wakeups,
            self.peak_occupancy
        )
    }
}
