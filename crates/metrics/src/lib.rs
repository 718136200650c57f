use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Thread-safe counters for feed intake and book updates.
#[derive(Debug)]
pub struct BookMetrics {
    // Counters
    messages_received: AtomicU64,
    parse_errors: AtomicU64,
    snapshots_applied: AtomicU64,
    delta_batches_applied: AtomicU64,
    deltas_applied: AtomicU64,
    deltas_dropped: AtomicU64,
    deltas_ignored: AtomicU64,
    foreign_messages: AtomicU64,

    // Timestamps
    inner: RwLock<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    start_time: Instant,
    last_update_time: Option<Instant>,
}

impl Default for BookMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl BookMetrics {
    pub fn new() -> Self {
        Self {
            messages_received: AtomicU64::new(0),
            parse_errors: AtomicU64::new(0),
            snapshots_applied: AtomicU64::new(0),
            delta_batches_applied: AtomicU64::new(0),
            deltas_applied: AtomicU64::new(0),
            deltas_dropped: AtomicU64::new(0),
            deltas_ignored: AtomicU64::new(0),
            foreign_messages: AtomicU64::new(0),
            inner: RwLock::new(MetricsInner {
                start_time: Instant::now(),
                last_update_time: None,
            }),
        }
    }

    // --- Increment methods ---

    pub fn inc_messages_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_parse_errors(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_snapshots_applied(&self) {
        self.snapshots_applied.fetch_add(1, Ordering::Relaxed);
        self.inner.write().last_update_time = Some(Instant::now());
    }

    /// Records one applied batch: `applied` deltas inserted, updated or
    /// removed a level, `dropped` were discarded at capacity and `ignored`
    /// matched nothing.
    pub fn record_delta_batch(&self, applied: u64, dropped: u64, ignored: u64) {
        self.delta_batches_applied.fetch_add(1, Ordering::Relaxed);
        self.deltas_applied.fetch_add(applied, Ordering::Relaxed);
        self.deltas_dropped.fetch_add(dropped, Ordering::Relaxed);
        self.deltas_ignored.fetch_add(ignored, Ordering::Relaxed);
        self.inner.write().last_update_time = Some(Instant::now());
    }

    /// Book message for a product other than the one being tracked.
    pub fn inc_foreign_messages(&self) {
        self.foreign_messages.fetch_add(1, Ordering::Relaxed);
    }

    // --- Getter methods ---

    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    pub fn parse_errors(&self) -> u64 {
        self.parse_errors.load(Ordering::Relaxed)
    }

    pub fn snapshots_applied(&self) -> u64 {
        self.snapshots_applied.load(Ordering::Relaxed)
    }

    pub fn delta_batches_applied(&self) -> u64 {
        self.delta_batches_applied.load(Ordering::Relaxed)
    }

    pub fn deltas_applied(&self) -> u64 {
        self.deltas_applied.load(Ordering::Relaxed)
    }

    pub fn deltas_dropped(&self) -> u64 {
        self.deltas_dropped.load(Ordering::Relaxed)
    }

    pub fn deltas_ignored(&self) -> u64 {
        self.deltas_ignored.load(Ordering::Relaxed)
    }

    pub fn foreign_messages(&self) -> u64 {
        self.foreign_messages.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> f64 {
        self.inner.read().start_time.elapsed().as_secs_f64()
    }

    pub fn secs_since_last_update(&self) -> Option<f64> {
        self.inner
            .read()
            .last_update_time
            .map(|t| t.elapsed().as_secs_f64())
    }

    /// Calculate messages per second since start.
    pub fn messages_per_second(&self) -> f64 {
        let uptime = self.uptime_secs();
        if uptime > 0.0 {
            self.messages_received() as f64 / uptime
        } else {
            0.0
        }
    }

    /// Generate a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: self.messages_received(),
            parse_errors: self.parse_errors(),
            snapshots_applied: self.snapshots_applied(),
            delta_batches_applied: self.delta_batches_applied(),
            deltas_applied: self.deltas_applied(),
            deltas_dropped: self.deltas_dropped(),
            deltas_ignored: self.deltas_ignored(),
            foreign_messages: self.foreign_messages(),
            uptime_secs: self.uptime_secs(),
            messages_per_second: self.messages_per_second(),
            secs_since_last_update: self.secs_since_last_update(),
        }
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub messages_received: u64,
    pub parse_errors: u64,
    pub snapshots_applied: u64,
    pub delta_batches_applied: u64,
    pub deltas_applied: u64,
    pub deltas_dropped: u64,
    pub deltas_ignored: u64,
    pub foreign_messages: u64,
    pub uptime_secs: f64,
    pub messages_per_second: f64,
    pub secs_since_last_update: Option<f64>,
}

/// Health status of the book feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Book is seeded and receiving updates.
    Healthy,
    /// Updates are stale or the book was never seeded.
    Degraded,
    /// No updates for an extended period.
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "HEALTHY"),
            HealthStatus::Degraded => write!(f, "DEGRADED"),
            HealthStatus::Unhealthy => write!(f, "UNHEALTHY"),
        }
    }
}

impl MetricsSnapshot {
    /// Threshold in seconds for considering data stale (degraded).
    const STALE_THRESHOLD_SECS: f64 = 30.0;
    /// Threshold in seconds for considering the feed unhealthy.
    const UNHEALTHY_THRESHOLD_SECS: f64 = 60.0;

    /// Determine the health status based on metrics.
    pub fn health_status(&self) -> HealthStatus {
        let secs_since_update = match self.secs_since_last_update {
            Some(secs) => secs,
            None => {
                // Nothing applied yet - still starting up if uptime is short
                if self.uptime_secs < Self::STALE_THRESHOLD_SECS {
                    return HealthStatus::Healthy;
                } else if self.uptime_secs < Self::UNHEALTHY_THRESHOLD_SECS {
                    return HealthStatus::Degraded;
                } else {
                    return HealthStatus::Unhealthy;
                }
            }
        };

        if secs_since_update > Self::UNHEALTHY_THRESHOLD_SECS {
            HealthStatus::Unhealthy
        } else if secs_since_update > Self::STALE_THRESHOLD_SECS || self.snapshots_applied == 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Book Metrics ===")?;
        writeln!(f, "Uptime:              {:.1}s", self.uptime_secs)?;
        writeln!(f, "Messages received:   {}", self.messages_received)?;
        writeln!(f, "Messages/sec:        {:.2}", self.messages_per_second)?;
        writeln!(f, "Parse errors:        {}", self.parse_errors)?;
        writeln!(f, "Snapshots applied:   {}", self.snapshots_applied)?;
        writeln!(f, "Delta batches:       {}", self.delta_batches_applied)?;
        writeln!(f, "Deltas applied:      {}", self.deltas_applied)?;
        writeln!(f, "Deltas dropped:      {}", self.deltas_dropped)?;
        writeln!(f, "Deltas ignored:      {}", self.deltas_ignored)?;
        writeln!(f, "Foreign messages:    {}", self.foreign_messages)?;
        if let Some(secs) = self.secs_since_last_update {
            writeln!(f, "Since last update:   {:.1}s", secs)?;
        }
        Ok(())
    }
}

/// Shared handle to metrics.
pub type SharedMetrics = Arc<BookMetrics>;

pub fn create_metrics() -> SharedMetrics {
    Arc::new(BookMetrics::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(
        uptime_secs: f64,
        snapshots_applied: u64,
        secs_since_last_update: Option<f64>,
    ) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: 10,
            parse_errors: 0,
            snapshots_applied,
            delta_batches_applied: 9,
            deltas_applied: 40,
            deltas_dropped: 0,
            deltas_ignored: 0,
            foreign_messages: 0,
            uptime_secs,
            messages_per_second: 0.1,
            secs_since_last_update,
        }
    }

    #[test]
    fn test_metrics_increment() {
        let metrics = BookMetrics::new();

        metrics.inc_messages_received();
        metrics.inc_messages_received();
        metrics.inc_parse_errors();
        metrics.inc_snapshots_applied();
        metrics.record_delta_batch(3, 1, 0);
        metrics.record_delta_batch(2, 0, 2);

        assert_eq!(metrics.messages_received(), 2);
        assert_eq!(metrics.parse_errors(), 1);
        assert_eq!(metrics.snapshots_applied(), 1);
        assert_eq!(metrics.delta_batches_applied(), 2);
        assert_eq!(metrics.deltas_applied(), 5);
        assert_eq!(metrics.deltas_dropped(), 1);
        assert_eq!(metrics.deltas_ignored(), 2);
    }

    #[test]
    fn test_last_update_time() {
        let metrics = BookMetrics::new();

        assert!(metrics.secs_since_last_update().is_none());

        metrics.record_delta_batch(1, 0, 0);

        let secs = metrics.secs_since_last_update();
        assert!(secs.is_some());
        assert!(secs.unwrap() < 1.0);
    }

    #[test]
    fn test_snapshot_display() {
        let metrics = BookMetrics::new();
        metrics.inc_foreign_messages();

        let text = metrics.snapshot().to_string();
        assert!(text.contains("Foreign messages:    1"));
    }

    #[test]
    fn test_health_status_healthy_with_recent_update() {
        assert_eq!(
            snapshot_with(120.0, 1, Some(5.0)).health_status(),
            HealthStatus::Healthy
        );
    }

    #[test]
    fn test_health_status_healthy_during_startup() {
        assert_eq!(
            snapshot_with(10.0, 0, None).health_status(),
            HealthStatus::Healthy
        );
    }

    #[test]
    fn test_health_status_degraded_without_snapshot() {
        // Deltas arriving but the book was never seeded
        assert_eq!(
            snapshot_with(120.0, 0, Some(1.0)).health_status(),
            HealthStatus::Degraded
        );
    }

    #[test]
    fn test_health_status_degraded_stale_data() {
        assert_eq!(
            snapshot_with(120.0, 1, Some(45.0)).health_status(),
            HealthStatus::Degraded
        );
    }

    #[test]
    fn test_health_status_unhealthy_no_updates_long_uptime() {
        assert_eq!(
            snapshot_with(120.0, 0, None).health_status(),
            HealthStatus::Unhealthy
        );
    }

    #[test]
    fn test_health_status_boundary_at_60_seconds() {
        // At exactly 60s, it's not > 60, so degraded
        assert_eq!(
            snapshot_with(120.0, 1, Some(60.0)).health_status(),
            HealthStatus::Degraded
        );
    }
}
