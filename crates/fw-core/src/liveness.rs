//! Heartbeat liveness monitoring.
//!
//! Tracks the device's heartbeat pings and raises edge-triggered
//! online/offline transitions. Entirely stream-time driven: the monitor
//! owns no timers, the pipeline calls [`HeartbeatMonitor::check`] as
//! frames arrive. A separate concern from thermal anomaly detection;
//! the two only share the alert interface.

use tracing::{info, warn};

use fw_common::{LivenessEvent, LivenessStatus};

/// Liveness monitor for one device stream.
#[derive(Debug, Clone)]
pub struct HeartbeatMonitor {
    timeout_secs: f64,
    last_heartbeat_at: Option<f64>,
    first_seen_at: Option<f64>,
    online: bool,
    offline_reported: bool,
}

impl HeartbeatMonitor {
    pub fn new(timeout_secs: f64) -> Self {
        HeartbeatMonitor {
            timeout_secs,
            last_heartbeat_at: None,
            first_seen_at: None,
            online: false,
            offline_reported: false,
        }
    }

    /// Record a heartbeat. Returns an `Online` event on the offline→online
    /// (or first-contact) edge.
    pub fn observe_heartbeat(&mut self, timestamp: f64) -> Option<LivenessEvent> {
        let previous = self.last_heartbeat_at;
        self.last_heartbeat_at = Some(timestamp);
        self.first_seen_at.get_or_insert(timestamp);

        if self.online {
            return None;
        }
        self.online = true;
        self.offline_reported = false;
        let silence_secs = previous.map(|p| timestamp - p).unwrap_or(0.0);
        info!(timestamp, silence_secs, "device online");
        Some(LivenessEvent {
            status: LivenessStatus::Online,
            timestamp,
            silence_secs,
        })
    }

    /// Evaluate silence against the timeout. Returns an `Offline` event
    /// once per outage; stays quiet until the device recovers.
    pub fn check(&mut self, now: f64) -> Option<LivenessEvent> {
        self.first_seen_at.get_or_insert(now);
        // A device that has never sent a heartbeat is measured from first
        // stream activity.
        let reference = self.last_heartbeat_at.or(self.first_seen_at)?;
        let silence_secs = now - reference;
        if silence_secs < self.timeout_secs {
            return None;
        }
        if !self.online && self.offline_reported {
            return None;
        }
        self.online = false;
        self.offline_reported = true;
        warn!(now, silence_secs, "device offline: no heartbeat");
        Some(LivenessEvent {
            status: LivenessStatus::Offline,
            timestamp: now,
            silence_secs,
        })
    }

    /// Whether the device is currently considered online.
    pub fn is_online(&self) -> bool {
        self.online
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_heartbeat_is_online_edge() {
        let mut monitor = HeartbeatMonitor::new(10.0);
        let event = monitor.observe_heartbeat(100.0).expect("online edge");
        assert_eq!(event.status, LivenessStatus::Online);
        assert_eq!(event.silence_secs, 0.0);
        assert!(monitor.is_online());
    }

    #[test]
    fn test_repeated_heartbeats_are_silent() {
        let mut monitor = HeartbeatMonitor::new(10.0);
        monitor.observe_heartbeat(100.0);
        assert!(monitor.observe_heartbeat(105.0).is_none());
        assert!(monitor.observe_heartbeat(110.0).is_none());
    }

    #[test]
    fn test_timeout_fires_offline_once() {
        let mut monitor = HeartbeatMonitor::new(10.0);
        monitor.observe_heartbeat(100.0);

        assert!(monitor.check(105.0).is_none());
        let offline = monitor.check(111.0).expect("offline edge");
        assert_eq!(offline.status, LivenessStatus::Offline);
        assert_eq!(offline.silence_secs, 11.0);

        // Still silent: no repeat while the outage continues.
        assert!(monitor.check(120.0).is_none());
        assert!(monitor.check(500.0).is_none());
    }

    #[test]
    fn test_recovery_after_outage() {
        let mut monitor = HeartbeatMonitor::new(10.0);
        monitor.observe_heartbeat(100.0);
        monitor.check(111.0);

        let online = monitor.observe_heartbeat(130.0).expect("recovery edge");
        assert_eq!(online.status, LivenessStatus::Online);
        assert_eq!(online.silence_secs, 30.0);

        // And a later outage reports again.
        let offline = monitor.check(141.0).expect("second outage");
        assert_eq!(offline.status, LivenessStatus::Offline);
    }

    #[test]
    fn test_device_that_never_spoke_goes_offline() {
        let mut monitor = HeartbeatMonitor::new(10.0);
        // First check seeds the reference clock.
        assert!(monitor.check(100.0).is_none());
        let offline = monitor.check(110.0).expect("offline without any heartbeat");
        assert_eq!(offline.status, LivenessStatus::Offline);
        assert_eq!(offline.silence_secs, 10.0);
        assert!(monitor.check(200.0).is_none());
    }
}
