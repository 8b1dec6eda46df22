//! Recording publish sink.

use otgw_gateway::{PublishSink, Value};

/// A sink that records every published (target, value) pair.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<(&'static str, Value)>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in publish order.
    pub fn events(&self) -> &[(&'static str, Value)] {
        &self.events
    }

    /// The most recent value published to a target.
    pub fn last_for(&self, target: &str) -> Option<&Value> {
        self.events
            .iter()
            .rev()
            .find(|(t, _)| *t == target)
            .map(|(_, v)| v)
    }

    /// Every value published to a target, in order.
    pub fn values_for(&self, target: &str) -> Vec<&Value> {
        self.events
            .iter()
            .filter(|(t, _)| *t == target)
            .map(|(_, v)| v)
            .collect()
    }

    /// Drop all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl PublishSink for RecordingSink {
    fn publish(&mut self, target: &'static str, value: Value) {
        log::info!("publish {} = {}", target, value);
        self.events.push((target, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_for_returns_latest() {
        let mut sink = RecordingSink::new();
        sink.publish("t_boiler", Value::F32(45.5));
        sink.publish("t_dhw", Value::F32(51.0));
        sink.publish("t_boiler", Value::F32(46.0));
        assert_eq!(sink.last_for("t_boiler"), Some(&Value::F32(46.0)));
        assert_eq!(sink.values_for("t_boiler").len(), 2);
        assert_eq!(sink.last_for("t_outside"), None);
    }
}
