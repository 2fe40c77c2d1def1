//! Scripted pointer source.

use std::collections::VecDeque;

use framecam_common::error::{FramecamError, FramecamResult};
use framecam_overlay_model::event::{parse_pointer_script, PointerEvent};

use crate::PointerSource;

/// Replays a fixed sequence of pointer events.
pub struct ScriptedPointerSource {
    name: String,
    events: VecDeque<PointerEvent>,
}

impl ScriptedPointerSource {
    pub fn new(events: Vec<PointerEvent>) -> Self {
        Self {
            name: "scripted".to_string(),
            events: events.into(),
        }
    }

    /// Build a source from a JSONL script.
    pub fn from_script(script: &str) -> FramecamResult<Self> {
        let events = parse_pointer_script(script)
            .map_err(|e| FramecamError::config(format!("Invalid pointer script: {e}")))?;
        Ok(Self::new(events))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Events not yet polled.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl PointerSource for ScriptedPointerSource {
    fn poll(&mut self) -> Option<PointerEvent> {
        self.events.pop_front()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_drains_in_order() {
        let mut source =
            ScriptedPointerSource::new(vec![PointerEvent::down(1.0, 2.0), PointerEvent::Up]);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.poll(), Some(PointerEvent::down(1.0, 2.0)));
        assert_eq!(source.poll(), Some(PointerEvent::Up));
        assert_eq!(source.poll(), None);
    }

    #[test]
    fn test_bad_script_is_config_error() {
        let err = ScriptedPointerSource::from_script("{not json}").err().unwrap();
        assert!(matches!(err, FramecamError::Config { .. }));
    }
}
