//! Pointer input events for the overlay.
//!
//! Positions are viewport pixel coordinates. Events can be serialized as
//! JSONL so interaction sessions can be scripted and replayed.

use serde::{Deserialize, Serialize};

/// A single pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Primary button pressed.
    Down { x: f64, y: f64 },
    /// Pointer moved (with or without the button held).
    Move { x: f64, y: f64 },
    /// Primary button released.
    Up,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::Down { x, y }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::Move { x, y }
    }
}

/// Parse a JSONL event script. Blank lines and `#` comments are skipped.
pub fn parse_pointer_script(content: &str) -> Result<Vec<PointerEvent>, serde_json::Error> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&PointerEvent::down(1.0, 2.0)).unwrap();
        assert_eq!(json, r#"{"type":"down","x":1.0,"y":2.0}"#);
        assert_eq!(serde_json::to_string(&PointerEvent::Up).unwrap(), r#"{"type":"up"}"#);
    }

    #[test]
    fn test_parse_script_skips_comments() {
        let script = "# drag a line\n{\"type\":\"down\",\"x\":400,\"y\":300}\n\n{\"type\":\"move\",\"x\":450,\"y\":300}\n{\"type\":\"up\"}\n";
        let events = parse_pointer_script(script).unwrap();
        assert_eq!(
            events,
            vec![
                PointerEvent::down(400.0, 300.0),
                PointerEvent::moved(450.0, 300.0),
                PointerEvent::Up
            ]
        );
    }

    #[test]
    fn test_parse_script_rejects_unknown_events() {
        assert!(parse_pointer_script(r#"{"type":"rotate","angle":1}"#).is_err());
    }
}
