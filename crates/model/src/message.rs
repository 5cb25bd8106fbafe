use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetKind {
    Clear,
}

/// Everything a viewer can be sent.
///
/// A fix serializes as `{"lat": .., "lng": ..}`, a reset notice as
/// `{"type": "clear"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ViewerMessage {
    Reset {
        #[serde(rename = "type")]
        kind: ResetKind,
    },
    Fix(Coordinate),
}

impl ViewerMessage {
    pub fn clear() -> Self {
        Self::Reset {
            kind: ResetKind::Clear,
        }
    }
}

impl From<Coordinate> for ViewerMessage {
    fn from(value: Coordinate) -> Self {
        Self::Fix(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_format() {
        let fix = ViewerMessage::from(Coordinate::new(54.5, 10.25));
        assert_eq!(
            serde_json::to_value(&fix).unwrap(),
            json!({"lat": 54.5, "lng": 10.25})
        );
        assert_eq!(
            serde_json::to_value(ViewerMessage::clear()).unwrap(),
            json!({"type": "clear"})
        );
    }

    #[test]
    fn reads_back_both_kinds() {
        let clear: ViewerMessage = serde_json::from_str(r#"{"type":"clear"}"#).unwrap();
        assert_eq!(clear, ViewerMessage::clear());

        let fix: ViewerMessage = serde_json::from_str(r#"{"lat":1.0,"lng":2.0}"#).unwrap();
        assert_eq!(fix, ViewerMessage::Fix(Coordinate::new(1.0, 2.0)));
    }
}
