//! The per-connection ingestion loop and the schema of inbound messages.

use std::{fmt::Display, str::FromStr};

use futures::{Stream, StreamExt};
use model::{
    coordinate::Coordinate,
    fix::{Fix, FixMetadata},
};
use serde_json::{Map, Value};

use crate::{database::Database, viewer::ViewerId, Tracker};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("message is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message is not a JSON object")]
    NotAnObject,
    #[error("field `{0}` is missing")]
    MissingField(&'static str),
    #[error("field `{0}` is not a number")]
    NotANumber(&'static str),
    #[error("field `{0}` is not finite")]
    NotFinite(&'static str),
}

/// A validated inbound position.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundFix {
    pub coordinate: Coordinate,
    pub metadata: FixMetadata,
}

impl InboundFix {
    pub fn new(coordinate: Coordinate, metadata: FixMetadata) -> Self {
        Self {
            coordinate,
            metadata,
        }
    }

    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Requires numeric `lat` and `lng`. The descriptive packet fields are
    /// picked up when they are strings and ignored otherwise.
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let object = value.as_object().ok_or(ParseError::NotAnObject)?;
        let coordinate = Coordinate::new(number(object, "lat")?, number(object, "lng")?);
        let metadata = FixMetadata {
            header: string(object, "header"),
            imei: string(object, "imei"),
            packet_type: string(object, "packet_type"),
            time: string(object, "time"),
            direction_lat: string(object, "direction_lat"),
            direction_lng: string(object, "direction_lng"),
            date: string(object, "date"),
            checksum: string(object, "checksum"),
        };
        Ok(Self::new(coordinate, metadata))
    }

    pub fn into_fix(self) -> Fix {
        Fix::new(self.coordinate, self.metadata)
    }
}

impl FromStr for InboundFix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn number(object: &Map<String, Value>, field: &'static str) -> Result<f64, ParseError> {
    let number = object
        .get(field)
        .ok_or(ParseError::MissingField(field))?
        .as_f64()
        .ok_or(ParseError::NotANumber(field))?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(ParseError::NotFinite(field))
    }
}

fn string(object: &Map<String, Value>, field: &str) -> Option<String> {
    object.get(field)?.as_str().map(str::to_owned)
}

/// How an ingestion loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEnd {
    Closed,
    Errored(String),
}

/// Runs the ingestion loop of one connection until its inbound stream ends
/// or fails.
///
/// Every parsable message is accepted and broadcast; unparsable messages
/// are logged and skipped. When the connection also acts as a viewer, pass
/// its id so it is unregistered on exit.
pub async fn run<D, S, E>(
    tracker: &Tracker<D>,
    mut inbound: S,
    viewer: Option<ViewerId>,
) -> ConnectionEnd
where
    D: Database,
    S: Stream<Item = Result<String, E>> + Unpin,
    E: Display,
{
    let end = loop {
        match inbound.next().await {
            None => break ConnectionEnd::Closed,
            Some(Err(why)) => break ConnectionEnd::Errored(why.to_string()),
            Some(Ok(text)) => match InboundFix::parse(&text) {
                Ok(inbound_fix) => {
                    tracker.accept(inbound_fix.into_fix());
                }
                Err(why) => log::warn!("skipping inbound message: {}", why),
            },
        }
    };

    if let Some(id) = viewer {
        tracker.disconnect_viewer(id);
    }
    end
}
