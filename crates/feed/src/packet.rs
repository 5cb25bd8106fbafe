use std::num::ParseFloatError;

use model::{coordinate::Coordinate, fix::FixMetadata};
use tracking::ingest::InboundFix;

const MIN_FIELDS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    #[error("expected at least 10 fields, got {0}")]
    TooFewFields(usize),
    #[error("invalid latitude `{value}`: {source}")]
    InvalidLatitude {
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("invalid longitude `{value}`: {source}")]
    InvalidLongitude {
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("latitude `{0}` is not finite")]
    NonFiniteLatitude(String),
    #[error("longitude `{0}` is not finite")]
    NonFiniteLongitude(String),
}

/// Parses one device packet.
///
/// Fields: header, imei, packet type, time, latitude, latitude hemisphere,
/// longitude, longitude hemisphere, date, checksum. Extra fields are ignored.
pub fn parse(line: &str) -> Result<InboundFix, PacketError> {
    let line = line.trim_end();
    let line = line.strip_suffix('#').unwrap_or(line);

    let fields = line.split(',').collect::<Vec<_>>();
    if fields.len() < MIN_FIELDS {
        return Err(PacketError::TooFewFields(fields.len()));
    }

    let lat = fields[4]
        .trim()
        .parse::<f64>()
        .map_err(|source| PacketError::InvalidLatitude {
            value: fields[4].to_owned(),
            source,
        })?;
    let lng = fields[6]
        .trim()
        .parse::<f64>()
        .map_err(|source| PacketError::InvalidLongitude {
            value: fields[6].to_owned(),
            source,
        })?;
    if !lat.is_finite() {
        return Err(PacketError::NonFiniteLatitude(fields[4].to_owned()));
    }
    if !lng.is_finite() {
        return Err(PacketError::NonFiniteLongitude(fields[6].to_owned()));
    }

    let field = |index: usize| Some(fields[index].to_owned());
    Ok(InboundFix::new(
        Coordinate::new(lat, lng),
        FixMetadata {
            header: field(0),
            imei: field(1),
            packet_type: field(2),
            time: field(3),
            direction_lat: field(5),
            direction_lng: field(7),
            date: field(8),
            checksum: field(9),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKET: &str = "*HQ,865205030330012,V1,120000,54.3233,N,10.1228,E,040824,7#";

    #[test]
    fn parses_a_full_packet() {
        let fix = parse(PACKET).unwrap();
        assert_eq!(fix.coordinate, Coordinate::new(54.3233, 10.1228));

        let metadata = fix.metadata;
        assert_eq!(metadata.header.as_deref(), Some("*HQ"));
        assert_eq!(metadata.imei.as_deref(), Some("865205030330012"));
        assert_eq!(metadata.packet_type.as_deref(), Some("V1"));
        assert_eq!(metadata.time.as_deref(), Some("120000"));
        assert_eq!(metadata.direction_lat.as_deref(), Some("N"));
        assert_eq!(metadata.direction_lng.as_deref(), Some("E"));
        assert_eq!(metadata.date.as_deref(), Some("040824"));
        // the terminator is not part of the checksum
        assert_eq!(metadata.checksum.as_deref(), Some("7"));
    }

    #[test]
    fn line_endings_and_missing_terminator() {
        let with_crlf = parse(&format!("{}\r\n", PACKET)).unwrap();
        let without_terminator = parse(PACKET.trim_end_matches('#')).unwrap();
        assert_eq!(with_crlf, without_terminator);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let fix = parse("*HQ,1,V1,0,1.5,N,2.5,E,0,9,extra,fields#").unwrap();
        assert_eq!(fix.coordinate, Coordinate::new(1.5, 2.5));
        assert_eq!(fix.metadata.checksum.as_deref(), Some("9"));
    }

    #[test]
    fn rejects_short_packets() {
        assert!(matches!(
            parse("*HQ,1,V1,0,1.5,N,2.5,E#"),
            Err(PacketError::TooFewFields(8))
        ));
        assert!(matches!(parse(""), Err(PacketError::TooFewFields(1))));
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert!(matches!(
            parse("*HQ,1,V1,0,north,N,2.5,E,0,9#"),
            Err(PacketError::InvalidLatitude { .. })
        ));
        assert!(matches!(
            parse("*HQ,1,V1,0,1.5,N,,E,0,9#"),
            Err(PacketError::InvalidLongitude { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        for lat in ["NaN", "inf", "-infinity", "1e400"] {
            let packet = format!("*HQ,1,V1,0,{},N,2.5,E,0,9#", lat);
            assert!(
                matches!(parse(&packet), Err(PacketError::NonFiniteLatitude(_))),
                "{}",
                packet
            );
        }
        assert!(matches!(
            parse("*HQ,1,V1,0,1.5,N,NaN,E,0,9#"),
            Err(PacketError::NonFiniteLongitude(_))
        ));
    }
}
