// Copyright 2023 Viktor Reusch
//
// This file is part of gpx_signal_kml.
//
// gpx_signal_kml is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// gpx_signal_kml is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License
// for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with gpx_signal_kml. If not, see <https://www.gnu.org/licenses/>.

//! Accumulator for the track point which is currently being read.

use crate::state::ElementState;
use crate::Error;

/// Highest signal strength reported by the tracker.
pub const MAX_SIGNAL: u8 = 31;

/// Data collected between `<trkpt>` and `</trkpt>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackPoint {
    /// Raw attributes of the `<trkpt>` tag in document order.
    pub attributes: Vec<(String, String)>,
    pub time: Option<String>,
    /// Elevation in meters.
    pub elevation: Option<f64>,
    pub speed: Option<f64>,
    pub accuracy: Option<f64>,
    /// Course in degrees.
    pub course: Option<f64>,
    /// Signal strength, usually from 0 to [`MAX_SIGNAL`]. Trackers write
    /// other values such as 99 when the strength is unknown.
    pub signal: Option<i64>,
}

impl TrackPoint {
    /// Start a new point with the attributes of its opening tag.
    pub fn new(attributes: Vec<(String, String)>) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    /// Raw value of the attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Signal strength if it has a matching icon style.
    pub fn icon(&self) -> Option<u8> {
        self.signal
            .and_then(|signal| u8::try_from(signal).ok())
            .filter(|signal| *signal <= MAX_SIGNAL)
    }

    /// Store character data read in `state`.
    ///
    /// Text in states without a field is dropped. Time is kept as raw text,
    /// numbers may be surrounded by whitespace.
    pub fn record(&mut self, state: ElementState, text: &str) -> Result<(), Error> {
        if state == ElementState::Time {
            self.time.get_or_insert_with(String::new).push_str(text);
            return Ok(());
        }

        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        match state {
            ElementState::Elevation => self.elevation = Some(parse_float("elevation", text)?),
            ElementState::ExtSpeed => self.speed = Some(parse_float("speed", text)?),
            ElementState::ExtAccuracy => self.accuracy = Some(parse_float("accuracy", text)?),
            ElementState::ExtCourse => self.course = Some(parse_float("course", text)?),
            ElementState::ExtSignal => self.signal = Some(parse_signal(text)?),
            ElementState::Ignore
            | ElementState::Time
            | ElementState::Track
            | ElementState::Point
            | ElementState::Extensions => {}
        }
        Ok(())
    }
}

fn parse_float(field: &'static str, text: &str) -> Result<f64, Error> {
    text.parse().map_err(|source| Error::InvalidFloat {
        field,
        value: text.to_string(),
        source,
    })
}

fn parse_signal(text: &str) -> Result<i64, Error> {
    text.parse().map_err(|source| Error::InvalidInteger {
        field: "signal strength",
        value: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> TrackPoint {
        TrackPoint::new(vec![
            ("lat".to_string(), "48.1".to_string()),
            ("lon".to_string(), "11.5".to_string()),
        ])
    }

    #[test]
    fn attributes_are_kept() {
        let point = point();
        assert_eq!(point.attribute("lon"), Some("11.5"));
        assert_eq!(point.attribute("lat"), Some("48.1"));
        assert_eq!(point.attribute("ele"), None);
    }

    #[test]
    fn fields_are_parsed_by_state() {
        let mut point = point();
        point.record(ElementState::Time, "2011-05-01T10:00:00Z").unwrap();
        point.record(ElementState::Elevation, " 512.25\n").unwrap();
        point.record(ElementState::ExtSpeed, "3.5").unwrap();
        point.record(ElementState::ExtAccuracy, "12").unwrap();
        point.record(ElementState::ExtCourse, "270.04").unwrap();
        point.record(ElementState::ExtSignal, "17").unwrap();

        assert_eq!(point.time.as_deref(), Some("2011-05-01T10:00:00Z"));
        assert_eq!(point.elevation, Some(512.25));
        assert_eq!(point.speed, Some(3.5));
        assert_eq!(point.accuracy, Some(12.0));
        assert_eq!(point.course, Some(270.04));
        assert_eq!(point.signal, Some(17));
    }

    #[test]
    fn text_outside_fields_is_dropped() {
        let mut point = point();
        point.record(ElementState::Point, "stray").unwrap();
        point.record(ElementState::Extensions, "stray").unwrap();
        point.record(ElementState::Elevation, "  \n\t").unwrap();
        assert_eq!(point, self::point());
    }

    #[test]
    fn time_chunks_are_joined() {
        let mut point = point();
        point.record(ElementState::Time, "2011-05-01").unwrap();
        point.record(ElementState::Time, "T10:00:00Z").unwrap();
        assert_eq!(point.time.as_deref(), Some("2011-05-01T10:00:00Z"));
    }

    #[test]
    fn non_numeric_text_fails() {
        let mut point = point();
        assert!(matches!(
            point.record(ElementState::ExtSpeed, "fast"),
            Err(Error::InvalidFloat { field: "speed", .. })
        ));
        assert!(matches!(
            point.record(ElementState::ExtSignal, "3.5"),
            Err(Error::InvalidInteger { .. })
        ));
    }

    #[test]
    fn any_signal_integer_is_kept() {
        let mut point = point();
        point.record(ElementState::ExtSignal, "31").unwrap();
        assert_eq!(point.signal, Some(31));
        assert_eq!(point.icon(), Some(31));

        point.record(ElementState::ExtSignal, "99").unwrap();
        assert_eq!(point.signal, Some(99));
        assert_eq!(point.icon(), None);

        point.record(ElementState::ExtSignal, "-1").unwrap();
        assert_eq!(point.icon(), None);

        point.record(ElementState::ExtSignal, "0").unwrap();
        assert_eq!(point.icon(), Some(0));
    }

    #[test]
    fn time_is_raw_text() {
        let mut point = point();
        point.record(ElementState::Time, "\n  2011-05-01").unwrap();
        point.record(ElementState::Time, " T10:00:00Z ").unwrap();
        assert_eq!(point.time.as_deref(), Some("\n  2011-05-01 T10:00:00Z "));
    }
}
