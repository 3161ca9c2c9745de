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

//! Element states and the tag transition table.
//!
//! Tag names are matched literally, including their namespace prefix. A
//! document that binds the extension namespaces to other prefixes is not
//! recognized.

use log::debug;

use crate::Error;

/// Semantic context of the innermost open recognized element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ElementState {
    #[default]
    Ignore,
    Track,
    Point,
    Time,
    Elevation,
    Extensions,
    ExtSpeed,
    ExtAccuracy,
    ExtCourse,
    ExtSignal,
}

/// Tags with a meaning for the conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    /// Root `<gpx>` element, which frames the KML output.
    Gpx,
    Track,
    TrackPoint,
    Time,
    Elevation,
    Extensions,
    Speed,
    Accuracy,
    Course,
    SignalStrength,
}

impl Tag {
    /// Look up the tag for a qualified element `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "gpx" => Self::Gpx,
            "trk" => Self::Track,
            "trkpt" => Self::TrackPoint,
            "time" => Self::Time,
            "ele" => Self::Elevation,
            "extensions" => Self::Extensions,
            "gpx10:speed" => Self::Speed,
            "ogt10:accuracy" => Self::Accuracy,
            "gpx10:course" => Self::Course,
            "gpx10:signal_strength" => Self::SignalStrength,
            _ => return None,
        })
    }

    /// Qualified name of this tag as it appears in GPX.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gpx => "gpx",
            Self::Track => "trk",
            Self::TrackPoint => "trkpt",
            Self::Time => "time",
            Self::Elevation => "ele",
            Self::Extensions => "extensions",
            Self::Speed => "gpx10:speed",
            Self::Accuracy => "ogt10:accuracy",
            Self::Course => "gpx10:course",
            Self::SignalStrength => "gpx10:signal_strength",
        }
    }

    /// Return `(state on open, state on close)` for this tag.
    ///
    /// The state on close is the one the tag is expected to be nested in.
    /// `<gpx>` has no entry because it does not change the state.
    pub fn transition(self) -> Option<(ElementState, ElementState)> {
        use ElementState::*;

        Some(match self {
            Self::Gpx => return None,
            Self::Track => (Track, Ignore),
            Self::TrackPoint => (Point, Track),
            Self::Time => (Time, Point),
            Self::Elevation => (Elevation, Point),
            Self::Extensions => (Extensions, Point),
            Self::Speed => (ExtSpeed, Extensions),
            Self::Accuracy => (ExtAccuracy, Extensions),
            Self::Course => (ExtCourse, Extensions),
            Self::SignalStrength => (ExtSignal, Extensions),
        })
    }
}

/// Stack of entered states.
///
/// Opening a tag remembers the state it was opened in, closing it restores
/// that state. This keeps the context correct even when tags show up outside
/// their usual parent.
#[derive(Debug, Default)]
pub struct StateStack {
    current: ElementState,
    entered: Vec<(Tag, ElementState)>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ElementState {
        self.current
    }

    /// Enter the open state of `tag`, if it has one.
    pub fn open(&mut self, tag: Tag) {
        let Some((open, expected_parent)) = tag.transition() else {
            return;
        };
        if self.current != expected_parent {
            debug!(
                "<{}> opened in state {:?} instead of {:?}",
                tag.name(),
                self.current,
                expected_parent
            );
        }
        self.entered.push((tag, self.current));
        self.current = open;
    }

    /// Leave `tag` and restore the state it was opened in.
    pub fn close(&mut self, tag: Tag) -> Result<(), Error> {
        if tag.transition().is_none() {
            return Ok(());
        }
        match self.entered.pop() {
            Some((open_tag, previous)) if open_tag == tag => {
                self.current = previous;
                Ok(())
            }
            _ => Err(Error::UnbalancedTag(tag.name().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for tag in [
            Tag::Gpx,
            Tag::Track,
            Tag::TrackPoint,
            Tag::Time,
            Tag::Elevation,
            Tag::Extensions,
            Tag::Speed,
            Tag::Accuracy,
            Tag::Course,
            Tag::SignalStrength,
        ] {
            assert_eq!(Tag::from_name(tag.name()), Some(tag));
        }
    }

    #[test]
    fn prefixes_are_literal() {
        assert_eq!(Tag::from_name("speed"), None);
        assert_eq!(Tag::from_name("gpxx:speed"), None);
        assert_eq!(Tag::from_name("gpx10:accuracy"), None);
        assert_eq!(Tag::from_name("wpt"), None);
    }

    #[test]
    fn nested_tags_restore_state() {
        let mut stack = StateStack::new();
        stack.open(Tag::Gpx);
        assert_eq!(stack.current(), ElementState::Ignore);
        stack.open(Tag::Track);
        stack.open(Tag::TrackPoint);
        stack.open(Tag::Extensions);
        stack.open(Tag::SignalStrength);
        assert_eq!(stack.current(), ElementState::ExtSignal);

        stack.close(Tag::SignalStrength).unwrap();
        assert_eq!(stack.current(), ElementState::Extensions);
        stack.close(Tag::Extensions).unwrap();
        assert_eq!(stack.current(), ElementState::Point);
        stack.close(Tag::TrackPoint).unwrap();
        assert_eq!(stack.current(), ElementState::Track);
        stack.close(Tag::Track).unwrap();
        stack.close(Tag::Gpx).unwrap();
        assert_eq!(stack.current(), ElementState::Ignore);
        assert!(stack.close(Tag::Track).is_err());
    }

    #[test]
    fn unexpected_parent_restores_actual_state() {
        let mut stack = StateStack::new();
        // `<time>` inside `<metadata>` is entered from `Ignore`.
        stack.open(Tag::Time);
        assert_eq!(stack.current(), ElementState::Time);
        stack.close(Tag::Time).unwrap();
        assert_eq!(stack.current(), ElementState::Ignore);
    }

    #[test]
    fn mismatched_close_fails() {
        let mut stack = StateStack::new();
        stack.open(Tag::Track);
        stack.open(Tag::TrackPoint);
        assert!(matches!(
            stack.close(Tag::Track),
            Err(Error::UnbalancedTag(name)) if name == "trk"
        ));
    }

    #[test]
    fn close_without_open_fails() {
        let mut stack = StateStack::new();
        assert!(stack.close(Tag::Elevation).is_err());
    }
}
