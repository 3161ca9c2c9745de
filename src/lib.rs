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

//! Library for converting signal tracking logs from
//! [GPX](https://www.topografix.com/gpx.asp) to
//! [KML](https://developers.google.com/kml).
//!
//! Track points are read in a single pass. Every tenth point is written as a
//! KML _Placemark_ whose icon reflects the recorded signal strength and whose
//! description lists time, speed, accuracy, course, and elevation.
//!
//! See [`convert`] for information on how to use this library.

use std::io::{self, BufReader, Read};
use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

pub mod converter;
pub mod kml;
pub mod point;
pub mod sampler;
pub mod state;

pub use converter::Converter;
pub use sampler::SAMPLING_RATIO;

/// Error returned from the [`convert`] function.
#[derive(Error, Debug)]
pub enum Error {
    /// GPX is not well-formed XML.
    #[error("reading GPX failed: {0}")]
    Xml(#[from] quick_xml::Error),
    /// The GPX document ended before all elements were closed.
    #[error("reading GPX failed: unexpected end of document")]
    UnexpectedEof,
    /// A known element was closed without being open.
    #[error("reading GPX failed: unbalanced </{0}>")]
    UnbalancedTag(String),
    /// A `<trkpt>` was opened inside another one.
    #[error("reading GPX failed: nested <trkpt>")]
    NestedTrackPoint,
    /// A decimal field could not be parsed.
    #[error("invalid {field} {value:?}: {source}")]
    InvalidFloat {
        field: &'static str,
        value: String,
        source: ParseFloatError,
    },
    /// An integer field could not be parsed.
    #[error("invalid {field} {value:?}: {source}")]
    InvalidInteger {
        field: &'static str,
        value: String,
        source: ParseIntError,
    },
    /// A written track point lacks a coordinate attribute.
    #[error("track point has no {0} attribute")]
    MissingAttribute(&'static str),
    /// KML writing failed.
    #[error("writing KML failed: {0}")]
    Io(#[from] io::Error),
}

/// Read a GPX file and write a KML file.
///
/// A complete GPX file is read from `source`. The converted data is written
/// to `sink` while reading, so the `sink` might contain partial output if an
/// error occurs.
///
/// # Example
/// ```
/// # use gpx_signal_kml::convert;
/// #
/// let mut source = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>
/// <gpx version="1.1" creator="OpenGPSTracker"><trk><trkseg>"#);
/// for i in 1..=10 {
///     source.push_str(&format!(
///         r#"<trkpt lat="48.{i}" lon="2.{i}"><ele>35.04</ele></trkpt>"#
///     ));
/// }
/// source.push_str("</trkseg></trk></gpx>");
/// let mut sink = vec![];
///
/// convert(source.as_bytes(), &mut sink).expect("conversion failed");
///
/// let kml = String::from_utf8(sink).expect("KML data is not valid UTF-8");
/// assert!(kml.contains("<kml"));
/// assert_eq!(kml.matches("<Placemark>").count(), 1);
/// assert!(kml.contains("2.10,48.10"));
/// assert!(kml.contains("35.0 meters"));
/// ```
pub fn convert(source: impl Read, sink: impl io::Write) -> Result<(), Error> {
    let mut converter = Converter::new(sink);
    converter.run(BufReader::new(source))
}
