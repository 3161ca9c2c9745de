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

//! KML output written piece by piece while the GPX input is read.

use std::borrow::Cow;
use std::io::{self, Write};

use quick_xml::escape::escape;

use crate::point::{TrackPoint, MAX_SIGNAL};
use crate::Error;

/// This line needs to be prepended to the KML output.
const XML_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
/// Namespace of the `<kml>` tag.
const NAMESPACE: &str = "http://earth.google.com/kml/2.1";

/// Write the document start with one icon style per signal strength.
///
/// The styles reference `icon_<n>.png`, which are expected next to the KML
/// file.
pub fn write_header(sink: &mut impl Write) -> io::Result<()> {
    writeln!(sink, "{XML_HEAD}")?;
    writeln!(sink, r#"<kml xmlns="{NAMESPACE}">"#)?;
    writeln!(sink, "\t<Document>")?;
    for signal in 0..=MAX_SIGNAL {
        write_style(sink, signal)?;
    }
    Ok(())
}

fn write_style(sink: &mut impl Write, signal: u8) -> io::Result<()> {
    write!(
        sink,
        concat!(
            "\n",
            "\t\t<Style id=\"icon_{sig}\">\n",
            "\t\t\t<IconStyle>\n",
            "\t\t\t\t<Icon>\n",
            "\t\t\t\t\t<href>icon_{sig}.png</href>\n",
            "\t\t\t\t</Icon>\n",
            "\t\t\t</IconStyle>\n",
            "\t\t</Style>\n",
        ),
        sig = signal
    )
}

/// Close the elements opened by [`write_header`].
pub fn write_footer(sink: &mut impl Write) -> io::Result<()> {
    writeln!(sink, "\t</Document>")?;
    writeln!(sink, "</kml>")
}

/// Write `point` as a _Placemark_.
///
/// The description lists only the fields which were present in the GPX. A
/// point without a signal strength in `0..=31` gets no style.
pub fn write_placemark(sink: &mut impl Write, point: &TrackPoint) -> Result<(), Error> {
    let lon = point
        .attribute("lon")
        .ok_or(Error::MissingAttribute("lon"))?;
    let lat = point
        .attribute("lat")
        .ok_or(Error::MissingAttribute("lat"))?;

    writeln!(sink, "\t\t<Placemark>")?;
    writeln!(sink, "\t\t\t<Point>")?;
    writeln!(sink, "\t\t\t\t<coordinates>")?;
    writeln!(sink, "\t\t\t\t\t{},{}", escape(lon), escape(lat))?;
    writeln!(sink, "\t\t\t\t</coordinates>")?;
    writeln!(sink, "\t\t\t</Point>")?;
    if let Some(icon) = point.icon() {
        writeln!(sink, "\t\t\t<styleUrl>#icon_{icon}</styleUrl>")?;
    }
    writeln!(sink, "\t\t\t<description>")?;
    writeln!(sink, "\t\t\t<![CDATA[")?;
    if let Some(ref time) = point.time {
        description_line(sink, "Time", format_args!("{}", cdata_safe(time)))?;
    }
    if let Some(signal) = point.signal {
        description_line(sink, "Signal Strength", format_args!("{signal} of {MAX_SIGNAL}"))?;
    }
    if let Some(speed) = point.speed {
        description_line(sink, "Speed", format_args!("{speed:.3}"))?;
    }
    if let Some(accuracy) = point.accuracy {
        description_line(sink, "Accuracy", format_args!("{accuracy:.3}"))?;
    }
    if let Some(course) = point.course {
        description_line(sink, "Course", format_args!("{course:.1} degrees"))?;
    }
    if let Some(elevation) = point.elevation {
        description_line(sink, "Elevation", format_args!("{elevation:.1} meters"))?;
    }
    writeln!(sink, "\t\t\t]]>")?;
    writeln!(sink, "\t\t\t</description>")?;
    writeln!(sink, "\t\t</Placemark>")?;

    Ok(())
}

/// Split `]]>` so that `text` cannot end the surrounding CDATA section.
fn cdata_safe(text: &str) -> Cow<str> {
    if text.contains("]]>") {
        Cow::Owned(text.replace("]]>", "]]]]><![CDATA[>"))
    } else {
        Cow::Borrowed(text)
    }
}

fn description_line(
    sink: &mut impl Write,
    label: &str,
    value: std::fmt::Arguments,
) -> io::Result<()> {
    writeln!(sink, "\t\t\t\t<strong>{label}</strong>: {value}<br/>")
}
