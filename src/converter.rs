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

//! The streaming GPX reader which drives the KML output.

use std::io::{BufRead, Write};

use log::{debug, trace};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::kml::{write_footer, write_header, write_placemark};
use crate::point::TrackPoint;
use crate::sampler::Sampler;
use crate::state::{StateStack, Tag};
use crate::Error;

/// Parser context for a single conversion.
///
/// The `open_tag`, `close_tag`, and `character_data` handlers take the
/// events of a GPX document in order and write KML to the sink as soon as
/// possible. [`Converter::run`] feeds them from a quick-xml reader.
pub struct Converter<W: Write> {
    sink: W,
    states: StateStack,
    point: Option<TrackPoint>,
    sampler: Sampler,
    placemarks: u64,
}

impl<W: Write> Converter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            states: StateStack::new(),
            point: None,
            sampler: Sampler::new(),
            placemarks: 0,
        }
    }

    /// Handle the start of the element `name`.
    pub fn open_tag(
        &mut self,
        name: &str,
        attributes: Vec<(String, String)>,
    ) -> Result<(), Error> {
        let Some(tag) = Tag::from_name(name) else {
            return Ok(());
        };

        match tag {
            Tag::Gpx => {
                debug!("writing KML header");
                write_header(&mut self.sink)?;
            }
            Tag::TrackPoint => {
                if self.point.is_some() {
                    return Err(Error::NestedTrackPoint);
                }
                self.point = Some(TrackPoint::new(attributes));
            }
            _ => {}
        }
        self.states.open(tag);

        Ok(())
    }

    /// Handle the end of the element `name`.
    pub fn close_tag(&mut self, name: &str) -> Result<(), Error> {
        let Some(tag) = Tag::from_name(name) else {
            return Ok(());
        };

        self.states.close(tag)?;
        match tag {
            Tag::TrackPoint => self.finish_point()?,
            Tag::Gpx => {
                debug!("writing KML footer");
                write_footer(&mut self.sink)?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Handle character data, which is only of interest inside a track point.
    pub fn character_data(&mut self, text: &str) -> Result<(), Error> {
        match self.point {
            Some(ref mut point) => point.record(self.states.current(), text),
            None => Ok(()),
        }
    }

    /// Count the finished point and write it if it is sampled.
    fn finish_point(&mut self) -> Result<(), Error> {
        let Some(point) = self.point.take() else {
            return Ok(());
        };
        if !self.sampler.tick() {
            return Ok(());
        }

        trace!("writing track point {} as placemark", self.sampler.count());
        write_placemark(&mut self.sink, &point)?;
        self.placemarks += 1;

        Ok(())
    }

    /// Read a complete GPX document from `source`.
    ///
    /// The sink is flushed when the document has been read completely.
    pub fn run(&mut self, source: impl BufRead) -> Result<(), Error> {
        let mut reader = Reader::from_reader(source);
        let mut buf = vec![];
        let mut depth = 0usize;
        let mut seen_element = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                    let attributes = read_attributes(&reader, &e)?;
                    self.open_tag(&name, attributes)?;
                    depth += 1;
                    seen_element = true;
                }
                Event::Empty(e) => {
                    let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                    let attributes = read_attributes(&reader, &e)?;
                    self.open_tag(&name, attributes)?;
                    self.close_tag(&name)?;
                    seen_element = true;
                }
                Event::End(e) => {
                    let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                    self.close_tag(&name)?;
                    depth = depth.saturating_sub(1);
                }
                Event::Text(e) => self.character_data(&e.unescape()?)?,
                Event::CData(e) => self.character_data(&reader.decoder().decode(&e)?)?,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if depth > 0 || !seen_element {
            return Err(Error::UnexpectedEof);
        }

        debug!(
            "read {} track points, wrote {} placemarks",
            self.points_seen(),
            self.placemarks
        );
        self.sink.flush()?;

        Ok(())
    }

    /// Number of completed track points.
    pub fn points_seen(&self) -> u64 {
        self.sampler.count()
    }

    pub fn placemarks_written(&self) -> u64 {
        self.placemarks
    }

    /// Give back the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Collect the qualified names and unescaped values of all attributes.
fn read_attributes<R>(
    reader: &Reader<R>,
    start: &BytesStart,
) -> Result<Vec<(String, String)>, Error> {
    start
        .attributes()
        .map(|attr| -> Result<(String, String), Error> {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
            let value = attr.unescape_value()?.into_owned();
            Ok((key, value))
        })
        .collect()
}
