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

//! Selection of the track points which end up in the KML output.

/// Only every `SAMPLING_RATIO`th track point is written.
pub const SAMPLING_RATIO: u64 = 10;

/// Counts completed track points across the whole document.
#[derive(Debug, Default)]
pub struct Sampler {
    count: u64,
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed point and return whether it should be written.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        self.count % SAMPLING_RATIO == 0
    }

    /// Number of points counted so far.
    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tenth_point_is_selected() {
        let mut sampler = Sampler::new();
        let selected: Vec<u64> = (1..=35).filter(|_| sampler.tick()).collect();
        assert_eq!(selected, vec![10, 20, 30]);
        assert_eq!(sampler.count(), 35);
    }

    #[test]
    fn first_point_is_skipped() {
        assert!(!Sampler::new().tick());
    }
}
