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

//! This is a very simple command-line interface for the GPX-to-KML converter.

use std::{
    io::{stdin, stdout, BufWriter},
    process::ExitCode,
};

use gpx_signal_kml::convert;

/// Converts from STDIN to STDOUT. Logging goes to STDERR and is configured
/// through `RUST_LOG`.
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let sink = BufWriter::new(stdout().lock());
    match convert(stdin().lock(), sink) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Conversion failed with: {err}");
            ExitCode::FAILURE
        }
    }
}
