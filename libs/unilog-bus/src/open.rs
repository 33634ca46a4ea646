//! Loading buses from any description source
//!
//! [`open_bus`] accepts whatever describes a bus: an already parsed mapping,
//! an open reader, a file path or a string. Strings naming an existing file
//! are opened; anything else is parsed as inline YAML.

use crate::bus::Bus;
use crate::error::{BusError, Result};
use crate::registry::from_dict;
use serde_yaml::{Mapping, Value as YamlValue};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A source a bus can be loaded from
pub enum BusSource<'a> {
    /// An already parsed description mapping
    Dict(Mapping),
    /// An open YAML stream
    Reader(Box<dyn Read + 'a>),
    /// A YAML description file
    Path(PathBuf),
    /// A file name or an inline YAML document
    Text(String),
}

impl BusSource<'_> {
    pub fn reader<'a>(reader: impl Read + 'a) -> BusSource<'a> {
        BusSource::Reader(Box::new(reader))
    }
}

impl From<Mapping> for BusSource<'_> {
    fn from(dict: Mapping) -> Self {
        BusSource::Dict(dict)
    }
}

impl From<File> for BusSource<'_> {
    fn from(file: File) -> Self {
        BusSource::Reader(Box::new(file))
    }
}

impl From<&Path> for BusSource<'_> {
    fn from(path: &Path) -> Self {
        BusSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for BusSource<'_> {
    fn from(path: PathBuf) -> Self {
        BusSource::Path(path)
    }
}

impl From<&str> for BusSource<'_> {
    fn from(text: &str) -> Self {
        BusSource::Text(text.to_string())
    }
}

impl From<String> for BusSource<'_> {
    fn from(text: String) -> Self {
        BusSource::Text(text)
    }
}

/// Load a bus from a dict, a reader, a path or a string
///
/// Dispatch order for strings: an existing file path is opened, everything
/// else is treated as an inline YAML document. Text that does not parse
/// into a mapping fails with [`BusError::NotABusDescription`].
pub fn open_bus<'a>(source: impl Into<BusSource<'a>>) -> Result<Box<dyn Bus>> {
    match source.into() {
        BusSource::Dict(dict) => from_dict(dict),
        BusSource::Reader(reader) => from_reader(reader),
        BusSource::Path(path) => from_path(path),
        BusSource::Text(text) => {
            if Path::new(&text).exists() {
                return from_path(&text);
            }
            let parsed: YamlValue = serde_yaml::from_str(&text)
                .map_err(|_| BusError::not_a_bus_description(preview(&text)))?;
            match parsed {
                YamlValue::Mapping(dict) => from_dict(dict),
                _ => Err(BusError::not_a_bus_description(preview(&text))),
            }
        }
    }
}

/// Load a bus from an open YAML stream
pub fn from_reader(reader: impl Read) -> Result<Box<dyn Bus>> {
    let parsed: YamlValue = serde_yaml::from_reader(reader)?;
    match parsed {
        YamlValue::Mapping(dict) => from_dict(dict),
        other => Err(BusError::not_a_bus_description(format!(
            "stream parsed to {:?}, expected a mapping",
            other
        ))),
    }
}

/// Load a bus from a description file
pub fn from_path(path: impl AsRef<Path>) -> Result<Box<dyn Bus>> {
    let path = path.as_ref();
    debug!("loading bus description from {}", path.display());
    from_reader(File::open(path)?)
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    if text.len() <= LIMIT {
        text.to_string()
    } else {
        let mut end = LIMIT;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
