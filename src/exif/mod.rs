//! EXIF metadata extraction.
//!
//! Two stages:
//!
//! - [`read_raw_tags`] — the metadata reader: tag-id → value mapping for one JPEG,
//!   with the GPS sub-IFD nested under tag `0x8825`
//! - [`normalize`] — resolves ids to names through the static [`tags`] tables
//!
//! [`extract`] runs both. [`NormalizedMetadata::location`] pulls the latitude
//! and longitude triples out of the normalized GPS block.

mod reader;
pub mod tags;

pub use reader::read_raw_tags;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::coords::Sexagesimal;
use crate::error::MetadataError;

/// A single tag value, simplified from the decoder's representation.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    /// Unsigned rationals already divided out (e.g. GPS degrees/minutes/seconds).
    Numbers(Vec<f64>),
    /// Any other value, in the decoder's display form.
    Other(String),
}

/// One raw entry: either a plain value or a nested sub-IFD.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry {
    Value(TagValue),
    Block(BTreeMap<u16, TagValue>),
}

/// Raw tag-id → entry mapping as produced by the metadata reader.
pub type RawTags = BTreeMap<u16, RawEntry>;

/// A resolved tag name, or the numeric id when the tables don't know it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagKey {
    Name(&'static str),
    Id(u16),
}

impl TagKey {
    fn resolve(id: u16, table: fn(u16) -> Option<&'static str>) -> Self {
        table(id).map_or(Self::Id(id), Self::Name)
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedEntry {
    Value(TagValue),
    Block(BTreeMap<TagKey, TagValue>),
}

/// Tag name → value mapping for one image.
///
/// Named tags are keyed by their `&'static str` name so [`get`](Self::get) is a
/// map lookup. Ids the tables don't know are kept apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedMetadata {
    named: BTreeMap<&'static str, NormalizedEntry>,
    unknown: BTreeMap<u16, NormalizedEntry>,
}

impl NormalizedMetadata {
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.unknown.is_empty()
    }

    pub fn len(&self) -> usize {
        self.named.len() + self.unknown.len()
    }

    pub fn get(&self, name: &str) -> Option<&NormalizedEntry> {
        self.named.get(name)
    }

    /// Named tags first, then unknown ids.
    pub fn iter(&self) -> impl Iterator<Item = (TagKey, &NormalizedEntry)> {
        self.named
            .iter()
            .map(|(&name, entry)| (TagKey::Name(name), entry))
            .chain(self.unknown.iter().map(|(&id, entry)| (TagKey::Id(id), entry)))
    }

    fn insert(&mut self, key: TagKey, entry: NormalizedEntry) {
        match key {
            TagKey::Name(name) => self.named.insert(name, entry),
            TagKey::Id(id) => self.unknown.insert(id, entry),
        };
    }

    /// The normalized GPS block, if the image carries one.
    pub fn gps(&self) -> Option<&BTreeMap<TagKey, TagValue>> {
        match self.get(tags::GPS_INFO_NAME)? {
            NormalizedEntry::Block(block) => Some(block),
            NormalizedEntry::Value(_) => None,
        }
    }

    /// Latitude and longitude triples, when both are present and well formed.
    pub fn location(&self) -> Option<(Sexagesimal, Sexagesimal)> {
        let gps = self.gps()?;
        let latitude = triple(gps.get(&TagKey::Name("GPSLatitude"))?)?;
        let longitude = triple(gps.get(&TagKey::Name("GPSLongitude"))?)?;
        Some((latitude, longitude))
    }
}

fn triple(value: &TagValue) -> Option<Sexagesimal> {
    match value {
        TagValue::Numbers(n) if n.len() == 3 && n.iter().all(|v| v.is_finite()) => {
            Some(Sexagesimal::new(n[0], n[1], n[2]))
        }
        _ => None,
    }
}

/// Resolve raw tag ids to names, descending into the GPS block.
pub fn normalize(raw: &RawTags) -> NormalizedMetadata {
    let mut meta = NormalizedMetadata::default();

    for (&id, entry) in raw {
        let key = TagKey::resolve(id, tags::tag_name);
        let normalized = match entry {
            RawEntry::Block(block) if key == TagKey::Name(tags::GPS_INFO_NAME) => {
                NormalizedEntry::Block(
                    block
                        .iter()
                        .map(|(&sub, value)| (TagKey::resolve(sub, tags::gps_tag_name), value.clone()))
                        .collect(),
                )
            }
            // Unknown sub-IFDs keep their ids.
            RawEntry::Block(block) => NormalizedEntry::Block(
                block
                    .iter()
                    .map(|(&sub, value)| (TagKey::Id(sub), value.clone()))
                    .collect(),
            ),
            RawEntry::Value(value) => NormalizedEntry::Value(value.clone()),
        };
        meta.insert(key, normalized);
    }

    meta
}

/// Read and normalize the metadata of a JPEG file.
pub fn extract(path: &Path) -> Result<NormalizedMetadata, MetadataError> {
    let raw = read_raw_tags(path)?;
    Ok(normalize(&raw))
}
