use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};
use kamadak_exif::{Context, Field, In, Reader, Value};
use std::collections::BTreeMap;
use std::path::Path;

use super::tags::GPS_INFO;
use super::{RawEntry, RawTags, TagValue};
use crate::error::MetadataError;

/// Read the raw EXIF tag dictionary of a JPEG file.
///
/// IFD0 and Exif sub-IFD tags of the primary image land at the top level; the
/// GPS sub-IFD is nested under tag `0x8825`, keyed by GPS tag ids. Thumbnail
/// and Interop entries are left out.
///
/// A file without an EXIF segment yields an empty mapping. A segment that is
/// present but cannot be decoded yields [`MetadataError`].
pub fn read_raw_tags(path: &Path) -> Result<RawTags, MetadataError> {
    let bytes = std::fs::read(path)
        .map_err(|e| MetadataError::new("image file could not be read", e))?;

    let jpeg = Jpeg::from_bytes(Bytes::from(bytes))
        .map_err(|e| MetadataError::new("JPEG segments could not be parsed", e.to_string()))?;

    let Some(tiff) = jpeg.exif() else {
        log::debug!("No EXIF data found in {}", path.display());
        return Ok(RawTags::new());
    };

    let exif = Reader::new()
        .read_raw(tiff.to_vec())
        .map_err(|e| MetadataError::new("EXIF segment could not be parsed", e))?;

    let mut raw = RawTags::new();
    let mut gps: Option<BTreeMap<u16, TagValue>> = None;

    for field in exif.fields() {
        if field.ifd_num != In::PRIMARY {
            continue;
        }
        let code = field.tag.number();
        match field.tag.context() {
            Context::Gps => {
                gps.get_or_insert_with(BTreeMap::new)
                    .insert(code, field_to_value(field));
            }
            // The pointer itself is replaced by the nested block below.
            Context::Tiff if code == GPS_INFO => {
                gps.get_or_insert_with(BTreeMap::new);
            }
            Context::Tiff | Context::Exif => {
                raw.insert(code, RawEntry::Value(field_to_value(field)));
            }
            _ => {}
        }
    }

    if let Some(block) = gps {
        raw.insert(GPS_INFO, RawEntry::Block(block));
    }

    log::debug!("Read {} EXIF tags from {}", raw.len(), path.display());
    Ok(raw)
}

/// Convert a kamadak-exif field to a [`TagValue`].
fn field_to_value(field: &Field) -> TagValue {
    match field.value {
        Value::Ascii(ref parts) => TagValue::Text(
            parts
                .iter()
                .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Rational(ref vec) => TagValue::Numbers(vec.iter().map(|r| r.to_f64()).collect()),
        _ => TagValue::Other(field.display_value().to_string()),
    }
}
