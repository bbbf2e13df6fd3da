#![allow(dead_code)]

use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};
use photo_geotag::coords::DecimalCoordinate;
use photo_geotag::error::ResolveError;
use photo_geotag::geocode::{PlaceLabel, PlaceResolver};
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

pub type Dms = [(u32, u32); 3];

pub fn dms(degrees: u32, minutes: u32, seconds: u32) -> Dms {
    [(degrees, 1), (minutes, 1), (seconds, 1)]
}

/// One IFD entry: tag, TIFF field type, count, and the encoded value.
pub struct Entry {
    tag: u16,
    kind: u16,
    count: u32,
    data: Vec<u8>,
}

pub fn ascii(tag: u16, text: &str) -> Entry {
    let mut data = text.as_bytes().to_vec();
    data.push(0);
    Entry { tag, kind: 2, count: data.len() as u32, data }
}

pub fn bytes(tag: u16, values: &[u8]) -> Entry {
    Entry { tag, kind: 1, count: values.len() as u32, data: values.to_vec() }
}

pub fn rationals(tag: u16, values: &[(u32, u32)]) -> Entry {
    let data = values
        .iter()
        .flat_map(|(num, den)| num.to_le_bytes().into_iter().chain(den.to_le_bytes()))
        .collect();
    Entry { tag, kind: 5, count: values.len() as u32, data }
}

/// A little-endian TIFF block with the given IFD0 entries and, when `gps` is
/// set, a GPS pointer in IFD0 and a GPS IFD holding those entries.
pub fn tiff(mut ifd0: Vec<Entry>, gps: Option<Vec<Entry>>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());

    let Some(gps) = gps else {
        write_ifd(&mut out, &ifd0);
        return out;
    };

    // Pointer value is patched once the GPS IFD offset is known.
    ifd0.push(Entry { tag: 0x8825, kind: 4, count: 1, data: vec![0; 4] });
    let pointer_at = 8 + 2 + 12 * (ifd0.len() - 1) + 8;
    write_ifd(&mut out, &ifd0);

    let gps_offset = out.len() as u32;
    out[pointer_at..pointer_at + 4].copy_from_slice(&gps_offset.to_le_bytes());
    write_ifd(&mut out, &gps);
    out
}

/// Append an IFD (next-IFD offset 0) followed by its out-of-line values.
fn write_ifd(out: &mut Vec<u8>, entries: &[Entry]) {
    let data_start = out.len() + 2 + 12 * entries.len() + 4;
    let mut area = Vec::new();

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for e in entries {
        out.extend_from_slice(&e.tag.to_le_bytes());
        out.extend_from_slice(&e.kind.to_le_bytes());
        out.extend_from_slice(&e.count.to_le_bytes());
        if e.data.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..e.data.len()].copy_from_slice(&e.data);
            out.extend_from_slice(&inline);
        } else {
            let offset = (data_start + area.len()) as u32;
            out.extend_from_slice(&offset.to_le_bytes());
            area.extend_from_slice(&e.data);
            if area.len() % 2 == 1 {
                area.push(0);
            }
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&area);
}

fn make() -> Entry {
    ascii(0x010F, "TestCam")
}

/// IFD0 with `Make` and a GPS IFD with latitude/longitude and their refs.
pub fn gps_tiff(lat: Dms, lon: Dms) -> Vec<u8> {
    tiff(
        vec![make()],
        Some(vec![
            ascii(0x0001, "N"),
            rationals(0x0002, &lat),
            ascii(0x0003, "W"),
            rationals(0x0004, &lon),
        ]),
    )
}

/// IFD0 with `Make` only; no GPS pointer.
pub fn make_only_tiff() -> Vec<u8> {
    tiff(vec![make()], None)
}

/// A GPS IFD carrying a version and altitude ref but no coordinates.
pub fn gps_without_coordinates_tiff() -> Vec<u8> {
    tiff(
        vec![make()],
        Some(vec![bytes(0x0000, &[2, 2, 0, 0]), bytes(0x0005, &[0])]),
    )
}

/// A GPS IFD with a latitude and no longitude.
pub fn latitude_only_tiff(lat: Dms) -> Vec<u8> {
    tiff(
        vec![make()],
        Some(vec![ascii(0x0001, "N"), rationals(0x0002, &lat)]),
    )
}

/// Encode a small JPEG, optionally carrying the given TIFF data as its EXIF segment.
pub fn jpeg_bytes(exif: Option<Vec<u8>>) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(16, 16));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .unwrap();

    let Some(tiff) = exif else {
        return bytes;
    };

    let mut jpeg = Jpeg::from_bytes(Bytes::from(bytes)).unwrap();
    jpeg.set_exif(Some(Bytes::from(tiff)));
    jpeg.encoder().bytes().to_vec()
}

pub fn write_gps_jpeg(path: &Path, lat: Dms, lon: Dms) {
    write_exif_jpeg(path, gps_tiff(lat, lon));
}

pub fn write_exif_jpeg(path: &Path, tiff: Vec<u8>) {
    std::fs::write(path, jpeg_bytes(Some(tiff))).unwrap();
}

pub fn write_plain_jpeg(path: &Path) {
    std::fs::write(path, jpeg_bytes(None)).unwrap();
}

/// Labels every coordinate as `"<lat>,<lon>"` and records the calls.
#[derive(Default)]
pub struct EchoResolver {
    pub calls: Mutex<Vec<DecimalCoordinate>>,
}

impl EchoResolver {
    pub fn calls(&self) -> Vec<DecimalCoordinate> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PlaceResolver for EchoResolver {
    fn name(&self) -> &str {
        "Echo"
    }

    async fn reverse_geocode(
        &self,
        coord: DecimalCoordinate,
    ) -> Result<Option<PlaceLabel>, ResolveError> {
        self.calls.lock().unwrap().push(coord);
        Ok(Some(PlaceLabel::new(coord.to_string())))
    }
}

/// Always answers with the given result kind.
pub enum FixedResolver {
    NoPlace,
    Failing,
}

#[async_trait::async_trait]
impl PlaceResolver for FixedResolver {
    fn name(&self) -> &str {
        "Fixed"
    }

    async fn reverse_geocode(
        &self,
        _coord: DecimalCoordinate,
    ) -> Result<Option<PlaceLabel>, ResolveError> {
        match self {
            Self::NoPlace => Ok(None),
            Self::Failing => Err(ResolveError::Service("quota exceeded".into())),
        }
    }
}
