use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use filetime::FileTime;
use std::path::Path;
use std::time::SystemTime;

const EXIF_IFD_POINTER: u16 = 0x8769;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

pub fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("valid date")
}

pub fn set_mtime(path: &Path, at: NaiveDateTime) {
    let local = Local
        .from_local_datetime(&at)
        .earliest()
        .expect("representable local time");
    let mtime = FileTime::from_system_time(SystemTime::from(local));
    filetime::set_file_mtime(path, mtime).expect("set mtime");
}

/// Builds a minimal JPEG (SOI + APP1) whose little-endian TIFF block holds the
/// given ASCII tags. Values must be longer than 3 bytes so they live out of line.
pub fn exif_jpeg(ifd0: &[(u16, &str)], exif_ifd: &[(u16, &str)]) -> Vec<u8> {
    let tiff = tiff_block(ifd0, exif_ifd);

    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("segment fits");
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

fn tiff_block(ifd0: &[(u16, &str)], exif_ifd: &[(u16, &str)]) -> Vec<u8> {
    let ifd_len = |entries: usize| 2 + 12 * entries + 4;
    let data_len =
        |entries: &[(u16, &str)]| entries.iter().map(|(_, v)| v.len() + 1).sum::<usize>();

    let with_pointer = !exif_ifd.is_empty();
    let ifd0_entries = ifd0.len() + usize::from(with_pointer);
    let ifd0_data = 8 + ifd_len(ifd0_entries);
    let exif_start = ifd0_data + data_len(ifd0);
    let exif_data = exif_start + ifd_len(exif_ifd.len());

    let mut out = b"II*\0".to_vec();
    out.extend_from_slice(&8u32.to_le_bytes());

    write_ifd(
        &mut out,
        ifd0,
        ifd0_data,
        with_pointer.then_some((EXIF_IFD_POINTER, exif_start)),
    );
    if with_pointer {
        write_ifd(&mut out, exif_ifd, exif_data, None);
    }
    out
}

fn write_ifd(
    out: &mut Vec<u8>,
    entries: &[(u16, &str)],
    data_start: usize,
    pointer: Option<(u16, usize)>,
) {
    let count = entries.len() + usize::from(pointer.is_some());
    out.extend_from_slice(&(count as u16).to_le_bytes());

    let mut offset = data_start;
    for (tag, value) in entries {
        assert!(value.len() > 3, "inline ASCII values are not supported");
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&TYPE_ASCII.to_le_bytes());
        out.extend_from_slice(&((value.len() + 1) as u32).to_le_bytes());
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += value.len() + 1;
    }
    if let Some((tag, target)) = pointer {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&TYPE_LONG.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&(target as u32).to_le_bytes());
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    for (_, value) in entries {
        out.extend_from_slice(value.as_bytes());
        out.push(0);
    }
}
