//! PDF header sniffing.
//!
//! Checks the `%PDF-x.y` magic before a file is handed to the parser, so that
//! a stray non-PDF in a batch directory fails fast with a clear reason.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;
const HEADER_WINDOW: usize = 1024;

/// Read the PDF version from the header of a file.
pub fn sniff_version<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = Vec::with_capacity(HEADER_WINDOW);
    File::open(path)?
        .take(HEADER_WINDOW as u64)
        .read_to_end(&mut header)?;
    sniff_version_bytes(&header)
}

/// Read the PDF version from the leading bytes of a document.
///
/// Some producers prepend junk before the magic; the first 1 KiB is scanned
/// the same way most readers tolerate it.
pub fn sniff_version_bytes(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version = window
        .get(start + PDF_MAGIC.len()..start + PDF_MAGIC.len() + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version).to_string();

    match version.as_bytes() {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => Ok(version),
        _ => Err(Error::UnsupportedVersion(version)),
    }
}

/// Check whether a path looks like a PDF, by extension only.
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_valid_versions() {
        assert_eq!(sniff_version_bytes(b"%PDF-1.7\n%\xe2\xe3").unwrap(), "1.7");
        assert_eq!(sniff_version_bytes(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_sniff_leading_garbage() {
        assert_eq!(sniff_version_bytes(b"\r\n  %PDF-1.4\n").unwrap(), "1.4");
    }

    #[test]
    fn test_sniff_rejects_non_pdf() {
        assert!(matches!(
            sniff_version_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            sniff_version_bytes(b"%PDF"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(sniff_version_bytes(b""), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_sniff_bad_version() {
        assert!(matches!(
            sniff_version_bytes(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_pdf_extension() {
        assert!(has_pdf_extension("a/b/report.PDF"));
        assert!(has_pdf_extension("report.pdf"));
        assert!(!has_pdf_extension("report.txt"));
        assert!(!has_pdf_extension("pdf"));
    }
}
