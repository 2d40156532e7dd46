//! Aperio SVS conventions.
//!
//! SVS files are TIFF files in which every directory carries an
//! ImageDescription. Aperio marks its descriptions with a leading "Aperio"
//! and names auxiliary images on the second line:
//!
//! ```text
//! Aperio Image Library v12.0.15
//! label 387x463
//! ```
//!
//! The label image has no dedicated tag, so the description text is the
//! only way to find it.

/// Vendor marker at the start of every Aperio ImageDescription.
pub const APERIO_MARKER: &str = "Aperio";

/// Prefix of the second description line of the label image.
pub const LABEL_PREFIX: &str = "label ";

/// Split text into lines on `\n`, `\r\n` or a lone `\r`.
///
/// Terminators are dropped and a trailing terminator does not produce an
/// empty final line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(pos) => {
                lines.push(&rest[..pos]);
                let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }

    lines
}

/// Whether a description was written by Aperio software.
#[inline]
pub fn is_aperio_description(description: &str) -> bool {
    description.starts_with(APERIO_MARKER)
}

/// Whether a description identifies the slide label image.
///
/// The text must start with "Aperio" and have a second line starting with
/// "label ".
pub fn is_label_description(description: &str) -> bool {
    if !is_aperio_description(description) {
        return false;
    }

    split_lines(description)
        .get(1)
        .is_some_and(|line| line.starts_with(LABEL_PREFIX))
}
