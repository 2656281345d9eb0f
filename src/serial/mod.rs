//! Serialization.
//!
//! This module writes a `Document` tree back out as indented markup, either
//! into a `String`, any `std::io::Write` sink, or a file.

pub mod xml;

pub use xml::{serialize, serialize_with_options, write_document, SerializeOptions};

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use crate::tree::Document;

/// Writes `doc` to `path`, creating or truncating the file.
///
/// A destination that cannot be opened fails this call only; the document
/// is left untouched.
///
/// # Errors
///
/// Returns the I/O error from creating or writing the file.
pub fn write_to_path(doc: &Document, path: impl AsRef<Path>, indent: usize) -> io::Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_document(&mut writer, doc, &SerializeOptions::default().indent(indent))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_to_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        let doc = Document::parse_str(r#"<a k="v"><b>text</b></a>"#);

        write_to_path(&doc, &path, 4).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<a k=\"v\">\n    <b>text</b>\n</a>\n"
        );
        let reloaded = Document::load_path(&path);
        assert!(reloaded.success());
    }

    #[test]
    fn test_write_to_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.xml");
        let doc = Document::parse_str("<a/>");

        let err = write_to_path(&doc, &path, 2).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(doc.success());
    }
}
