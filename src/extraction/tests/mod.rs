use crate::error::Error;
use crate::extraction::*;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// An archive entry for the fixture builder
enum Entry<'a> {
    Dir(&'a str),
    File(&'a str, &'a [u8]),
}

/// Build an in-memory ZIP archive from the given entries
fn build_zip(entries: &[Entry]) -> Vec<u8> {
    let mut writer = ::zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = ::zip::write::FileOptions::default()
        .compression_method(::zip::CompressionMethod::Deflated);
    for entry in entries {
        match entry {
            Entry::Dir(name) => writer.add_directory(*name, options).unwrap(),
            Entry::File(name, content) => {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

/// Single stored entry written the way streaming writers do it: the local
/// header carries general purpose flag bit 3 and zero sizes, and the real
/// CRC and sizes follow the data in a descriptor.
fn data_descriptor_zip(name: &str, content: &[u8]) -> Vec<u8> {
    let crc = crc32(content);
    let size = content.len() as u32;
    let name_len = name.len() as u16;
    let mut out = Vec::new();

    out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes()); // version needed
    out.extend_from_slice(&0x0008u16.to_le_bytes()); // flags
    out.extend_from_slice(&0u16.to_le_bytes()); // stored
    out.extend_from_slice(&0u16.to_le_bytes()); // time
    out.extend_from_slice(&0x0021u16.to_le_bytes()); // 1980-01-01
    out.extend_from_slice(&[0; 12]); // crc and sizes deferred
    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(content);

    out.extend_from_slice(&0x0807_4b50u32.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());

    let cd_offset = out.len() as u32;
    out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes()); // version made by
    out.extend_from_slice(&20u16.to_le_bytes()); // version needed
    out.extend_from_slice(&0x0008u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0x0021u16.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(&[0; 12]); // extra, comment, disk, attributes
    out.extend_from_slice(&0u32.to_le_bytes()); // local header offset
    out.extend_from_slice(name.as_bytes());
    let cd_size = out.len() as u32 - cd_offset;

    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&[0; 4]); // disk numbers
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

/// End-of-central-directory record and nothing else
const EMPTY_ZIP: &[u8] = b"PK\x05\x06\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0";

/// Log sink for asserting on formatted tracing output
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn read(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}

const DE: &[u8] = b"greeting=Hallo\nfarewell=Tsch\\u00fcss\n";
const EN: &[u8] = b"greeting=Hello\nfarewell=Goodbye\n";

// ---------------------------------------------------------------------------
// Name derivation
// ---------------------------------------------------------------------------

#[test]
fn language_code_from_plain_entry() {
    assert_eq!(language_code_from_entry("de.properties").unwrap(), "de");
    assert_eq!(language_code_from_entry("en_US.properties").unwrap(), "en_US");
}

#[test]
fn language_code_uses_final_path_segment() {
    assert_eq!(
        language_code_from_entry("locale/nested/fr.properties").unwrap(),
        "fr"
    );
    assert_eq!(language_code_from_entry("locale\\pt_BR.properties").unwrap(), "pt_BR");
}

#[test]
fn language_code_rejects_other_formats() {
    for name in ["de.json", "de.properties.bak", "README", "locale/.properties"] {
        let err = language_code_from_entry(name).unwrap_err();
        assert!(
            matches!(err, Error::UnsupportedEntry { name: ref n } if n == name),
            "{name} should be unsupported, got {err:?}"
        );
    }
}

#[test]
fn output_file_name_applies_prefix() {
    assert_eq!(output_file_name("", "de"), "de.properties");
    assert_eq!(output_file_name("messages_", "de"), "messages_de.properties");
}

// ---------------------------------------------------------------------------
// BundleExtractor
// ---------------------------------------------------------------------------

#[test]
fn extracts_files_and_skips_directories() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("i18n");
    let archive = build_zip(&[
        Entry::Dir("locale/"),
        Entry::File("locale/de.properties", DE),
        Entry::File("locale/en.properties", EN),
    ]);

    let extractor = BundleExtractor::new(&out, "messages_");
    assert_eq!(extractor.output_dir(), out.as_path());
    let files = extractor.extract(Cursor::new(archive)).unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].language, "de");
    assert_eq!(files[1].language, "en");
    assert!(files.iter().all(|f| f.path.is_absolute()));

    assert_eq!(read(&out.join("messages_de.properties")), DE);
    assert_eq!(read(&out.join("messages_en.properties")), EN);

    let mut names: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["messages_de.properties", "messages_en.properties"]);
    assert!(!out.join("locale").exists(), "directory entries must not be created");
}

#[test]
fn creates_missing_output_directories() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("a").join("b").join("c");
    let archive = build_zip(&[Entry::File("de.properties", DE)]);

    BundleExtractor::new(&out, "")
        .extract(Cursor::new(archive))
        .unwrap();

    assert_eq!(read(&out.join("de.properties")), DE);
}

#[test]
fn existing_output_directory_is_fine() {
    let temp = TempDir::new().unwrap();
    let archive = build_zip(&[Entry::File("de.properties", DE)]);

    BundleExtractor::new(temp.path(), "")
        .extract(Cursor::new(archive))
        .unwrap();

    assert_eq!(read(&temp.path().join("de.properties")), DE);
}

#[test]
fn existing_files_are_truncated() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("de.properties");
    std::fs::write(&target, vec![b'x'; 4096]).unwrap();

    let archive = build_zip(&[Entry::File("de.properties", DE)]);
    BundleExtractor::new(temp.path(), "")
        .extract(Cursor::new(archive))
        .unwrap();

    assert_eq!(read(&target), DE);
}

#[test]
fn colliding_names_keep_the_last_entry() {
    let temp = TempDir::new().unwrap();
    let archive = build_zip(&[
        Entry::File("web/de.properties", b"source=web\n"),
        Entry::File("ios/de.properties", b"source=ios\n"),
    ]);

    let files = BundleExtractor::new(temp.path(), "")
        .extract(Cursor::new(archive))
        .unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(read(&temp.path().join("de.properties")), b"source=ios\n");
}

#[test]
fn empty_entry_produces_empty_file() {
    let temp = TempDir::new().unwrap();
    let archive = build_zip(&[Entry::File("ja.properties", b"")]);

    BundleExtractor::new(temp.path(), "")
        .extract(Cursor::new(archive))
        .unwrap();

    assert_eq!(read(&temp.path().join("ja.properties")), b"");
}

#[test]
fn data_descriptor_entries_are_extracted() {
    let temp = TempDir::new().unwrap();
    let archive = data_descriptor_zip("locale/de.properties", DE);
    assert_eq!(&archive[6..8], &[0x08, 0x00], "flag bit 3 must be set");

    let files = BundleExtractor::new(temp.path(), "")
        .extract(Cursor::new(archive))
        .unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].language, "de");
    assert_eq!(read(&temp.path().join("de.properties")), DE);
}

#[test]
fn empty_archive_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("i18n");
    assert_eq!(EMPTY_ZIP.len(), 22);

    let files = BundleExtractor::new(&out, "")
        .extract(Cursor::new(EMPTY_ZIP))
        .unwrap();

    assert!(files.is_empty());
    assert!(out.is_dir());
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn each_written_file_is_logged_with_its_absolute_path() {
    let temp = TempDir::new().unwrap();
    let archive = build_zip(&[
        Entry::File("de.properties", DE),
        Entry::File("en.properties", EN),
    ]);

    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let files = tracing::subscriber::with_default(subscriber, || {
        BundleExtractor::new(temp.path(), "app_")
            .extract(Cursor::new(archive))
            .unwrap()
    });

    let output = log.contents();
    assert_eq!(files.len(), 2);
    for file in &files {
        assert!(file.path.is_absolute());
        let line = format!("Saved: {}", file.path.display());
        assert!(output.contains(&line), "missing `{line}` in:\n{output}");
    }
}

#[test]
fn unsupported_entry_stops_extraction() {
    let temp = TempDir::new().unwrap();
    let archive = build_zip(&[
        Entry::File("de.properties", DE),
        Entry::File("en.json", br#"{"greeting":"Hello"}"#),
        Entry::File("fr.properties", b"greeting=Bonjour\n"),
    ]);

    let err = BundleExtractor::new(temp.path(), "")
        .extract(Cursor::new(archive))
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedEntry { ref name } if name == "en.json"));
    // Files written before the failure stay on disk
    assert!(temp.path().join("de.properties").exists());
    assert!(!temp.path().join("fr.properties").exists());
}

#[test]
fn garbage_input_is_an_archive_error() {
    let temp = TempDir::new().unwrap();
    let err = BundleExtractor::new(temp.path(), "")
        .extract(Cursor::new(b"<Error><Code>AccessDenied</Code></Error>".to_vec()))
        .unwrap_err();

    assert!(matches!(err, Error::Archive(_)), "got {err:?}");
}

#[test]
fn output_dir_blocked_by_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("i18n");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let archive = build_zip(&[Entry::File("de.properties", DE)]);

    let err = BundleExtractor::new(&blocker, "")
        .extract(Cursor::new(archive))
        .unwrap_err();

    assert!(matches!(err, Error::Io(_)), "got {err:?}");
}

#[tokio::test]
async fn extract_bundle_runs_on_blocking_worker() {
    let temp = TempDir::new().unwrap();
    let archive = build_zip(&[
        Entry::File("de.properties", DE),
        Entry::File("en.properties", EN),
    ]);

    let files = extract_bundle(BundleExtractor::new(temp.path(), "app_"), archive)
        .await
        .unwrap();

    let languages: Vec<&str> = files.iter().map(|f| f.language.as_str()).collect();
    assert_eq!(languages, vec!["de", "en"]);
    assert_eq!(read(&temp.path().join("app_en.properties")), EN);
}
