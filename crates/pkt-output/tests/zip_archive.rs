use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use pkt_output::{OutputError, crc32, write_zip, write_zip_to_path};
use tempfile::tempdir;

fn write(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn sample_tree(root: &Path) {
    write(&root.join("Summary.csv"), b"Recipient Name,Email\n");
    write(&root.join("Ann Lee-1a2b3c4d/Packet.pdf"), b"%PDF-1.7 fake");
    write(&root.join("Ann Lee-1a2b3c4d/Message.txt"), "Grüße, Ann\n".as_bytes());
    write(&root.join("empty.txt"), b"");
    write(&root.join(".DS_Store"), b"hidden");
    write(&root.join("nested/.git/config"), b"hidden dir");
    write(&root.join("Slides.key/Data/index.apxl"), b"package");
}

#[test]
fn archive_opens_in_standard_reader() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let (bytes, count) = write_zip(dir.path(), Vec::new()).unwrap();
    assert_eq!(count, 4);

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "Ann Lee-1a2b3c4d/Message.txt",
            "Ann Lee-1a2b3c4d/Packet.pdf",
            "Summary.csv",
            "empty.txt",
        ]
    );

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_eq!(entry.crc32(), crc32(&contents), "{}", entry.name());
        assert_eq!(entry.size(), contents.len() as u64);
        assert_eq!(entry.compression(), zip::CompressionMethod::Stored);
    }

    let mut message = String::new();
    archive
        .by_name("Ann Lee-1a2b3c4d/Message.txt")
        .unwrap()
        .read_to_string(&mut message)
        .unwrap();
    assert_eq!(message, "Grüße, Ann\n");
}

#[test]
fn empty_directory_yields_valid_empty_archive() {
    let dir = tempdir().unwrap();
    let (bytes, count) = write_zip(dir.path(), Vec::new()).unwrap();
    assert_eq!(count, 0);
    assert_eq!(bytes.len(), 22);

    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 0);
}

#[test]
fn output_is_deterministic() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());
    let (first, _) = write_zip(dir.path(), Vec::new()).unwrap();
    let (second, _) = write_zip(dir.path(), Vec::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn writes_archive_file_atomically() {
    let source = tempdir().unwrap();
    sample_tree(source.path());
    let out = tempdir().unwrap();
    let dest = out.path().join("bundles/export.zip");

    let count = write_zip_to_path(source.path(), &dest).unwrap();
    assert_eq!(count, 4);
    assert!(dest.exists());
    assert!(!out.path().join("bundles/export.zip.partial").exists());

    let archive = zip::ZipArchive::new(fs::File::open(&dest).unwrap()).unwrap();
    assert_eq!(archive.len(), 4);
}

#[test]
fn rejects_destination_inside_source() {
    let source = tempdir().unwrap();
    sample_tree(source.path());
    let result = write_zip_to_path(source.path(), &source.path().join("nested/out.zip"));
    assert!(matches!(
        result,
        Err(OutputError::InvalidDestination { .. })
    ));
}

#[test]
fn rejected_destination_creates_no_folders() {
    let source = tempdir().unwrap();
    sample_tree(source.path());
    let dest = source.path().join("exports/2025/out.zip");

    let result = write_zip_to_path(source.path(), &dest);
    assert!(matches!(
        result,
        Err(OutputError::InvalidDestination { .. })
    ));
    assert!(!source.path().join("exports").exists());
}

#[test]
fn rejects_missing_source() {
    let out = tempdir().unwrap();
    let result = write_zip_to_path(&out.path().join("missing"), &out.path().join("a.zip"));
    assert!(matches!(result, Err(OutputError::InvalidSource { .. })));

    let result = write_zip(&out.path().join("missing"), Vec::new());
    assert!(matches!(result, Err(OutputError::InvalidSource { .. })));
}
