//! Minimal ZIP archive writer.
//!
//! Entries use the stored method (no compression). Each entry is written as
//! local header, raw content streamed in chunks with an incremental CRC-32,
//! then a data descriptor carrying the CRC and sizes (flag bit 3). Names are
//! declared UTF-8 (flag bit 11). The central directory and end record
//! follow the last entry.
//!
//! ```text
//! [local header][content][data descriptor]   per entry
//! [central directory record]                 per entry
//! [end of central directory]
//! ```
//!
//! All multi-byte fields are little-endian. Timestamps are fixed at
//! 1980-01-01 00:00 so identical inputs produce identical archives.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::crc32::Crc32;
use crate::error::{OutputError, Result};

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4B50;
const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x0807_4B50;
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4B50;
const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4B50;

/// Version 2.0: the minimum for stored entries with data descriptors.
const VERSION: u16 = 20;
/// Bit 3 (sizes in data descriptor) and bit 11 (UTF-8 names).
const FLAGS: u16 = 0x0008 | 0x0800;
const METHOD_STORED: u16 = 0;
/// MS-DOS time 00:00:00.
const DOS_TIME: u16 = 0;
/// MS-DOS date 1980-01-01.
const DOS_DATE: u16 = (1 << 5) | 1;

const CHUNK_SIZE: usize = 64 * 1024;

/// Directory extensions treated as opaque packages and skipped.
const PACKAGE_EXTENSIONS: &[&str] = &[
    "app",
    "bundle",
    "framework",
    "plugin",
    "kext",
    "pkg",
    "xcodeproj",
    "xcworkspace",
    "pages",
    "numbers",
    "key",
    "rtfd",
    "photoslibrary",
];

/// Central directory data remembered per entry.
#[derive(Debug, Clone)]
struct EntryRecord {
    name: String,
    crc: u32,
    size: u32,
    offset: u32,
}

/// Tracks the number of bytes written.
struct CountingWriter<W: Write> {
    inner: W,
    count: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Streaming ZIP writer.
///
/// Add entries with [`ZipWriter::add_entry`] or [`ZipWriter::add_file`], then
/// call [`ZipWriter::finish`] to write the central directory.
pub struct ZipWriter<W: Write> {
    writer: CountingWriter<BufWriter<W>>,
    entries: Vec<EntryRecord>,
    /// Destination shown in write errors.
    destination: PathBuf,
}

impl<W: Write> ZipWriter<W> {
    /// Create a writer over any sink.
    pub fn new(sink: W) -> Self {
        Self::with_destination(sink, PathBuf::from("<archive>"))
    }

    fn with_destination(sink: W, destination: PathBuf) -> Self {
        Self {
            writer: CountingWriter {
                inner: BufWriter::new(sink),
                count: 0,
            },
            entries: Vec::new(),
            destination,
        }
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds one stored entry whose content is read from `content`.
    ///
    /// `name` is the archive path and must use `/` separators.
    pub fn add_entry<R: Read>(&mut self, name: &str, content: &mut R) -> Result<()> {
        let offset = self.offset_u32()?;
        let name_len = u16::try_from(name.len()).map_err(|_| OutputError::EntryTooLarge {
            name: name.to_string(),
            size: name.len() as u64,
        })?;

        let mut header = Vec::with_capacity(30 + name.len());
        put_u32(&mut header, LOCAL_HEADER_SIGNATURE);
        put_u16(&mut header, VERSION);
        put_u16(&mut header, FLAGS);
        put_u16(&mut header, METHOD_STORED);
        put_u16(&mut header, DOS_TIME);
        put_u16(&mut header, DOS_DATE);
        // CRC and sizes follow in the data descriptor
        put_u32(&mut header, 0);
        put_u32(&mut header, 0);
        put_u32(&mut header, 0);
        put_u16(&mut header, name_len);
        put_u16(&mut header, 0);
        header.extend_from_slice(name.as_bytes());
        self.write_bytes(&header)?;

        let mut crc = Crc32::new();
        let mut size: u64 = 0;
        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            let read = match content.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(OutputError::Read {
                        path: PathBuf::from(name),
                        source: e,
                    });
                }
            };
            crc.update(&buffer[..read]);
            size += read as u64;
            self.write_bytes(&buffer[..read])?;
        }

        let size = u32::try_from(size).map_err(|_| OutputError::EntryTooLarge {
            name: name.to_string(),
            size,
        })?;
        let crc = crc.finalize();

        let mut descriptor = Vec::with_capacity(16);
        put_u32(&mut descriptor, DATA_DESCRIPTOR_SIGNATURE);
        put_u32(&mut descriptor, crc);
        put_u32(&mut descriptor, size);
        put_u32(&mut descriptor, size);
        self.write_bytes(&descriptor)?;

        tracing::trace!(name, size, crc, "added ZIP entry");
        self.entries.push(EntryRecord {
            name: name.to_string(),
            crc,
            size,
            offset,
        });
        Ok(())
    }

    /// Adds the file at `path` under the archive name `name`.
    pub fn add_file(&mut self, name: &str, path: &Path) -> Result<()> {
        let mut file = File::open(path).map_err(|e| OutputError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.add_entry(name, &mut file)
    }

    /// Writes the central directory and end record, returning the sink.
    pub fn finish(mut self) -> Result<W> {
        let count = u16::try_from(self.entries.len()).map_err(|_| OutputError::ArchiveTooLarge {
            reason: "more than 65535 entries",
        })?;
        let directory_offset = self.offset_u32()?;

        let entries = std::mem::take(&mut self.entries);
        for entry in &entries {
            let mut record = Vec::with_capacity(46 + entry.name.len());
            put_u32(&mut record, CENTRAL_HEADER_SIGNATURE);
            put_u16(&mut record, VERSION); // made by
            put_u16(&mut record, VERSION); // needed
            put_u16(&mut record, FLAGS);
            put_u16(&mut record, METHOD_STORED);
            put_u16(&mut record, DOS_TIME);
            put_u16(&mut record, DOS_DATE);
            put_u32(&mut record, entry.crc);
            put_u32(&mut record, entry.size);
            put_u32(&mut record, entry.size);
            // Length was checked when the entry was added
            put_u16(&mut record, entry.name.len() as u16);
            put_u16(&mut record, 0); // extra field length
            put_u16(&mut record, 0); // comment length
            put_u16(&mut record, 0); // disk number start
            put_u16(&mut record, 0); // internal attributes
            put_u32(&mut record, 0); // external attributes
            put_u32(&mut record, entry.offset);
            record.extend_from_slice(entry.name.as_bytes());
            self.write_bytes(&record)?;
        }

        let directory_size = u32::try_from(self.writer.count - u64::from(directory_offset))
            .map_err(|_| OutputError::ArchiveTooLarge {
                reason: "central directory larger than 4 GiB",
            })?;

        let mut end = Vec::with_capacity(22);
        put_u32(&mut end, END_OF_CENTRAL_DIRECTORY_SIGNATURE);
        put_u16(&mut end, 0); // this disk
        put_u16(&mut end, 0); // disk with central directory
        put_u16(&mut end, count);
        put_u16(&mut end, count);
        put_u32(&mut end, directory_size);
        put_u32(&mut end, directory_offset);
        put_u16(&mut end, 0); // comment length
        self.write_bytes(&end)?;

        self.writer.flush().map_err(|e| self.write_error(e))?;
        let destination = self.destination;
        self.writer
            .inner
            .into_inner()
            .map_err(|e| OutputError::Write {
                path: destination,
                source: e.into_error(),
            })
    }

    fn offset_u32(&self) -> Result<u32> {
        u32::try_from(self.writer.count).map_err(|_| OutputError::ArchiveTooLarge {
            reason: "archive larger than 4 GiB",
        })
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).map_err(|e| self.write_error(e))
    }

    fn write_error(&self, source: io::Error) -> OutputError {
        OutputError::Write {
            path: self.destination.clone(),
            source,
        }
    }
}

impl ZipWriter<File> {
    /// Create a ZIP file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| OutputError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::with_destination(file, path.to_path_buf()))
    }
}

fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// A file to archive: its archive name and location on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Relative path with `/` separators.
    pub name: String,
    pub path: PathBuf,
}

/// True for hidden names (leading `.`).
fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// True for directories that look like opaque packages (`Foo.app`).
fn is_package_dir(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            PACKAGE_EXTENSIONS
                .iter()
                .any(|pkg| ext.eq_ignore_ascii_case(pkg))
        })
}

/// Regular files under `source_dir`, sorted by archive name.
///
/// Hidden files and directories, package-like directories and symbolic
/// links are skipped.
pub fn collect_entries(source_dir: &Path) -> Result<Vec<SourceEntry>> {
    if !source_dir.is_dir() {
        return Err(OutputError::InvalidSource {
            path: source_dir.to_path_buf(),
        });
    }

    let mut entries = Vec::new();
    let mut pending = vec![(source_dir.to_path_buf(), String::new())];
    while let Some((dir, prefix)) = pending.pop() {
        let read_dir = fs::read_dir(&dir).map_err(|e| OutputError::Read {
            path: dir.clone(),
            source: e,
        })?;
        for item in read_dir {
            let item = item.map_err(|e| OutputError::Read {
                path: dir.clone(),
                source: e,
            })?;
            let Some(name) = item.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %item.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            if is_hidden(&name) {
                continue;
            }
            let file_type = item.file_type().map_err(|e| OutputError::Read {
                path: item.path(),
                source: e,
            })?;
            let relative = format!("{prefix}{name}");
            if file_type.is_dir() {
                if is_package_dir(&name) {
                    tracing::debug!(path = %item.path().display(), "skipping package directory");
                    continue;
                }
                pending.push((item.path(), format!("{relative}/")));
            } else if file_type.is_file() {
                entries.push(SourceEntry {
                    name: relative,
                    path: item.path(),
                });
            }
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Archives every regular file under `source_dir` into `sink`.
///
/// Returns the sink and the number of entries written. An empty directory
/// produces a valid archive with no entries.
pub fn write_zip<W: Write>(source_dir: &Path, sink: W) -> Result<(W, usize)> {
    let entries = collect_entries(source_dir)?;
    let mut writer = ZipWriter::new(sink);
    for entry in &entries {
        writer.add_file(&entry.name, &entry.path)?;
    }
    let count = writer.len();
    Ok((writer.finish()?, count))
}

/// Archives `source_dir` into a new file at `destination`.
///
/// The archive is written to a temporary sibling and renamed into place, so
/// a failed run never leaves a truncated archive behind. The destination may
/// not lie inside the source directory.
pub fn write_zip_to_path(source_dir: &Path, destination: &Path) -> Result<usize> {
    let source = source_dir
        .canonicalize()
        .map_err(|_| OutputError::InvalidSource {
            path: source_dir.to_path_buf(),
        })?;
    if !source.is_dir() {
        return Err(OutputError::InvalidSource {
            path: source_dir.to_path_buf(),
        });
    }
    if destination.is_dir() {
        return Err(OutputError::InvalidDestination {
            path: destination.to_path_buf(),
            reason: "destination is a directory",
        });
    }

    let parent = resolve_parent(destination.parent().unwrap_or(Path::new("")))?;
    if parent.starts_with(&source) {
        return Err(OutputError::InvalidDestination {
            path: destination.to_path_buf(),
            reason: "destination is inside the source directory",
        });
    }
    fs::create_dir_all(&parent).map_err(|e| OutputError::CreateDirectory {
        path: parent.clone(),
        source: e,
    })?;

    let Some(file_name) = destination.file_name() else {
        return Err(OutputError::InvalidDestination {
            path: destination.to_path_buf(),
            reason: "destination has no file name",
        });
    };
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".partial");
    let temp_path = parent.join(temp_name);

    let result = ZipWriter::create(&temp_path).and_then(|mut writer| {
        for entry in collect_entries(&source)? {
            writer.add_file(&entry.name, &entry.path)?;
        }
        let count = writer.len();
        let file = writer.finish()?;
        file.sync_all().map_err(|e| OutputError::Write {
            path: temp_path.clone(),
            source: e,
        })?;
        Ok(count)
    });

    let count = match result {
        Ok(count) => count,
        Err(err) => {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
    };

    fs::rename(&temp_path, destination).map_err(|e| OutputError::Write {
        path: destination.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        source = %source_dir.display(),
        destination = %destination.display(),
        entries = count,
        "wrote ZIP archive"
    );
    Ok(count)
}

/// Absolute form of `parent`, which may not exist yet: the nearest existing
/// ancestor is canonicalized and the missing components are appended.
fn resolve_parent(parent: &Path) -> Result<PathBuf> {
    let mut existing = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(up), Some(name)) => {
                missing.push(name.to_os_string());
                existing = if up.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    up
                };
            }
            _ => break,
        }
    }
    let mut resolved = existing.canonicalize().map_err(|e| OutputError::Read {
        path: existing.to_path_buf(),
        source: e,
    })?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}
