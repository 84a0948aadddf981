//! Reading tar archives, optionally gzip, zstd or xz compressed.
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use xz2::read::XzDecoder;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xb5, 0x2f, 0xfd];
const XZ_MAGIC: &[u8] = &[0xfd, b'7', b'z', b'X', b'Z', 0x00];

/// One member of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member path with any trailing `/` removed.
    pub path: String,
    /// Whether the member is a directory.
    pub is_dir: bool,
    /// UTF-8 contents, read only for regular files the caller asked for.
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    None,
    Gzip,
    Zstd,
    Xz,
}

impl Compression {
    fn detect(magic: &[u8]) -> Self {
        if magic.starts_with(GZIP_MAGIC) {
            Self::Gzip
        } else if magic.starts_with(ZSTD_MAGIC) {
            Self::Zstd
        } else if magic.starts_with(XZ_MAGIC) {
            Self::Xz
        } else {
            Self::None
        }
    }
}

/// List every member of the archive at `path`.
///
/// `want` decides which regular files have their contents read.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a tar archive, fails
/// to decompress, or a wanted member is not valid UTF-8.
pub fn read_members(path: &Path, want: impl Fn(&str) -> bool) -> io::Result<Vec<Member>> {
    let mut reader = BufReader::new(File::open(path)?);
    let compression = Compression::detect(reader.fill_buf()?);

    let reader: Box<dyn Read> = match compression {
        Compression::Gzip => Box::new(GzDecoder::new(reader)),
        Compression::Zstd => Box::new(zstd::stream::read::Decoder::with_buffer(reader)?),
        Compression::Xz => Box::new(XzDecoder::new(reader)),
        Compression::None => Box::new(reader),
    };

    let mut archive = tar::Archive::new(reader);
    let mut members = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let raw = entry.path()?.to_string_lossy().into_owned();
        let path = raw.trim_start_matches("./").trim_end_matches('/').to_string();
        if path.is_empty() {
            continue;
        }
        let kind = entry.header().entry_type();
        let is_dir = kind.is_dir();

        let content = if kind.is_file() && want(&path) {
            let mut content = String::new();
            entry.read_to_string(&mut content)?;
            Some(content)
        } else {
            None
        };

        members.push(Member {
            path,
            is_dir,
            content,
        });
    }
    Ok(members)
}
