use anyhow::{Context, Result, anyhow, bail};
use std::{
    io::Read,
    path::{Path, PathBuf},
    sync::{Arc, LazyLock},
    time::Duration,
};

const SKIN_SUFFIXES: [&str; 2] = ["wsz", "zip"];
const MAX_FETCH_BYTES: u64 = 256 * 1024 * 1024;

static HTTP_AGENT: LazyLock<ureq::Agent> = LazyLock::new(|| {
    ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(30))
        .timeout_read(Duration::from_secs(60))
        .redirects(10)
        .build()
});

/// Where a load reads its bytes from.
#[derive(Clone, Debug)]
pub enum FileHandle {
    Url { url: String, name: String },
    Local { path: PathBuf, name: String },
    Memory { name: String, bytes: Arc<[u8]> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Skin,
    Media,
}

impl FileHandle {
    /// Without an explicit name, the last path segment of the URL is used.
    pub fn from_url(url: &str, name: Option<&str>) -> Self {
        let name = match name {
            Some(n) => n.to_string(),
            None => url.rsplit('/').next().unwrap_or(url).to_string(),
        };

        FileHandle::Url {
            url: url.to_string(),
            name,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        FileHandle::Local {
            path: path.to_path_buf(),
            name,
        }
    }

    pub fn from_bytes(name: &str, bytes: impl Into<Arc<[u8]>>) -> Self {
        FileHandle::Memory {
            name: name.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Config values may be either a URL or a local path.
    pub fn from_location(location: &str, name: Option<&str>) -> Self {
        match location.starts_with("http://") || location.starts_with("https://") {
            true => Self::from_url(location, name),
            false => {
                let mut handle = Self::from_path(location);
                if let (FileHandle::Local { name: n, .. }, Some(name)) = (&mut handle, name) {
                    *n = name.to_string();
                }
                handle
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileHandle::Url { name, .. } => name,
            FileHandle::Local { name, .. } => name,
            FileHandle::Memory { name, .. } => name,
        }
    }

    /// Case-insensitive suffix match on the declared name.
    pub fn is_skin_archive(&self) -> bool {
        let name = self.name().to_ascii_lowercase();
        SKIN_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
    }

    pub fn route(&self) -> Route {
        match self.is_skin_archive() {
            true => Route::Skin,
            false => Route::Media,
        }
    }

    /// Blocking read of the whole file. Call from a worker, never the controller.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match self {
            FileHandle::Url { url, .. } => fetch_url(url),
            FileHandle::Local { path, .. } => std::fs::read(path)
                .with_context(|| format!("Unable to read \"{}\"", path.display())),
            FileHandle::Memory { bytes, .. } => Ok(bytes.to_vec()),
        }
    }
}

fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let response = HTTP_AGENT
        .get(url)
        .call()
        .map_err(|e| anyhow!("HTTP GET failed for {url}: {e}"))?;

    read_capped(response.into_reader(), MAX_FETCH_BYTES)
        .with_context(|| format!("Failed reading body of {url}"))
}

/// Reads at most `limit` bytes. A longer stream is an error, never a
/// silently truncated buffer.
fn read_capped(reader: impl Read, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(limit + 1).read_to_end(&mut bytes)?;

    if bytes.len() as u64 > limit {
        bail!("Body exceeds {limit} bytes");
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capped_read_rejects_oversized_bodies() {
        let body = std::io::Cursor::new(vec![7u8; 16]);
        assert_eq!(read_capped(body, 16).unwrap().len(), 16);

        let body = std::io::Cursor::new(vec![7u8; 17]);
        let err = read_capped(body, 16).unwrap_err();
        assert!(err.to_string().contains("exceeds 16 bytes"));
    }

    #[test]
    fn skin_archives_route_to_skin() {
        assert_eq!(FileHandle::from_path("classic.wsz").route(), Route::Skin);
        assert_eq!(FileHandle::from_path("/tmp/Base.ZIP").route(), Route::Skin);
        assert_eq!(FileHandle::from_bytes("MODERN.Wsz", Vec::<u8>::new()).route(), Route::Skin);
    }

    #[test]
    fn everything_else_routes_to_media() {
        assert_eq!(FileHandle::from_path("track.mp3").route(), Route::Media);
        assert_eq!(FileHandle::from_path("zip.flac").route(), Route::Media);
        assert_eq!(FileHandle::from_path("skin.png").route(), Route::Media);
    }

    #[test]
    fn url_name_defaults_to_last_segment() {
        let handle = FileHandle::from_url("https://example.com/mp3/llama-2.91.mp3", None);
        assert_eq!(handle.name(), "llama-2.91.mp3");

        let handle = FileHandle::from_url("https://example.com/a.mp3", Some("Llama"));
        assert_eq!(handle.name(), "Llama");
    }

    #[test]
    fn location_picks_url_or_path() {
        assert!(matches!(
            FileHandle::from_location("https://example.com/x.wsz", None),
            FileHandle::Url { .. }
        ));

        let local = FileHandle::from_location("/music/song.ogg", Some("Song"));
        assert!(matches!(local, FileHandle::Local { .. }));
        assert_eq!(local.name(), "Song");
    }

    #[test]
    fn local_and_memory_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.mp3");
        std::fs::write(&path, b"ID3 bytes").unwrap();

        let handle = FileHandle::from_path(&path);
        assert_eq!(handle.name(), "track.mp3");
        assert_eq!(handle.read_bytes().unwrap(), b"ID3 bytes");

        let memory = FileHandle::from_bytes("x.mp3", vec![1u8, 2, 3]);
        assert_eq!(memory.read_bytes().unwrap(), vec![1, 2, 3]);

        let missing = FileHandle::from_path(dir.path().join("nope.mp3"));
        assert!(missing.read_bytes().is_err());
    }
}
