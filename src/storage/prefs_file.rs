//! Memory-Mapped PlayerPrefs File I/O
//!
//! Load: file di-mmap read-only lalu di-decode langsung dari page cache,
//! tanpa copy ke buffer perantara.
//! Save: encode ke buffer, tulis ke file sementara unik per call, lalu
//! rename atomik supaya file lama tidak pernah setengah tertulis.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;
use memmap2::Mmap;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::format::{DecodeConfig, Decoder, Prefs};

/// Load dan decode file PlayerPrefs
pub fn load<P: AsRef<Path>>(path: P) -> Result<Prefs> {
    load_with_config(path, DecodeConfig::default())
}

pub fn load_with_config<P: AsRef<Path>>(path: P, config: DecodeConfig) -> Result<Prefs> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::io(format!("opening {}", path.display()), e))?;

    let len = file
        .metadata()
        .map_err(|e| Error::io(format!("reading metadata of {}", path.display()), e))?
        .len();

    // mmap dengan panjang 0 gagal di beberapa platform
    if len == 0 {
        return Err(Error::malformed_header(format!(
            "{} is empty",
            path.display()
        )));
    }

    // SAFETY: mapping read-only; file tidak diubah selama decode berlangsung
    let mmap = unsafe { Mmap::map(&file) }
        .map_err(|e| Error::io(format!("mapping {}", path.display()), e))?;

    debug!("loading {} ({} bytes)", path.display(), len);
    Decoder::with_config(&mmap, config)?.decode_all()
}

/// Encode dan simpan ke `path`
///
/// Setiap call punya file sementara sendiri di direktori tujuan, jadi save
/// paralel ke path yang sama tidak saling menimpa; yang terakhir rename menang.
pub fn save<P: AsRef<Path>>(path: P, prefs: &Prefs) -> Result<()> {
    let path = path.as_ref();
    let bytes = crate::encode(prefs)?;
    let dir = staging_dir(path);

    // NamedTempFile menghapus file miliknya sendiri saat drop kalau belum di-persist
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| Error::io(format!("creating temp file in {}", dir.display()), e))?;

    tmp.write_all(&bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| Error::io(format!("writing {}", tmp.path().display()), e))?;

    tmp.persist(path).map_err(|e| {
        Error::io(
            format!("renaming {} to {}", e.file.path().display(), path.display()),
            e.error,
        )
    })?;

    debug!("saved {} entries to {}", prefs.len(), path.display());
    Ok(())
}

/// Direktori tempat file sementara dibuat: parent dari `path`, atau `.`
fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
