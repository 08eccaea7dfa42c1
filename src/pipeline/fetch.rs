//! The fetch stage: acquire the source and verify it.
//!
//! Path sources are staged by copying the tree (minus hidden and
//! gitignored files) into the work directory. Url sources are downloaded,
//! checked against the recipe's sha256, and unpacked when they are plain
//! tarballs. Compressed archives are left for the build script, which gets
//! the path in `KILN_SRC_ARCHIVE` (pip and friends consume sdists as-is).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::{KilnError, Result};
use crate::pipeline::BuildOptions;
use crate::recipe::{Recipe, SourceKind};

/// Where the fetch stage put things.
#[derive(Debug, Clone)]
pub struct FetchedSource {
    /// Root of the staged source tree; the build script's working directory.
    pub src_dir: PathBuf,
    /// The downloaded archive, for url sources.
    pub archive: Option<PathBuf>,
    /// Whether the archive matched the recipe's sha256.
    pub verified: bool,
}

impl FetchedSource {
    pub fn describe(&self) -> String {
        match (&self.archive, self.verified) {
            (None, _) => "staged local source tree".into(),
            (Some(_), true) => "downloaded and verified archive".into(),
            (Some(_), false) => "downloaded archive without checksum verification".into(),
        }
    }
}

pub fn fetch(
    recipe: &Recipe,
    recipe_dir: &Path,
    work_dir: &Path,
    options: &BuildOptions,
) -> Result<FetchedSource> {
    match recipe.source.kind() {
        SourceKind::Path(rel) => stage_local(&recipe_dir.join(rel), work_dir),
        SourceKind::Url(url) => download(url, recipe, work_dir, options),
        SourceKind::Conflicting => Err(KilnError::Config(
            "source declares both a url and a path".into(),
        )),
        SourceKind::Missing => Err(KilnError::Config(
            "source declares neither a url nor a path".into(),
        )),
    }
}

fn stage_local(source_root: &Path, work_dir: &Path) -> Result<FetchedSource> {
    if !source_root.is_dir() {
        return Err(KilnError::Config(format!(
            "source path {} is not a directory",
            source_root.display()
        )));
    }
    let src_dir = work_dir.join("src");
    fs::create_dir_all(&src_dir)?;

    let mut copied = 0usize;
    let walker = ignore::WalkBuilder::new(source_root)
        .hidden(true)
        .git_ignore(true)
        .build();
    for entry in walker {
        let entry =
            entry.map_err(|e| KilnError::Config(format!("cannot read source tree: {e}")))?;
        let Ok(rel) = entry.path().strip_prefix(source_root) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let dest = src_dir.join(rel);
        if entry.file_type().map_or(false, |t| t.is_dir()) {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            copied += 1;
        }
    }
    info!(copied, src = %source_root.display(), "staged local source");
    Ok(FetchedSource {
        src_dir,
        archive: None,
        verified: false,
    })
}

fn download(
    url: &str,
    recipe: &Recipe,
    work_dir: &Path,
    options: &BuildOptions,
) -> Result<FetchedSource> {
    let expected = match recipe.source.checksum() {
        Some(sum) => Some(sum.to_lowercase()),
        None if options.allow_unverified => None,
        None => return Err(KilnError::MissingChecksum { url: url.into() }),
    };

    let file_name = url
        .rsplit('/')
        .next()
        .and_then(|n| n.split('?').next())
        .filter(|n| !n.is_empty())
        .unwrap_or("source.tar");
    let archive = work_dir.join(file_name);

    let network = |e: reqwest::Error| KilnError::Network {
        url: url.into(),
        source: e,
    };
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("kiln/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(options.fetch.timeout_secs))
        .build()
        .map_err(network)?;

    info!(url, "downloading source");
    let mut response = client.get(url).send().map_err(network)?;
    if !response.status().is_success() {
        return Err(KilnError::HttpStatus {
            url: url.into(),
            status: response.status().as_u16(),
        });
    }
    let mut file = fs::File::create(&archive)?;
    response.copy_to(&mut file).map_err(network)?;
    drop(file);

    let verified = match &expected {
        Some(expected) => {
            if let Err(e) = verify_sha256(&archive, expected) {
                // failed downloads are not kept
                let _ = fs::remove_file(&archive);
                return Err(e);
            }
            true
        }
        None => {
            warn!(url, "proceeding without checksum verification");
            false
        }
    };

    let src_dir = unpack(&archive, work_dir)?;
    Ok(FetchedSource {
        src_dir,
        archive: Some(archive),
        verified,
    })
}

/// Hash a file and compare against the expected lowercase hex digest.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());
    if actual != expected.to_lowercase() {
        return Err(KilnError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_lowercase(),
            actual,
        });
    }
    Ok(())
}

/// Unpack plain tarballs into `work/src`. Anything else stays packed and
/// the empty src dir becomes the build cwd.
fn unpack(archive: &Path, work_dir: &Path) -> Result<PathBuf> {
    let src_dir = work_dir.join("src");
    fs::create_dir_all(&src_dir)?;
    if archive.extension().map_or(true, |e| e != "tar") {
        return Ok(src_dir);
    }
    let file = fs::File::open(archive)?;
    tar::Archive::new(file)
        .unpack(&src_dir)
        .map_err(|e| KilnError::Archive {
            path: archive.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(descend_single_dir(src_dir))
}

/// Tarballs conventionally wrap everything in `name-version/`; descend into
/// it so build scripts land next to setup.py.
fn descend_single_dir(dir: PathBuf) -> PathBuf {
    let Ok(mut entries) = fs::read_dir(&dir) else {
        return dir;
    };
    match (entries.next(), entries.next()) {
        (Some(Ok(only)), None) if only.path().is_dir() => only.path(),
        _ => dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn verify_accepts_matching_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        fs::write(&path, "hello").unwrap();
        verify_sha256(&path, HELLO_SHA256).unwrap();
        verify_sha256(&path, &HELLO_SHA256.to_uppercase()).unwrap();
    }

    #[test]
    fn verify_rejects_mismatch_with_actual_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        fs::write(&path, "hello").unwrap();
        let err = verify_sha256(&path, &"0".repeat(64)).unwrap_err();
        match err {
            KilnError::ChecksumMismatch { actual, .. } => assert_eq!(actual, HELLO_SHA256),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stage_local_copies_tree_and_skips_hidden() {
        let source = tempfile::tempdir().unwrap();
        fs::write(source.path().join("setup.py"), "# stub\n").unwrap();
        fs::create_dir(source.path().join("pkg")).unwrap();
        fs::write(source.path().join("pkg/__init__.py"), "").unwrap();
        fs::write(source.path().join(".secret"), "x").unwrap();

        let work = tempfile::tempdir().unwrap();
        let fetched = stage_local(source.path(), work.path()).unwrap();
        assert!(fetched.src_dir.join("setup.py").is_file());
        assert!(fetched.src_dir.join("pkg/__init__.py").is_file());
        assert!(!fetched.src_dir.join(".secret").exists());
        assert!(fetched.archive.is_none());
    }

    #[test]
    fn stage_local_rejects_missing_directory() {
        let work = tempfile::tempdir().unwrap();
        let err = stage_local(&work.path().join("nope"), work.path()).unwrap_err();
        assert!(matches!(err, KilnError::Config(_)));
    }

    #[test]
    fn unpack_descends_single_top_level_dir() {
        let tree = tempfile::tempdir().unwrap();
        fs::write(tree.path().join("setup.py"), "# stub\n").unwrap();

        let work = tempfile::tempdir().unwrap();
        let tar_path = work.path().join("pkg-1.0.tar");
        let file = fs::File::create(&tar_path).unwrap();
        let mut builder = tar::Builder::new(file);
        builder.append_dir_all("pkg-1.0", tree.path()).unwrap();
        builder.finish().unwrap();

        let src_dir = unpack(&tar_path, work.path()).unwrap();
        assert!(src_dir.ends_with("pkg-1.0"));
        assert!(src_dir.join("setup.py").is_file());
    }

    #[test]
    fn compressed_archives_stay_packed() {
        let work = tempfile::tempdir().unwrap();
        let archive = work.path().join("pkg-1.0.tar.gz");
        fs::write(&archive, b"not really gzip").unwrap();
        let src_dir = unpack(&archive, work.path()).unwrap();
        assert_eq!(src_dir, work.path().join("src"));
    }

    #[test]
    fn url_without_checksum_is_refused() {
        let recipe = Recipe::from_str(
            "[source]\nurl = \"https://example.invalid/a.tar\"\nsha256 = \"\"\n",
        )
        .unwrap();
        let work = tempfile::tempdir().unwrap();
        let err = fetch(&recipe, work.path(), work.path(), &BuildOptions::default()).unwrap_err();
        assert!(matches!(err, KilnError::MissingChecksum { .. }));
    }

    #[test]
    fn conflicting_source_is_a_config_error() {
        let recipe =
            Recipe::from_str("[source]\nurl = \"https://e.com/a.tar\"\npath = \"a\"\n").unwrap();
        let work = tempfile::tempdir().unwrap();
        let err = fetch(&recipe, work.path(), work.path(), &BuildOptions::default()).unwrap_err();
        assert!(matches!(err, KilnError::Config(_)));
    }
}
