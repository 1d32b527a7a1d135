use std::fs;
use std::io;
use std::path::Path;

use rvg_model::Catalog;

use crate::error::HarvestError;

/// Result of a write-once attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { bytes: usize },
    /// The file already held content and was left untouched.
    AlreadyExists,
}

/// Create `{NN}-{code}` under `root` for every book in the catalog.
///
/// Existing directories are left as they are.
pub fn ensure_book_directories(root: &Path, catalog: &Catalog) -> Result<(), HarvestError> {
    for entry in catalog.entries() {
        let path = root.join(entry.dir_name());
        fs::create_dir_all(&path).map_err(|source| HarvestError::CreateDir {
            path: path.clone(),
            source,
        })?;
    }
    tracing::debug!(root = %root.display(), books = catalog.len(), "Book directories ready");
    Ok(())
}

/// Chapter file contents: one verse per line, no trailing newline.
pub fn join_verses(verses: &[String]) -> String {
    verses.join("\n")
}

/// Whether `path` is a regular file with nonzero size.
///
/// Anything other than a regular file at `path` is an error.
pub fn has_content(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if !meta.is_file() => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "destination is not a regular file",
        )),
        Ok(meta) => Ok(meta.len() > 0),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Write the verses to `path` unless it already holds content.
///
/// Absent and zero-length files are (re)written; anything else is never
/// modified.
pub fn write_once(path: &Path, verses: &[String]) -> io::Result<WriteOutcome> {
    if has_content(path)? {
        return Ok(WriteOutcome::AlreadyExists);
    }

    let text = join_verses(verses);
    fs::write(path, &text)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "Wrote chapter text");
    Ok(WriteOutcome::Written { bytes: text.len() })
}

/// Cache raw HTML so a page can be re-examined without re-fetching.
pub fn cache_html(dir: &Path, filename: &str, html: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, html)?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "Cached raw HTML");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvg_model::Book;

    fn verses(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_join_round_trip() {
        let original = verses(&["a", "b", "c"]);
        let text = join_verses(&original);
        assert_eq!(text, "a\nb\nc");

        let recovered: Vec<String> = text.split('\n').map(String::from).collect();
        assert_eq!(recovered, original);
    }

    #[test]
    fn test_join_keeps_identical_verses() {
        assert_eq!(join_verses(&verses(&["Amén.", "Amén."])), "Amén.\nAmén.");
    }

    #[test]
    fn test_write_once_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis-01.txt");

        let outcome = write_once(&path, &verses(&["Hello", "World"])).unwrap();
        assert_eq!(outcome, WriteOutcome::Written { bytes: 11 });
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello\nWorld");
    }

    #[test]
    fn test_write_once_fills_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis-01.txt");
        fs::write(&path, "").unwrap();

        let outcome = write_once(&path, &verses(&["Hello"])).unwrap();
        assert_eq!(outcome, WriteOutcome::Written { bytes: 5 });
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello");
    }

    #[test]
    fn test_write_once_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis-01.txt");
        fs::write(&path, "Original").unwrap();

        let outcome = write_once(&path, &verses(&["Replacement"])).unwrap();
        assert_eq!(outcome, WriteOutcome::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Original");
    }

    #[test]
    fn test_has_content_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis-01.txt");
        fs::create_dir(&path).unwrap();

        let err = has_content(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(write_once(&path, &verses(&["Hello"])).is_err());
        assert!(path.is_dir());
    }

    #[test]
    fn test_write_once_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("genesis-01.txt");
        assert!(write_once(&path, &verses(&["Hello"])).is_err());
    }

    #[test]
    fn test_ensure_book_directories_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(&[
            Book { name: "Uno", chapters: 1, code: "uno", site_code: "UNO" },
            Book { name: "Dos", chapters: 2, code: "dos", site_code: "DOS" },
        ])
        .unwrap();

        ensure_book_directories(dir.path(), &catalog).unwrap();
        ensure_book_directories(dir.path(), &catalog).unwrap();

        assert!(dir.path().join("01-uno").is_dir());
        assert!(dir.path().join("02-dos").is_dir());
    }

    #[test]
    fn test_ensure_book_directories_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = ensure_book_directories(&blocker, &Catalog::standard()).unwrap_err();
        let HarvestError::CreateDir { path, .. } = err;
        assert_eq!(path, blocker.join("01-genesis"));
    }

    #[test]
    fn test_cache_html() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(".html");
        cache_html(&cache, "GEN01.htm", "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(cache.join("GEN01.htm")).unwrap(), "<html></html>");
    }
}
