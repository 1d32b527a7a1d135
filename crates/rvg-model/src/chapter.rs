use std::path::{Path, PathBuf};

use crate::catalog::{book_dir_name, Book};

/// Path prefix of the Reina-Valera Gómez pages on ebible.org.
pub const REMOTE_PREFIX: &str = "/sparvg/";

/// One chapter of one book, with everything needed to address it remotely and locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterTarget {
    /// 1-based position of the book in the catalog.
    pub book_number: u8,
    pub book: Book,
    /// 1-based chapter number.
    pub chapter: u16,
}

impl ChapterTarget {
    pub fn padded_chapter(&self) -> String {
        self.book.pad_chapter(self.chapter)
    }

    pub fn book_dir_name(&self) -> String {
        book_dir_name(self.book_number, self.book.code)
    }

    /// `{code}-{CC}.txt`, e.g. "genesis-01.txt" or "salmos-119.txt".
    pub fn file_name(&self) -> String {
        format!("{}-{}.txt", self.book.code, self.padded_chapter())
    }

    /// Path relative to the site origin, e.g. "/sparvg/GEN01.htm".
    pub fn remote_path(&self) -> String {
        format!("{REMOTE_PREFIX}{}{}.htm", self.book.site_code, self.padded_chapter())
    }

    /// Name under which the raw page is archived, e.g. "GEN01.htm".
    pub fn page_name(&self) -> String {
        format!("{}{}.htm", self.book.site_code, self.padded_chapter())
    }

    pub fn file_path(&self, root: &Path) -> PathBuf {
        root.join(self.book_dir_name()).join(self.file_name())
    }
}
