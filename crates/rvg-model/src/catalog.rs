use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::chapter::ChapterTarget;

/// Site code of the only book whose chapters need three digits.
pub const PSALMS_SITE_CODE: &str = "PSA";

/// A book of the Bible as addressed both locally and on ebible.org.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Display name (e.g., "Génesis").
    pub name: &'static str,
    /// Number of chapters in the book.
    pub chapters: u16,
    /// Lowercase, hyphenated code used for local directories and files (e.g., "i-samuel").
    pub code: &'static str,
    /// Three-character code used by the site to address the book's pages (e.g., "1SA").
    pub site_code: &'static str,
}

impl Book {
    /// Zero-padding width for this book's chapter numbers.
    pub fn chapter_width(&self) -> usize {
        if self.site_code == PSALMS_SITE_CODE {
            3
        } else {
            2
        }
    }

    /// Left-pad a chapter number to this book's width (e.g., 7 -> "07", or "007" for Psalms).
    pub fn pad_chapter(&self, chapter: u16) -> String {
        format!("{chapter:0width$}", width = self.chapter_width())
    }
}

/// Directory name for a book: the two-digit 1-based book number, a hyphen, and the local code.
pub fn book_dir_name(number: u8, code: &str) -> String {
    format!("{number:02}-{code}")
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no books")]
    Empty,

    #[error("catalog has {0} books, but book numbers are limited to two digits")]
    TooManyBooks(usize),

    #[error("book '{0}' has no chapters")]
    NoChapters(String),

    #[error("duplicate local code: {0}")]
    DuplicateCode(String),

    #[error("duplicate site code: {0}")]
    DuplicateSiteCode(String),

    #[error("unknown site code: {0}")]
    UnknownSiteCode(String),
}

/// A book together with its 1-based position in the full catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub number: u8,
    #[serde(flatten)]
    pub book: Book,
}

impl CatalogEntry {
    pub fn dir_name(&self) -> String {
        book_dir_name(self.number, self.book.code)
    }
}

/// An ordered list of books with book numbers assigned at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from books in canonical order, numbering them from 1.
    pub fn new(books: &[Book]) -> Result<Self, CatalogError> {
        if books.is_empty() {
            return Err(CatalogError::Empty);
        }
        if books.len() > 99 {
            return Err(CatalogError::TooManyBooks(books.len()));
        }

        let mut codes = HashSet::new();
        let mut site_codes = HashSet::new();
        for book in books {
            if book.chapters == 0 {
                return Err(CatalogError::NoChapters(book.code.to_string()));
            }
            if !codes.insert(book.code) {
                return Err(CatalogError::DuplicateCode(book.code.to_string()));
            }
            // Lookups ignore case, so "GEN" and "gen" collide.
            if !site_codes.insert(book.site_code.to_ascii_uppercase()) {
                return Err(CatalogError::DuplicateSiteCode(book.site_code.to_string()));
            }
        }

        Ok(Self::numbered(books))
    }

    /// The 66-book Reina-Valera Gómez catalog.
    pub fn standard() -> Self {
        Self::numbered(&BOOKS)
    }

    fn numbered(books: &[Book]) -> Self {
        let entries = books
            .iter()
            .zip(1u8..)
            .map(|(book, number)| CatalogEntry { number, book: *book })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a book by site code (case-insensitive).
    pub fn get(&self, site_code: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.book.site_code.eq_ignore_ascii_case(site_code))
    }

    pub fn total_chapters(&self) -> usize {
        self.entries.iter().map(|e| e.book.chapters as usize).sum()
    }

    /// Every chapter of every book, in catalog order with ascending chapters.
    pub fn chapters(&self) -> impl Iterator<Item = ChapterTarget> + '_ {
        self.entries.iter().flat_map(|entry| {
            (1..=entry.book.chapters).map(move |chapter| ChapterTarget {
                book_number: entry.number,
                book: entry.book,
                chapter,
            })
        })
    }

    /// Restrict the catalog to the given site codes.
    ///
    /// Books keep their numbers from this catalog, so directory names are the
    /// same whether a book is harvested alone or as part of a full run.
    pub fn select<S: AsRef<str>>(&self, site_codes: &[S]) -> Result<Self, CatalogError> {
        for code in site_codes {
            if self.get(code.as_ref()).is_none() {
                return Err(CatalogError::UnknownSiteCode(code.as_ref().to_string()));
            }
        }

        let entries = self
            .entries
            .iter()
            .filter(|e| {
                site_codes
                    .iter()
                    .any(|code| e.book.site_code.eq_ignore_ascii_case(code.as_ref()))
            })
            .copied()
            .collect();
        Ok(Self { entries })
    }
}

const fn book(name: &'static str, chapters: u16, code: &'static str, site_code: &'static str) -> Book {
    Book {
        name,
        chapters,
        code,
        site_code,
    }
}

/// The books in canonical order. Position determines the book number.
pub const BOOKS: [Book; 66] = [
    book("Génesis", 50, "genesis", "GEN"),
    book("Éxodo", 40, "exodo", "EXO"),
    book("Levítico", 27, "levitico", "LEV"),
    book("Números", 36, "numeros", "NUM"),
    book("Deuteronomio", 34, "deuteronomio", "DEU"),
    book("Josué", 24, "josue", "JOS"),
    book("Jueces", 21, "jueces", "JDG"),
    book("Rut", 4, "rut", "RUT"),
    book("I Samuel", 31, "i-samuel", "1SA"),
    book("II Samuel", 24, "ii-samuel", "2SA"),
    book("I Reyes", 22, "i-reyes", "1KI"),
    book("II Reyes", 25, "ii-reyes", "2KI"),
    book("I Crónicas", 29, "i-cronicas", "1CH"),
    book("II Crónicas", 36, "ii-cronicas", "2CH"),
    book("Esdras", 10, "esdras", "EZR"),
    book("Nehemías", 13, "nehemias", "NEH"),
    book("Ester", 10, "ester", "EST"),
    book("Job", 42, "job", "JOB"),
    book("Salmos", 150, "salmos", "PSA"),
    book("Proverbios", 31, "proverbios", "PRO"),
    book("Eclesiastés", 12, "eclesiastes", "ECC"),
    book("Cantares", 8, "cantares", "SNG"),
    book("Isaías", 66, "isaias", "ISA"),
    book("Jeremías", 52, "jeremias", "JER"),
    book("Lamentaciones", 5, "lamentaciones", "LAM"),
    book("Ezequiel", 48, "ezequiel", "EZK"),
    book("Daniel", 12, "daniel", "DAN"),
    book("Oseas", 14, "oseas", "HOS"),
    book("Joel", 3, "joel", "JOL"),
    book("Amós", 9, "amos", "AMO"),
    book("Abdías", 1, "obdias", "OBA"),
    book("Jonás", 4, "jonas", "JON"),
    book("Miqueas", 7, "miqueas", "MIC"),
    book("Nahúm", 3, "nahum", "NAM"),
    book("Habacuc", 3, "habacuc", "HAB"),
    book("Sofonías", 3, "sofonias", "ZEP"),
    book("Hageo", 2, "hageo", "HAG"),
    book("Zacarías", 14, "zacarias", "ZEC"),
    book("Malaquías", 4, "malaquias", "MAL"),
    book("Mateo", 28, "mateo", "MAT"),
    book("Marcos", 16, "marcos", "MRK"),
    book("Lucas", 24, "lucas", "LUK"),
    book("Juan", 21, "juan", "JHN"),
    book("Hechos", 28, "hechos", "ACT"),
    book("Romanos", 16, "romanos", "ROM"),
    book("I Corintios", 16, "i-corintios", "1CO"),
    book("II Corintios", 13, "ii-corintios", "2CO"),
    book("Gálatas", 6, "galatas", "GAL"),
    book("Efesios", 6, "efesios", "EPH"),
    book("Filipenses", 4, "filipenses", "PHP"),
    book("Colosenses", 4, "colosenses", "COL"),
    book("I Tesalonicenses", 5, "i-tesalonicenses", "1TH"),
    book("II Tesalonicenses", 3, "ii-tesalonicenses", "2TH"),
    book("I Timoteo", 6, "i-timoteo", "1TI"),
    book("II Timoteo", 4, "ii-timoteo", "2TI"),
    book("Tito", 3, "tito", "TIT"),
    book("Filemón", 1, "filemon", "PHM"),
    book("Hebreos", 13, "hebreos", "HEB"),
    book("Santiago", 5, "santiago", "JAS"),
    book("I Pedro", 5, "i-pedro", "1PE"),
    book("II Pedro", 3, "ii-pedro", "2PE"),
    book("I Juan", 5, "i-juan", "1JN"),
    book("II Juan", 1, "ii-juan", "2JN"),
    book("III Juan", 1, "iii-juan", "3JN"),
    book("Judas", 1, "judas", "JUD"),
    book("Apocalipsis", 22, "apocalipsis", "REV"),
];
