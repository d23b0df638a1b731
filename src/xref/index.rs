//! Heading index of a generated corpus.
//!
//! Every page's first top-level heading names the page. The index maps
//! those headings to page IDs and can be saved as a small CSV file so the
//! indexing and linking passes can run separately.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::corpus::{CorpusStore, PageFailure, PageId};
use crate::error::{Error, Result};
use crate::wiki::top_level_heading;

/// Header row of the index file.
pub const HEADER: [&str; 2] = ["page_id", "heading"];

/// A page and the heading that names it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct IndexEntry {
    #[cfg_attr(feature = "cli", serde(serialize_with = "serialize_page_id"))]
    pub page: PageId,
    pub heading: String,
}

#[cfg(feature = "cli")]
fn serialize_page_id<S: serde::Serializer>(
    id: &PageId,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(id.as_str())
}

impl IndexEntry {
    pub fn new(page: PageId, heading: impl Into<String>) -> Self {
        Self {
            page,
            heading: heading.into(),
        }
    }
}

/// Ordered heading index.
///
/// Headings are not unique across pages. Entries keep discovery order and
/// [`CrossRefIndex::targets`] resolves duplicates to the last entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossRefIndex {
    entries: Vec<IndexEntry>,
}

impl CrossRefIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Heading → page lookup; for duplicate headings the last entry wins.
    pub fn targets(&self) -> HashMap<&str, &PageId> {
        let mut map = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !entry.heading.is_empty() {
                map.insert(entry.heading.as_str(), &entry.page);
            }
        }
        map
    }

    /// Write the index as CSV with a header row.
    ///
    /// Fields containing a comma, quote or line break are quoted.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", HEADER.join(","))?;
        for entry in &self.entries {
            writeln!(
                writer,
                "{},{}",
                quote_field(entry.page.as_str()),
                quote_field(&entry.heading)
            )?;
        }
        Ok(())
    }

    /// Read an index written by [`CrossRefIndex::write_to`].
    ///
    /// The first record is the header and is skipped. Unquoted rows with
    /// extra commas keep everything after the first comma as the heading,
    /// since page IDs never contain commas.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        let mut index = Self::new();
        for (line, fields) in parse_records(&text)?.into_iter().skip(1) {
            let mut fields = fields.into_iter();
            let (Some(page), Some(first)) = (fields.next(), fields.next()) else {
                return Err(Error::IndexFormat {
                    line,
                    message: "expected page_id and heading".to_string(),
                });
            };
            let heading = std::iter::once(first).chain(fields).collect::<Vec<_>>().join(",");
            if page.is_empty() {
                return Err(Error::IndexFormat {
                    line,
                    message: "empty page_id".to_string(),
                });
            }
            index.push(IndexEntry::new(PageId::new(page), heading));
        }
        Ok(index)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = File::open(path)?;
        Self::read_from(&mut file)
    }
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split CSV text into records, each tagged with its starting line (1-based).
fn parse_records(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                if !fields.is_empty() || !field.is_empty() {
                    fields.push(std::mem::take(&mut field));
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::IndexFormat {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !fields.is_empty() || !field.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }
    Ok(records)
}

/// First top-level heading of a page body.
pub fn first_heading(body: &str) -> Option<&str> {
    body.lines().find_map(top_level_heading)
}

/// Outcome of indexing a corpus.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub index: CrossRefIndex,
    pub pages_scanned: usize,
    /// Pages without a top-level heading.
    pub without_heading: usize,
    pub failures: Vec<PageFailure>,
}

/// Index every page of `store`.
///
/// Pages are visited in path order. Unreadable pages are logged and
/// skipped; only an unreadable corpus root is an error.
pub fn index_corpus(store: &CorpusStore) -> Result<IndexReport> {
    let mut report = IndexReport::default();

    for path in store.list_pages()? {
        report.pages_scanned += 1;

        let body = match store.read_page(&path) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                report.failures.push(PageFailure {
                    path,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let Some(heading) = first_heading(&body) else {
            report.without_heading += 1;
            continue;
        };

        let page = match store.page_id(&path) {
            Ok(page) => page,
            Err(e) => {
                log::warn!("Skipping {}: {e}", path.display());
                report.failures.push(PageFailure {
                    path,
                    error: e.to_string(),
                });
                continue;
            }
        };
        log::debug!("Indexed {page} as {heading:?}");
        report.index.push(IndexEntry::new(page, heading));
    }

    log::info!(
        "Indexed {} of {} pages under {}",
        report.index.len(),
        report.pages_scanned,
        store.root().display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entry(page: &str, heading: &str) -> IndexEntry {
        IndexEntry::new(PageId::new(page), heading)
    }

    #[test]
    fn test_first_heading_skips_lower_levels() {
        let body = "intro\n==== Sub ====\n====== Risk Management ======\n\n====== Later ======\n";
        assert_eq!(first_heading(body), Some("Risk Management"));
        assert_eq!(first_heading("==== Only sub ====\n"), None);
        assert_eq!(first_heading(""), None);
    }

    #[test]
    fn test_targets_last_entry_wins() {
        let mut index = CrossRefIndex::new();
        index.push(entry("a:first", "Dup"));
        index.push(entry("b:other", "Other"));
        index.push(entry("c:second", "Dup"));

        let targets = index.targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets["Dup"].as_str(), "c:second");
    }

    #[test]
    fn test_write_quotes_when_needed() {
        let mut index = CrossRefIndex::new();
        index.push(entry("a:plain", "Plain"));
        index.push(entry("a:comma", "Risiken, Gefahren"));
        index.push(entry("a:quote", "Der \"Faktor\" Mensch"));

        let mut out = Vec::new();
        index.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "page_id,heading\n\
             a:plain,Plain\n\
             a:comma,\"Risiken, Gefahren\"\n\
             a:quote,\"Der \"\"Faktor\"\" Mensch\"\n"
        );
    }

    #[test]
    fn test_read_back_written_index() {
        let mut index = CrossRefIndex::new();
        index.push(entry("a:comma", "Risiken, Gefahren"));
        index.push(entry("a:newline", "Zwei\nZeilen"));

        let mut out = Vec::new();
        index.write_to(&mut out).unwrap();
        let read = CrossRefIndex::read_from(&mut out.as_slice()).unwrap();
        assert_eq!(read, index);
    }

    #[test]
    fn test_read_legacy_unquoted_rows() {
        let text = "Dateipfad,Überschrift\r\nisms:isms.1,Sicherheitsmanagement, allgemein\r\n\r\n";
        let index = CrossRefIndex::read_from(&mut text.as_bytes()).unwrap();
        assert_eq!(
            index.entries(),
            [entry("isms:isms.1", "Sicherheitsmanagement, allgemein")]
        );
    }

    #[test]
    fn test_read_rejects_short_rows() {
        let text = "page_id,heading\na:b,Ok\nbroken\n";
        let err = CrossRefIndex::read_from(&mut text.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::IndexFormat { line: 3, .. }));
    }

    #[test]
    fn test_read_rejects_unterminated_quote() {
        let text = "page_id,heading\na:b,\"open\n";
        assert!(matches!(
            CrossRefIndex::read_from(&mut text.as_bytes()),
            Err(Error::IndexFormat { line: 2, .. })
        ));
    }

    #[test]
    fn test_index_corpus() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("kap")).unwrap();
        fs::write(root.join("kap").join("start.txt"), "Nur Text.\n").unwrap();
        fs::write(
            root.join("kap").join("risiko.txt"),
            "====== Risk Management ======\n\nText\n",
        )
        .unwrap();
        fs::write(root.join("kap").join("notes.md"), "====== Ignored ======\n").unwrap();

        let report = index_corpus(&CorpusStore::new(root)).unwrap();
        assert_eq!(report.pages_scanned, 2);
        assert_eq!(report.without_heading, 1);
        assert_eq!(
            report.index.entries(),
            [entry("kap:risiko", "Risk Management")]
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("indexed_pages.csv");
        let mut index = CrossRefIndex::new();
        index.push(entry("a:b", "Titel"));

        index.save(&path).unwrap();
        assert_eq!(CrossRefIndex::load(&path).unwrap(), index);
    }
}
