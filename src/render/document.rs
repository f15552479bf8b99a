//! Paged SVG document output.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;

/// One rendered page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Page title, used for the output file name
    pub title: String,
    /// Rendered SVG document
    pub svg: String,
}

/// An ordered collection of rendered pages, written to an output
/// directory as numbered SVG files.
#[derive(Debug, Default)]
pub struct PagedDocument {
    pages: Vec<Page>,
}

impl PagedDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn push(&mut self, title: impl Into<String>, svg: String) {
        self.pages.push(Page {
            title: title.into(),
            svg,
        });
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Write all pages to `dir` as `NN_<slug>.svg`, creating the
    /// directory if needed. Returns the written paths in page order.
    pub fn save(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut paths = Vec::with_capacity(self.pages.len());
        for (i, page) in self.pages.iter().enumerate() {
            let file_name = format!("{:02}_{}.svg", i + 1, slug(&page.title));
            let path = dir.join(file_name);
            std::fs::write(&path, &page.svg)?;
            info!("Wrote {}", path.display());
            paths.push(path);
        }
        Ok(paths)
    }
}

/// File-name-safe slug: lowercase alphanumerics with single dashes.
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_dash = true; // suppress leading dash
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Position difference: a vs b"), "position-difference-a-vs-b");
        assert_eq!(slug("  spaces  "), "spaces");
        assert_eq!(slug("‖Δp‖ page"), "p-page");
    }

    #[test]
    fn test_save_numbered_pages() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = PagedDocument::new();
        doc.push("First page", "<svg>1</svg>".to_string());
        doc.push("Second page", "<svg>2</svg>".to_string());

        let paths = doc.save(dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].file_name().unwrap().to_str().unwrap().starts_with("01_first-page"));
        assert!(paths[1].file_name().unwrap().to_str().unwrap().starts_with("02_second-page"));

        let content = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(content, "<svg>1</svg>");
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("pages");

        let mut doc = PagedDocument::new();
        doc.push("page", "<svg/>".to_string());
        doc.save(&nested).unwrap();

        assert!(nested.join("01_page.svg").exists());
    }

    #[test]
    fn test_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = PagedDocument::new();
        assert!(doc.is_empty());
        assert!(doc.save(dir.path()).unwrap().is_empty());
    }
}
