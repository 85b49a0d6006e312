//! Typed view of a package manifest (`package.xml`).
//!
//! The manifest is held as an ordered line list and only ever touched
//! through the operations below; callers never see the markup. Untouched
//! lines round-trip byte-identically, which matters because manifests are
//! hand-maintained files and a URL fix must not reformat anything else.
//!
//! URL and dependency elements are one element per line, the way the
//! manifest convention writes them; multi-line elements are not recognised.

use std::path::{Path, PathBuf};

use crate::error::WorkspaceError;

/// The dependency element tags a manifest may declare.
const DEPEND_TAGS: [&str; 4] = ["depend", "build_depend", "exec_depend", "test_depend"];

/// Where a new dependency element lands in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Right after the last existing dependency element; falls back to
    /// `BeforeClose` when there is none.
    GroupWithDepends,
    /// Immediately before the closing `</package>` tag (or at the end when
    /// no closing tag exists).
    BeforeClose,
    /// At an explicit line index, clamped to the document length.
    Line(usize),
}

/// One package manifest, loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDoc {
    path: PathBuf,
    name: String,
    lines: Vec<String>,
}

impl ManifestDoc {
    /// Load and validate the manifest at `path`.
    ///
    /// Unreadable files and manifests without a `<name>` element are both
    /// `WorkspaceError::ManifestParse`; callers skip the package and
    /// continue their pass.
    pub fn load(path: &Path) -> Result<Self, WorkspaceError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| WorkspaceError::ManifestParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::parse(path, &contents)
    }

    /// Parse manifest `contents`; `path` is carried for error reporting.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, WorkspaceError> {
        let lines: Vec<String> = contents.lines().map(str::to_string).collect();
        let name = lines
            .iter()
            .find_map(|line| element_text(line, "name"))
            .filter(|n| !n.is_empty())
            .ok_or_else(|| WorkspaceError::ManifestParse {
                path: path.to_path_buf(),
                message: "missing <name> element".to_string(),
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            name,
            lines,
        })
    }

    /// Declared package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path this manifest was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All lines, for the operator's insert-position choice.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Every declared repository URL, in document order.
    pub fn urls(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter_map(|line| element_text(line, "url"))
            .collect()
    }

    /// The declared repository URL, if exactly one exists.
    ///
    /// Zero and more-than-one are both `None` — an ambiguous declaration is
    /// treated as absent rather than guessed at.
    pub fn single_url(&self) -> Option<String> {
        let mut urls = self.urls();
        if urls.len() == 1 {
            urls.pop()
        } else {
            None
        }
    }

    /// Every declared dependency name, in document order.
    pub fn dependencies(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter_map(|line| {
                DEPEND_TAGS
                    .iter()
                    .find_map(|tag| element_text(line, tag))
            })
            .collect()
    }

    /// Remove every `<url>` element line. Returns how many were removed.
    pub fn clear_urls(&mut self) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| !is_element_line(line, "url"));
        before - self.lines.len()
    }

    /// Insert `  <url type="repository">{url}</url>` at line index `line`
    /// (clamped to the document length).
    pub fn insert_url(&mut self, url: &str, line: usize) {
        let at = line.min(self.lines.len());
        self.lines
            .insert(at, format!("  <url type=\"repository\">{url}</url>"));
    }

    /// Insert `  <depend>{name}</depend>` according to `position`.
    ///
    /// Declaring the same dependency twice is a no-op; returns whether a
    /// line was inserted.
    pub fn insert_dependency(&mut self, name: &str, position: InsertPosition) -> bool {
        if self.dependencies().iter().any(|d| d == name) {
            return false;
        }
        let at = match position {
            InsertPosition::GroupWithDepends => self
                .lines
                .iter()
                .rposition(|line| DEPEND_TAGS.iter().any(|tag| is_element_line(line, tag)))
                .map(|idx| idx + 1)
                .unwrap_or_else(|| self.closing_tag_line()),
            InsertPosition::BeforeClose => self.closing_tag_line(),
            InsertPosition::Line(line) => line.min(self.lines.len()),
        };
        self.lines.insert(at, format!("  <depend>{name}</depend>"));
        true
    }

    fn closing_tag_line(&self) -> usize {
        self.lines
            .iter()
            .position(|line| line.trim() == "</package>")
            .unwrap_or(self.lines.len())
    }

    /// Serialize back to text. Always ends with a newline.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Atomically write the manifest back to the path it was loaded from.
    ///
    /// Write flow: render → `.xml.tmp` sibling → `rename`.
    pub fn save(&self) -> Result<(), WorkspaceError> {
        let tmp = self.path.with_extension("xml.tmp");
        std::fs::write(&tmp, self.render())?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            WorkspaceError::Io(e)
        })?;
        Ok(())
    }
}

/// True when `line` holds a complete single-line `<tag ...>...</tag>` or
/// `<tag ... />` element.
fn is_element_line(line: &str, tag: &str) -> bool {
    let trimmed = line.trim_start();
    let opens = trimmed.starts_with(&format!("<{tag}>")) || trimmed.starts_with(&format!("<{tag} "));
    opens && (trimmed.contains(&format!("</{tag}>")) || trimmed.trim_end().ends_with("/>"))
}

/// Inner text of a single-line `<tag ...>text</tag>` element, if `line` is
/// one.
fn element_text(line: &str, tag: &str) -> Option<String> {
    let trimmed = line.trim();
    if !(trimmed.starts_with(&format!("<{tag}>")) || trimmed.starts_with(&format!("<{tag} "))) {
        return None;
    }
    let close = format!("</{tag}>");
    let end = trimmed.find(&close)?;
    let open_end = trimmed.find('>')?;
    if open_end >= end {
        return None;
    }
    Some(trimmed[open_end + 1..end].trim().to_string())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
