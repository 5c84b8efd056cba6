use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, UserDirs};
use tracing::warn;

use crate::models::Article;
use crate::preview::ImagePreview;

use super::forms::ArticleForm;
use super::helpers::surface_error;

/// Width of the divider drawn under each search result.
pub(crate) const DIVIDER_WIDTH: usize = 40;

/// Initial text of the tags bar before any search has run.
const NO_TAGS: &str = "Tags: None";

/// One row in the search results pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ResultLine {
    Field { label: &'static str, value: String },
    Divider,
    ImageError(String),
    NoResults,
}

impl ResultLine {
    pub(crate) fn text(&self) -> String {
        match self {
            ResultLine::Field { label, value } => format!("{label}: {value}"),
            ResultLine::Divider => "-".repeat(DIVIDER_WIDTH),
            ResultLine::ImageError(reason) => format!("Error loading image: {reason}"),
            ResultLine::NoResults => "No results found.".to_string(),
        }
    }
}

/// The single image slot on the search screen.
pub(crate) struct PreviewSlot {
    pub(crate) path: String,
    pub(crate) image: ImagePreview,
}

/// State of the search modal: the query being typed plus whatever the last
/// submission produced.
pub(crate) struct SearchScreen {
    pub(crate) query: String,
    pub(crate) results: Vec<Article>,
    pub(crate) lines: Vec<ResultLine>,
    pub(crate) preview: Option<PreviewSlot>,
    pub(crate) tags: String,
    pub(crate) scroll: u16,
}

impl SearchScreen {
    pub(crate) fn new() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            lines: Vec::new(),
            preview: None,
            tags: NO_TAGS.to_string(),
            scroll: 0,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.query.push(ch);
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.query.pop();
    }

    /// Drop the previous results, preview and tags.
    pub(crate) fn clear(&mut self) {
        self.results.clear();
        self.lines.clear();
        self.preview = None;
        self.tags.clear();
        self.scroll = 0;
    }

    /// Lay out a fresh result set. Results are walked in order: each one
    /// overwrites the tags bar, and each image that loads overwrites the
    /// preview slot. The screen therefore ends up showing the last result's
    /// tags and the last successfully loaded image.
    pub(crate) fn show_results(&mut self, results: Vec<Article>) {
        self.clear();

        if results.is_empty() {
            self.lines.push(ResultLine::NoResults);
            return;
        }

        for article in &results {
            self.lines.push(ResultLine::Field {
                label: "Title",
                value: article.title.clone(),
            });
            self.lines.push(ResultLine::Field {
                label: "Content",
                value: article.content.clone(),
            });
            self.lines.push(ResultLine::Field {
                label: "Category",
                value: article.category.clone(),
            });
            self.lines.push(ResultLine::Divider);

            self.tags = article.tags_label();

            if let Some(path) = article.image() {
                match ImagePreview::load(path) {
                    Ok(image) => {
                        self.preview = Some(PreviewSlot {
                            path: path.to_string(),
                            image,
                        });
                    }
                    Err(err) => {
                        warn!(path, error = %err, "failed to load preview image");
                        self.lines.push(ResultLine::ImageError(err.to_string()));
                    }
                }
            }
        }

        self.results = results;
    }

    pub(crate) fn scroll_by(&mut self, delta: i32) {
        let max = self.lines.len().saturating_sub(1) as i32;
        let next = (self.scroll as i32 + delta).clamp(0, max.max(0));
        self.scroll = next as u16;
    }

    pub(crate) fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }
}

/// Acknowledgment popup shown after a successful insert.
pub(crate) struct Notice {
    pub(crate) title: &'static str,
    pub(crate) message: String,
}

impl Notice {
    pub(crate) fn success(message: impl Into<String>) -> Self {
        Self {
            title: "Success",
            message: message.into(),
        }
    }
}

/// The add-article modal, optionally with the file browser stacked on top.
#[derive(Default)]
pub(crate) struct AddArticleScreen {
    pub(crate) form: ArticleForm,
    pub(crate) browser: Option<FileBrowser>,
}

/// Entries listed by the file browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowserEntry {
    Parent,
    Dir(PathBuf),
    File(PathBuf),
}

impl BrowserEntry {
    pub(crate) fn label(&self) -> String {
        match self {
            BrowserEntry::Parent => "..".to_string(),
            BrowserEntry::Dir(path) => format!("{}/", file_name(path)),
            BrowserEntry::File(path) => file_name(path),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Minimal directory browser used to pick an image path.
pub(crate) struct FileBrowser {
    pub(crate) dir: PathBuf,
    pub(crate) entries: Vec<BrowserEntry>,
    pub(crate) selected: usize,
    pub(crate) error: Option<String>,
}

impl FileBrowser {
    /// Open in the directory containing `current` if that exists, otherwise in
    /// the user's pictures folder, home folder, or working directory.
    pub(crate) fn starting_at(current: &str) -> Self {
        let dir = start_dir(current);
        let mut browser = Self {
            dir: dir.clone(),
            entries: vec![BrowserEntry::Parent],
            selected: 0,
            error: None,
        };
        let result = browser.change_dir(dir);
        browser.record(result);
        browser
    }

    /// List `dir` and make it current. On failure the previous listing stays.
    pub(crate) fn change_dir(&mut self, dir: PathBuf) -> Result<()> {
        let entries = read_entries(&dir)?;
        self.dir = dir;
        self.entries = entries;
        self.selected = 0;
        self.error = None;
        Ok(())
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(err) = result {
            warn!(error = %err, "file browser could not list directory");
            self.error = Some(surface_error(&err));
        }
    }

    pub(crate) fn current(&self) -> Option<&BrowserEntry> {
        self.entries.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    /// Go up one directory level.
    pub(crate) fn ascend(&mut self) {
        if let Some(parent) = self.dir.parent().map(Path::to_path_buf) {
            let result = self.change_dir(parent);
            self.record(result);
        }
    }

    /// Act on the highlighted entry. Directories are entered; a file is
    /// returned as the pick.
    pub(crate) fn activate(&mut self) -> Option<PathBuf> {
        match self.current().cloned()? {
            BrowserEntry::Parent => {
                self.ascend();
                None
            }
            BrowserEntry::Dir(path) => {
                let result = self.change_dir(path);
                self.record(result);
                None
            }
            BrowserEntry::File(path) => Some(path),
        }
    }
}

fn start_dir(current: &str) -> PathBuf {
    let current = current.trim();
    if !current.is_empty() {
        if let Some(parent) = Path::new(current).parent().filter(|dir| dir.is_dir()) {
            return parent.to_path_buf();
        }
    }

    UserDirs::new()
        .and_then(|dirs| dirs.picture_dir().map(Path::to_path_buf))
        .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `..` first, then directories, then files; hidden entries are skipped and
/// names compare case-insensitively.
fn read_entries(dir: &Path) -> Result<Vec<BrowserEntry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    let listing =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in listing {
        let entry = entry.context("failed to read directory entry")?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        } else {
            files.push(path);
        }
    }

    dirs.sort_by(|a, b| compare_names(a, b));
    files.sort_by(|a, b| compare_names(a, b));

    let mut entries = vec![BrowserEntry::Parent];
    entries.extend(dirs.into_iter().map(BrowserEntry::Dir));
    entries.extend(files.into_iter().map(BrowserEntry::File));
    Ok(entries)
}

fn compare_names(a: &Path, b: &Path) -> Ordering {
    let a = file_name(a);
    let b = file_name(b);
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(&b))
}
