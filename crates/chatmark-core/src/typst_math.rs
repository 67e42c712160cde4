//! Math backend that compiles snippets with Typst and emits inline SVG.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Mutex;

use log::{debug, warn};
use lru::LruCache;
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::layout::PagedDocument;
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};

use crate::math::{MathError, MathRenderer};

/// Environment variable listing extra font files or directories.
pub const FONT_PATHS_ENV: &str = "CHATMARK_FONT_PATHS";

const DEFAULT_CACHE_CAPACITY: usize = 100;

/// The state for a single Typst compilation.
struct MathWorld<'a> {
    library: &'a LazyHash<Library>,
    book: LazyHash<FontBook>,
    fonts: &'a [Font],
    source: Source,
    main_id: FileId,
}

impl World for MathWorld<'_> {
    fn library(&self) -> &LazyHash<Library> {
        self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main_id
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main_id {
            Ok(self.source.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rooted_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rooted_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        None
    }
}

struct FontSlot {
    book: FontBook,
    fonts: Vec<Font>,
}

fn push_font_bytes<T>(book: &mut FontBook, fonts: &mut Vec<Font>, bytes: T)
where
    T: AsRef<[u8]> + Send + Sync + 'static,
{
    let buffer = Bytes::new(bytes);
    for font in Font::iter(buffer) {
        book.push(font.info().clone());
        fonts.push(font);
    }
}

fn load_fonts() -> FontSlot {
    let mut book = FontBook::new();
    let mut fonts = Vec::new();

    for font_bytes in typst_assets::fonts() {
        push_font_bytes(&mut book, &mut fonts, font_bytes);
    }

    let paths: Vec<PathBuf> = std::env::var_os(FONT_PATHS_ENV)
        .map(|value| std::env::split_paths(&value).collect())
        .unwrap_or_default();
    for path in expand_font_paths(&paths) {
        match std::fs::read(&path) {
            Ok(font_bytes) => push_font_bytes(&mut book, &mut fonts, font_bytes),
            Err(err) => warn!("skipping font {}: {}", path.display(), err),
        }
    }
    debug!("loaded {} math fonts", fonts.len());

    FontSlot { book, fonts }
}

fn expand_font_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            if let Ok(entries) = std::fs::read_dir(path) {
                let mut files: Vec<PathBuf> = entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|entry_path| is_font_file(entry_path))
                    .collect();
                files.sort();
                out.extend(files);
            }
        } else if is_font_file(path) {
            out.push(path.clone());
        }
    }
    out
}

fn is_font_file(path: &std::path::Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    matches!(ext, "ttf" | "otf" | "ttc" | "otc")
}

static FONT_SLOT: Lazy<FontSlot> = Lazy::new(load_fonts);
static TYPST_LIBRARY: Lazy<LazyHash<Library>> = Lazy::new(|| LazyHash::new(Library::default()));

type CacheKey = (String, bool); // (source, is_display_mode)

/// Renders math with Typst. Display math is wrapped in a `div`, inline math
/// in a `span`, each carrying the SVG.
///
/// Each instance keeps its own bounded cache of rendered snippets.
pub struct TypstMath {
    cache: Mutex<LruCache<CacheKey, String>>,
}

impl TypstMath {
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// A capacity of zero is bumped to one.
    pub fn with_cache_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn compile(&self, source: &str, display: bool) -> Result<String, MathError> {
        let mut preamble = if display {
            String::from("#set page(width: auto, height: auto, margin: 0.5em)\n")
        } else {
            String::from("#set page(width: auto, height: auto, margin: 0.2em)\n")
        };
        if display {
            preamble.push_str("#set block(spacing: 0.5em)\n");
        }
        let wrapped_source = format!(
            "{}#math.equation(block: {}, $ {} $)",
            preamble, display, source
        );

        let main_file_id = FileId::new(None, VirtualPath::new("main.typ"));
        let world = MathWorld {
            library: &TYPST_LIBRARY,
            book: LazyHash::new(FONT_SLOT.book.clone()),
            fonts: &FONT_SLOT.fonts,
            source: Source::new(main_file_id, wrapped_source),
            main_id: main_file_id,
        };

        let warned = typst::compile::<PagedDocument>(&world);
        for warning in &warned.warnings {
            debug!("typst math warning: {}", warning.message);
        }
        // Drop memoized results that went unused for a while.
        comemo::evict(10);

        let document = warned.output.map_err(|errors| {
            let messages: Vec<String> = errors
                .iter()
                .map(|error| error.message.to_string())
                .collect();
            MathError::Compile(messages.join("; "))
        })?;
        let page = document.pages.first().ok_or(MathError::EmptyOutput)?;
        let svg = typst_svg::svg(page);
        Ok(if display {
            format!("<div class=\"math-block\">{}</div>", svg)
        } else {
            format!("<span class=\"math-inline\">{}</span>", svg)
        })
    }
}

impl Default for TypstMath {
    fn default() -> Self {
        Self::new()
    }
}

impl MathRenderer for TypstMath {
    fn render(&self, source: &str, display: bool) -> Result<String, MathError> {
        let cache_key = (source.to_string(), display);
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&cache_key) {
                return Ok(cached.clone());
            }
        }

        let rendered = self.compile(source, display)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(cache_key, rendered.clone());
        }
        Ok(rendered)
    }
}
