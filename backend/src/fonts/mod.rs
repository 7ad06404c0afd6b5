//! Font discovery and resolution.
//!
//! [`FontResolver::resolve`] never fails: a family that cannot be found on
//! the host falls back to the DejaVu Sans face compiled into the binary, so
//! a missing font install degrades a badge instead of aborting an export.

mod discovery;

pub use discovery::system_font_dirs;

use crate::error::{BadgeError, BadgeResult};
use discovery::FaceEntry;
use log::{debug, info};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use ttf_parser::{Face, GlyphId};

static BUILTIN_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

pub const BUILTIN_FAMILY: &str = "DejaVu Sans";

/// Project-local font directory, scanned before anything else.
const PROJECT_FONT_DIR: &str = "fonts";

#[derive(Debug, Clone)]
enum FontData {
    Builtin,
    Loaded(Arc<Vec<u8>>),
}

/// A resolved face plus the styling the renderer has to fake.
#[derive(Debug, Clone)]
pub struct FontHandle {
    data: FontData,
    pub family: String,
    pub synthetic_bold: bool,
    pub synthetic_italic: bool,
}

impl FontHandle {
    fn builtin(bold: bool, italic: bool) -> Self {
        Self {
            data: FontData::Builtin,
            family: BUILTIN_FAMILY.to_string(),
            synthetic_bold: bold,
            synthetic_italic: italic,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.data, FontData::Builtin)
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.data {
            FontData::Builtin => BUILTIN_FONT,
            FontData::Loaded(bytes) => bytes.as_slice(),
        }
    }

    /// Parses the face for measuring and drawing at `size` pixels.
    pub fn scaled(&self, size: f32) -> BadgeResult<ScaledFont<'_>> {
        let face = Face::parse(self.bytes(), 0).map_err(|e| {
            BadgeError::RenderingFailure(format!("font '{}' is unusable: {}", self.family, e))
        })?;
        let units_per_em = face.units_per_em().max(1) as f32;
        Ok(ScaledFont {
            face,
            size,
            scale: size / units_per_em,
        })
    }
}

/// A parsed face at a fixed pixel size.
pub struct ScaledFont<'a> {
    face: Face<'a>,
    size: f32,
    scale: f32,
}

impl<'a> ScaledFont<'a> {
    pub fn face(&self) -> &Face<'a> {
        &self.face
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Font units to pixels.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Distance from the top of the line box to the baseline.
    pub fn ascender(&self) -> f32 {
        self.face.ascender() as f32 * self.scale
    }

    /// Glyph for `ch`, or notdef.
    pub fn glyph(&self, ch: char) -> GlyphId {
        self.face.glyph_index(ch).unwrap_or(GlyphId(0))
    }

    pub fn advance(&self, ch: char) -> f32 {
        self.face
            .glyph_hor_advance(self.glyph(ch))
            .map(|units| units as f32 * self.scale)
            .unwrap_or(self.size * 0.5)
    }

    /// Width of `text` as the sum of its advances.
    pub fn measure(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.advance(ch)).sum()
    }
}

type StyleKey = (String, bool, bool);

pub struct FontResolver {
    search_dirs: Vec<PathBuf>,
    catalog: OnceLock<Vec<FaceEntry>>,
    files: Mutex<HashMap<PathBuf, Option<Arc<Vec<u8>>>>>,
    resolved: Mutex<HashMap<StyleKey, FontHandle>>,
}

impl FontResolver {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs,
            catalog: OnceLock::new(),
            files: Mutex::new(HashMap::new()),
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// Project `fonts/`, then `extra_dirs`, then the platform directories.
    pub fn system(extra_dirs: &[PathBuf]) -> Self {
        let mut dirs = vec![PathBuf::from(PROJECT_FONT_DIR)];
        dirs.extend(extra_dirs.iter().cloned());
        dirs.extend(system_font_dirs());
        Self::new(dirs)
    }

    /// Resolver that never discovers anything and always hands out the
    /// built-in face.
    pub fn builtin_only() -> Self {
        Self::new(Vec::new())
    }

    /// Runs discovery now instead of on the first resolve.
    pub fn warm(&self) -> usize {
        self.catalog().len()
    }

    fn catalog(&self) -> &[FaceEntry] {
        self.catalog.get_or_init(|| {
            let faces = discovery::scan(&self.search_dirs);
            info!(
                "Font discovery found {} faces in {} directories",
                faces.len(),
                self.search_dirs.len()
            );
            faces
        })
    }

    /// Distinct family names, sorted. The built-in family is always present.
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for name in self
            .catalog()
            .iter()
            .map(|face| face.family.as_str())
            .chain(std::iter::once(BUILTIN_FAMILY))
        {
            if seen.insert(name.to_lowercase()) {
                families.push(name.to_string());
            }
        }
        families.sort_by_key(|name| name.to_lowercase());
        families
    }

    pub fn resolve(&self, family: &str, bold: bool, italic: bool) -> FontHandle {
        let key = (family.trim().to_lowercase(), bold, italic);
        if let Ok(guard) = self.resolved.lock() {
            if let Some(handle) = guard.get(&key) {
                return handle.clone();
            }
        }

        let handle = self.resolve_uncached(&key.0, bold, italic).unwrap_or_else(|| {
            debug!(
                "No font for '{}' (bold={}, italic={}); using {}",
                family, bold, italic, BUILTIN_FAMILY
            );
            FontHandle::builtin(bold, italic)
        });

        if let Ok(mut guard) = self.resolved.lock() {
            guard.insert(key, handle.clone());
        }
        handle
    }

    fn resolve_uncached(&self, wanted: &str, bold: bool, italic: bool) -> Option<FontHandle> {
        if wanted.is_empty() {
            return None;
        }
        let catalog = self.catalog();
        let family = match_family(catalog, wanted)?;

        // Drop italic first, then bold.
        let mut styles = vec![(bold, italic)];
        if italic {
            styles.push((bold, false));
        }
        if bold {
            styles.push((false, false));
        }

        for (b, i) in styles {
            let Some(entry) = best_face(catalog, &family, b, i) else {
                continue;
            };
            let Some(bytes) = self.load(&entry.path) else {
                continue;
            };
            return Some(FontHandle {
                data: FontData::Loaded(bytes),
                family: entry.family.clone(),
                synthetic_bold: bold && !entry.bold,
                synthetic_italic: italic && !entry.italic,
            });
        }
        None
    }

    fn load(&self, path: &PathBuf) -> Option<Arc<Vec<u8>>> {
        if let Ok(guard) = self.files.lock() {
            if let Some(entry) = guard.get(path) {
                return entry.clone();
            }
        }
        let loaded = std::fs::read(path).ok().map(Arc::new);
        if let Ok(mut guard) = self.files.lock() {
            guard.insert(path.clone(), loaded.clone());
        }
        loaded
    }
}

/// Exact case-insensitive match, else the shortest family starting with
/// the requested name.
fn match_family(catalog: &[FaceEntry], wanted: &str) -> Option<String> {
    if let Some(face) = catalog.iter().find(|f| f.family.to_lowercase() == wanted) {
        return Some(face.family.clone());
    }
    catalog
        .iter()
        .filter(|f| f.family.to_lowercase().starts_with(wanted))
        .map(|f| f.family.clone())
        .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
}

fn best_face<'c>(
    catalog: &'c [FaceEntry],
    family: &str,
    bold: bool,
    italic: bool,
) -> Option<&'c FaceEntry> {
    let target_weight: i32 = if bold { 700 } else { 400 };
    catalog
        .iter()
        .filter(|f| f.family == family && f.bold == bold && f.italic == italic)
        .min_by_key(|f| {
            (
                !f.normal_width,
                (f.weight as i32 - target_weight).abs(),
                f.path.clone(),
            )
        })
}
