use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use ttf_parser::{name_id, Face, Width};

/// One usable face found on disk.
#[derive(Debug, Clone)]
pub(crate) struct FaceEntry {
    pub family: String,
    pub path: PathBuf,
    pub bold: bool,
    pub italic: bool,
    pub weight: u16,
    pub normal_width: bool,
}

/// Families that render pictograms instead of letters.
const BLOCKED_FAMILIES: [&str; 3] = ["webdings", "marlett", "symbol"];
const BLOCKED_FRAGMENTS: [&str; 4] = ["mdl2", "emoji", "assets", "icons"];

pub(crate) fn is_blocked(family: &str) -> bool {
    let lower = family.to_lowercase();
    BLOCKED_FAMILIES.contains(&lower.as_str())
        || lower.starts_with("wingdings")
        || BLOCKED_FRAGMENTS.iter().any(|frag| lower.contains(frag))
}

/// Walks every directory recursively and returns the parsed faces, sorted by
/// path so that resolution does not depend on directory iteration order.
pub(crate) fn scan(dirs: &[PathBuf]) -> Vec<FaceEntry> {
    let mut files = Vec::new();
    for dir in dirs {
        collect_font_files(dir, &mut files);
    }
    files.sort();
    files.dedup();

    files.iter().filter_map(|path| read_face(path)).collect()
}

fn collect_font_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() {
            collect_font_files(&path, out);
        } else if has_font_extension(&path) {
            out.push(path);
        }
    }
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"))
        .unwrap_or(false)
}

fn read_face(path: &Path) -> Option<FaceEntry> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            debug!("Skipping font {}: {}", path.display(), e);
            return None;
        }
    };
    let face = match Face::parse(&data, 0) {
        Ok(face) => face,
        Err(e) => {
            warn!("Unreadable font file {}: {}", path.display(), e);
            return None;
        }
    };

    let family = family_name(&face)?;
    if is_blocked(&family) {
        return None;
    }

    Some(FaceEntry {
        family,
        path: path.to_path_buf(),
        bold: face.is_bold(),
        italic: face.is_italic() || face.is_oblique(),
        weight: face.weight().to_number(),
        normal_width: face.width() == Width::Normal,
    })
}

/// Typographic family first, so "Roboto Light" files group under "Roboto".
fn family_name(face: &Face<'_>) -> Option<String> {
    let lookup = |id: u16| {
        face.names()
            .into_iter()
            .filter(|name| name.name_id == id && name.is_unicode())
            .find_map(|name| name.to_string())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    lookup(name_id::TYPOGRAPHIC_FAMILY).or_else(|| lookup(name_id::FAMILY))
}

/// Platform font directories, searched after the configured ones.
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push(PathBuf::from(r"C:\Windows\Fonts"));
        }
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join(r"Microsoft\Windows\Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(&home).join(".local/share/fonts"));
            dirs.push(PathBuf::from(home).join(".fonts"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    dirs
}
