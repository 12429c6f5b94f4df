//! Registry scanning and matching over on-disk fixture fonts.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use velja::test_helpers::{build_collection, build_font, simple_font_tables};
use velja::{FontError, FontRegistry, FontSource, Style, SystemSource, Weight};

/// A source rooted at a temp directory, exercising the same walking and
/// reading code paths as the real system source.
struct FixtureSource {
    root: PathBuf,
}

impl FontSource for FixtureSource {
    fn font_directories(&self) -> Vec<PathBuf> {
        vec![self.root.clone()]
    }

    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        SystemSource.walk(dir)
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        SystemSource.read_all(path)
    }
}

fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

fn fixture_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_fixture(
        root,
        "arial/Arial-Regular.ttf",
        &build_font(&simple_font_tables("Arial", "Regular", 400, 0x0040)),
    );
    write_fixture(
        root,
        "arial/Arial-BoldItalic.ttf",
        &build_font(&simple_font_tables("Arial", "Bold Italic", 700, 0x0021)),
    );
    let mono_regular = simple_font_tables("Demo Mono", "Regular", 400, 0x0040);
    let mono_bold = simple_font_tables("Demo Mono", "Bold", 700, 0x0020);
    write_fixture(
        root,
        "mono/DemoMono.ttc",
        &build_collection(&[&mono_regular, &mono_bold]),
    );
    // not fonts: wrong suffix, wrong case, garbage payload
    write_fixture(root, "notes.txt", b"not a font");
    write_fixture(root, "arial/Arial-Regular.TTF", b"wrong case");
    write_fixture(root, "broken/Broken.ttf", &[0xDE, 0xAD, 0xBE, 0xEF, 0, 0]);
    dir
}

#[test]
fn scan_collects_descriptors_and_skips_failures() {
    let dir = fixture_tree();
    let registry = FontRegistry::scan(&FixtureSource {
        root: dir.path().to_path_buf(),
    });
    let mut families: Vec<_> = registry
        .known_fonts()
        .iter()
        .map(|known| (known.family().to_string(), known.weight(), known.style()))
        .collect();
    families.sort();
    assert_eq!(
        families,
        vec![
            ("Arial".to_string(), Weight::Normal, Style::Normal),
            ("Arial".to_string(), Weight::Bold, Style::Italic),
            ("Demo Mono".to_string(), Weight::Normal, Style::Normal),
            ("Demo Mono".to_string(), Weight::Bold, Style::Normal),
        ]
    );
    // collection entries remember their index
    let ttc_indices: Vec<_> = registry
        .known_fonts()
        .iter()
        .filter(|known| known.family() == "Demo Mono")
        .map(|known| known.index())
        .collect();
    assert_eq!(ttc_indices, vec![0, 1]);
}

#[test]
fn matching_prefers_close_weight_and_slant() {
    let dir = fixture_tree();
    let mut registry = FontRegistry::scan(&FixtureSource {
        root: dir.path().to_path_buf(),
    });
    // |500-400| + 10000 for the regular vs |500-700| + 1 for bold italic
    let face = registry
        .find_best_match("arial", Weight::Medium, Style::Oblique)
        .unwrap();
    assert_eq!(face.sub_family_name(), "Bold Italic");

    let face = registry
        .find_best_match("Arial", Weight::Normal, Style::Normal)
        .unwrap();
    assert_eq!(face.sub_family_name(), "Regular");
}

#[test]
fn matches_are_cached_and_idempotent() {
    let dir = fixture_tree();
    let mut registry = FontRegistry::scan(&FixtureSource {
        root: dir.path().to_path_buf(),
    });
    let first = registry
        .find_best_match("Demo Mono", Weight::Bold, Style::Normal)
        .unwrap();
    let second = registry
        .find_best_match("Demo Mono", Weight::Bold, Style::Normal)
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    // family comparison and the cache key are case-insensitive
    let third = registry
        .find_best_match("demo mono", Weight::Bold, Style::Normal)
        .unwrap();
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(first.index(), 1);
    assert_eq!(first.horizontal_advance('A').unwrap(), 600);
}

#[test]
fn release_parsed_font_reparses_later() {
    let dir = fixture_tree();
    let mut registry = FontRegistry::scan(&FixtureSource {
        root: dir.path().to_path_buf(),
    });
    let first = registry
        .find_best_match("Arial", Weight::Normal, Style::Normal)
        .unwrap();
    let path = first.path().unwrap().to_path_buf();
    registry.release_parsed_font(&path, 0);
    assert!(registry
        .known_fonts()
        .iter()
        .all(|known| known.parsed().is_none() || known.path() != path));
    let second = registry
        .find_best_match("Arial", Weight::Normal, Style::Normal)
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.family_name(), "Arial");
}

#[test]
fn first_seen_descriptor_wins_ties() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_fixture(
        root,
        "a.ttf",
        &build_font(&simple_font_tables("Twin", "Regular", 400, 0x0040)),
    );
    let mut registry = FontRegistry::scan(&FixtureSource {
        root: root.to_path_buf(),
    });
    // an identical descriptor registered later scores the same
    registry
        .register_font_file(&root.join("a.ttf"))
        .unwrap();
    assert_eq!(registry.known_fonts().len(), 2);
    let face = registry
        .find_best_match("Twin", Weight::Normal, Style::Normal)
        .unwrap();
    assert_eq!(
        registry.known_fonts()[0].parsed().map(|parsed| Arc::ptr_eq(parsed, &face)),
        Some(true)
    );
    assert!(registry.known_fonts()[1].parsed().is_none());
}

#[test]
fn register_font_file_reports_count_and_errors() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let tables = simple_font_tables("Demo Sans", "Regular", 400, 0x0040);
    write_fixture(root, "pair.ttc", &build_collection(&[&tables, &tables]));
    write_fixture(root, "broken.ttf", &[1, 2, 3]);

    let mut registry = FontRegistry::new();
    assert_eq!(registry.register_font_file(&root.join("pair.ttc")).unwrap(), 2);
    assert!(matches!(
        registry.register_font_file(&root.join("broken.ttf")),
        Err(FontError::Read(_))
    ));
    assert!(matches!(
        registry.register_font_file(&root.join("absent.ttf")),
        Err(FontError::Io(_))
    ));
    assert_eq!(registry.known_fonts().len(), 2);
}
