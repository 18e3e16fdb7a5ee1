//! Hygiene: enforces coding standards at test time
//!
//! These tests scan the mapview crate source tree for antipatterns that
//! violate project standards. Each has a budget (ideally zero). If you must
//! add one, you have to fix an existing one first; the budget never grows.
//!
//! Two structural checks ride along: browser bindings stay inside the
//! drawing layer, and every sibling `*_test.rs` file is attached to its module.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

/// Modules allowed to name `web_sys` types.
const BROWSER_MODULES: &[&str] = &["background.rs", "engine.rs", "render.rs"];

struct SourceFile {
    path: String,
    name: String,
    content: String,
}

/// Every `.rs` file under `src/`, test files included.
fn all_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

/// Production files only.
fn source_files() -> Vec<SourceFile> {
    all_files().into_iter().filter(|f| !f.name.ends_with("_test.rs")).collect()
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let name = path.file_name().unwrap_or_default().to_string_lossy().to_string();
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path.to_string_lossy().to_string(), name, content });
            }
        }
    }
}

fn count_in_source(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn format_hits(hits: &[(String, usize)]) -> String {
    hits.iter().map(|(path, count)| format!("  {path}: {count}")).collect::<Vec<_>>().join("\n")
}

fn check_budget(pattern: &str, max: usize) {
    let hits = count_in_source(&source_files(), pattern);
    let count: usize = hits.iter().map(|(_, c)| c).sum();
    assert!(count <= max, "{pattern} budget exceeded: found {count}, max {max}.\n{}", format_hits(&hits));
}

macro_rules! budget {
    ($name:ident, $pattern:expr, $max:expr) => {
        #[test]
        fn $name() {
            check_budget($pattern, $max);
        }
    };
}

// Panics: these crash the frame loop.
budget!(unwrap_budget, ".unwrap()", 0);
budget!(expect_budget, ".expect(", 0);
budget!(panic_budget, "panic!(", 0);
budget!(unreachable_budget, "unreachable!(", 0);
budget!(todo_budget, "todo!(", 0);
budget!(unimplemented_budget, "unimplemented!(", 0);

// Silent loss: discards errors without inspecting.
budget!(silent_discard_budget, "let _ =", 0);
budget!(dot_ok_budget, ".ok()", 0);

// Style / structure.
budget!(allow_dead_code_budget, "#[allow(dead_code)]", 0);
budget!(println_budget, "println!(", 0);

#[test]
fn browser_bindings_stay_in_drawing_layer() {
    let offenders: Vec<String> = source_files()
        .into_iter()
        .filter(|f| f.content.contains("web_sys") && !BROWSER_MODULES.contains(&f.name.as_str()))
        .map(|f| f.path)
        .collect();
    assert!(offenders.is_empty(), "web_sys used outside {BROWSER_MODULES:?}:\n  {}", offenders.join("\n  "));
}

#[test]
fn every_test_file_is_attached() {
    let files = all_files();
    let missing: Vec<String> = files
        .iter()
        .filter(|f| f.name.ends_with("_test.rs"))
        .filter(|t| {
            let attr = format!("#[path = \"{}\"]", t.name);
            !files.iter().any(|f| f.content.contains(&attr))
        })
        .map(|t| t.path.clone())
        .collect();
    assert!(missing.is_empty(), "test files not attached with #[path]:\n  {}", missing.join("\n  "));
}
