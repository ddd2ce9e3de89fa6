//! Plain-text shopping list files.
//!
//! Layout: a `Shopping List for {heading}` line, a blank line, then one
//! `□ {item}` line per entry. Items are written verbatim.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Written relative to the working directory when no path is given.
pub const DEFAULT_EXPORT_PATH: &str = "shopping_list.txt";

const ITEM_MARKER: &str = "□ ";

#[must_use]
pub fn render_shopping_list<S: AsRef<str>>(heading: &str, items: &[S]) -> String {
    let mut out = format!("Shopping List for {heading}\n\n");
    for item in items {
        let _ = writeln!(out, "{ITEM_MARKER}{}", item.as_ref());
    }
    out
}

pub fn write_shopping_list<S: AsRef<str>>(path: &Path, heading: &str, items: &[S]) -> Result<()> {
    fs::write(path, render_shopping_list(heading, items))?;
    debug!(path = %path.display(), items = items.len(), "shopping list exported");
    Ok(())
}

/// Read back the item lines of an exported list, in file order.
///
/// Items are written unescaped, so one containing a line break (or ending in
/// `\r`) does not read back as the same string.
pub fn read_shopping_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter_map(|line| line.strip_prefix(ITEM_MARKER))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShoppingItem;

    #[test]
    fn test_render_layout() {
        let text = render_shopping_list("Pancakes", &["2 eggs", "1 cup milk"]);
        assert_eq!(
            text,
            "Shopping List for Pancakes\n\n□ 2 eggs\n□ 1 cup milk\n"
        );
    }

    #[test]
    fn test_single_recipe_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_PATH);
        let ingredients = vec![
            "2 cups all-purpose flour".to_string(),
            "1/2 tsp salt".to_string(),
            "3 large eggs, beaten".to_string(),
            "1 cup milk (whole or 2%)".to_string(),
        ];

        write_shopping_list(&path, "Crêpes", &ingredients).unwrap();
        let read = read_shopping_list(&path).unwrap();
        assert_eq!(read, ingredients);
    }

    #[test]
    fn test_combined_export_keeps_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined.txt");
        let items = [
            ShoppingItem {
                ingredient: "2 eggs".to_string(),
                count: 2,
            },
            ShoppingItem {
                ingredient: "1 lemon".to_string(),
                count: 1,
            },
        ];
        let lines: Vec<String> = items.iter().map(ToString::to_string).collect();

        write_shopping_list(&path, "all planned meals", &lines).unwrap();
        assert_eq!(
            read_shopping_list(&path).unwrap(),
            vec!["2 eggs (x2)", "1 lemon"]
        );
    }

    #[test]
    fn test_export_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        write_shopping_list(&path, "First", &["a", "b", "c"]).unwrap();
        write_shopping_list(&path, "Second", &["d"]).unwrap();
        assert_eq!(read_shopping_list(&path).unwrap(), vec!["d"]);
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_shopping_list(&dir.path().join("nope.txt")).is_err());
    }
}
