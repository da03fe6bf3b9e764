use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const EXTENSION: &str = "maze";

/// `\r\n` becomes `\n`, and one final line break (as left by most editors) is dropped.
pub fn normalize(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    match text.strip_suffix('\n') {
        Some(trimmed) => trimmed.to_string(),
        None => text,
    }
}

/// The file name without its last extension.
pub fn name_from_file(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => base.to_string(),
    }
}

pub fn export_file_name(name: &str) -> String {
    format!("{name}.{EXTENSION}")
}

/// Returns `(default maze name, layout text)`.
pub fn read_maze_file(path: &Path) -> io::Result<(String, String)> {
    let text = fs::read_to_string(path)?;
    let name = name_from_file(&path.to_string_lossy());
    Ok((name, normalize(&text)))
}

pub fn write_maze_file(dir: &Path, name: &str, layout: &str) -> io::Result<PathBuf> {
    let path = dir.join(export_file_name(name));
    fs::write(&path, layout)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_come_from_the_file_stem() {
        assert_eq!(name_from_file("spiral.maze"), "spiral");
        assert_eq!(name_from_file("dir/my.big.maze"), "my.big");
        assert_eq!(name_from_file("plain"), "plain");
    }

    #[test]
    fn windows_line_endings_are_normalised() {
        assert_eq!(normalize("...\r\n. .\r\n...\r\n"), "...\n. .\n...");
        assert_eq!(normalize("...\n. .\n..."), "...\n. .\n...");
    }

    #[test]
    fn export_uses_maze_extension() {
        assert_eq!(export_file_name("1. Easy (8x8)"), "1. Easy (8x8).maze");
    }
}
