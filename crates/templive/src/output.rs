use std::io::{self, Write};
use std::path::Path;

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// Standalone HTML page showing `body` styled by `stylesheet`
pub fn preview_document(body: &str, stylesheet: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{stylesheet}\n</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

/// Write `content` to `path`, creating parent directories
pub fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}
