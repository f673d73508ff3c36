//! Check-mode output: window headers and the dump file writer.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::WinaimError;

/// Width of the `=` separator line between window blocks.
pub const SEPARATOR_WIDTH: usize = 80;

/// Header line printed above each window's tree.
///
/// `index` is the window's 1-based position in the discovery result, kept
/// even for windows whose trees failed to capture so the numbering stays
/// attributable.
pub fn window_header(index: usize, title: &str, handle: isize) -> String {
    format!("=== window {index}: {title} (handle: {handle}) ===")
}

/// Writes window tree blocks to a dump file.
///
/// The first block truncates the file so a rerun never appends to stale
/// output; every later block appends.  Each block is the header, the tree
/// text, a separator line of `=`, and a blank line.
pub struct DumpFile {
    path: PathBuf,
    blocks_written: usize,
}

impl DumpFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            blocks_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one window block (truncating on the first call).
    pub fn write_window(
        &mut self,
        index: usize,
        title: &str,
        handle: isize,
        tree_text: &str,
    ) -> Result<(), WinaimError> {
        let mut file = self.open()?;
        writeln!(file, "{}", window_header(index, title, handle))?;
        writeln!(file, "{tree_text}")?;
        writeln!(file, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        writeln!(file)?;
        self.blocks_written += 1;
        Ok(())
    }

    fn open(&self) -> Result<File, WinaimError> {
        let file = if self.blocks_written == 0 {
            File::create(&self.path)?
        } else {
            OpenOptions::new().append(true).open(&self.path)?
        };
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn header_carries_index_title_and_handle() {
        assert_eq!(
            window_header(2, "Untitled - Notepad", 66042),
            "=== window 2: Untitled - Notepad (handle: 66042) ==="
        );
    }

    #[test]
    fn first_block_truncates_stale_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        std::fs::write(&path, "left over from an earlier run\n").unwrap();

        let mut dump = DumpFile::new(&path);
        dump.write_window(1, "Notepad", 7, "Window 'Notepad' (L0, T0, R10, B10)")
            .unwrap();

        let text = read(&path);
        assert!(!text.contains("left over"));
        assert!(text.starts_with("=== window 1: Notepad (handle: 7) ==="));
    }

    #[test]
    fn later_blocks_append_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");

        let mut dump = DumpFile::new(&path);
        dump.write_window(1, "First", 1, "tree one").unwrap();
        dump.write_window(2, "Second", 2, "tree two").unwrap();
        dump.write_window(3, "Third", 3, "tree three").unwrap();

        let text = read(&path);
        assert_eq!(text.matches("=== window").count(), 3);
        let first = text.find("=== window 1").unwrap();
        let second = text.find("=== window 2").unwrap();
        let third = text.find("=== window 3").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn block_layout_is_header_tree_separator_blank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");

        let mut dump = DumpFile::new(&path);
        dump.write_window(1, "Notepad", 7, "line one\nline two").unwrap();

        let text = read(&path);
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines[0], "=== window 1: Notepad (handle: 7) ===");
        assert_eq!(lines[1], "line one");
        assert_eq!(lines[2], "line two");
        assert_eq!(lines[3], "=".repeat(SEPARATOR_WIDTH));
        assert_eq!(lines[4], "");
    }

    #[test]
    fn missing_parent_directory_surfaces_as_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("dump.txt");

        let mut dump = DumpFile::new(&path);
        let err = dump.write_window(1, "Notepad", 7, "tree").unwrap_err();
        assert!(matches!(err, WinaimError::IoError(_)));
    }
}
