use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::event::Event;

const MAX_PREVIEW_BYTES: u64 = 64 * 1024;
const MAX_PREVIEW_LINES: usize = 256;

/// Plain-text head of the file under the working cursor, shown in the child
/// pane slot. Binary files carry no lines and render as a notice.
#[derive(Debug)]
pub struct FilePreview {
  pub path: PathBuf,
  pub lines: Vec<String>,
  pub binary: bool,
}

/// Tagged like directory loads: the browser keeps its own preview id
/// sequence and drops responses that lost the race.
#[derive(Debug)]
pub struct PreviewResponse {
  pub id: u64,
  pub preview: FilePreview,
}

/// Read the file head on a worker thread and deliver exactly one response
/// back into the main event stream.
pub fn spawn_preview(tx: mpsc::Sender<Event>, id: u64, path: PathBuf) {
  thread::spawn(move || {
    let preview = load_preview(&path);
    let _ = tx.send(Event::Preview(PreviewResponse { id, preview }));
  });
}

fn load_preview(path: &Path) -> FilePreview {
  let mut buf = Vec::new();
  let read = std::fs::File::open(path)
    .and_then(|f| f.take(MAX_PREVIEW_BYTES).read_to_end(&mut buf));
  if let Err(e) = read {
    return FilePreview {
      path: path.to_path_buf(),
      lines: vec![format!("cannot read: {e}")],
      binary: false,
    };
  }
  if buf.contains(&0) {
    return FilePreview { path: path.to_path_buf(), lines: Vec::new(), binary: true };
  }
  let text = String::from_utf8_lossy(&buf);
  let lines = text
    .lines()
    .take(MAX_PREVIEW_LINES)
    .map(|line| line.to_string())
    .collect();
  FilePreview { path: path.to_path_buf(), lines, binary: false }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::time::Duration;

  static COUNTER: AtomicU32 = AtomicU32::new(0);

  fn test_dir() -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("triptych_preview_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn test_text_preview_lines() {
    let dir = test_dir();
    let file = dir.join("hello.txt");
    fs::write(&file, "one\ntwo\nthree\n").unwrap();

    let preview = load_preview(&file);
    assert!(!preview.binary);
    assert_eq!(preview.lines, ["one", "two", "three"]);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_line_cap() {
    let dir = test_dir();
    let file = dir.join("long.txt");
    let body: String = (0..1000).map(|i| format!("line {i}\n")).collect();
    fs::write(&file, body).unwrap();

    let preview = load_preview(&file);
    assert_eq!(preview.lines.len(), MAX_PREVIEW_LINES);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_binary_detected() {
    let dir = test_dir();
    let file = dir.join("blob.bin");
    fs::write(&file, [0x7f, b'E', b'L', b'F', 0x00, 0x01]).unwrap();

    let preview = load_preview(&file);
    assert!(preview.binary);
    assert!(preview.lines.is_empty());
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_unreadable_reports_in_line() {
    let preview = load_preview(Path::new("/no/such/file"));
    assert!(!preview.binary);
    assert_eq!(preview.lines.len(), 1);
    assert!(preview.lines[0].starts_with("cannot read:"));
  }

  #[test]
  fn test_spawn_preview_delivers_tagged_response() {
    let dir = test_dir();
    let file = dir.join("x.txt");
    fs::write(&file, "x").unwrap();
    let (tx, rx) = mpsc::channel();

    spawn_preview(tx, 42, file.clone());

    let Event::Preview(response) = rx.recv_timeout(Duration::from_secs(5)).unwrap() else {
      panic!("expected a preview response");
    };
    assert_eq!(response.id, 42);
    assert_eq!(response.preview.path, file);
    let _ = fs::remove_dir_all(&dir);
  }
}
