//! # Remembered Positions
//!
//! Durable `entity name -> (x, y)` mapping, kept in a tab-separated text file under the
//! per-user application data directory:
//!
//! ```text
//! <entityName>\t<x>\t<y>
//! ```
//!
//! Loading is forgiving: empty lines, lines that are not UTF-8, lines without exactly three fields
//! and lines with an empty name are skipped, and an unparsable coordinate reads as `0`. A missing file simply yields an empty mapping.
//! Names containing a tab or a line break cannot be represented and are refused.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chanman_common::config::Config;
use chanman_common::geometry::Position;
use thiserror::Error;
use tracing::{debug, warn};

const SETTINGS_DIR: &str = "ChannelManager";
const SETTINGS_FILE: &str = "settings.txt";
const FIELD_SEPARATOR: char = '\t';

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("entity name {0:?} is empty or contains a tab or line break and cannot be persisted")]
    InvalidName(String),
}

/// `<user data dir>/ChannelManager/settings.txt`, falling back to the working directory.
pub fn default_settings_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIR)
        .join(SETTINGS_FILE)
}

#[derive(Debug, Clone)]
pub struct PositionStore {
    path: PathBuf,
    positions: BTreeMap<String, Position>,
}

impl PositionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            positions: BTreeMap::new(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.settings_path
                .clone()
                .unwrap_or_else(default_settings_path),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory mapping with the file's content and returns the entry count.
    /// On a read failure the mapping is left empty.
    pub fn load(&mut self) -> Result<usize, StoreError> {
        self.positions.clear();
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No settings file at {}", self.path.display());
                return Ok(0);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        self.positions = parse_positions(&bytes);
        debug!(
            "Recalled {} positions from {}",
            self.positions.len(),
            self.path.display()
        );
        Ok(self.positions.len())
    }

    /// Rewrites the file from scratch, one line per entry. Returns the number of lines written.
    pub fn save(&self) -> Result<usize, StoreError> {
        let write_err = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut writer = BufWriter::new(File::create(&self.path).map_err(write_err)?);
        let mut written = 0;
        for (name, where_) in &self.positions {
            writeln!(
                writer,
                "{name}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
                where_.x, where_.y
            )
            .map_err(write_err)?;
            written += 1;
        }
        writer.flush().map_err(write_err)?;

        debug!("Saved {written} positions to {}", self.path.display());
        Ok(written)
    }

    /// Inserts or overwrites the entry for `name`.
    pub fn remember(&mut self, name: &str, position: Position) -> Result<(), StoreError> {
        if !is_persistable(name) {
            warn!("Not remembering position of {name:?}: name is empty or holds a separator");
            return Err(StoreError::InvalidName(name.to_string()));
        }
        self.positions.insert(name.to_string(), position);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Position> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn forget(&mut self, name: &str) -> Option<Position> {
        self.positions.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> {
        self.positions.iter().map(|(name, p)| (name.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn is_persistable(name: &str) -> bool {
    !name.is_empty() && !name.contains([FIELD_SEPARATOR, '\n', '\r'])
}

fn parse_positions(bytes: &[u8]) -> BTreeMap<String, Position> {
    let mut positions = BTreeMap::new();

    for raw in bytes.split(|&b| b == b'\n') {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.is_empty() {
            continue;
        }
        let Ok(line) = std::str::from_utf8(raw) else {
            debug!("Skipping settings line that is not UTF-8: {:?}", String::from_utf8_lossy(raw));
            continue;
        };
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        match fields.as_slice() {
            [name, x, y] if is_persistable(name) => {
                positions.insert(
                    name.to_string(),
                    Position::new(parse_coordinate(x), parse_coordinate(y)),
                );
            }
            _ => debug!("Skipping malformed settings line: {line:?}"),
        }
    }
    positions
}

/// Reads the longest numeric prefix of `raw`; anything unreadable becomes `0`.
fn parse_coordinate(raw: &str) -> f32 {
    numeric_prefix(raw.trim())
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// `[sign] digits [. digits] [e [sign] digits]`, with at least one mantissa digit.
fn numeric_prefix(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let digits_from = |start: usize| {
        bytes
            .get(start..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits_from(end);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if whole + fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole + fraction == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let digits = digits_from(exponent);
        if digits > 0 {
            end = exponent + digits;
        }
    }
    &raw[..end]
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EPSILON: f32 = 1e-6;

    fn store_in(dir: &TempDir) -> PositionStore {
        PositionStore::new(dir.path().join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    #[test]
    fn save_then_load_reproduces_mapping() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.remember("A", Position::new(1.0, 2.0)).unwrap();
        store.remember("B", Position::new(3.5, -1.25)).unwrap();
        assert_eq!(store.save().unwrap(), 2);

        let mut reloaded = store_in(&dir);
        assert_eq!(reloaded.load().unwrap(), 2);

        let a = reloaded.get("A").unwrap();
        let b = reloaded.get("B").unwrap();
        assert!((a.x - 1.0).abs() < EPSILON && (a.y - 2.0).abs() < EPSILON);
        assert!((b.x - 3.5).abs() < EPSILON && (b.y + 1.25).abs() < EPSILON);
    }

    #[test]
    fn save_writes_tab_separated_lines() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.remember("A", Position::new(1.0, 2.0)).unwrap();
        store.remember("B", Position::new(3.5, -1.25)).unwrap();
        store.save().unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let mut lines: Vec<&str> = text.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["A\t1\t2", "B\t3.5\t-1.25"]);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn save_truncates_previous_content() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.remember("old", Position::new(5.0, 5.0)).unwrap();
        store.save().unwrap();

        store.forget("old");
        store.remember("new", Position::new(1.0, 1.0)).unwrap();
        store.save().unwrap();

        let mut reloaded = store_in(&dir);
        reloaded.load().unwrap();
        assert!(!reloaded.contains("old"));
        assert!(reloaded.contains("new"));
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.remember("stale", Position::ORIGIN).unwrap();

        assert_eq!(store.load().unwrap(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "good\t10\t20\nbad\t30\n\nworse\t1\t2\t3\n").unwrap();

        let mut store = PositionStore::new(&path);
        assert_eq!(store.load().unwrap(), 1);
        assert_eq!(store.get("good"), Some(Position::new(10.0, 20.0)));
        assert!(!store.contains("bad"));
        assert!(!store.contains("worse"));
    }

    #[test]
    fn unparsable_coordinates_default_to_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "x\tabc\t7\ny\t12.5px\tnan\n").unwrap();

        let mut store = PositionStore::new(&path);
        store.load().unwrap();
        assert_eq!(store.get("x"), Some(Position::new(0.0, 7.0)));
        assert_eq!(store.get("y"), Some(Position::new(12.5, 0.0)));
    }

    #[test]
    fn last_line_for_a_name_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "a\t1\t1\r\na\t2\t3\r\n").unwrap();

        let mut store = PositionStore::new(&path);
        assert_eq!(store.load().unwrap(), 1);
        assert_eq!(store.get("a"), Some(Position::new(2.0, 3.0)));
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, b"good\t1\t2\n\xffbad\t3\t4\nalso\t5\t6\n").unwrap();

        let mut store = PositionStore::new(&path);
        store.remember("stale", Position::new(9.0, 9.0)).unwrap();
        assert_eq!(store.load().unwrap(), 2);
        assert_eq!(store.get("good"), Some(Position::new(1.0, 2.0)));
        assert_eq!(store.get("also"), Some(Position::new(5.0, 6.0)));
        assert!(!store.contains("stale"));
    }

    #[test]
    fn unreadable_file_leaves_an_empty_mapping() {
        let dir = TempDir::new().unwrap();
        let mut store = PositionStore::new(dir.path());
        store.remember("stale", Position::ORIGIN).unwrap();

        assert!(matches!(store.load(), Err(StoreError::Read { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn empty_names_are_neither_loaded_nor_remembered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "\t1\t2\nnamed\t3\t4\n").unwrap();

        let mut store = PositionStore::new(&path);
        assert_eq!(store.load().unwrap(), 1);
        assert!(!store.contains(""));
        assert!(store.remember("", Position::ORIGIN).is_err());
    }

    #[test]
    fn coordinates_use_their_numeric_prefix() {
        assert_eq!(parse_coordinate(" -3.25e1x "), -32.5);
        assert_eq!(parse_coordinate("7e"), 7.0);
        assert_eq!(parse_coordinate(".5."), 0.5);
        assert_eq!(parse_coordinate("+"), 0.0);
        assert_eq!(parse_coordinate("1e999"), 0.0);

        let long = format!("{}junk", "1".repeat(50_000));
        assert_eq!(parse_coordinate(&long), 0.0);
    }

    #[test]
    fn remember_overwrites_and_refuses_separators() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.remember("a", Position::new(1.0, 1.0)).unwrap();
        store.remember("a", Position::new(4.0, 4.0)).unwrap();
        assert_eq!(store.get("a"), Some(Position::new(4.0, 4.0)));

        assert!(matches!(
            store.remember("bad\tname", Position::ORIGIN),
            Err(StoreError::InvalidName(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn save_into_unwritable_location_reports_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let mut store = PositionStore::new(blocker.join(SETTINGS_FILE));
        store.remember("a", Position::ORIGIN).unwrap();
        assert!(matches!(store.save(), Err(StoreError::Write { .. })));
    }

    #[test]
    fn default_path_ends_with_fixed_location() {
        let path = default_settings_path();
        assert!(path.ends_with(Path::new(SETTINGS_DIR).join(SETTINGS_FILE)));
    }
}
