use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use thiserror::Error;

/// One `sender: text` record of a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to create history directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to append to {path}: {source}")]
    Append {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Append-only per-contact transcripts, one `<contact>.txt` file per contact
/// under a single history directory. Files are created lazily on first append
/// and only ever grow.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    /// Remember the history directory. Nothing is touched on disk until the
    /// first append.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn contact_file(&self, contact: &str) -> PathBuf {
        self.dir.join(format!("{contact}.txt"))
    }

    /// Append one record to a contact's transcript, creating the directory
    /// and file if needed. Interior newlines in `text` are flattened to
    /// spaces to keep one record per line.
    pub fn append(&self, contact: &str, sender: &str, text: &str) -> Result<(), HistoryError> {
        fs::create_dir_all(&self.dir).map_err(|e| HistoryError::CreateDir {
            path: self.dir.clone(),
            source: e,
        })?;
        let path = self.contact_file(contact);
        let text = text.replace(['\r', '\n'], " ");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| HistoryError::Append {
                path: path.clone(),
                source: e,
            })?;
        writeln!(file, "{sender}: {text}")
            .and_then(|_| file.flush())
            .map_err(|e| HistoryError::Append { path, source: e })?;
        Ok(())
    }

    /// Load a contact's full transcript in append order. A missing file is an
    /// empty transcript. The sender/text split is on the first `": "`, so the
    /// delimiter may appear inside the text; a line without it is skipped
    /// with a warning.
    pub fn load(&self, contact: &str) -> Result<Vec<Message>, HistoryError> {
        let path = self.contact_file(contact);
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HistoryError::Read { path, source: e }),
        };
        let mut out = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| HistoryError::Read {
                path: path.clone(),
                source: e,
            })?;
            if line.is_empty() {
                continue;
            }
            match line.split_once(": ") {
                Some((sender, text)) => out.push(Message {
                    sender: sender.to_string(),
                    text: text.to_string(),
                }),
                None => log::warn!(
                    "skipping malformed history line in {}: {line:?}",
                    path.display()
                ),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn append_then_load_preserves_order() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history"));

        store.append("Мария", "Ты", "Привет").unwrap();
        store.append("Мария", "Мария", "Ок 👍").unwrap();
        store.append("Мария", "Ты", "Как дела?").unwrap();

        let messages = store.load("Мария").unwrap();
        let got: Vec<(&str, &str)> = messages
            .iter()
            .map(|m| (m.sender.as_str(), m.text.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![("Ты", "Привет"), ("Мария", "Ок 👍"), ("Ты", "Как дела?")]
        );
    }

    #[test]
    fn missing_file_is_an_empty_transcript() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history"));
        assert!(store.load("Сергей").unwrap().is_empty());
    }

    #[test]
    fn each_contact_gets_its_own_file() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::open(dir.path());

        store.append("Алексей", "Ты", "раз").unwrap();
        store.append("Дмитрий", "Ты", "два").unwrap();

        assert_eq!(store.load("Алексей").unwrap().len(), 1);
        assert_eq!(store.load("Дмитрий").unwrap().len(), 1);
        assert!(dir.path().join("Алексей.txt").is_file());
        assert!(dir.path().join("Дмитрий.txt").is_file());
    }

    #[test]
    fn directory_is_created_on_first_append() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = HistoryStore::open(&nested);

        store.append("Мария", "Ты", "Привет").unwrap();
        assert!(nested.join("Мария.txt").is_file());
    }

    #[test]
    fn text_containing_the_delimiter_round_trips() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::open(dir.path());

        store.append("Мария", "Ты", "план: встреча в 10:30: ок?").unwrap();

        let messages = store.load("Мария").unwrap();
        assert_eq!(messages[0].sender, "Ты");
        assert_eq!(messages[0].text, "план: встреча в 10:30: ок?");
    }

    #[test]
    fn malformed_line_is_skipped() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::open(dir.path());

        fs::write(
            dir.path().join("Мария.txt"),
            "Ты: Привет\nмусор без разделителя\nМария: Понял\n",
        )
        .unwrap();

        let messages = store.load("Мария").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "Привет");
        assert_eq!(messages[1].sender, "Мария");
    }

    #[test]
    fn interior_newlines_are_flattened() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::open(dir.path());

        store.append("Мария", "Ты", "первая\nвторая").unwrap();
        store.append("Мария", "Ты", "третья").unwrap();

        let messages = store.load("Мария").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "первая вторая");
        assert_eq!(messages[1].text, "третья");
    }
}
