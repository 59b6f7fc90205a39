use crate::error::{Result, SpellError};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Ordered list of practice words, owned by a store.
///
/// The drill only reads words by index and asks the store to delete; it never
/// mutates the sequence itself.
pub trait WordStore {
    fn words(&self) -> &[String];

    /// Remove the word at `index` and persist the resulting list.
    ///
    /// On error the in-memory list is left as it was. Panics if `index` is out
    /// of range.
    fn delete_at(&mut self, index: usize) -> Result<()>;

    fn len(&self) -> usize {
        self.words().len()
    }

    fn is_empty(&self) -> bool {
        self.words().is_empty()
    }

    fn get(&self, index: usize) -> Option<&str> {
        self.words().get(index).map(String::as_str)
    }
}

/// Split persisted text into words: one per line, trimmed, blanks dropped.
pub fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Copy of `words` with the element at `index` removed.
pub fn without(words: &[String], index: usize) -> Vec<String> {
    assert!(
        index < words.len(),
        "delete index {index} out of range for list of {}",
        words.len()
    );
    let mut next = words.to_vec();
    next.remove(index);
    next
}

/// Trim `word` and make sure it can live on a single line of the list file.
pub fn normalize_word(word: &str) -> Result<String> {
    let trimmed = word.trim();
    if trimmed.is_empty() || trimmed.contains(['\n', '\r']) {
        return Err(SpellError::InvalidWord(word.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Append one word to the list file without loading it.
///
/// The file is created if missing. A separator is only written when the
/// existing contents don't already end in a line break.
pub fn append_word<P: AsRef<Path>>(path: P, word: &str) -> Result<String> {
    let path = path.as_ref();
    let word = normalize_word(word)?;
    let storage = |e| SpellError::storage(path, e);

    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(storage)?;

    let needs_separator = match file.metadata().map_err(storage)?.len() {
        0 => false,
        _ => {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1)).map_err(storage)?;
            file.read_exact(&mut last).map_err(storage)?;
            last[0] != b'\n'
        }
    };

    let line = if needs_separator {
        format!("\n{word}")
    } else {
        word.clone()
    };
    file.write_all(line.as_bytes()).map_err(storage)?;
    file.sync_all().map_err(storage)?;

    log::info!("appended {word:?} to {}", path.display());
    Ok(word)
}

/// Word list backed by a flat newline-delimited file.
#[derive(Debug)]
pub struct FileWordStore {
    path: PathBuf,
    words: Vec<String>,
}

impl FileWordStore {
    /// Load the list at `path`, creating an empty file if none exists.
    ///
    /// The file is opened for writing as well so a read-only list is reported
    /// before the session starts rather than on the first deletion.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| SpellError::storage(&path, e))?;

        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|e| SpellError::storage(&path, e))?;

        let words = parse_word_list(&text);
        log::debug!("loaded {} words from {}", words.len(), path.display());
        Ok(Self { path, words })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the list file with `words` via a sibling temp file and rename,
    /// so readers see either the old list or the new one.
    fn persist(&self, words: &[String]) -> std::io::Result<()> {
        let mut tmp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        let written = File::create(&tmp).and_then(|mut file| {
            file.write_all(words.join("\n").as_bytes())?;
            file.sync_all()
        });
        let result = written.and_then(|()| fs::rename(&tmp, &self.path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

impl WordStore for FileWordStore {
    fn words(&self) -> &[String] {
        &self.words
    }

    fn delete_at(&mut self, index: usize) -> Result<()> {
        let next = without(&self.words, index);
        self.persist(&next)
            .map_err(|e| SpellError::storage(&self.path, e))?;
        let removed = &self.words[index];
        log::info!("deleted {removed:?} from {}", self.path.display());
        self.words = next;
        Ok(())
    }
}

/// Word list that lives only in memory. Used for headless sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWordStore {
    words: Vec<String>,
}

impl InMemoryWordStore {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl WordStore for InMemoryWordStore {
    fn words(&self) -> &[String] {
        &self.words
    }

    fn delete_at(&mut self, index: usize) -> Result<()> {
        self.words = without(&self.words, index);
        Ok(())
    }
}
