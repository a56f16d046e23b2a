// File: src/persistence.rs
use crate::core::trie::PrefixTrie;
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const BLOB_EXTENSION: &str = "bin";

/// Compact binary blob of the whole trie, statistics included.
pub fn to_bytes(trie: &PrefixTrie) -> Result<Vec<u8>> {
    Ok(bincode::serialize(trie)?)
}

pub fn from_bytes(bytes: &[u8]) -> Result<PrefixTrie> {
    checked(bincode::deserialize(bytes)?)
}

/// Human-readable structured blob, for export and debugging.
pub fn to_json(trie: &PrefixTrie) -> Result<String> {
    Ok(serde_json::to_string(trie)?)
}

pub fn from_json(json: &str) -> Result<PrefixTrie> {
    checked(serde_json::from_str(json)?)
}

/// Rejects blobs that decode but describe a broken trie.
fn checked(trie: PrefixTrie) -> Result<PrefixTrie> {
    trie.validate().map_err(Error::CorruptDictionary)?;
    Ok(trie)
}

/// Writes the trie atomically: a temp file in the same directory is
/// persisted over `path` only once fully written.
pub fn save_to_disk(trie: &PrefixTrie, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, trie)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| Error::Io(e.error))?;
    log::debug!("saved {} entries to {}", trie.len(), path.display());
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<PrefixTrie> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let trie = checked(bincode::deserialize_from(reader)?)?;
    log::debug!("loaded {} entries from {}", trie.len(), path.display());
    Ok(trie)
}

/// Moves an unreadable dictionary to `<name>.corrupt` so a later save
/// cannot overwrite it. Returns the new location.
pub fn quarantine(path: &Path) -> Result<PathBuf> {
    let mut aside = path.as_os_str().to_owned();
    aside.push(".corrupt");
    let aside = PathBuf::from(aside);
    fs::rename(path, &aside)?;
    log::warn!("moved unreadable dictionary {} to {}", path.display(), aside.display());
    Ok(aside)
}

/// A directory of dictionaries keyed by id, one blob per id.
pub struct DictionaryStore {
    root: PathBuf,
}

impl DictionaryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            log::warn!("rejected dictionary id {:?}", id);
            return Err(Error::InvalidDictionaryId(id.to_string()));
        }
        Ok(self.root.join(format!("{id}.{BLOB_EXTENSION}")))
    }

    pub fn save(&self, id: &str, trie: &PrefixTrie) -> Result<()> {
        save_to_disk(trie, &self.path_for(id)?)
    }

    pub fn load(&self, id: &str) -> Result<PrefixTrie> {
        load_from_disk(&self.path_for(id)?)
    }

    /// Like `load`, but a dictionary that was never saved comes back empty.
    pub fn load_or_default(&self, id: &str) -> Result<PrefixTrie> {
        match self.load(id) {
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(PrefixTrie::new()),
            other => other,
        }
    }

    /// Ids of every saved dictionary, sorted.
    pub fn ids(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(BLOB_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Returns whether a dictionary was actually deleted.
    pub fn remove(&self, id: &str) -> Result<bool> {
        match fs::remove_file(self.path_for(id)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
