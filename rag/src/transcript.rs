//! Chat transcripts on disk.
//!
//! One plain-text file per session, named `chat_YYYYmmdd_HHMMSS.txt`. Each
//! turn is a line `[hh:mm AM] Speaker: text`. The file name is the only
//! index: listing parses it and previews the first user line.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

const FILE_PREFIX: &str = "chat_";
const FILE_SUFFIX: &str = ".txt";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const PREVIEW_CHARS: usize = 30;
const USER_MARKER: &str = "] You: ";

pub fn format_turn(at: NaiveTime, speaker: &str, text: &str) -> String {
    format!("[{}] {}: {}", at.format("%I:%M %p"), speaker, text)
}

pub fn file_name_for(at: NaiveDateTime) -> String {
    format!("{}{}{}", FILE_PREFIX, at.format(STAMP_FORMAT), FILE_SUFFIX)
}

pub fn parse_file_name(file_name: &str) -> Option<NaiveDateTime> {
    let stamp = file_name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()
}

/// First user line of a transcript, shortened for a list entry.
pub fn preview(content: &str) -> String {
    let found = content.lines().find_map(|line| {
        if !line.starts_with('[') {
            return None;
        }
        line.find(USER_MARKER)
            .map(|pos| line[pos + USER_MARKER.len()..].trim().to_string())
    });
    match found {
        Some(prompt) if prompt.chars().count() > PREVIEW_CHARS => {
            let head: String = prompt.chars().take(PREVIEW_CHARS - 3).collect();
            format!("{}...", head)
        }
        Some(prompt) => prompt,
        None => "No prompt found".to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub file_name: String,
    pub started: NaiveDateTime,
    pub preview: String,
}

impl TranscriptEntry {
    pub fn label(&self) -> String {
        self.started.format("%b %d, %Y %I:%M %p").to_string()
    }
}

/// Transcripts from one calendar day, newest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub entries: Vec<TranscriptEntry>,
}

impl DayGroup {
    pub fn label(&self) -> String {
        self.date.format("%b %d, %Y").to_string()
    }
}

#[derive(Clone, Debug)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `content` as a new transcript. Blank chats are not saved.
    pub fn save(&self, content: &str, at: NaiveDateTime) -> Result<Option<PathBuf>> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }
        let save_err = |source| Error::Save {
            path: self.dir.display().to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(save_err)?;
        let path = self.dir.join(file_name_for(at));
        fs::write(&path, content).map_err(|source| Error::Save {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), "saved transcript");
        Ok(Some(path))
    }

    pub fn load(&self, file_name: &str) -> Result<String> {
        let path = self.dir.join(file_name);
        fs::read_to_string(&path).map_err(|source| Error::Load {
            path: path.display().to_string(),
            source,
        })
    }

    /// Transcripts grouped by day, newest day first. Files whose names do not
    /// parse are skipped; `search` filters on the preview, ignoring case.
    pub fn list(&self, search: &str) -> Result<Vec<DayGroup>> {
        if !self.dir.is_dir() {
            return Ok(vec![]);
        }
        let read_dir = fs::read_dir(&self.dir).map_err(|source| Error::Load {
            path: self.dir.display().to_string(),
            source,
        })?;
        let search = search.trim().to_lowercase();

        let mut entries: Vec<TranscriptEntry> = Vec::new();
        for item in read_dir.filter_map(|e| e.ok()) {
            let file_name = item.file_name().to_string_lossy().to_string();
            let Some(started) = parse_file_name(&file_name) else {
                continue;
            };
            let preview = match fs::read_to_string(item.path()) {
                Ok(content) => preview(&content),
                Err(_) => "Error reading file".to_string(),
            };
            if !search.is_empty() && !preview.to_lowercase().contains(&search) {
                continue;
            }
            entries.push(TranscriptEntry {
                file_name,
                started,
                preview,
            });
        }
        entries.sort_by(|a, b| b.file_name.cmp(&a.file_name));

        let mut groups: Vec<DayGroup> = Vec::new();
        for entry in entries {
            let date = entry.started.date();
            match groups.last_mut() {
                Some(group) if group.date == date => group.entries.push(entry),
                _ => groups.push(DayGroup {
                    date,
                    entries: vec![entry],
                }),
            }
        }
        Ok(groups)
    }
}
