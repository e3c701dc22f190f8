// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only journal of announced chore events
//!
//! One JSON record per line. A line cut short by a crash mid-append is
//! skipped on read and numbering resumes after the last intact record.

use super::filter::EventFilter;
use chore_core::ChoreEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Starts at 1 and never repeats within one journal
    pub sequence: u64,
    pub announced_at: DateTime<Utc>,
    pub name: String,
    pub event: ChoreEvent,
}

#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
    sequence: u64,
}

impl EventLog {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        terminate_torn_line(&path)?;
        let sequence = read_records(&path)?
            .last()
            .map_or(0, |record| record.sequence);
        Ok(Self { path, sequence })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, event: &ChoreEvent, at: DateTime<Utc>) -> io::Result<EventRecord> {
        let record = EventRecord {
            sequence: self.sequence + 1,
            announced_at: at,
            name: event.name().to_string(),
            event: event.clone(),
        };
        let line = serde_json::to_string(&record).map_err(io::Error::other)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        self.sequence = record.sequence;
        Ok(record)
    }

    pub fn read_all(&self) -> io::Result<Vec<EventRecord>> {
        read_records(&self.path)
    }

    /// Recorded events the filter admits, oldest first
    pub fn query(&self, filter: &EventFilter) -> io::Result<Vec<EventRecord>> {
        let mut records = self.read_all()?;
        records.retain(|r| filter.matches(&r.event));
        Ok(records)
    }

    /// Events recorded after `sequence`, for readers catching up
    pub fn after(&self, sequence: u64) -> io::Result<Vec<EventRecord>> {
        let mut records = self.read_all()?;
        records.retain(|r| r.sequence > sequence);
        Ok(records)
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence
    }
}

/// Close off a partial last line so the next append starts fresh
fn terminate_torn_line(path: &Path) -> io::Result<()> {
    let mut file = match OpenOptions::new().read(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if file.metadata()?.len() == 0 {
        return Ok(());
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        file.write_all(b"\n")?;
    }
    Ok(())
}

fn read_records(path: &Path) -> io::Result<Vec<EventRecord>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<EventRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), line = index + 1, error = %e, "skipping unreadable journal line");
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
