//! The student table held in memory and mirrored to the CSV file. Every
//! mutation rewrites the whole file and is undone in memory if that rewrite
//! fails, so after any mutating call returns, `list()` and the file agree.

use std::mem;
use std::path::{Path, PathBuf};

use log::info;

use crate::db::{read_students, write_students};
use crate::error::{StoreError, StoreResult};
use crate::models::StudentRecord;

#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<StudentRecord>,
}

impl RecordStore {
    /// Bind to `path` and load whatever it holds.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let mut store = Self {
            path: path.into(),
            records: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the working copy with the file contents. On error the previous
    /// working copy is kept.
    pub fn load(&mut self) -> StoreResult<&[StudentRecord]> {
        self.records = read_students(&self.path)?;
        info!(
            "loaded {} students from {}",
            self.records.len(),
            self.path.display()
        );
        Ok(&self.records)
    }

    /// Rewrite the file from the working copy.
    pub fn save(&self) -> StoreResult<()> {
        write_students(&self.path, &self.records)?;
        info!(
            "saved {} students to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn list(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&StudentRecord> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append and persist. Returns the new record's position.
    pub fn add(&mut self, record: StudentRecord) -> StoreResult<usize> {
        self.records.push(record);
        if let Err(err) = self.save() {
            self.records.pop();
            return Err(err);
        }
        Ok(self.records.len() - 1)
    }

    /// Replace the record at `position` and persist.
    pub fn update_at(&mut self, position: usize, record: StudentRecord) -> StoreResult<()> {
        self.check_position(position)?;
        let previous = mem::replace(&mut self.records[position], record);
        if let Err(err) = self.save() {
            self.records[position] = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Remove the record at `position`, shifting later records down, and
    /// persist. Returns the removed record.
    pub fn delete_at(&mut self, position: usize) -> StoreResult<StudentRecord> {
        self.check_position(position)?;
        let removed = self.records.remove(position);
        if let Err(err) = self.save() {
            self.records.insert(position, removed);
            return Err(err);
        }
        Ok(removed)
    }

    fn check_position(&self, position: usize) -> StoreResult<()> {
        if position < self.records.len() {
            Ok(())
        } else {
            Err(StoreError::OutOfRange {
                position,
                len: self.records.len(),
            })
        }
    }
}
