// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jiff::tz::TimeZone;
use tidecal_core::{
    CalendarRef, DecodeError, EncodeError, EventStore, FieldSet, HandleMethod, MasterEvent, Moment,
    decode, encode,
};

const EXTENSION: &str = "ics";
const DELETED_SUFFIX: &str = ".deleted";

/// Failure of the directory store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A stored file is not valid calendar text.
    #[error("{path}: {source}")]
    Decode {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: DecodeError,
    },

    /// An event could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// An [`EventStore`] keeping one `.ics` file per event in a directory.
///
/// Masters live in `<uid>.ics`, recurrence exceptions in
/// `<uid>@<recurrence-id>.ics`. Deleted events are renamed to
/// `<name>.ics.deleted`. The directory holds a single calendar; the calendar
/// reference of each call is only logged.
///
/// All calls block on file I/O; from async code, run them on a blocking
/// thread such as [`tokio::task::spawn_blocking`].
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    zone: TimeZone,
}

impl DirStore {
    /// Open the store at `root`, creating the directory if needed. Floating
    /// times in stored files are read in `zone`.
    pub fn open(root: impl Into<PathBuf>, zone: TimeZone) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root, zone })
    }

    /// The directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `event`.
    pub fn path_of(&self, event: &MasterEvent) -> PathBuf {
        let stem = match event.reference_id() {
            Some(reference) => format!("{}@{}", file_stem(event.uid()), reference_stem(reference)),
            None => file_stem(event.uid()),
        };
        self.root.join(format!("{stem}.{EXTENSION}"))
    }

    fn master_path(&self, uid: &str) -> PathBuf {
        self.root.join(format!("{}.{EXTENSION}", file_stem(uid)))
    }

    fn write(&self, event: &MasterEvent) -> Result<(), StoreError> {
        let path = self.path_of(event);
        let output = encode(std::slice::from_ref(event), FieldSet::AllFields)?;
        for warning in &output.warnings {
            tracing::warn!(path = %path.display(), %warning, "lossy event file");
        }
        fs::write(&path, output.text).map_err(|source| StoreError::Io { path, source })
    }
}

impl EventStore for DirStore {
    type Error = StoreError;

    fn find_master_by_uid(
        &self,
        calendar: &CalendarRef,
        uid: &str,
    ) -> Result<Option<MasterEvent>, StoreError> {
        let path = self.master_path(uid);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::debug!(%calendar, path = %path.display(), "reading stored event");

        let decoded = decode(&text, HandleMethod::AddUpdate, &self.zone)
            .map_err(|source| StoreError::Decode {
                path: path.clone(),
                source,
            })?;
        Ok(decoded
            .into_iter()
            .map(|d| d.event)
            .find(|e| e.uid() == uid && !e.is_recurrence_exception()))
    }

    fn save(&mut self, calendar: &CalendarRef, event: &MasterEvent) -> Result<(), StoreError> {
        tracing::info!(%calendar, uid = event.uid(), "saving event");
        self.write(event)
    }

    fn update(
        &mut self,
        calendar: &CalendarRef,
        event: &MasterEvent,
        forced: bool,
    ) -> Result<(), StoreError> {
        if forced {
            tracing::warn!(%calendar, uid = event.uid(), "overwriting a newer stored event");
        } else {
            tracing::info!(%calendar, uid = event.uid(), "updating event");
        }
        self.write(event)
    }

    fn mark_deleted(&mut self, calendar: &CalendarRef, event: &MasterEvent) -> Result<(), StoreError> {
        tracing::info!(%calendar, uid = event.uid(), "deleting event");
        let path = self.path_of(event);
        let mut deleted = path.clone().into_os_string();
        deleted.push(DELETED_SUFFIX);
        fs::rename(&path, &deleted).map_err(|source| StoreError::Io { path, source })
    }
}

/// Map a uid to a file name stem, replacing characters that are not safe in
/// file names.
fn file_stem(uid: &str) -> String {
    uid.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn reference_stem(reference: Moment) -> String {
    match reference {
        Moment::Date(date) => date.strftime("%Y%m%d").to_string(),
        Moment::Instant(ts) => ts.strftime("%Y%m%dT%H%M%SZ").to_string(),
    }
}
