//! Record storage for medbook.
//!
//! This module owns raw reads and writes of the two CSV data files. It maps
//! rows to [`Doctor`] and [`Appointment`] records and back, and attaches no
//! meaning to field values.
//!
//! There is no file locking: a single writer is assumed.

pub mod schema;

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use csv::{ByteRecord, Reader, ReaderBuilder, StringRecord, Terminator, Writer, WriterBuilder};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{Appointment, Doctor};

use schema::{APPOINTMENTS_FILE_NAME, APPOINTMENT_HEADER, DOCTORS_FILE_NAME};

/// Locations of the two data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreLocation {
    /// Doctors file (no header, positional rows).
    pub doctors: PathBuf,
    /// Appointments file (header row, one appointment per row).
    pub appointments: PathBuf,
}

impl StoreLocation {
    /// Use the default file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            doctors: dir.join(DOCTORS_FILE_NAME),
            appointments: dir.join(APPOINTMENTS_FILE_NAME),
        }
    }
}

/// Files created by [`RecordStore::initialize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    /// An empty doctors file was created.
    pub doctors_created: bool,
    /// A header-only appointments file was created.
    pub appointments_created: bool,
}

/// Record counts and locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Path to the doctors file.
    pub doctors_path: PathBuf,
    /// Path to the appointments file.
    pub appointments_path: PathBuf,
    /// Number of well-formed doctor rows.
    pub doctors: usize,
    /// Number of stored appointments.
    pub appointments: usize,
}

/// Flat-file store for doctors and appointments.
///
/// Every call goes back to disk; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct RecordStore {
    location: StoreLocation,
}

impl RecordStore {
    /// Create a store over the given files. Nothing is opened yet.
    #[must_use]
    pub fn new(location: StoreLocation) -> Self {
        Self { location }
    }

    /// Get the data file locations.
    #[must_use]
    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Create missing data files.
    ///
    /// Creates parent directories, an empty doctors file, and an appointments
    /// file holding only the header. Existing files are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be created.
    pub fn initialize(&self) -> Result<InitReport> {
        for path in [&self.location.doctors, &self.location.appointments] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
        }

        let doctors_created = create_new(&self.location.doctors)?.is_some();

        let path = &self.location.appointments;
        let appointments_created = match create_new(path)? {
            Some(file) => {
                let mut writer = writer_builder().from_writer(file);
                writer
                    .write_record(APPOINTMENT_HEADER)
                    .map_err(|err| Error::from_csv(path, err))?;
                writer
                    .flush()
                    .map_err(|source| Error::storage(path, source))?;
                true
            }
            None => false,
        };

        let report = InitReport {
            doctors_created,
            appointments_created,
        };
        info!("Initialized data files: {:?}", report);
        Ok(report)
    }

    /// Load every well-formed doctor row.
    ///
    /// Rows with fewer than five fields are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the file cannot be opened or read.
    pub fn load_doctors(&self) -> Result<Vec<Doctor>> {
        let path = &self.location.doctors;
        let file = File::open(path).map_err(|source| Error::storage(path, source))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut doctors = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) if err.is_io_error() => return Err(Error::from_csv(path, err)),
                Err(err) => {
                    warn!("Skipping unreadable doctor row: {}", err);
                    continue;
                }
            };

            match Doctor::from_fields(record.iter()) {
                Some(doctor) => doctors.push(doctor),
                None => debug!(
                    "Skipping doctor row with {} of {} fields at line {}",
                    record.len(),
                    Doctor::FIELD_COUNT,
                    record.position().map_or(0, csv::Position::line)
                ),
            }
        }

        debug!("Loaded {} doctors from {}", doctors.len(), path.display());
        Ok(doctors)
    }

    /// Load all appointments in file order.
    ///
    /// An empty file yields no appointments. Rows that do not fit the header
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the file cannot be opened or
    /// read, and [`Error::SchemaMismatch`] if the header row is wrong.
    pub fn load_appointments(&self) -> Result<Vec<Appointment>> {
        let path = &self.location.appointments;
        let mut reader = self.appointments_reader()?;
        if read_header(&mut reader, path)?.is_none() {
            debug!("Appointments file {} is empty", path.display());
            return Ok(Vec::new());
        }
        // Field lookup goes by name, so use the canonical spelling.
        reader.set_headers(StringRecord::from(APPOINTMENT_HEADER.to_vec()));

        let mut appointments = Vec::new();
        for result in reader.deserialize::<Appointment>() {
            match result {
                Ok(appointment) => appointments.push(appointment),
                Err(err) if err.is_io_error() => return Err(Error::from_csv(path, err)),
                Err(err) => warn!("Skipping malformed appointment row: {}", err),
            }
        }

        debug!(
            "Loaded {} appointments from {}",
            appointments.len(),
            path.display()
        );
        Ok(appointments)
    }

    /// Append one appointment to the end of the file.
    ///
    /// Writes the header first if the file is missing or holds nothing but
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the file cannot be written.
    pub fn append_appointment(&self, appointment: &Appointment) -> Result<()> {
        let path = &self.location.appointments;
        let storage_err = |source| Error::storage(path, source);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(storage_err)?;

        let mut existing = Vec::new();
        file.read_to_end(&mut existing).map_err(storage_err)?;
        let needs_header = existing.iter().all(u8::is_ascii_whitespace);
        if needs_header {
            // Blank lines read back as an empty store, so start the file over.
            file.set_len(0).map_err(storage_err)?;
            file.rewind().map_err(storage_err)?;
        } else if !existing.ends_with(b"\n") {
            file.write_all(b"\n").map_err(storage_err)?;
        }

        let mut writer = writer_builder().from_writer(file);
        if needs_header {
            writer
                .write_record(APPOINTMENT_HEADER)
                .map_err(|err| Error::from_csv(path, err))?;
        }
        writer
            .serialize(appointment)
            .map_err(|err| Error::from_csv(path, err))?;
        writer.flush().map_err(storage_err)?;

        info!(
            "Appended appointment for slot {} to {}",
            appointment.slot(),
            path.display()
        );
        Ok(())
    }

    /// Replace the whole appointments file with `appointments`.
    ///
    /// The header and records go to a temporary file next to the destination,
    /// which is then renamed over it. Readers see either the old file or the
    /// new one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the temporary file cannot be
    /// written or moved into place.
    pub fn rewrite_appointments(&self, appointments: &[Appointment]) -> Result<()> {
        self.replace_appointments(|writer| {
            appointments
                .iter()
                .try_for_each(|appointment| writer.serialize(appointment))
        })?;

        info!(
            "Rewrote {} with {} appointments",
            self.location.appointments.display(),
            appointments.len()
        );
        Ok(())
    }

    /// Keep only the appointment rows for which `keep` returns `true`.
    ///
    /// Rows are handled raw, so a row that does not map onto [`Appointment`]
    /// is written back unchanged when kept. Returns the number of rows
    /// removed. The file is replaced the same way as
    /// [`RecordStore::rewrite_appointments`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the file cannot be read or
    /// replaced, and [`Error::SchemaMismatch`] if the header row is wrong.
    pub fn retain_appointment_rows<F>(&self, mut keep: F) -> Result<usize>
    where
        F: FnMut(&ByteRecord) -> bool,
    {
        let path = &self.location.appointments;
        let mut reader = self.appointments_reader()?;

        let mut kept = Vec::new();
        let mut removed = 0;
        if read_header(&mut reader, path)?.is_some() {
            for result in reader.byte_records() {
                let row = result.map_err(|err| Error::from_csv(path, err))?;
                if keep(&row) {
                    kept.push(row);
                } else {
                    removed += 1;
                }
            }
        }

        self.replace_appointments(|writer| {
            kept.iter().try_for_each(|row| writer.write_byte_record(row))
        })?;

        info!(
            "Removed {} of {} appointment rows from {}",
            removed,
            removed + kept.len(),
            path.display()
        );
        Ok(removed)
    }

    /// Count the records in both files.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be loaded.
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            doctors_path: self.location.doctors.clone(),
            appointments_path: self.location.appointments.clone(),
            doctors: self.load_doctors()?.len(),
            appointments: self.load_appointments()?.len(),
        })
    }

    fn appointments_reader(&self) -> Result<Reader<File>> {
        let path = &self.location.appointments;
        let file = File::open(path).map_err(|source| Error::storage(path, source))?;
        Ok(ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file))
    }

    /// Write the header plus `write_rows` output to a temporary file and move
    /// it over the appointments file.
    fn replace_appointments<F>(&self, write_rows: F) -> Result<()>
    where
        F: FnOnce(&mut Writer<NamedTempFile>) -> csv::Result<()>,
    {
        let path = &self.location.appointments;
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let temp = NamedTempFile::new_in(dir).map_err(|source| Error::storage(dir, source))?;
        let mut writer = writer_builder().from_writer(temp);
        writer
            .write_record(APPOINTMENT_HEADER)
            .map_err(|err| Error::from_csv(path, err))?;
        write_rows(&mut writer).map_err(|err| Error::from_csv(path, err))?;

        let temp = writer
            .into_inner()
            .map_err(|err| Error::storage(path, err.into_error()))?;
        // Temporary files are owner-only; carry over the destination's mode.
        if let Ok(metadata) = std::fs::metadata(path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|source| Error::storage(path, source))?;
        }
        temp.as_file()
            .sync_all()
            .map_err(|source| Error::storage(path, source))?;
        temp.persist(path)
            .map_err(|err| Error::storage(path, err.error))?;
        Ok(())
    }
}

/// Read and check the appointments header. `None` means the file is empty.
fn read_header(reader: &mut Reader<File>, path: &Path) -> Result<Option<StringRecord>> {
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) if err.is_io_error() => return Err(Error::from_csv(path, err)),
        Err(err) => {
            return Err(Error::schema_mismatch(
                path,
                format!("unreadable header row: {err}"),
            ))
        }
    };

    if headers.is_empty() {
        return Ok(None);
    }
    if let Some(message) = schema::header_mismatch(headers.iter()) {
        return Err(Error::schema_mismatch(path, message));
    }
    Ok(Some(headers))
}

/// Create `path` if it does not exist yet. `None` means it already existed.
fn create_new(path: &Path) -> Result<Option<File>> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(source) => Err(Error::storage(path, source)),
    }
}

fn writer_builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'));
    builder
}
