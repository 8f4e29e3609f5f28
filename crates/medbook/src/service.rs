//! Appointment booking rules.
//!
//! [`AppointmentService`] layers filtering, duplicate-slot detection, and
//! lookup/cancellation by telephone on top of [`RecordStore`]. It holds no
//! record state of its own: every call re-reads the data files.
//!
//! Check-then-append and load-filter-rewrite run under an in-process lock.
//! Nothing guards against a second process writing the same files, so two
//! processes can still book one slot twice.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{telephones_match, Appointment, Doctor, PatientDetails};
use crate::storage::schema::TELEPHONE_COLUMN;
use crate::storage::RecordStore;

/// Booking, lookup, and cancellation over a [`RecordStore`].
#[derive(Debug)]
pub struct AppointmentService {
    store: RecordStore,
    write_lock: Mutex<()>,
}

impl AppointmentService {
    /// Create a service over `store`.
    #[must_use]
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the underlying store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Distinct specialties across all doctors.
    ///
    /// # Errors
    ///
    /// Returns an error if the doctors file cannot be loaded.
    pub fn list_specialties(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .store
            .load_doctors()?
            .into_iter()
            .map(|doctor| doctor.specialty)
            .collect())
    }

    /// Distinct days offered by doctors of `specialty`.
    ///
    /// # Errors
    ///
    /// Returns an error if the doctors file cannot be loaded.
    pub fn list_days(&self, specialty: &str) -> Result<BTreeSet<String>> {
        Ok(self
            .store
            .load_doctors()?
            .into_iter()
            .filter(|doctor| doctor.specialty == specialty)
            .map(|doctor| doctor.day)
            .collect())
    }

    /// Doctors of `specialty` available on `day`, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the doctors file cannot be loaded.
    pub fn list_doctors(&self, specialty: &str, day: &str) -> Result<Vec<Doctor>> {
        Ok(self
            .store
            .load_doctors()?
            .into_iter()
            .filter(|doctor| doctor.specialty == specialty && doctor.day == day)
            .collect())
    }

    /// Resolve a single doctor entry by specialty, day, id, and optional time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DoctorNotFound`] if nothing matches and
    /// [`Error::AmbiguousDoctor`] if several slots match and `time` is `None`.
    pub fn find_doctor(
        &self,
        specialty: &str,
        day: &str,
        id: &str,
        time: Option<&str>,
    ) -> Result<Doctor> {
        let mut matches: Vec<Doctor> = self
            .list_doctors(specialty, day)?
            .into_iter()
            .filter(|doctor| doctor.id == id)
            .filter(|doctor| time.map_or(true, |time| doctor.time == time))
            .collect();

        match matches.len() {
            0 => Err(Error::DoctorNotFound {
                id: id.to_string(),
                specialty: specialty.to_string(),
                day: day.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            count => Err(Error::AmbiguousDoctor {
                id: id.to_string(),
                day: day.to_string(),
                count,
            }),
        }
    }

    /// Book `doctor`'s slot for `patient`.
    ///
    /// Name, age, and e-mail must be non-blank. The slot must not already be
    /// booked. Returns the stored appointment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequiredField`], [`Error::SlotAlreadyBooked`],
    /// or a storage error. Nothing is written on error.
    pub fn book_appointment(
        &self,
        doctor: &Doctor,
        patient: PatientDetails,
    ) -> Result<Appointment> {
        if let Some(field) = patient.first_missing_field() {
            return Err(Error::MissingRequiredField { field });
        }

        let _guard = self.lock();
        let taken = self
            .store
            .load_appointments()?
            .iter()
            .any(|existing| existing.slot() == doctor.slot());
        if taken {
            debug!("Slot {} is already booked", doctor.slot());
            return Err(Error::SlotAlreadyBooked {
                doctor_name: doctor.name.clone(),
                time: doctor.time.clone(),
                day: doctor.day.clone(),
            });
        }

        let appointment = Appointment::book(doctor, patient);
        self.store.append_appointment(&appointment)?;
        info!("Booked slot {}", doctor.slot());
        Ok(appointment)
    }

    /// Appointments whose telephone matches, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointments file cannot be loaded.
    pub fn find_appointments_by_telephone(&self, telephone: &str) -> Result<Vec<Appointment>> {
        Ok(self
            .store
            .load_appointments()?
            .into_iter()
            .filter(|appointment| appointment.has_telephone(telephone))
            .collect())
    }

    /// Remove every appointment whose telephone matches, ignoring case.
    ///
    /// Returns how many were removed; zero is not an error. Rows that do not
    /// parse as appointments are kept unless their telephone column matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointments file cannot be read or rewritten.
    pub fn cancel_appointments_by_telephone(&self, telephone: &str) -> Result<usize> {
        let _guard = self.lock();
        let removed = self.store.retain_appointment_rows(|row| {
            !row.get(TELEPHONE_COLUMN)
                .and_then(|field| std::str::from_utf8(field).ok())
                .is_some_and(|field| telephones_match(field, telephone))
        })?;

        info!("Cancelled {} appointments", removed);
        Ok(removed)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
