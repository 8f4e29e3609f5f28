//! Record types for medbook.
//!
//! This module defines the fixed-field records stored in the two data files:
//! doctors (read-only reference data) and appointments (one booking per row).

use serde::{Deserialize, Serialize};

/// A bookable doctor/time/day triple.
///
/// At most one appointment may exist per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot<'a> {
    /// Doctor identifier.
    pub doctor_id: &'a str,
    /// Free-text time label.
    pub time: &'a str,
    /// Free-text day label.
    pub day: &'a str,
}

impl std::fmt::Display for Slot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {} on {}", self.doctor_id, self.time, self.day)
    }
}

/// A doctor as listed in the doctors file.
///
/// Positional fields: `id, name, specialty, time, day`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Doctor {
    /// Doctor identifier. Not unique across days or times.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Medical specialty.
    pub specialty: String,
    /// Free-text time label for this slot.
    pub time: String,
    /// Free-text day-of-week label.
    pub day: String,
}

impl Doctor {
    /// Number of positional fields a doctor row must carry.
    pub const FIELD_COUNT: usize = 5;

    /// Create a doctor from its five fields.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        specialty: impl Into<String>,
        time: impl Into<String>,
        day: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            specialty: specialty.into(),
            time: time.into(),
            day: day.into(),
        }
    }

    /// Build a doctor from positional fields.
    ///
    /// Returns `None` when fewer than [`Doctor::FIELD_COUNT`] fields are
    /// present. Extra trailing fields are ignored.
    #[must_use]
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut fields = fields.into_iter();
        Some(Self::new(
            fields.next()?,
            fields.next()?,
            fields.next()?,
            fields.next()?,
            fields.next()?,
        ))
    }

    /// The slot this doctor entry offers.
    #[must_use]
    pub fn slot(&self) -> Slot<'_> {
        Slot {
            doctor_id: &self.id,
            time: &self.time,
            day: &self.day,
        }
    }
}

/// Patient fields submitted with a booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDetails {
    /// Patient name. Required.
    pub name: String,
    /// Patient age as entered. Required.
    pub age: String,
    /// Contact e-mail. Required.
    pub email: String,
    /// Sex as entered (M/F).
    pub sex: String,
    /// Contact telephone; identifies the patient for lookup and cancellation.
    pub telephone: String,
}

impl PatientDetails {
    /// Return the first required field that is blank, in form order.
    #[must_use]
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("age", &self.age),
            ("email", &self.email),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// A booked appointment.
///
/// Carries a copy of the doctor's fields taken at booking time. Serde names
/// match the appointments file header column for column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Patient name.
    #[serde(rename = "name")]
    pub name: String,
    /// Patient age.
    #[serde(rename = "age")]
    pub age: String,
    /// Patient e-mail.
    #[serde(rename = "E-mail")]
    pub email: String,
    /// Patient sex.
    #[serde(rename = "Sex: M/F")]
    pub sex: String,
    /// Patient telephone.
    #[serde(rename = "Telephone")]
    pub telephone: String,
    /// Booked doctor's id.
    #[serde(rename = "Doctor ID")]
    pub doctor_id: String,
    /// Booked doctor's name.
    #[serde(rename = "Doctor_Name")]
    pub doctor_name: String,
    /// Booked doctor's specialty.
    #[serde(rename = "Doctor_Specialty")]
    pub doctor_specialty: String,
    /// Booked slot time.
    #[serde(rename = "Doctor_Time")]
    pub doctor_time: String,
    /// Booked slot day.
    #[serde(rename = "Day")]
    pub day: String,
}

impl Appointment {
    /// Build the denormalized appointment for `patient` with `doctor`.
    #[must_use]
    pub fn book(doctor: &Doctor, patient: PatientDetails) -> Self {
        Self {
            name: patient.name,
            age: patient.age,
            email: patient.email,
            sex: patient.sex,
            telephone: patient.telephone,
            doctor_id: doctor.id.clone(),
            doctor_name: doctor.name.clone(),
            doctor_specialty: doctor.specialty.clone(),
            doctor_time: doctor.time.clone(),
            day: doctor.day.clone(),
        }
    }

    /// The slot this appointment occupies.
    #[must_use]
    pub fn slot(&self) -> Slot<'_> {
        Slot {
            doctor_id: &self.doctor_id,
            time: &self.doctor_time,
            day: &self.day,
        }
    }

    /// Case-insensitive telephone comparison.
    #[must_use]
    pub fn has_telephone(&self, telephone: &str) -> bool {
        telephones_match(&self.telephone, telephone)
    }
}

/// Compare two telephone values the way lookups and cancellation do.
#[must_use]
pub fn telephones_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cardio() -> Doctor {
        Doctor::new("1", "A", "Cardio", "9am", "Mon")
    }

    fn patient(telephone: &str) -> PatientDetails {
        PatientDetails {
            name: "Jane".to_string(),
            age: "34".to_string(),
            email: "jane@example.com".to_string(),
            sex: "F".to_string(),
            telephone: telephone.to_string(),
        }
    }

    #[test]
    fn test_doctor_from_fields() {
        let doctor = Doctor::from_fields(["1", "A", "Cardio", "9am", "Mon"]).unwrap();
        assert_eq!(doctor, cardio());
    }

    #[test]
    fn test_doctor_from_short_row() {
        assert!(Doctor::from_fields(["1", "A", "Cardio", "9am"]).is_none());
        assert!(Doctor::from_fields(Vec::<&str>::new()).is_none());
    }

    #[test]
    fn test_doctor_from_long_row_ignores_extra() {
        let doctor = Doctor::from_fields(["1", "A", "Cardio", "9am", "Mon", "room 4"]).unwrap();
        assert_eq!(doctor.day, "Mon");
    }

    #[test]
    fn test_first_missing_field_order() {
        let mut details = PatientDetails::default();
        assert_eq!(details.first_missing_field(), Some("name"));

        details.name = "Jane".to_string();
        assert_eq!(details.first_missing_field(), Some("age"));

        details.age = "  ".to_string();
        assert_eq!(details.first_missing_field(), Some("age"));

        details.age = "34".to_string();
        assert_eq!(details.first_missing_field(), Some("email"));

        details.email = "jane@example.com".to_string();
        assert_eq!(details.first_missing_field(), None);
    }

    #[test]
    fn test_sex_and_telephone_optional() {
        let details = PatientDetails {
            sex: String::new(),
            telephone: String::new(),
            ..patient("")
        };
        assert_eq!(details.first_missing_field(), None);
    }

    #[test]
    fn test_book_copies_doctor_fields() {
        let appointment = Appointment::book(&cardio(), patient("555-1234"));

        assert_eq!(appointment.name, "Jane");
        assert_eq!(appointment.doctor_id, "1");
        assert_eq!(appointment.doctor_name, "A");
        assert_eq!(appointment.doctor_specialty, "Cardio");
        assert_eq!(appointment.doctor_time, "9am");
        assert_eq!(appointment.day, "Mon");
    }

    #[test]
    fn test_slot_equality() {
        let doctor = cardio();
        let appointment = Appointment::book(&doctor, patient("555"));
        assert_eq!(doctor.slot(), appointment.slot());

        let other = Doctor::new("1", "A", "Cardio", "10am", "Mon");
        assert_ne!(other.slot(), appointment.slot());
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(cardio().slot().to_string(), "1 @ 9am on Mon");
    }

    #[test]
    fn test_has_telephone_case_insensitive() {
        let appointment = Appointment::book(&cardio(), patient("555-ABC"));
        assert!(appointment.has_telephone("555-abc"));
        assert!(appointment.has_telephone("555-ABC"));
        assert!(!appointment.has_telephone("555-abd"));
    }

    #[test]
    fn test_telephones_match_ignores_case_only() {
        assert!(telephones_match("555-ext-A", "555-EXT-a"));
        assert!(!telephones_match("555 0100", "5550100"));
    }

    #[test]
    fn test_appointment_json_uses_header_names() {
        let appointment = Appointment::book(&cardio(), patient("555"));
        let json = serde_json::to_string(&appointment).unwrap();
        assert!(json.contains("\"E-mail\""));
        assert!(json.contains("\"Sex: M/F\""));
        assert!(json.contains("\"Doctor ID\""));
    }
}
