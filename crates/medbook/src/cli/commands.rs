//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::record::PatientDetails;

/// Output options shared by the listing commands.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Days command arguments.
#[derive(Debug, Args)]
pub struct DaysCommand {
    /// Specialty to list days for (exact, case-sensitive)
    pub specialty: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Doctors command arguments.
#[derive(Debug, Args)]
pub struct DoctorsCommand {
    /// Specialty to filter by (exact, case-sensitive)
    pub specialty: String,

    /// Day to filter by (exact, case-sensitive)
    pub day: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Book command arguments.
#[derive(Debug, Args)]
pub struct BookCommand {
    /// Doctor specialty
    #[arg(long)]
    pub specialty: String,

    /// Day of the appointment
    #[arg(long)]
    pub day: String,

    /// Doctor ID
    #[arg(long = "doctor", value_name = "ID")]
    pub doctor_id: String,

    /// Slot time, needed when the doctor has several slots that day
    #[arg(long)]
    pub time: Option<String>,

    /// Patient name
    #[arg(long)]
    pub name: String,

    /// Patient age
    #[arg(long)]
    pub age: String,

    /// Patient e-mail
    #[arg(long)]
    pub email: String,

    /// Patient sex (M/F)
    #[arg(long, default_value = "")]
    pub sex: String,

    /// Patient telephone
    #[arg(long, default_value = "")]
    pub telephone: String,
}

impl BookCommand {
    /// Collect the patient fields from the arguments.
    #[must_use]
    pub fn patient(&self) -> PatientDetails {
        PatientDetails {
            name: self.name.clone(),
            age: self.age.clone(),
            email: self.email.clone(),
            sex: self.sex.clone(),
            telephone: self.telephone.clone(),
        }
    }
}

/// View command arguments.
#[derive(Debug, Args)]
pub struct ViewCommand {
    /// Patient name
    #[arg(long)]
    pub name: String,

    /// Telephone used when booking
    #[arg(long)]
    pub telephone: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl ViewCommand {
    /// The view form needs a name.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        self.name.trim().is_empty().then_some("name")
    }
}

/// Cancel command arguments.
#[derive(Debug, Args)]
pub struct CancelCommand {
    /// Patient name
    #[arg(long)]
    pub name: String,

    /// Patient age
    #[arg(long)]
    pub age: String,

    /// Telephone used when booking
    #[arg(long)]
    pub telephone: String,
}

impl CancelCommand {
    /// The cancel form needs name, age, and telephone.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("age", &self.age),
            ("telephone", &self.telephone),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cancel(name: &str, age: &str, telephone: &str) -> CancelCommand {
        CancelCommand {
            name: name.to_string(),
            age: age.to_string(),
            telephone: telephone.to_string(),
        }
    }

    #[test]
    fn test_book_command_patient() {
        let cmd = BookCommand {
            specialty: "Cardio".to_string(),
            day: "Mon".to_string(),
            doctor_id: "1".to_string(),
            time: None,
            name: "Jane".to_string(),
            age: "34".to_string(),
            email: "jane@example.com".to_string(),
            sex: "F".to_string(),
            telephone: "555".to_string(),
        };
        let patient = cmd.patient();
        assert_eq!(patient.name, "Jane");
        assert_eq!(patient.telephone, "555");
    }

    #[test]
    fn test_view_requires_name() {
        let mut cmd = ViewCommand {
            name: " ".to_string(),
            telephone: "555".to_string(),
            json: false,
        };
        assert_eq!(cmd.missing_field(), Some("name"));

        cmd.name = "Jane".to_string();
        assert_eq!(cmd.missing_field(), None);
    }

    #[test]
    fn test_cancel_requires_all_fields() {
        assert_eq!(cancel("", "34", "555").missing_field(), Some("name"));
        assert_eq!(cancel("Jane", "", "555").missing_field(), Some("age"));
        assert_eq!(cancel("Jane", "34", "\t").missing_field(), Some("telephone"));
        assert_eq!(cancel("Jane", "34", "555").missing_field(), None);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
