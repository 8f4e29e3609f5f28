//! Command-line interface for medbook.
//!
//! This module provides the CLI structure, the interactive session, and the
//! text rendering used by the `medbook` binary. Business rules stay in
//! [`crate::service`]; this layer only collects input and shows results.

mod commands;
pub mod interactive;
pub mod navigation;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BookCommand, CancelCommand, ConfigCommand, DaysCommand, DoctorsCommand, ListCommand,
    StatusCommand, ViewCommand,
};

use crate::error::Error;
use crate::logging::Verbosity;
use crate::record::{Appointment, Doctor};

/// medbook - Book, view, and cancel clinic appointments
///
/// Doctors and appointments live in two CSV files in the data directory.
/// Run `medbook init` once to create them.
#[derive(Debug, Parser)]
#[command(name = "medbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create missing data files
    Init,

    /// List specialties
    Specialties(ListCommand),

    /// List days offered for a specialty
    Days(DaysCommand),

    /// List doctors for a specialty and day
    Doctors(DoctorsCommand),

    /// Book an appointment
    Book(BookCommand),

    /// View appointments by telephone
    View(ViewCommand),

    /// Cancel all appointments for a telephone
    Cancel(CancelCommand),

    /// Menu-driven session on the terminal
    Interactive,

    /// Show data file locations and record counts
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

/// One-line description of an appointment.
#[must_use]
pub fn format_appointment(appointment: &Appointment) -> String {
    format!(
        "Patient: {}, Doctor: {}, Specialty: {}, Time: {}, Day: {}",
        appointment.name,
        appointment.doctor_name,
        appointment.doctor_specialty,
        appointment.doctor_time,
        appointment.day
    )
}

/// One-line description of a doctor slot.
#[must_use]
pub fn format_doctor(doctor: &Doctor) -> String {
    format!(
        "[{}] {} - {} ({}, {})",
        doctor.id, doctor.name, doctor.time, doctor.specialty, doctor.day
    )
}

/// Follow-up advice for errors caused by the data files.
#[must_use]
pub fn storage_hint(err: &Error) -> Option<&'static str> {
    err.is_storage_error().then_some(
        "run `medbook init` to create missing data files, \
         or `medbook config show` to see where they are expected",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PatientDetails;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "medbook");
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["medbook", "-q", "status"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["medbook", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_doctors() {
        let cli = Cli::try_parse_from(["medbook", "doctors", "Cardio", "Mon", "--json"]).unwrap();
        match cli.command {
            Command::Doctors(cmd) => {
                assert_eq!(cmd.specialty, "Cardio");
                assert_eq!(cmd.day, "Mon");
                assert!(cmd.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_book() {
        let cli = Cli::try_parse_from([
            "medbook",
            "book",
            "--specialty",
            "Cardio",
            "--day",
            "Mon",
            "--doctor",
            "1",
            "--name",
            "Jane",
            "--age",
            "34",
            "--email",
            "jane@example.com",
        ])
        .unwrap();
        match cli.command {
            Command::Book(cmd) => {
                assert_eq!(cmd.doctor_id, "1");
                assert!(cmd.time.is_none());
                assert_eq!(cmd.sex, "");
                assert_eq!(cmd.telephone, "");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_book_requires_name() {
        let result = Cli::try_parse_from([
            "medbook",
            "book",
            "--specialty",
            "Cardio",
            "--day",
            "Mon",
            "--doctor",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cancel() {
        let cli = Cli::try_parse_from([
            "medbook",
            "cancel",
            "--name",
            "Jane",
            "--age",
            "34",
            "--telephone",
            "555",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Cancel(_)));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["medbook", "-c", "/custom/config.toml", "specialties"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["medbook", "config", "validate", "--file", "x.toml"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_format_appointment() {
        let doctor = Doctor::new("1", "A", "Cardio", "9am", "Mon");
        let appointment = Appointment::book(
            &doctor,
            PatientDetails {
                name: "Jane".to_string(),
                ..PatientDetails::default()
            },
        );
        assert_eq!(
            format_appointment(&appointment),
            "Patient: Jane, Doctor: A, Specialty: Cardio, Time: 9am, Day: Mon"
        );
    }

    #[test]
    fn test_storage_hint() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let hint = storage_hint(&Error::storage("/tmp/Data.csv", missing)).unwrap();
        assert!(hint.contains("medbook init"));

        assert!(storage_hint(&Error::MissingRequiredField { field: "name" }).is_none());
    }

    #[test]
    fn test_format_doctor() {
        let doctor = Doctor::new("1", "A", "Cardio", "9am", "Mon");
        assert_eq!(format_doctor(&doctor), "[1] A - 9am (Cardio, Mon)");
    }
}
