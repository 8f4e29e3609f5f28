//! `medbook` - Clinic appointment booking over flat CSV files
//!
//! This library provides the record store for doctors and appointments, the
//! booking rules layered on top of it, and the command-line front end.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Appointment, Doctor, PatientDetails, Slot};
pub use service::AppointmentService;
pub use storage::{RecordStore, StoreLocation, StoreStats};
