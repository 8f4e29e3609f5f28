//! `medbook` - CLI for booking clinic appointments
//!
//! This binary wires configuration and logging to the appointment service and
//! renders its results on stdout.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use medbook::cli::interactive::Session;
use medbook::cli::{
    format_appointment, format_doctor, storage_hint, BookCommand, CancelCommand, Cli, Command,
    ConfigCommand, ViewCommand,
};
use medbook::{init_logging, AppointmentService, Config, Error, RecordStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    let service = AppointmentService::new(RecordStore::new(config.store_location()));

    let result = run(cli.command, &config, &service);
    if let Some(hint) = result
        .as_ref()
        .err()
        .and_then(|err| err.downcast_ref::<Error>())
        .and_then(storage_hint)
    {
        eprintln!("hint: {hint}");
    }
    result
}

fn run(command: Command, config: &Config, service: &AppointmentService) -> anyhow::Result<()> {
    match command {
        Command::Init => handle_init(service)?,
        Command::Specialties(cmd) => {
            let specialties = service.list_specialties()?;
            print_list(specialties.iter().map(String::as_str), &specialties, cmd.json)?;
        }
        Command::Days(cmd) => {
            let days = service.list_days(&cmd.specialty)?;
            print_list(days.iter().map(String::as_str), &days, cmd.json)?;
        }
        Command::Doctors(cmd) => {
            let doctors = service.list_doctors(&cmd.specialty, &cmd.day)?;
            let lines: Vec<String> = doctors.iter().map(format_doctor).collect();
            print_list(lines.iter().map(String::as_str), &doctors, cmd.json)?;
        }
        Command::Book(cmd) => handle_book(service, &cmd)?,
        Command::View(cmd) => handle_view(service, &cmd)?,
        Command::Cancel(cmd) => handle_cancel(service, &cmd)?,
        Command::Interactive => {
            let stdin = std::io::stdin();
            let mut session = Session::new(service, stdin.lock(), std::io::stdout());
            session.run()?;
        }
        Command::Status(cmd) => handle_status(service, cmd.json)?,
        Command::Config(cmd) => handle_config(config, cmd)?,
    }
    Ok(())
}

fn print_list<'a, T: Serialize + ?Sized>(
    lines: impl Iterator<Item = &'a str>,
    value: &T,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        for line in lines {
            println!("{line}");
        }
    }
    Ok(())
}

fn handle_init(service: &AppointmentService) -> anyhow::Result<()> {
    let report = service.store().initialize()?;
    let location = service.store().location();
    let describe = |created: bool| if created { "created" } else { "exists" };
    println!(
        "Doctors:       {} ({})",
        location.doctors.display(),
        describe(report.doctors_created)
    );
    println!(
        "Appointments:  {} ({})",
        location.appointments.display(),
        describe(report.appointments_created)
    );
    Ok(())
}

fn handle_book(service: &AppointmentService, cmd: &BookCommand) -> anyhow::Result<()> {
    let doctor = service.find_doctor(
        &cmd.specialty,
        &cmd.day,
        &cmd.doctor_id,
        cmd.time.as_deref(),
    )?;
    let appointment = service.book_appointment(&doctor, cmd.patient())?;
    println!("Appointment booked successfully!");
    println!("{}", format_appointment(&appointment));
    Ok(())
}

fn handle_view(service: &AppointmentService, cmd: &ViewCommand) -> anyhow::Result<()> {
    if let Some(field) = cmd.missing_field() {
        return Err(Error::MissingRequiredField { field }.into());
    }

    let appointments = service.find_appointments_by_telephone(cmd.telephone.trim())?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&appointments)?);
    } else if appointments.is_empty() {
        println!("No appointments found for this name.");
    } else {
        println!("Appointments for {}:", cmd.name.trim());
        for appointment in &appointments {
            println!("  {}", format_appointment(appointment));
        }
    }
    Ok(())
}

fn handle_cancel(service: &AppointmentService, cmd: &CancelCommand) -> anyhow::Result<()> {
    if let Some(field) = cmd.missing_field() {
        return Err(Error::MissingRequiredField { field }.into());
    }

    let removed = service.cancel_appointments_by_telephone(cmd.telephone.trim())?;
    println!("Appointments canceled successfully! ({removed} removed)");
    Ok(())
}

fn handle_status(service: &AppointmentService, json: bool) -> anyhow::Result<()> {
    let stats = service.store().stats()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("medbook status");
        println!("--------------");
        println!("Doctors file:       {}", stats.doctors_path.display());
        println!("Appointments file:  {}", stats.appointments_path.display());
        println!("Doctors:            {}", stats.doctors);
        println!("Appointments:       {}", stats.appointments);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let location = config.store_location();
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Doctors file:       {}", location.doctors.display());
                println!("  Appointments file:  {}", location.appointments.display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
