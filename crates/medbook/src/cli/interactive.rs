//! Line-oriented interactive session.
//!
//! Walks the [`Screen`] graph over any reader/writer pair, calling the
//! [`AppointmentService`] for data and rendering results as plain text.

use std::io::{BufRead, Write};

use tracing::debug;

use super::format_appointment;
use super::navigation::{Action, Screen};
use crate::error::{Error, Result};
use crate::record::{Doctor, PatientDetails};
use crate::service::AppointmentService;

/// An item picked from a numbered list.
enum Choice {
    Item(usize),
    Back,
}

/// Interactive session state.
pub struct Session<'a, R, W> {
    service: &'a AppointmentService,
    input: R,
    output: W,
    screen: Screen,
    specialty: Option<String>,
    day: Option<String>,
    doctor: Option<Doctor>,
}

impl<R, W> std::fmt::Debug for Session<'_, R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("screen", &self.screen)
            .field("specialty", &self.specialty)
            .field("day", &self.day)
            .field("doctor", &self.doctor)
            .finish_non_exhaustive()
    }
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Start a session on the main menu.
    #[must_use]
    pub fn new(service: &'a AppointmentService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
            screen: Screen::MainMenu,
            specialty: None,
            day: None,
            doctor: None,
        }
    }

    /// Current screen.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Run until the user quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns storage and terminal I/O errors. Input problems the user can
    /// fix are reported on the output and the screen is shown again.
    pub fn run(&mut self) -> Result<()> {
        while self.screen != Screen::Exit {
            let Some(action) = self.show()? else {
                debug!("Input closed on {}", self.screen);
                self.screen = Screen::Exit;
                break;
            };

            let next = self.screen.next(action).ok_or_else(|| {
                Error::internal(format!("no transition from {} on {action:?}", self.screen))
            })?;
            debug!("{} --{:?}--> {}", self.screen, action, next);
            self.screen = next;
        }
        writeln!(self.output, "Goodbye.")?;
        Ok(())
    }

    fn show(&mut self) -> Result<Option<Action>> {
        match self.screen {
            Screen::MainMenu => self.main_menu(),
            Screen::SelectSpecialty => self.select_specialty(),
            Screen::SelectDay => self.select_day(),
            Screen::SelectDoctor => self.select_doctor(),
            Screen::EnterDetails => self.enter_details(),
            Screen::ViewForm => self.view_form(),
            Screen::CancelForm => self.cancel_form(),
            Screen::Exit => Ok(Some(Action::Quit)),
        }
    }

    fn main_menu(&mut self) -> Result<Option<Action>> {
        let items = [
            "Book an Appointment".to_string(),
            "View Appointments".to_string(),
            "Cancel an Appointment".to_string(),
        ];
        let action = match self.choose("Doctor Appointment Scheduler", &items, "q", "Quit")? {
            None => None,
            Some(Choice::Back) => Some(Action::Quit),
            Some(Choice::Item(0)) => Some(Action::Book),
            Some(Choice::Item(1)) => Some(Action::View),
            Some(Choice::Item(_)) => Some(Action::Cancel),
        };
        Ok(action)
    }

    fn select_specialty(&mut self) -> Result<Option<Action>> {
        let specialties: Vec<String> = self.service.list_specialties()?.into_iter().collect();
        let choice = self.choose("Select a Specialty", &specialties, "b", "Go Back")?;
        Ok(choice.map(|choice| match choice {
            Choice::Item(index) => {
                self.specialty = Some(specialties[index].clone());
                Action::Select
            }
            Choice::Back => Action::Back,
        }))
    }

    fn select_day(&mut self) -> Result<Option<Action>> {
        let specialty = self.specialty.clone().unwrap_or_default();
        let days: Vec<String> = self.service.list_days(&specialty)?.into_iter().collect();
        let choice = self.choose("Select a Day of the Week", &days, "b", "Go Back")?;
        Ok(choice.map(|choice| match choice {
            Choice::Item(index) => {
                self.day = Some(days[index].clone());
                Action::Select
            }
            Choice::Back => Action::Back,
        }))
    }

    fn select_doctor(&mut self) -> Result<Option<Action>> {
        let specialty = self.specialty.clone().unwrap_or_default();
        let day = self.day.clone().unwrap_or_default();
        let mut doctors = self.service.list_doctors(&specialty, &day)?;
        let labels: Vec<String> = doctors
            .iter()
            .map(|doctor| format!("{} - {}", doctor.name, doctor.time))
            .collect();

        let title = format!("Doctors Available for {specialty} on {day}");
        let choice = self.choose(&title, &labels, "b", "Go Back")?;
        Ok(choice.map(|choice| match choice {
            Choice::Item(index) => {
                self.doctor = Some(doctors.swap_remove(index));
                Action::Select
            }
            Choice::Back => Action::Back,
        }))
    }

    fn enter_details(&mut self) -> Result<Option<Action>> {
        let Some(doctor) = self.doctor.clone() else {
            return Err(Error::internal("no doctor selected"));
        };

        loop {
            let items = [format!(
                "Enter details for {} at {} on {}",
                doctor.name, doctor.time, doctor.day
            )];
            match self.choose("Enter Your Details", &items, "b", "Go Back")? {
                None => return Ok(None),
                Some(Choice::Back) => return Ok(Some(Action::Back)),
                Some(Choice::Item(_)) => {}
            }

            let Some(patient) = self.read_patient()? else {
                return Ok(None);
            };
            match self.service.book_appointment(&doctor, patient) {
                Ok(_) => {
                    writeln!(self.output, "Appointment booked successfully!")?;
                    return Ok(Some(Action::Submit));
                }
                Err(err) if err.is_recoverable() => writeln!(self.output, "{err}")?,
                Err(err) => return Err(err),
            }
        }
    }

    fn view_form(&mut self) -> Result<Option<Action>> {
        let items = ["Check Appointments".to_string()];
        match self.choose("View Appointments", &items, "b", "Go Back")? {
            None => return Ok(None),
            Some(Choice::Back) => return Ok(Some(Action::Back)),
            Some(Choice::Item(_)) => {}
        }

        let Some(name) = self.prompt("Enter Your Name")? else {
            return Ok(None);
        };
        let Some(telephone) = self.prompt("Enter Your Telephone")? else {
            return Ok(None);
        };
        let (name, telephone) = (name.trim(), telephone.trim());
        if name.is_empty() {
            writeln!(self.output, "Name is required!")?;
            return Ok(Some(Action::Submit));
        }

        let appointments = self.service.find_appointments_by_telephone(telephone)?;
        if appointments.is_empty() {
            writeln!(self.output, "No appointments found for this name.")?;
        } else {
            writeln!(self.output, "Appointments for {name}:")?;
            for appointment in &appointments {
                writeln!(self.output, "  {}", format_appointment(appointment))?;
            }
        }
        Ok(Some(Action::Submit))
    }

    fn cancel_form(&mut self) -> Result<Option<Action>> {
        let items = ["Cancel Appointments".to_string()];
        match self.choose("Cancel an Appointment", &items, "b", "Go Back")? {
            None => return Ok(None),
            Some(Choice::Back) => return Ok(Some(Action::Back)),
            Some(Choice::Item(_)) => {}
        }

        let mut values = Vec::with_capacity(3);
        for label in ["Enter Your Name", "Enter Your Age", "Enter Your Telephone"] {
            let Some(value) = self.prompt(label)? else {
                return Ok(None);
            };
            values.push(value.trim().to_string());
        }
        if values.iter().any(String::is_empty) {
            writeln!(self.output, "All fields are required!")?;
            return Ok(Some(Action::Submit));
        }

        let removed = self.service.cancel_appointments_by_telephone(&values[2])?;
        writeln!(
            self.output,
            "Appointments canceled successfully! ({removed} removed)"
        )?;
        Ok(Some(Action::Submit))
    }

    fn read_patient(&mut self) -> Result<Option<PatientDetails>> {
        let mut fields = Vec::with_capacity(5);
        for label in ["Name", "Age", "Email", "Sex", "Telephone"] {
            match self.prompt(label)? {
                Some(value) => fields.push(value),
                None => return Ok(None),
            }
        }
        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        Ok(Some(PatientDetails {
            name: next(),
            age: next(),
            email: next(),
            sex: next(),
            telephone: next(),
        }))
    }

    /// Show a numbered list and read a choice. `None` means input ended.
    fn choose(
        &mut self,
        title: &str,
        items: &[String],
        back_key: &str,
        back_label: &str,
    ) -> Result<Option<Choice>> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{title}")?;
            if items.is_empty() {
                writeln!(self.output, "  (none available)")?;
            }
            for (index, item) in items.iter().enumerate() {
                writeln!(self.output, "  {}) {item}", index + 1)?;
            }
            writeln!(self.output, "  {back_key}) {back_label}")?;

            let Some(answer) = self.prompt(">")? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if answer.eq_ignore_ascii_case(back_key) {
                return Ok(Some(Choice::Back));
            }
            match answer.parse::<usize>() {
                Ok(number) if (1..=items.len()).contains(&number) => {
                    return Ok(Some(Choice::Item(number - 1)));
                }
                _ => writeln!(self.output, "Invalid choice: {answer}")?,
            }
        }
    }

    /// Print `label` and read one line without its terminator.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label} ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{RecordStore, StoreLocation};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn create_test_service() -> (TempDir, AppointmentService) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(StoreLocation::in_dir(dir.path()));
        store.initialize().unwrap();
        std::fs::write(
            &store.location().doctors,
            "1,A,Cardio,9am,Mon\n2,B,Cardio,10am,Tue\n3,C,Derm,9am,Mon\n",
        )
        .unwrap();
        (dir, AppointmentService::new(store))
    }

    fn run_session(service: &AppointmentService, script: &str) -> String {
        let mut output = Vec::new();
        let mut session = Session::new(service, Cursor::new(script.as_bytes()), &mut output);
        session.run().unwrap();
        assert_eq!(session.screen(), Screen::Exit);
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_quit_immediately() {
        let (_dir, service) = create_test_service();
        let output = run_session(&service, "q\n");
        assert!(output.contains("Book an Appointment"));
        assert!(output.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_dir, service) = create_test_service();
        let output = run_session(&service, "1\n");
        assert!(output.contains("Select a Specialty"));
        assert!(output.contains("Goodbye."));
    }

    #[test]
    fn test_book_through_menus() {
        let (_dir, service) = create_test_service();
        // Book -> Cardio -> Mon -> A 9am -> enter details -> quit
        let script = "1\n1\n1\n1\n1\nJane\n34\njane@example.com\nF\n555-1234\nq\n";
        let output = run_session(&service, script);

        assert!(output.contains("Doctors Available for Cardio on Mon"));
        assert!(output.contains("A - 9am"));
        assert!(output.contains("Appointment booked successfully!"));

        let stored = service.store().load_appointments().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].doctor_name, "A");
        assert_eq!(stored[0].telephone, "555-1234");
    }

    #[test]
    fn test_missing_field_reprompts() {
        let (_dir, service) = create_test_service();
        let script = "1\n2\n1\n1\n1\nJane\n\nj@x\nF\n555\nb\nq\n";
        let output = run_session(&service, script);

        assert!(output.contains("missing required field: age"));
        assert!(service.store().load_appointments().unwrap().is_empty());
    }

    #[test]
    fn test_slot_taken_is_reported() {
        let (_dir, service) = create_test_service();
        let doctor = Doctor::new("3", "C", "Derm", "9am", "Mon");
        service
            .book_appointment(
                &doctor,
                PatientDetails {
                    name: "Ann".to_string(),
                    age: "50".to_string(),
                    email: "ann@x".to_string(),
                    ..PatientDetails::default()
                },
            )
            .unwrap();

        let script = "1\n2\n1\n1\n1\nJane\n34\nj@x\nF\n555\nb\nq\n";
        let output = run_session(&service, script);

        assert!(output.contains("already booked with Dr. C at 9am on Mon"));
        assert_eq!(service.store().load_appointments().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_choice_is_repeated() {
        let (_dir, service) = create_test_service();
        let output = run_session(&service, "7\nzzz\nq\n");
        assert!(output.contains("Invalid choice: 7"));
        assert!(output.contains("Invalid choice: zzz"));
    }

    #[test]
    fn test_go_back_from_day_selection() {
        let (_dir, service) = create_test_service();
        let output = run_session(&service, "1\n1\nb\nq\n");
        assert!(output.contains("Select a Day of the Week"));
        assert_eq!(output.matches("Doctor Appointment Scheduler").count(), 2);
    }

    #[test]
    fn test_view_and_cancel() {
        let (_dir, service) = create_test_service();
        let doctor = Doctor::new("1", "A", "Cardio", "9am", "Mon");
        service
            .book_appointment(
                &doctor,
                PatientDetails {
                    name: "Jane".to_string(),
                    age: "34".to_string(),
                    email: "j@x".to_string(),
                    sex: "F".to_string(),
                    telephone: "555-ABC".to_string(),
                },
            )
            .unwrap();

        let script = "2\n1\nJane\n555-abc\nb\n3\n1\nJane\n34\n555-abc\nb\n2\n1\nJane\n555-abc\nb\nq\n";
        let output = run_session(&service, script);

        assert!(output.contains("Appointments for Jane:"));
        assert!(output.contains("Doctor: A, Specialty: Cardio, Time: 9am, Day: Mon"));
        assert!(output.contains("(1 removed)"));
        assert!(output.contains("No appointments found for this name."));
        assert!(service.store().load_appointments().unwrap().is_empty());
    }

    #[test]
    fn test_view_requires_name() {
        let (_dir, service) = create_test_service();
        let output = run_session(&service, "2\n1\n\n555\nb\nq\n");
        assert!(output.contains("Name is required!"));
    }

    #[test]
    fn test_cancel_requires_all_fields() {
        let (_dir, service) = create_test_service();
        let output = run_session(&service, "3\n1\nJane\n\n555\nb\nq\n");
        assert!(output.contains("All fields are required!"));
    }
}
