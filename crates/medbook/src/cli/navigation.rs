//! Screen graph for the interactive session.
//!
//! The session moves between a fixed set of screens. Every allowed move is
//! listed in [`Screen::next`]; anything else is rejected.

use std::fmt;

/// A screen of the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Top-level menu.
    MainMenu,
    /// Pick a specialty to book with.
    SelectSpecialty,
    /// Pick a day for the chosen specialty.
    SelectDay,
    /// Pick a doctor slot for the chosen specialty and day.
    SelectDoctor,
    /// Enter patient details and book.
    EnterDetails,
    /// Look up appointments by telephone.
    ViewForm,
    /// Cancel appointments by telephone.
    CancelForm,
    /// Session finished.
    Exit,
}

/// What the user did on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start a booking.
    Book,
    /// Open the view form.
    View,
    /// Open the cancel form.
    Cancel,
    /// Picked an item from a list.
    Select,
    /// Submitted a form.
    Submit,
    /// Go back to the main menu.
    Back,
    /// Leave the session.
    Quit,
}

impl Screen {
    /// The screen reached by taking `action` here, if that move exists.
    #[must_use]
    pub fn next(self, action: Action) -> Option<Self> {
        use Action as A;
        use Screen as S;

        match (self, action) {
            (S::MainMenu, A::Book) => Some(S::SelectSpecialty),
            (S::MainMenu, A::View) => Some(S::ViewForm),
            (S::MainMenu, A::Cancel) => Some(S::CancelForm),
            (S::MainMenu, A::Quit) => Some(S::Exit),

            (S::SelectSpecialty, A::Select) => Some(S::SelectDay),
            (S::SelectDay, A::Select) => Some(S::SelectDoctor),
            (S::SelectDoctor, A::Select) => Some(S::EnterDetails),
            (S::EnterDetails, A::Submit) => Some(S::MainMenu),

            (S::ViewForm, A::Submit) => Some(S::ViewForm),
            (S::CancelForm, A::Submit) => Some(S::CancelForm),

            (
                S::SelectSpecialty
                | S::SelectDay
                | S::SelectDoctor
                | S::EnterDetails
                | S::ViewForm
                | S::CancelForm,
                A::Back,
            ) => Some(S::MainMenu),

            _ => None,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MainMenu => "main menu",
            Self::SelectSpecialty => "select specialty",
            Self::SelectDay => "select day",
            Self::SelectDoctor => "select doctor",
            Self::EnterDetails => "enter details",
            Self::ViewForm => "view appointments",
            Self::CancelForm => "cancel appointments",
            Self::Exit => "exit",
        };
        f.write_str(name)
    }
}
