//! On-disk layout of the medbook data files.
//!
//! The doctors file has no header. The appointments file starts with a fixed
//! header row whose column order must not change.

/// Header row of the appointments file, in column order.
pub const APPOINTMENT_HEADER: [&str; 10] = [
    "name",
    "age",
    "E-mail",
    "Sex: M/F",
    "Telephone",
    "Doctor ID",
    "Doctor_Name",
    "Doctor_Specialty",
    "Doctor_Time",
    "Day",
];

/// Column index of the telephone field in the appointments file.
pub const TELEPHONE_COLUMN: usize = 4;

/// Default doctors file name inside the data directory.
pub const DOCTORS_FILE_NAME: &str = "Doctors.csv";

/// Default appointments file name inside the data directory.
pub const APPOINTMENTS_FILE_NAME: &str = "Data.csv";

/// Compare a header row against [`APPOINTMENT_HEADER`].
///
/// Field names are trimmed before comparison. Returns a description of the
/// first difference, or `None` if the header matches.
pub fn header_mismatch<'a>(found: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let found: Vec<&str> = found.into_iter().map(str::trim).collect();

    if found.len() != APPOINTMENT_HEADER.len() {
        return Some(format!(
            "expected {} header fields, found {} ({})",
            APPOINTMENT_HEADER.len(),
            found.len(),
            found.join(",")
        ));
    }

    APPOINTMENT_HEADER
        .iter()
        .zip(&found)
        .position(|(expected, actual)| expected != actual)
        .map(|column| {
            format!(
                "header column {} is '{}', expected '{}'",
                column + 1,
                found[column],
                APPOINTMENT_HEADER[column]
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_has_ten_columns() {
        assert_eq!(APPOINTMENT_HEADER.len(), 10);
        assert_eq!(APPOINTMENT_HEADER[TELEPHONE_COLUMN], "Telephone");
    }

    #[test]
    fn test_header_matches_itself() {
        assert!(header_mismatch(APPOINTMENT_HEADER).is_none());
    }

    #[test]
    fn test_header_trims_whitespace() {
        let padded: Vec<String> = APPOINTMENT_HEADER.iter().map(|h| format!(" {h} ")).collect();
        assert!(header_mismatch(padded.iter().map(String::as_str)).is_none());
    }

    #[test]
    fn test_header_wrong_length() {
        let msg = header_mismatch(["name", "age"]).unwrap();
        assert!(msg.contains("expected 10 header fields, found 2"));
    }

    #[test]
    fn test_header_wrong_order() {
        let mut swapped = APPOINTMENT_HEADER;
        swapped.swap(0, 1);
        let msg = header_mismatch(swapped).unwrap();
        assert!(msg.contains("column 1"));
        assert!(msg.contains("'age'"));
    }

    #[test]
    fn test_header_is_case_sensitive() {
        let mut lowered = APPOINTMENT_HEADER;
        lowered[4] = "telephone";
        assert!(header_mismatch(lowered).is_some());
    }
}
