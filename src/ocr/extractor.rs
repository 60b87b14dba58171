use chrono::{
    Local,
    NaiveDate,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::{
    Prescription,
    PrescriptionStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    VeterinarianName,
    AnimalId,
    DrugName,
    IssueDate,
    Dosage,
    Frequency,
    Duration,
    Notes,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::VeterinarianName,
        Field::AnimalId,
        Field::DrugName,
        Field::IssueDate,
        Field::Dosage,
        Field::Frequency,
        Field::Duration,
        Field::Notes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::VeterinarianName => "veterinarian_name",
            Field::AnimalId => "animal_id",
            Field::DrugName => "drug_name",
            Field::IssueDate => "issue_date",
            Field::Dosage => "dosage",
            Field::Frequency => "frequency",
            Field::Duration => "duration",
            Field::Notes => "notes",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Field::VeterinarianName => &VETERINARIAN_RE,
            Field::AnimalId => &ANIMAL_ID_RE,
            Field::DrugName => &DRUG_RE,
            Field::IssueDate => &DATE_RE,
            Field::Dosage => &DOSAGE_RE,
            Field::Frequency => &FREQUENCY_RE,
            Field::Duration => &DURATION_RE,
            Field::Notes => &NOTES_RE,
        }
    }
}

fn label_pattern(label: &str) -> Regex {
    // Label word, optional separator, then the rest of the line
    Regex::new(&format!(r"(?i)\b(?:{label})\b\.?\s*[:#\-]?[ \t]*([^\n\r]+)"))
        .expect("field label pattern")
}

static VETERINARIAN_RE: Lazy<Regex> =
    Lazy::new(|| label_pattern(r"veterinarian(?:\s+name)?|vet(?:\s+name)?|doctor|dr"));
static ANIMAL_ID_RE: Lazy<Regex> = Lazy::new(|| {
    // A bare "animal" or "tag" only counts as a label when a separator follows
    Regex::new(
        r"(?i)\b(?:(?:animal\s*(?:id|no)|tag\s*(?:no|id))\b\.?\s*[:#\-]?|(?:animal|tag)\b\s*[:#\-])\s*([A-Za-z0-9][A-Za-z0-9\-/]*)",
    )
    .expect("animal id pattern")
});
static DRUG_RE: Lazy<Regex> =
    Lazy::new(|| label_pattern(r"drug(?:\s+name)?|medicine|medication|rx"));
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:issue\s+date|date)\b\s*[:\-]?\s*(\d{1,4}[/\-.]\d{1,2}[/\-.]\d{1,4})")
        .expect("date pattern")
});
static DOSAGE_RE: Lazy<Regex> = Lazy::new(|| label_pattern(r"dosage|dose"));
static FREQUENCY_RE: Lazy<Regex> = Lazy::new(|| label_pattern(r"frequency|freq"));
static DURATION_RE: Lazy<Regex> = Lazy::new(|| label_pattern(r"duration"));
static NOTES_RE: Lazy<Regex> = Lazy::new(|| label_pattern(r"notes?|remarks?|instructions?"));

// A following "Label:" ends the current field's run on single-line OCR output
static NEXT_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:veterinarian|vet|doctor|animal\s*id|animal\s*no|animal|tag|drug(?:\s+name)?|medicine|medication|issue\s+date|date|dosage|dose|frequency|freq|duration|notes?|remarks?|instructions?)\b\s*[:#]",
    )
    .expect("next label pattern")
});

static HONORIFIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:dr\.?|doctor)\s+").expect("honorific pattern"));

const YEAR_FIRST_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

/// Result of running the extractor: the record plus which fields actually matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub prescription: Prescription,
    pub matched: Vec<Field>,
}

impl Extraction {
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL.iter().copied().filter(|f| !self.matched.contains(f)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

pub fn extract_prescription(text: &str) -> Extraction {
    extract_prescription_on(text, Local::now().date_naive())
}

/// Same as [`extract_prescription`] with an explicit "today" for the issue date default.
pub fn extract_prescription_on(text: &str, today: NaiveDate) -> Extraction {
    let mut matched = Vec::new();
    let mut capture = |field: Field| -> String {
        match capture_field(field, text) {
            Some(value) => {
                matched.push(field);
                value
            }
            None => String::new(),
        }
    };

    let veterinarian_name = capture(Field::VeterinarianName);
    let animal_id = capture(Field::AnimalId);
    let drug_name = capture(Field::DrugName);
    let issue_date = capture(Field::IssueDate);
    let dosage = capture(Field::Dosage);
    let frequency = capture(Field::Frequency);
    let duration = capture(Field::Duration);
    let notes = capture(Field::Notes);

    let issue_date = if issue_date.is_empty() {
        today.format("%Y-%m-%d").to_string()
    } else {
        normalize_date(&issue_date).unwrap_or(issue_date)
    };

    tracing::debug!("Extracted {} of {} prescription fields", matched.len(), Field::ALL.len());

    Extraction {
        prescription: Prescription {
            veterinarian_name,
            animal_id,
            drug_name,
            issue_date,
            dosage,
            frequency,
            duration,
            notes,
            source_image: None,
            status: PrescriptionStatus::Pending,
        },
        matched,
    }
}

fn capture_field(field: Field, text: &str) -> Option<String> {
    let captures = field.pattern().captures(text)?;
    let raw = captures.get(1)?.as_str();

    let mut value = match NEXT_LABEL_RE.find(raw) {
        Some(next) => &raw[..next.start()],
        None => raw,
    }
    .trim()
    .trim_end_matches([',', ';'])
    .trim()
    .to_string();

    if field == Field::VeterinarianName {
        value = HONORIFIC_RE.replace(&value, "").trim().to_string();
    }

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn normalize_date(raw: &str) -> Option<String> {
    // `%Y` also accepts two digits, so the format set is picked by year width
    let parts: Vec<&str> = raw.split(['/', '-', '.']).collect();
    let formats = match parts.as_slice() {
        [year, _, _] if year.len() == 4 => YEAR_FIRST_FORMATS,
        [_, _, year] if year.len() == 4 => DAY_FIRST_FORMATS,
        [_, _, year] if year.len() == 2 => SHORT_YEAR_FORMATS,
        _ => return None,
    };

    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_single_line_ocr() {
        let extraction = extract_prescription_on(
            "Dr. Jane Smith Animal ID: COW-023 Dosage: 5ml twice daily",
            today(),
        );
        let rx = &extraction.prescription;

        assert!(rx.veterinarian_name.contains("Jane Smith"));
        assert_eq!(rx.animal_id, "COW-023");
        assert!(rx.dosage.contains("5ml"));
        assert_eq!(rx.status, PrescriptionStatus::Pending);
        assert!(extraction.matched.contains(&Field::Dosage));
    }

    #[test]
    fn test_multi_line_prescription() {
        let text = "VETERINARY PRESCRIPTION\n\
                    Veterinarian: Dr. Arjun Rao\n\
                    Animal ID: BUF-117\n\
                    Drug Name: Oxytetracycline LA  \n\
                    Date: 03/04/2024\n\
                    Dosage: 20 mg/kg IM\n\
                    Frequency: once daily\n\
                    Duration: 5 days\n\
                    Notes: milk withdrawal 7 days\n";

        let extraction = extract_prescription_on(text, today());
        let rx = &extraction.prescription;

        assert_eq!(rx.veterinarian_name, "Arjun Rao");
        assert_eq!(rx.animal_id, "BUF-117");
        assert_eq!(rx.drug_name, "Oxytetracycline LA");
        assert_eq!(rx.issue_date, "2024-04-03");
        assert_eq!(rx.dosage, "20 mg/kg IM");
        assert_eq!(rx.frequency, "once daily");
        assert_eq!(rx.duration, "5 days");
        assert_eq!(rx.notes, "milk withdrawal 7 days");
        assert!(extraction.missing_fields().is_empty());
    }

    #[test]
    fn test_no_labels_defaults() {
        let extraction = extract_prescription_on("smudged scan, nothing legible", today());
        let rx = &extraction.prescription;

        assert_eq!(rx.veterinarian_name, "");
        assert_eq!(rx.animal_id, "");
        assert_eq!(rx.drug_name, "");
        assert_eq!(rx.dosage, "");
        assert_eq!(rx.frequency, "");
        assert_eq!(rx.duration, "");
        assert_eq!(rx.notes, "");
        assert_eq!(rx.issue_date, "2024-06-15");
        assert!(extraction.is_empty());
        assert_eq!(extraction.missing_fields().len(), Field::ALL.len());
    }

    #[test]
    fn test_first_match_wins() {
        let text = "Dosage: 10 ml\nDosage: 99 ml";
        let extraction = extract_prescription_on(text, today());
        assert_eq!(extraction.prescription.dosage, "10 ml");
    }

    #[test]
    fn test_unparseable_date_is_kept() {
        let extraction = extract_prescription_on("Date: 45/13/2024", today());
        assert_eq!(extraction.prescription.issue_date, "45/13/2024");
        assert!(extraction.matched.contains(&Field::IssueDate));
    }

    #[test]
    fn test_two_digit_years() {
        let slashes = extract_prescription_on("Date: 03/04/24", today());
        assert_eq!(slashes.prescription.issue_date, "2024-04-03");

        let dots = extract_prescription_on("Date: 03.04.24", today());
        assert_eq!(dots.prescription.issue_date, "2024-04-03");

        let full = extract_prescription_on("Issue Date: 2024/04/03", today());
        assert_eq!(full.prescription.issue_date, "2024-04-03");
    }

    #[test]
    fn test_animal_word_in_header_is_not_a_label() {
        let clinic = extract_prescription_on("Sunrise animal health clinic\nAnimal ID: COW-9", today());
        assert_eq!(clinic.prescription.animal_id, "COW-9");

        let tag = extract_prescription_on("Animal species: cattle\nTag No: BUF-2", today());
        assert_eq!(tag.prescription.animal_id, "BUF-2");

        let bare = extract_prescription_on("Animal: GOAT-14", today());
        assert_eq!(bare.prescription.animal_id, "GOAT-14");
    }

    #[test]
    fn test_case_insensitive_labels() {
        let extraction = extract_prescription_on("DOSAGE - 2 tablets\nfrequency: BID", today());
        assert_eq!(extraction.prescription.dosage, "2 tablets");
        assert_eq!(extraction.prescription.frequency, "BID");
    }
}
