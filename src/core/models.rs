use std::{
    fmt,
    str::FromStr,
};

use chrono::{
    Days,
    Months,
    NaiveDate,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{
    Deserialize,
    Serialize,
};

use super::FarmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Bengali,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Bengali];

    /// Two-letter code used as a voice language prefix.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Bengali => "bn",
        }
    }

    pub fn regional_tag(&self) -> &'static str {
        match self {
            Language::English => "en-IN",
            Language::Hindi => "hi-IN",
            Language::Bengali => "bn-IN",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Bengali => "bengali",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Language::English => 0,
            Language::Hindi => 1,
            Language::Bengali => 2,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = FarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" | "en-in" => Ok(Language::English),
            "hindi" | "hi" | "hi-in" => Ok(Language::Hindi),
            "bengali" | "bn" | "bn-in" | "bangla" => Ok(Language::Bengali),
            other => Err(FarmError::Custom(format!("Unsupported language: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionStatus {
    #[default]
    Pending,
    Verified,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Prescription {
    pub veterinarian_name: String,
    pub animal_id: String,
    pub drug_name: String,
    pub issue_date: String, // YYYY-MM-DD
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub notes: String,
    pub source_image: Option<String>,
    #[serde(default)]
    pub status: PrescriptionStatus,
}

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(days?|d\b|weeks?|wks?|months?)").expect("duration pattern")
});

impl Prescription {
    pub fn issued_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.issue_date, "%Y-%m-%d").ok()
    }

    /// Last day the prescription covers, when both the issue date and the
    /// duration can be read.
    pub fn expires_on(&self) -> Option<NaiveDate> {
        let issued = self.issued_on()?;
        let captures = DURATION_RE.captures(&self.duration)?;
        let amount: u32 = captures.get(1)?.as_str().parse().ok()?;
        let unit = captures.get(2)?.as_str().to_lowercase();

        if unit.starts_with('m') {
            issued.checked_add_months(Months::new(amount))
        } else if unit.starts_with('w') {
            issued.checked_add_days(Days::new(u64::from(amount) * 7))
        } else {
            issued.checked_add_days(Days::new(u64::from(amount)))
        }
    }

    pub fn refresh_status(&mut self, today: NaiveDate) -> PrescriptionStatus {
        if let Some(end) = self.expires_on() {
            if today > end {
                self.status = PrescriptionStatus::Expired;
            }
        }
        self.status
    }

    pub fn verify(&mut self) {
        if self.status == PrescriptionStatus::Pending {
            self.status = PrescriptionStatus::Verified;
        }
    }
}
