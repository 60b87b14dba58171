use chrono::{
    DateTime,
    Days,
    NaiveDate,
    Utc,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};
use uuid::Uuid;

use crate::core::{
    Language,
    Prescription,
};

/// A row type stored in one table of the hosted database.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const TABLE: &'static str;
    /// Column holding the owning user's id.
    const OWNER_COLUMN: &'static str = "user_id";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    WithdrawalPeriod,
    MrlViolation,
    PrescriptionExpiry,
    Compliance,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Cattle,
    Buffalo,
    Goat,
    Sheep,
    Pig,
    Poultry,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Milk,
    Meat,
    Eggs,
    Honey,
    Fish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContaminantType {
    AntibioticResidue,
    Pesticide,
    HeavyMetal,
    Mycotoxin,
    Microbial,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    #[default]
    Pending,
    InProgress,
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Alert {
    const TABLE: &'static str = "alerts";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    /// Ear tag or herd identifier, e.g. `COW-023`.
    pub tag_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub species: Species,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Animal {
    const TABLE: &'static str = "animals";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Antimicrobial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub name: String,
    /// Drug class, e.g. `tetracycline`.
    pub class: String,
    pub withdrawal_days_milk: u32,
    pub withdrawal_days_meat: u32,
    /// Maximum residue limit in mg/kg.
    #[serde(default)]
    pub mrl: Option<f64>,
}

impl Record for Antimicrobial {
    const TABLE: &'static str = "antimicrobials";
}

/// One administered dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmuEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub animal_id: String,
    #[serde(default)]
    pub antimicrobial_id: Option<Uuid>,
    pub drug_name: String,
    pub dosage: String,
    #[serde(default)]
    pub route: String,
    pub administered_on: NaiveDate,
    pub withdrawal_days: u32,
    #[serde(default)]
    pub veterinarian_name: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AmuEntry {
    /// First day the animal's products may enter the food supply again.
    pub fn withdrawal_ends_on(&self) -> Option<NaiveDate> {
        self.administered_on.checked_add_days(Days::new(self.withdrawal_days.into()))
    }

    pub fn in_withdrawal(&self, today: NaiveDate) -> bool {
        match self.withdrawal_ends_on() {
            Some(end) => today >= self.administered_on && today < end,
            None => true,
        }
    }

    /// Days left until the withdrawal period ends, zero once it is over.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        self.withdrawal_ends_on()
            .map(|end| (end - today).num_days().max(0))
            .unwrap_or(0)
    }
}

impl Record for AmuEntry {
    const TABLE: &'static str = "amu_entries";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub prescription: Prescription,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PrescriptionRow {
    pub fn new(user_id: Uuid, prescription: Prescription) -> Self {
        Self { id: None, user_id, prescription, created_at: None }
    }
}

impl Record for PrescriptionRow {
    const TABLE: &'static str = "prescriptions";
}

/// Profiles are keyed by the auth user id itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub farm_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub preferred_language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Profile {
    const TABLE: &'static str = "profiles";
    const OWNER_COLUMN: &'static str = "id";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSafetySample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub sample_code: String,
    pub category: FoodCategory,
    #[serde(default)]
    pub animal_id: Option<String>,
    pub collected_on: NaiveDate,
    #[serde(default)]
    pub lab_name: Option<String>,
    #[serde(default)]
    pub status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for FoodSafetySample {
    const TABLE: &'static str = "food_safety_samples";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contaminant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub name: String,
    pub contaminant_type: ContaminantType,
    pub mrl: f64,
    pub unit: String,
}

impl Record for Contaminant {
    const TABLE: &'static str = "contaminants";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub sample_id: Uuid,
    #[serde(default)]
    pub contaminant_id: Option<Uuid>,
    pub contaminant_name: String,
    pub measured_value: f64,
    pub mrl: f64,
    pub unit: String,
    pub tested_on: NaiveDate,
    #[serde(default)]
    pub status: TestStatus,
}

impl TestResult {
    pub fn within_mrl(&self) -> bool {
        self.measured_value <= self.mrl
    }

    /// Passed or failed against the MRL, regardless of the stored status.
    pub fn compliance(&self) -> TestStatus {
        if self.within_mrl() {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        }
    }

    /// Measured value as a percentage of the limit.
    pub fn mrl_ratio(&self) -> Option<f64> {
        (self.mrl > 0.0).then(|| self.measured_value / self.mrl * 100.0)
    }
}

impl Record for TestResult {
    const TABLE: &'static str = "test_results";
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn amu_entry(administered_on: &str, withdrawal_days: u32) -> AmuEntry {
        AmuEntry {
            id: None,
            user_id: Uuid::nil(),
            animal_id: "COW-023".to_string(),
            antimicrobial_id: None,
            drug_name: "Oxytetracycline".to_string(),
            dosage: "5ml".to_string(),
            route: "IM".to_string(),
            administered_on: date(administered_on),
            withdrawal_days,
            veterinarian_name: None,
            notes: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_withdrawal_window() {
        let entry = amu_entry("2024-03-10", 7);
        assert_eq!(entry.withdrawal_ends_on(), Some(date("2024-03-17")));

        assert!(entry.in_withdrawal(date("2024-03-10")));
        assert!(entry.in_withdrawal(date("2024-03-16")));
        assert!(!entry.in_withdrawal(date("2024-03-17")));
        assert!(!entry.in_withdrawal(date("2024-03-09")));

        assert_eq!(entry.days_remaining(date("2024-03-12")), 5);
        assert_eq!(entry.days_remaining(date("2024-04-01")), 0);
    }

    #[test]
    fn test_zero_day_withdrawal() {
        let entry = amu_entry("2024-03-10", 0);
        assert!(!entry.in_withdrawal(date("2024-03-10")));
    }

    #[test]
    fn test_mrl_compliance() {
        let mut result = TestResult {
            id: None,
            user_id: Uuid::nil(),
            sample_id: Uuid::nil(),
            contaminant_id: None,
            contaminant_name: "Oxytetracycline".to_string(),
            measured_value: 80.0,
            mrl: 100.0,
            unit: "µg/kg".to_string(),
            tested_on: date("2024-03-20"),
            status: TestStatus::Pending,
        };

        assert!(result.within_mrl());
        assert_eq!(result.compliance(), TestStatus::Passed);
        assert_eq!(result.mrl_ratio(), Some(80.0));

        result.measured_value = 100.5;
        assert_eq!(result.compliance(), TestStatus::Failed);

        result.mrl = 0.0;
        assert_eq!(result.mrl_ratio(), None);
    }

    #[test]
    fn test_alert_wire_format() {
        let row = json!({
            "id": "6f1c1f2e-8a43-4a4e-9a57-0b8e6f1d2c11",
            "user_id": "00000000-0000-0000-0000-000000000000",
            "type": "withdrawal_period",
            "title": "Withdrawal ends soon",
            "message": "COW-023 milk can be sold from 17 March",
            "is_read": false,
            "created_at": "2024-03-15T08:30:00+00:00"
        });

        let alert: Alert = serde_json::from_value(row).unwrap();
        assert_eq!(alert.alert_type, AlertType::WithdrawalPeriod);
        assert!(!alert.is_read);

        let new_alert = Alert { id: None, created_at: None, ..alert };
        let body = serde_json::to_value(&new_alert).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["type"], "withdrawal_period");
    }

    #[test]
    fn test_prescription_row_is_flat() {
        let row = PrescriptionRow::new(
            Uuid::nil(),
            Prescription { drug_name: "Amoxicillin".to_string(), ..Default::default() },
        );

        let body = serde_json::to_value(&row).unwrap();
        assert_eq!(body["drug_name"], "Amoxicillin");
        assert_eq!(body["status"], "pending");
        assert_eq!(body["user_id"], "00000000-0000-0000-0000-000000000000");
    }
}
