use chrono::NaiveDate;
use reqwest::{
    Client,
    Method,
    RequestBuilder,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use super::entities::{
    Alert,
    AmuEntry,
    Animal,
    Antimicrobial,
    Contaminant,
    FoodSafetySample,
    PrescriptionRow,
    Profile,
    Record,
    TestResult,
    TestStatus,
};
use crate::core::{
    http::{
        ensure_success,
        http_client,
    },
    AppConfig,
    FarmError,
    Prescription,
    PrescriptionStatus,
};

/// Counts shown on the dashboard landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub animals: usize,
    pub amu_entries: usize,
    pub active_withdrawals: usize,
    pub unread_alerts: usize,
    pub pending_prescriptions: usize,
    pub failed_tests: usize,
}

/// REST client for the hosted database, PostgREST conventions.
pub struct DatabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl DatabaseClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, FarmError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: None,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FarmError> {
        config.require_database()?;
        Self::new(&config.database_url, &config.database_key)
    }

    /// Signed-in user's session token; the anon key is used otherwise.
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Token sent as the bearer credential: the session token when set, else the anon key.
    pub fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.rest_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer_token())
    }

    /// All rows of `R` owned by `user_id`.
    pub async fn select<R: Record>(&self, user_id: &Uuid) -> Result<Vec<R>, FarmError> {
        self.select_where(&[(R::OWNER_COLUMN, format!("eq.{user_id}"))]).await
    }

    /// Rows of `R` matching raw PostgREST filters, e.g. `("is_read", "eq.false")`.
    pub async fn select_where<R: Record>(
        &self,
        filters: &[(&str, String)],
    ) -> Result<Vec<R>, FarmError> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(filters.iter().cloned());

        tracing::debug!("SELECT {} {:?}", R::TABLE, filters);

        let response = self.request(Method::GET, R::TABLE).query(&query).send().await?;
        let rows: Vec<R> = ensure_success(response).await?.json().await?;
        Ok(rows)
    }

    /// Inserts `row` and returns it as stored, with generated columns filled in.
    pub async fn insert<R: Record>(&self, row: &R) -> Result<R, FarmError> {
        tracing::debug!("INSERT {}", R::TABLE);

        let response = self
            .request(Method::POST, R::TABLE)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let mut rows: Vec<R> = ensure_success(response).await?.json().await?;
        if rows.is_empty() {
            return Err(FarmError::Custom(format!("Insert into {} returned no rows", R::TABLE)));
        }
        Ok(rows.swap_remove(0))
    }

    /// Applies `patch` to the row with primary key `id`, returning updated rows.
    pub async fn update<R: Record>(
        &self,
        id: &Uuid,
        patch: &serde_json::Value,
    ) -> Result<Vec<R>, FarmError> {
        tracing::debug!("UPDATE {} id={} {}", R::TABLE, id, patch);

        let response = self
            .request(Method::PATCH, R::TABLE)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;

        let rows: Vec<R> = ensure_success(response).await?.json().await?;
        Ok(rows)
    }

    // Alerts

    pub async fn fetch_alerts(&self, user_id: &Uuid) -> Result<Vec<Alert>, FarmError> {
        self.select_where(&[
            ("user_id", format!("eq.{user_id}")),
            ("order", "created_at.desc".to_string()),
        ])
        .await
    }

    pub async fn unread_alert_count(&self, user_id: &Uuid) -> Result<usize, FarmError> {
        let unread: Vec<Alert> = self
            .select_where(&[
                ("user_id", format!("eq.{user_id}")),
                ("is_read", "eq.false".to_string()),
            ])
            .await?;
        Ok(unread.len())
    }

    pub async fn mark_alert_read(&self, alert_id: &Uuid) -> Result<(), FarmError> {
        let updated: Vec<Alert> = self.update(alert_id, &json!({ "is_read": true })).await?;
        if updated.is_empty() {
            tracing::warn!("Alert {} not found while marking read", alert_id);
        }
        Ok(())
    }

    pub async fn create_alert(&self, alert: &Alert) -> Result<Alert, FarmError> {
        self.insert(alert).await
    }

    // Records

    pub async fn fetch_animals(&self, user_id: &Uuid) -> Result<Vec<Animal>, FarmError> {
        self.select(user_id).await
    }

    pub async fn fetch_antimicrobials(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<Antimicrobial>, FarmError> {
        self.select(user_id).await
    }

    pub async fn fetch_amu_entries(&self, user_id: &Uuid) -> Result<Vec<AmuEntry>, FarmError> {
        self.select_where(&[
            ("user_id", format!("eq.{user_id}")),
            ("order", "administered_on.desc".to_string()),
        ])
        .await
    }

    pub async fn record_amu_entry(&self, entry: &AmuEntry) -> Result<AmuEntry, FarmError> {
        self.insert(entry).await
    }

    /// AMU entries whose withdrawal period has not ended on `today`.
    pub async fn active_withdrawals(
        &self,
        user_id: &Uuid,
        today: NaiveDate,
    ) -> Result<Vec<AmuEntry>, FarmError> {
        let entries = self.fetch_amu_entries(user_id).await?;
        Ok(entries.into_iter().filter(|entry| entry.in_withdrawal(today)).collect())
    }

    pub async fn fetch_prescriptions(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PrescriptionRow>, FarmError> {
        self.select(user_id).await
    }

    pub async fn save_prescription(
        &self,
        user_id: &Uuid,
        prescription: &Prescription,
    ) -> Result<PrescriptionRow, FarmError> {
        let row = PrescriptionRow::new(*user_id, prescription.clone());
        let saved = self.insert(&row).await?;
        tracing::info!(
            "Saved prescription {} for animal '{}'",
            saved.id.map(|id| id.to_string()).unwrap_or_default(),
            saved.prescription.animal_id
        );
        Ok(saved)
    }

    pub async fn set_prescription_status(
        &self,
        prescription_id: &Uuid,
        status: PrescriptionStatus,
    ) -> Result<Vec<PrescriptionRow>, FarmError> {
        self.update(prescription_id, &json!({ "status": status })).await
    }

    pub async fn fetch_profile(&self, user_id: &Uuid) -> Result<Option<Profile>, FarmError> {
        let profiles: Vec<Profile> = self.select(user_id).await?;
        Ok(profiles.into_iter().next())
    }

    pub async fn fetch_samples(&self, user_id: &Uuid) -> Result<Vec<FoodSafetySample>, FarmError> {
        self.select(user_id).await
    }

    pub async fn fetch_contaminants(&self, user_id: &Uuid) -> Result<Vec<Contaminant>, FarmError> {
        self.select(user_id).await
    }

    pub async fn fetch_test_results(&self, user_id: &Uuid) -> Result<Vec<TestResult>, FarmError> {
        self.select(user_id).await
    }

    pub async fn record_test_result(&self, result: &TestResult) -> Result<TestResult, FarmError> {
        let mut result = result.clone();
        result.status = result.compliance();
        if result.status == TestStatus::Failed {
            tracing::warn!(
                "{} measured {} {} exceeds MRL {}",
                result.contaminant_name,
                result.measured_value,
                result.unit,
                result.mrl
            );
        }
        self.insert(&result).await
    }

    /// Loads every dashboard count concurrently; any failed request fails the summary.
    pub async fn dashboard_summary(
        &self,
        user_id: &Uuid,
        today: NaiveDate,
    ) -> Result<DashboardSummary, FarmError> {
        let (animals, amu_entries, unread_alerts, prescriptions, results) = futures::try_join!(
            self.fetch_animals(user_id),
            self.fetch_amu_entries(user_id),
            self.unread_alert_count(user_id),
            self.fetch_prescriptions(user_id),
            self.fetch_test_results(user_id),
        )?;

        Ok(DashboardSummary {
            animals: animals.len(),
            amu_entries: amu_entries.len(),
            active_withdrawals: amu_entries.iter().filter(|e| e.in_withdrawal(today)).count(),
            unread_alerts,
            pending_prescriptions: prescriptions
                .iter()
                .filter(|row| row.prescription.status == PrescriptionStatus::Pending)
                .count(),
            failed_tests: results.iter().filter(|r| !r.within_mrl()).count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_url_trims_slash() {
        let client = DatabaseClient::new("https://farm.example.co/", "anon").unwrap();
        assert_eq!(client.rest_url("alerts"), "https://farm.example.co/rest/v1/alerts");
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = AppConfig::default();
        assert!(matches!(DatabaseClient::from_config(&config), Err(FarmError::Config(_))));
    }
}
