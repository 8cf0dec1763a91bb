//! Supabase (PostgREST) table store.
//!
//! Reads go through `GET /rest/v1/{table}?select=*&order={col}.desc&limit={n}`,
//! writes through `POST /rest/v1/{table}` with a JSON array body. Yearly
//! alignment rows are upserted on `year` with duplicates ignored.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::StoreConfig;
use crate::data::{DatasetProvider, RecordSink};
use crate::domain::{
    AnnualTarget, Co2IntensityRecord, GenerationMixRecord, NetZeroAlignmentRecord, RawGenerationRow,
    RawIntensityRow,
};
use crate::error::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
    table_co2_intensity: String,
    table_generation_mix: String,
    table_netzero_alignment: String,
}

impl SupabaseClient {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_config(&StoreConfig::from_env())
    }

    pub fn from_config(store: &StoreConfig) -> Result<Self, AppError> {
        let base_url = store
            .supabase_url
            .clone()
            .ok_or_else(|| AppError::config("Missing SUPABASE_URL in environment (.env)."))?;
        let api_key = store
            .supabase_key
            .clone()
            .ok_or_else(|| AppError::config("Missing SUPABASE_KEY in environment (.env)."))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            table_co2_intensity: store.table_co2_intensity.clone(),
            table_generation_mix: store.table_generation_mix.clone(),
            table_netzero_alignment: store.table_netzero_alignment.clone(),
        })
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    fn fetch_table<T: DeserializeOwned>(&self, table: &str, order_column: &str, limit: usize) -> Result<Vec<T>, AppError> {
        let req = self
            .client
            .get(table_endpoint(&self.base_url, table))
            .query(&select_query(order_column, limit));

        let resp = self
            .authorized(req)
            .send()
            .map_err(|e| AppError::runtime(format!("Supabase request for {table} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Supabase request for {table} failed with status {}.",
                resp.status()
            )));
        }

        let rows: Vec<T> = resp
            .json()
            .map_err(|e| AppError::runtime(format!("Failed to parse Supabase response for {table}: {e}")))?;
        info!(table, rows = rows.len(), "fetched rows");
        Ok(rows)
    }

    fn insert_rows<T: Serialize>(&self, table: &str, rows: &[T], upsert_on: Option<&str>) -> Result<(), AppError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut req = self
            .client
            .post(table_endpoint(&self.base_url, table))
            .header("Prefer", prefer_header(upsert_on.is_some()))
            .json(rows);
        if let Some(column) = upsert_on {
            req = req.query(&[("on_conflict", column)]);
        }

        let resp = self
            .authorized(req)
            .send()
            .map_err(|e| AppError::runtime(format!("Supabase insert into {table} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let details = resp.text().unwrap_or_default();
            return Err(AppError::runtime(format!(
                "Supabase insert into {table} failed with status {status} | details: {details}"
            )));
        }

        info!(table, rows = rows.len(), "inserted rows");
        Ok(())
    }
}

impl DatasetProvider for SupabaseClient {
    fn fetch_intensity(&self, limit: usize) -> Result<Vec<RawIntensityRow>, AppError> {
        self.fetch_table(&self.table_co2_intensity, "timestamp", limit)
    }

    fn fetch_generation(&self, limit: usize) -> Result<Vec<RawGenerationRow>, AppError> {
        self.fetch_table(&self.table_generation_mix, "timestamp", limit)
    }

    fn fetch_targets(&self, limit: usize) -> Result<Vec<AnnualTarget>, AppError> {
        self.fetch_table(&self.table_netzero_alignment, "year", limit)
    }
}

impl RecordSink for SupabaseClient {
    fn write_co2(&self, records: &[Co2IntensityRecord]) -> Result<(), AppError> {
        self.insert_rows(&self.table_co2_intensity, records, None)
    }

    fn write_generation(&self, records: &[GenerationMixRecord]) -> Result<(), AppError> {
        self.insert_rows(&self.table_generation_mix, records, None)
    }

    fn upsert_targets(&self, records: &[NetZeroAlignmentRecord]) -> Result<(), AppError> {
        self.insert_rows(&self.table_netzero_alignment, records, Some("year"))
    }
}

fn table_endpoint(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{table}", base_url.trim_end_matches('/'))
}

fn select_query(order_column: &str, limit: usize) -> [(&'static str, String); 3] {
    [
        ("select", "*".to_string()),
        ("order", format!("{order_column}.desc")),
        ("limit", limit.to_string()),
    ]
}

fn prefer_header(ignore_duplicates: bool) -> &'static str {
    if ignore_duplicates {
        "resolution=ignore-duplicates,return=minimal"
    } else {
        "return=minimal"
    }
}
