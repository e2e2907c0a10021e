//! Default dataset fetch (data.gov.tw 運動現況統計資料).

use reqwest::blocking::Client;

use crate::domain::ParseMode;
use crate::error::AppError;
use crate::io::ingest::{IngestedData, read_records};

/// CSV download endpoint for dataset #24375 (運動現況統計資料).
const DEFAULT_DATA_URL: &str = "https://quality.data.gov.tw/dl_csv.php?nid=24375";

/// Environment variable overriding the dataset URL (a `.env` file is honored).
const DATA_URL_ENV: &str = "SPORTVIZ_DATA_URL";

pub struct DatasetClient {
    client: Client,
    url: String,
}

impl DatasetClient {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let url = std::env::var(DATA_URL_ENV).unwrap_or_else(|_| DEFAULT_DATA_URL.to_string());
        Self::with_url(url)
    }

    pub fn with_url(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and ingest the default dataset.
    ///
    /// Transport failures and non-2xx statuses surface as a single error;
    /// nothing is retried. Callers decide whether that degrades (TUI keeps an
    /// empty dataset and prompts for a local file) or aborts (scripted
    /// subcommands).
    pub fn fetch_dataset(&self, mode: ParseMode) -> Result<IngestedData, AppError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::runtime(format!("Dataset request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Dataset request failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| AppError::runtime(format!("Failed to read dataset response: {e}")))?;

        read_records(body.as_ref(), mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_wins_over_default() {
        let client = DatasetClient::with_url("http://localhost:9/data.csv".to_string());
        assert_eq!(client.url(), "http://localhost:9/data.csv");
    }
}
