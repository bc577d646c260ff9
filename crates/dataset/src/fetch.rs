use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use tracing::info;

use crate::error::LoadError;
use crate::parse::{parse_csv, parse_json, LoadOptions};
use crate::table::RecordTable;

pub const OWID_CSV_URL: &str =
    "https://raw.githubusercontent.com/owid/covid-19-data/master/public/data/owid-covid-data.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
}

impl DatasetFormat {
    /// `.json` URLs are read as JSON, everything else as CSV.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.to_ascii_lowercase().ends_with(".json") {
            DatasetFormat::Json
        } else {
            DatasetFormat::Csv
        }
    }
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetFormat::Csv => f.write_str("csv"),
            DatasetFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for DatasetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(DatasetFormat::Csv),
            "json" => Ok(DatasetFormat::Json),
            other => Err(format!("unknown dataset format {other:?}")),
        }
    }
}

/// Where the dataset lives and how to read it.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    pub url: String,
    pub format: DatasetFormat,
    pub options: LoadOptions,
}

impl DatasetSource {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            format: DatasetFormat::from_url(&url),
            url,
            options: LoadOptions::default(),
        }
    }
}

impl Default for DatasetSource {
    fn default() -> Self {
        Self::new(OWID_CSV_URL)
    }
}

/// Downloads and parses the dataset in one go. No retries: any failure is
/// returned to the caller, which is expected to abort.
pub async fn fetch_dataset(
    client: &reqwest::Client,
    source: &DatasetSource,
) -> Result<RecordTable, LoadError> {
    let url = source.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(LoadError::UnsupportedUrl(url.to_string()));
    }

    let started = Instant::now();
    info!("fetching dataset from {url}");
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(LoadError::Status(resp.status().as_u16()));
    }
    let bytes = resp.bytes().await?;

    let table = match source.format {
        DatasetFormat::Csv => parse_csv(&bytes, source.options)?,
        DatasetFormat::Json => parse_json(&bytes, source.options)?,
    };

    info!(
        rows = table.len(),
        bytes = bytes.len(),
        format = %source.format,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dataset loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::{fetch_dataset, DatasetFormat, DatasetSource};
    use crate::error::LoadError;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    const CSV: &str = "iso_code,location,date,total_cases\nUSA,United States,2020-03-01,100\nCAN,Canada,2020-03-01,50\n";
    const JSON: &str =
        r#"{"USA": {"location": "United States", "data": [{"date": "2020-03-02", "total_cases": 150}]}}"#;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn app() -> Router {
        Router::new()
            .route("/owid.csv", get(|| async { CSV }))
            .route("/owid.json", get(|| async { JSON }))
            .route("/gone.csv", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
            .route("/broken.csv", get(|| async { "iso_code,date\nUSA,2020-03-01\n" }))
    }

    #[test]
    fn format_is_inferred_from_url() {
        assert_eq!(DatasetFormat::from_url("https://x/data.csv"), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::from_url("https://x/data.JSON?raw=1"), DatasetFormat::Json);
        assert_eq!(DatasetFormat::from_url("https://x/data"), DatasetFormat::Csv);
        assert_eq!("json".parse::<DatasetFormat>(), Ok(DatasetFormat::Json));
        assert!("xml".parse::<DatasetFormat>().is_err());
    }

    #[tokio::test]
    async fn fetches_csv_and_json() {
        let base = serve(app()).await;
        let client = reqwest::Client::new();

        let table = fetch_dataset(&client, &DatasetSource::new(format!("{base}/owid.csv")))
            .await
            .unwrap();
        assert_eq!(table.len(), 2);

        let table = fetch_dataset(&client, &DatasetSource::new(format!("{base}/owid.json")))
            .await
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].total_cases, Some(150.0));
    }

    #[tokio::test]
    async fn upstream_failures_abort() {
        let base = serve(app()).await;
        let client = reqwest::Client::new();

        let err = fetch_dataset(&client, &DatasetSource::new(format!("{base}/gone.csv")))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Status(404)), "{err}");

        let err = fetch_dataset(&client, &DatasetSource::new(format!("{base}/broken.csv")))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(_)), "{err}");

        let err = fetch_dataset(&client, &DatasetSource::new("file:///tmp/owid.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedUrl(_)), "{err}");
    }
}
