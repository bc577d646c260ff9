use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use dataset::fetch::OWID_CSV_URL;
use dataset::{DatasetFormat, DatasetSource, Metric};
use figure::{ClampRange, ColorScale, Projection};
use presenter::{PickerMode, PresenterSettings};

/// Everything the binary reads from the environment, resolved once at startup.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub addr: SocketAddr,
    pub source: DatasetSource,
    pub fetch_timeout: Option<Duration>,
    pub presenter: PresenterSettings,
}

impl DashboardConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or blank keys take their
    /// default; anything set but unparsable is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let addr = env_var::<SocketAddr>(&var, "DASHBOARD_ADDR")?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8050)));

        let mut source = DatasetSource::new(
            var("COVID_DATA_URL").unwrap_or_else(|| OWID_CSV_URL.to_string()),
        );
        if let Some(format) = env_var::<DatasetFormat>(&var, "COVID_DATA_FORMAT")? {
            source.format = format;
        }
        if let Some(exclude) = env_var_bool(&var, "COVID_EXCLUDE_AGGREGATES")? {
            source.options.exclude_aggregates = exclude;
        }

        let fetch_timeout =
            env_var::<u64>(&var, "DASHBOARD_FETCH_TIMEOUT_SECS")?.map(Duration::from_secs);

        let defaults = PresenterSettings::default();
        let mut style = defaults.style.clone();
        if let Some(ms) = env_var::<u32>(&var, "DASHBOARD_TRANSITION_MS")? {
            style.transition_ms = ms;
        }

        let clamp = match (
            env_var::<f64>(&var, "DASHBOARD_CLAMP_MIN")?,
            env_var::<f64>(&var, "DASHBOARD_CLAMP_MAX")?,
        ) {
            (Some(min), Some(max)) => Some(
                ClampRange::new(min, max).context("invalid DASHBOARD_CLAMP_MIN/MAX")?,
            ),
            (None, None) => None,
            _ => bail!("DASHBOARD_CLAMP_MIN and DASHBOARD_CLAMP_MAX must be set together"),
        };

        let presenter = PresenterSettings {
            title: var("DASHBOARD_TITLE").unwrap_or(defaults.title),
            picker: env_var::<PickerMode>(&var, "DASHBOARD_PICKER")?.unwrap_or(defaults.picker),
            default_date: env_var::<NaiveDate>(&var, "DASHBOARD_DEFAULT_DATE")?
                .or(defaults.default_date),
            projection: env_var::<Projection>(&var, "DASHBOARD_PROJECTION")?
                .unwrap_or(defaults.projection),
            metric: env_var::<Metric>(&var, "DASHBOARD_METRIC")?.unwrap_or(defaults.metric),
            colorscale: env_var::<ColorScale>(&var, "DASHBOARD_COLORSCALE")?
                .unwrap_or(defaults.colorscale),
            clamp,
            style,
        };

        Ok(Self {
            addr,
            source,
            fetch_timeout,
            presenter,
        })
    }
}

fn env_var<T>(var: impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    var(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|err| anyhow!("invalid {key}={raw:?}: {err}"))
        })
        .transpose()
}

fn env_var_bool(var: impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<bool>> {
    var(key)
        .map(|raw| match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(anyhow!("invalid {key}={raw:?}: expected true or false")),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::DashboardConfig;
    use chrono::NaiveDate;
    use dataset::{DatasetFormat, Metric};
    use figure::{ColorScale, Projection};
    use presenter::PickerMode;
    use std::collections::HashMap;
    use std::time::Duration;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<DashboardConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr.to_string(), "127.0.0.1:8050");
        assert!(cfg.source.url.ends_with("owid-covid-data.csv"));
        assert_eq!(cfg.source.format, DatasetFormat::Csv);
        assert!(cfg.source.options.exclude_aggregates);
        assert_eq!(cfg.fetch_timeout, None);
        assert_eq!(cfg.presenter.picker, PickerMode::Date);
        assert_eq!(
            cfg.presenter.default_date,
            NaiveDate::from_ymd_opt(2020, 1, 22)
        );
        assert_eq!(cfg.presenter.projection, Projection::Equirectangular);
        assert_eq!(cfg.presenter.metric, Metric::TotalCases);
        assert_eq!(cfg.presenter.colorscale, ColorScale::default());
        assert_eq!(cfg.presenter.clamp, None);
        assert_eq!(cfg.presenter.style.transition_ms, 500);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = config(&[
            ("DASHBOARD_ADDR", "0.0.0.0:9000"),
            ("COVID_DATA_URL", "https://example.org/owid.json"),
            ("COVID_EXCLUDE_AGGREGATES", "false"),
            ("DASHBOARD_PICKER", "calendar"),
            ("DASHBOARD_DEFAULT_DATE", "2021-06-01"),
            ("DASHBOARD_PROJECTION", "natural earth"),
            ("DASHBOARD_METRIC", "new_deaths"),
            ("DASHBOARD_CLAMP_MIN", "0"),
            ("DASHBOARD_CLAMP_MAX", "30000000"),
            ("DASHBOARD_TRANSITION_MS", "0"),
            ("DASHBOARD_FETCH_TIMEOUT_SECS", "30"),
            ("DASHBOARD_TITLE", "Cases"),
        ])
        .unwrap();
        assert_eq!(cfg.addr.port(), 9000);
        assert_eq!(cfg.source.format, DatasetFormat::Json);
        assert!(!cfg.source.options.exclude_aggregates);
        assert_eq!(cfg.presenter.picker, PickerMode::Calendar);
        assert_eq!(cfg.presenter.projection, Projection::NaturalEarth);
        assert_eq!(cfg.presenter.metric, Metric::NewDeaths);
        let clamp = cfg.presenter.clamp.unwrap();
        assert_eq!((clamp.min(), clamp.max()), (0.0, 30_000_000.0));
        assert_eq!(cfg.presenter.style.transition_ms, 0);
        assert_eq!(cfg.fetch_timeout, Some(Duration::from_secs(30)));
        assert_eq!(cfg.presenter.title, "Cases");
    }

    #[test]
    fn explicit_format_wins_over_url() {
        let cfg = config(&[
            ("COVID_DATA_URL", "https://example.org/export"),
            ("COVID_DATA_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(cfg.source.format, DatasetFormat::Json);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = config(&[("DASHBOARD_PICKER", "  "), ("DASHBOARD_TITLE", "")]).unwrap();
        assert_eq!(cfg.presenter.picker, PickerMode::Date);
        assert_eq!(cfg.presenter.title, "COVID-19 Data Visualization");
    }

    #[test]
    fn invalid_values_fail() {
        for pairs in [
            &[("DASHBOARD_ADDR", "localhost")][..],
            &[("DASHBOARD_PICKER", "wheel")][..],
            &[("DASHBOARD_DEFAULT_DATE", "22/01/2020")][..],
            &[("DASHBOARD_PROJECTION", "flat")][..],
            &[("DASHBOARD_COLORSCALE", "rainbowish")][..],
            &[("COVID_EXCLUDE_AGGREGATES", "maybe")][..],
            &[("DASHBOARD_CLAMP_MIN", "0")][..],
            &[("DASHBOARD_CLAMP_MIN", "10"), ("DASHBOARD_CLAMP_MAX", "1")][..],
        ] {
            assert!(config(pairs).is_err(), "{pairs:?} should be rejected");
        }
    }
}
