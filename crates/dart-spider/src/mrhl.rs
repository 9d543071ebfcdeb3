use crate::config::{Config, REPORT_CODE};
use crate::corp::Corp;
use crate::error::{Error, Result};
use crate::http::*;
use crate::progress::ProgressState;
use crate::store::{CsvSink, RecordSink};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// DART business-status codes carried in the response envelope.
const STATUS_OK: &str = "000";
const STATUS_NO_DATA: &str = "013";
const STATUS_QUOTA: &str = "020";

// scrape
// ----------------------------------------------------------------------------

/// Crawl minority-shareholder disclosures for every listed corp, one
/// (corp, year) lookup at a time, appending rows as they arrive.
///
/// Strictly sequential: the API allows fewer than 1000 requests/minute and
/// 20000/day, so lookups are throttled and never overlap. Quota exhaustion
/// surfaces as [`Error::QuotaExceeded`] and unwinds to the caller; rows
/// flushed before that point stay on disk and the next run resumes from
/// them.
pub async fn scrape(http_client: &HttpClient, cfg: &Config, tui: bool) -> Result<()> {
    let time = std::time::Instant::now();

    let catalog = crate::corp::ensure_catalog(http_client, cfg).await?;
    let corps = crate::corp::load_companies(&catalog)?;
    info!("{} listed corps in catalog", corps.len());
    if tui {
        println!(
            "{bar}\n{name:^40}\n{bar}",
            bar = "=".repeat(40),
            name = "DART Minority Shareholders"
        );
    }

    let progress = ProgressState::load(&cfg.output_path(), &cfg.failure_path())?;
    let mut output = CsvSink::open(&cfg.output_path())?;
    let mut failures = CsvSink::open(&cfg.failure_path())?;

    // progress bar
    let pb = if tui {
        let pb = ProgressBar::new(corps.len() as u64).with_style(
            ProgressStyle::default_bar()
                .template(
                    "{msg} {spinner:.magenta}\n\
                    [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| {human_pos}/{human_len} \
                    [Rate: {per_sec:.magenta}, ETA: {eta:.blue}]",
                )?
                .progress_chars("##-"),
        );
        pb.set_message("collecting minority shareholders ...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };

    let total = corps.len();
    for (i, corp) in corps.iter().enumerate() {
        if progress.is_completed(&corp.corp_code) {
            info!(
                "[{}/{total}] {} skipped (already collected)",
                i + 1,
                corp.corp_name
            );
            pb.inc(1);
            continue;
        }

        debug!(
            "[{}/{total}] {} {} collecting ...",
            i + 1,
            corp.corp_code,
            corp.corp_name
        );

        for year in cfg.years() {
            if progress.is_failed(&corp.corp_code, year) {
                trace!("{} {year} skipped (known empty)", corp.corp_code);
                continue;
            }

            match lookup(http_client, cfg, &corp.corp_code, year).await? {
                Outcome::Rows(rows) => {
                    for row in rows {
                        let row = row.to_row(&corp.stock_code);
                        let row: Vec<&str> = row.iter().map(String::as_str).collect();
                        output.append(&row)?;
                    }
                }
                Outcome::NoData => {
                    let year = year.to_string();
                    failures.append(&[&corp.corp_code, &year])?;
                }
                Outcome::Retry => {}
            }

            // fixed pause after every lookup, to stay under the rate ceiling
            tokio::time::sleep(cfg.throttle).await;
        }

        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "minority-shareholder crawl finished, {}",
        crate::time_elapsed(time)
    );

    if tui {
        println!("collecting minority shareholders ... done\n");
    }

    Ok(())
}

/// One `mrhlSttus.json` lookup, classified.
///
/// Transport failures and unknown statuses become [`Outcome::Retry`]: nothing
/// is persisted and the key is attempted again on the next run.
async fn lookup(
    http_client: &HttpClient,
    cfg: &Config,
    corp_code: &str,
    year: i32,
) -> Result<Outcome> {
    let bsns_year = year.to_string();
    let response = match http_client
        .get(&cfg.lookup_url)
        .query(&[
            ("crtfc_key", cfg.api_key.as_str()),
            ("corp_code", corp_code),
            ("bsns_year", &bsns_year),
            ("reprt_code", REPORT_CODE),
        ])
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            error!("lookup request failed for {corp_code} {year}, error({err})");
            return Ok(Outcome::Retry);
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!("lookup returned {status} for {corp_code} {year}; retrying next run");
        return Ok(Outcome::Retry);
    }

    let envelope: Envelope = match response.json().await {
        Ok(envelope) => envelope,
        Err(err) => {
            error!("failed to parse lookup response for {corp_code} {year}, error({err})");
            return Ok(Outcome::Retry);
        }
    };

    classify(envelope, corp_code, year)
}

fn classify(envelope: Envelope, corp_code: &str, year: i32) -> Result<Outcome> {
    match envelope.status.as_str() {
        STATUS_OK => {
            trace!("{} rows for {corp_code} {year}", envelope.list.len());
            Ok(Outcome::Rows(envelope.list))
        }
        STATUS_NO_DATA => {
            debug!("no data for {corp_code} {year} ({})", envelope.message);
            Ok(Outcome::NoData)
        }
        STATUS_QUOTA => {
            error!("request quota exhausted at {corp_code} {year}; aborting run");
            Err(Error::QuotaExceeded)
        }
        other => {
            warn!(
                "unexpected status {other} for {corp_code} {year}: {}",
                envelope.message
            );
            Ok(Outcome::Retry)
        }
    }
}

/// How one lookup ended.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Rows to append; may be empty.
    Rows(Vec<ShareholderRecord>),
    /// Permanent "no data" for this key; recorded and never re-fetched.
    NoData,
    /// Transient; nothing persisted, the key is re-attempted next run.
    Retry,
}

// de
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    list: Vec<ShareholderRecord>,
}

/// One minority-shareholder row as DART returns it. Fields default to empty
/// strings; the spider persists them as-is rather than validating.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ShareholderRecord {
    #[serde(default)]
    pub rcept_no: String,
    #[serde(default)]
    pub corp_cls: String,
    #[serde(default)]
    pub corp_code: String,
    #[serde(default)]
    pub corp_name: String,
    #[serde(default)]
    pub se: String,
    #[serde(default)]
    pub shrhldr_co: String,
    #[serde(default)]
    pub shrhldr_tot_co: String,
    #[serde(default)]
    pub shrhldr_rate: String,
    #[serde(default)]
    pub hold_stock_co: String,
    #[serde(default)]
    pub stock_tot_co: String,
    #[serde(default)]
    pub hold_stock_rate: String,
}

impl ShareholderRecord {
    /// Fixed output-store column order, with the catalog ticker appended
    /// last. `corp_code` stays at [`crate::progress::CORP_CODE_COLUMN`] so
    /// resume state can be rebuilt from the store.
    pub fn to_row(&self, stock_code: &str) -> Vec<String> {
        vec![
            self.rcept_no.clone(),
            self.corp_cls.clone(),
            self.corp_code.clone(),
            self.corp_name.clone(),
            self.se.clone(),
            self.shrhldr_co.clone(),
            self.shrhldr_tot_co.clone(),
            self.shrhldr_rate.clone(),
            self.hold_stock_co.clone(),
            self.stock_tot_co.clone(),
            self.hold_stock_rate.clone(),
            stock_code.to_string(),
        ]
    }
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
