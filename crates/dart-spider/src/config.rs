use crate::error::{Error, Result};
use crate::http::var;
use chrono::Datelike;
use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

/// First fiscal year DART serves minority-shareholder disclosures for.
pub const START_YEAR: i32 = 2015;

/// Fixed report type: `11011` is the annual business report.
pub const REPORT_CODE: &str = "11011";

const CATALOG_URL: &str = "https://opendart.fss.or.kr/api/corpCode.xml";
const LOOKUP_URL: &str = "https://opendart.fss.or.kr/api/mrhlSttus.json";

/// Per-run configuration, read once at startup. Nothing in the spider reads
/// the environment after this struct is built.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub data_dir: PathBuf,
    pub start_year: i32,
    pub include_current_year: bool,
    /// Pause after every lookup call; 100ms keeps the crawl under the
    /// 1000 requests/minute ceiling.
    pub throttle: Duration,
    pub catalog_url: String,
    pub lookup_url: String,
}

impl Config {
    /// Read `DART_API_KEY` from the environment (or `.env`), with the
    /// default data directory and year range.
    pub fn from_env() -> Result<Self> {
        let api_key = var("DART_API_KEY").map_err(|_| Error::Configuration("DART_API_KEY"))?;
        Ok(Self::new(api_key, "data"))
    }

    pub fn new(api_key: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key: api_key.into(),
            data_dir: data_dir.into(),
            start_year: START_YEAR,
            include_current_year: true,
            throttle: Duration::from_millis(100),
            catalog_url: CATALOG_URL.to_string(),
            lookup_url: LOOKUP_URL.to_string(),
        }
    }

    /// Fiscal years to crawl, ascending. The current year is included by
    /// default since annual reports for it begin appearing mid-year.
    pub fn years(&self) -> Range<i32> {
        let current = chrono::Local::now().year();
        if self.include_current_year {
            self.start_year..current + 1
        } else {
            self.start_year..current
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("corpCode.xml")
    }

    pub fn archive_path(&self) -> PathBuf {
        self.data_dir.join("corpCode.zip")
    }

    pub fn output_path(&self) -> PathBuf {
        self.data_dir.join("minority_shareholders.csv")
    }

    pub fn failure_path(&self) -> PathBuf {
        self.data_dir.join("failed_keys.csv")
    }
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
