use crate::error::{Error, Result};
use crate::store::{CsvSink, RecordSink};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Column position of `corp_code` within output-store rows.
pub const CORP_CODE_COLUMN: usize = 2;

/// Width of a DART corp code.
pub const CORP_CODE_WIDTH: usize = 8;

/// One unit of crawl work: (corp code, fiscal year).
pub type FetchKey = (String, i32);

/// Resume state, rebuilt at startup from the two append-only stores.
///
/// A corp with any row in the output store counts as fully collected for
/// every year. That is deliberately coarse: a run that crashed mid-way
/// through a corp's year loop will over-skip that corp on resume.
#[derive(Debug, Default)]
pub struct ProgressState {
    completed: HashSet<String>,
    failed: HashSet<FetchKey>,
}

impl ProgressState {
    pub fn load(output_path: &Path, failure_path: &Path) -> Result<Self> {
        let completed = load_completed(output_path)?;
        let failed = load_failed(failure_path)?;

        if !completed.is_empty() || !failed.is_empty() {
            info!(
                "resuming: {} corps already collected, {} keys known empty",
                completed.len(),
                failed.len()
            );
        }
        Ok(Self { completed, failed })
    }

    pub fn is_completed(&self, corp_code: &str) -> bool {
        self.completed.contains(corp_code)
    }

    pub fn is_failed(&self, corp_code: &str, year: i32) -> bool {
        self.failed.contains(&(corp_code.to_string(), year))
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }
}

/// Distinct corp codes already present in the output store, normalized back
/// to the catalog's zero-padded width.
fn load_completed(output_path: &Path) -> Result<HashSet<String>> {
    let codes = CsvSink::load_column(output_path, CORP_CODE_COLUMN)?;
    let completed: HashSet<String> = codes
        .into_iter()
        .map(|code| zfill(&code, CORP_CODE_WIDTH))
        .collect();
    debug!("{} corps found in output store", completed.len());
    Ok(completed)
}

/// Keys that permanently returned "no data". A missing store is created
/// empty so the first append has a file to extend; a malformed line is
/// corrupted state and fails the run.
fn load_failed(failure_path: &Path) -> Result<HashSet<FetchKey>> {
    if !failure_path.exists() {
        CsvSink::open(failure_path)?;
        return Ok(HashSet::new());
    }

    let content = std::fs::read_to_string(failure_path)?;
    let mut failed = HashSet::new();

    // no tolerance: any line that is not `code,year` is corrupted state
    for (i, line) in content.lines().enumerate() {
        let malformed = || Error::FailureStoreParse {
            line_no: i + 1,
            line: line.to_string(),
        };

        let (code, year) = line.split_once(',').ok_or_else(malformed)?;
        let year: i32 = year.trim().parse().map_err(|_| malformed())?;
        failed.insert((code.to_string(), year));
    }

    debug!("{} failed keys loaded", failed.len());
    Ok(failed)
}

pub(crate) fn zfill(code: &str, width: usize) -> String {
    format!("{code:0>width$}")
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(dir: &tempfile::TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        (
            dir.path().join("minority_shareholders.csv"),
            dir.path().join("failed_keys.csv"),
        )
    }

    #[test]
    fn empty_state_when_no_stores_exist() {
        let dir = tempfile::tempdir().unwrap();
        let (output, failure) = paths(&dir);

        let state = ProgressState::load(&output, &failure).unwrap();
        assert_eq!(state.completed_count(), 0);
        assert!(!state.is_failed("00126380", 2020));

        // the failure store must now exist, empty
        assert_eq!(std::fs::read_to_string(&failure).unwrap(), "");
    }

    #[test]
    fn completed_corps_come_from_the_corp_code_column() {
        let dir = tempfile::tempdir().unwrap();
        let (output, failure) = paths(&dir);
        std::fs::write(
            &output,
            "20240101000001,Y,00126380,삼성전자,소액주주,100,005930\n\
             20240101000002,Y,00126380,삼성전자,소액주주,101,005930\n\
             20240101000003,Y,00164742,현대자동차,소액주주,55,005380\n",
        )
        .unwrap();

        let state = ProgressState::load(&output, &failure).unwrap();
        assert_eq!(state.completed_count(), 2);
        assert!(state.is_completed("00126380"));
        assert!(state.is_completed("00164742"));
        assert!(!state.is_completed("00000000"));
    }

    #[test]
    fn corp_codes_are_zero_padded_on_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let (output, failure) = paths(&dir);
        // a code that lost its leading zeros in transit
        std::fs::write(&output, "r,Y,126380,삼성전자,se,1,005930\n").unwrap();

        let state = ProgressState::load(&output, &failure).unwrap();
        assert!(state.is_completed("00126380"));
    }

    #[test]
    fn failed_keys_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let (output, failure) = paths(&dir);
        std::fs::write(&failure, "00126380,2015\n00126380,2016\n").unwrap();

        let state = ProgressState::load(&output, &failure).unwrap();
        assert!(state.is_failed("00126380", 2015));
        assert!(state.is_failed("00126380", 2016));
        assert!(!state.is_failed("00126380", 2017));
        assert!(!state.is_failed("00164742", 2015));
    }

    #[test]
    fn malformed_failure_line_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let (output, failure) = paths(&dir);
        std::fs::write(&failure, "00126380,2015\nnot a key\n").unwrap();

        match ProgressState::load(&output, &failure) {
            Err(Error::FailureStoreParse { line_no, line }) => {
                assert_eq!(line_no, 2);
                assert_eq!(line, "not a key");
            }
            other => panic!("expected FailureStoreParse, got {other:?}"),
        }
    }

    #[test]
    fn blank_line_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let (output, failure) = paths(&dir);
        std::fs::write(&failure, "00126380,2015\n\n00126380,2016\n").unwrap();

        assert!(matches!(
            ProgressState::load(&output, &failure),
            Err(Error::FailureStoreParse { line_no: 2, .. })
        ));
    }

    #[test]
    fn non_numeric_year_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let (output, failure) = paths(&dir);
        std::fs::write(&failure, "00126380,twenty\n").unwrap();

        assert!(matches!(
            ProgressState::load(&output, &failure),
            Err(Error::FailureStoreParse { line_no: 1, .. })
        ));
    }

    #[test]
    fn zfill_pads_to_width() {
        assert_eq!(zfill("126380", 8), "00126380");
        assert_eq!(zfill("00126380", 8), "00126380");
        assert_eq!(zfill("", 8), "00000000");
    }
}
