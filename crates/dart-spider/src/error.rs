use thiserror::Error;

/// Everything that can stop, or be absorbed by, a crawl run.
///
/// `QuotaExceeded` is the only fatal condition raised mid-loop; it is
/// returned to the loop boundary so that open sinks close via drop rather
/// than a process exit.
#[derive(Error, Debug)]
pub enum Error {
    #[error("missing environment variable {0}")]
    Configuration(&'static str),

    #[error("remote endpoint unavailable: {endpoint} returned {status}")]
    RemoteUnavailable {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("DART request quota exceeded (status 020); aborting run")]
    QuotaExceeded,

    #[error("malformed failure store, line {line_no}: {line:?}")]
    FailureStoreParse { line_no: usize, line: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Xml(#[from] quick_xml::DeError),

    #[error(transparent)]
    Template(#[from] indicatif::style::TemplateError),
}

pub type Result<T> = std::result::Result<T, Error>;
