pub mod config;
pub mod corp;
pub mod error;
pub mod fs;
pub mod mrhl;
pub mod progress;
pub mod store;

pub use config::Config;
pub use error::Error;

/// Shortcut for required API elements.
pub(crate) mod http {
    pub(crate) use dotenv::var;
    pub(crate) use reqwest::Client as HttpClient;
}

/// Build the default blocking-free HTTP client used by every endpoint.
pub fn std_client_build() -> reqwest::Client {
    reqwest::ClientBuilder::new()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("failed to build reqwest client")
}

pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:.2}s", time.elapsed().as_secs_f64())
}
