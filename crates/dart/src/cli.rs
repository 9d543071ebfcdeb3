use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl DART and append rows to the local data stores.
    Spider {
        /// Specify the endpoints to crawl.
        ///
        /// If no endpoints are provided, spider will collect all.
        #[arg(short, long)]
        endpoints: Option<Vec<Endpoint>>,

        /// Rotate the existing output and failure stores aside and start a
        /// fresh collection instead of resuming.
        #[arg(long)]
        fresh: bool,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The corp-code company catalog.
    Catalog,

    /// Minority-shareholder disclosures for every listed corp.
    Minority,
}
