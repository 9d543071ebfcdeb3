mod cli;
mod spider;

// remote imports
use crate::cli::Endpoint::*;
use clap::Parser;
use cli::{Cli, TraceLevel};
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// preproccess the trace level, and open the .env file
fn preprocess(trace_level: Option<Level>) {
    dotenv::dotenv().ok();
    if let Some(trace_level) = trace_level {
        let my_subscriber = FmtSubscriber::builder()
            .with_max_level(trace_level)
            .finish();
        subscriber::set_global_default(my_subscriber).expect("Set subscriber");
    }
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // set the trace level
    preprocess(cli.trace.map(|trace_level| match trace_level {
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::ERROR => Level::ERROR,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::TRACE => Level::TRACE,
        TraceLevel::WARN => Level::WARN,
    }));
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = match cli.trace {
        Some(_) => false,
        None => true,
    };

    // read cli inputs
    use cli::Commands::*;
    match cli.command {
        // `dart spider <Option<Vec<Endpoint>>>`: crawl endpoints
        Spider { endpoints, fresh } => {
            // if no endpoints provided, crawl all
            match endpoints {
                Some(endpoints) => spider::run(endpoints, fresh, tui).await?,
                None => spider::run(vec![Catalog, Minority], fresh, tui).await?,
            }
        }
    }

    Ok(())
}
