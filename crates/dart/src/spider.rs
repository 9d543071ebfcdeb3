use crate::cli::Endpoint;
use dart_spider as spider;
use tracing::{debug, info, trace};

/// Run the requested spider endpoints in order.
pub(crate) async fn run(endpoints: Vec<Endpoint>, fresh: bool, tui: bool) -> anyhow::Result<()> {
    trace!("loading spider configuration ...");
    let cfg = spider::Config::from_env()?;
    let http_client = spider::std_client_build();
    debug!("configuration loaded, data dir {:?}", cfg.data_dir);

    if fresh {
        spider::store::rotate(&cfg.output_path())?;
        spider::store::rotate(&cfg.failure_path())?;
    }

    // start collecting data
    let time = std::time::Instant::now();
    for endpoint in endpoints {
        match endpoint {
            Endpoint::Catalog => {
                let time = std::time::Instant::now();

                spider::corp::ensure_catalog(&http_client, &cfg).await?;

                info!("corp catalog ready, time elapsed: {:?}", time.elapsed());
            }
            Endpoint::Minority => {
                let time = std::time::Instant::now();

                spider::mrhl::scrape(&http_client, &cfg, tui).await?;

                info!(
                    "minority-shareholder data collected, time elapsed: {:?}",
                    time.elapsed()
                );
            }
        }
    }

    info!(
        "spider finished collecting data, time elapsed: {:?}",
        time.elapsed()
    );

    Ok(())
}
