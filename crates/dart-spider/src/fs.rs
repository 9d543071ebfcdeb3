use crate::error::{Error, Result};
use crate::http::*;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, trace};

/// GET request a file and write it to `path`.
///
/// The query pairs are kept out of the logs; catalog downloads carry the API
/// key as a parameter.
pub async fn download_file(
    http_client: &HttpClient,
    endpoint: &'static str,
    url: &str,
    query: &[(&str, &str)],
    path: &Path,
) -> Result<()> {
    trace!("downloading {endpoint} to {path:?}");
    let response = http_client.get(url).query(query).send().await?;

    let status = response.status();
    if !status.is_success() {
        error!("failed to download {endpoint}, status({status})");
        return Err(Error::RemoteUnavailable { endpoint, status });
    }

    // ensure the directory exists
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }

    let body = response.bytes().await?;
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(&body).await?;
    file.flush().await?;

    debug!("{endpoint} downloaded to {path:?} ({} bytes)", body.len());
    Ok(())
}

/// Unzip `zip_file` into the directory `to_dir`, creating directories as
/// necessary.
pub async fn unzip(zip_file: &Path, to_dir: &Path) -> Result<()> {
    debug!("unzipping {zip_file:?} to {to_dir:?}");

    let file = std::fs::File::open(zip_file)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|err| {
        error!("failed to open zip file at {zip_file:?}, {err}");
        err
    })?;

    tokio::fs::create_dir_all(to_dir).await?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let outpath = to_dir.join(entry.mangled_name());

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)?;
            continue;
        }

        // if output directory does not exist, create it
        if let Some(outdir) = outpath.parent() {
            if !outdir.exists() {
                std::fs::create_dir_all(outdir)?;
            }
        }

        let mut outfile = std::fs::File::create(&outpath)?;
        trace!("copying {} to {outpath:?}", entry.name());
        std::io::copy(&mut entry, &mut outfile)?;
    }

    info!("{zip_file:?} unzipped to {to_dir:?}");
    Ok(())
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
