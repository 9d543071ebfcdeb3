use crate::config::Config;
use crate::error::Result;
use crate::http::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Return the path of the local corp-code catalog, downloading and
/// unzipping it first if it is not already cached. The archive is deleted
/// once extracted.
pub async fn ensure_catalog(http_client: &HttpClient, cfg: &Config) -> Result<PathBuf> {
    let catalog = cfg.catalog_path();
    if catalog.exists() {
        debug!("corp catalog already present at {catalog:?}");
        return Ok(catalog);
    }

    info!("downloading corp-code catalog ...");
    let archive = cfg.archive_path();
    crate::fs::download_file(
        http_client,
        "corpCode.xml",
        &cfg.catalog_url,
        &[("crtfc_key", cfg.api_key.as_str())],
        &archive,
    )
    .await?;

    crate::fs::unzip(&archive, &cfg.data_dir).await?;
    tokio::fs::remove_file(&archive).await?;

    info!("corp-code catalog cached at {catalog:?}");
    Ok(catalog)
}

/// Parse the catalog, keeping only listed corps (non-blank ticker) in
/// document order.
pub fn load_companies(path: &Path) -> Result<Vec<Corp>> {
    let xml = std::fs::read_to_string(path)?;
    let catalog: Catalog = quick_xml::de::from_str(&xml)?;

    let corps: Vec<Corp> = catalog
        .list
        .into_iter()
        .filter(|corp| !corp.stock_code.trim().is_empty())
        .collect();

    debug!("{} listed corps found in catalog", corps.len());
    Ok(corps)
}

// de
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Catalog {
    #[serde(rename = "list", default)]
    list: Vec<Corp>,
}

/// One catalog entry; `corp_code` is the 8-digit zero-padded DART
/// identifier, `stock_code` the KRX ticker (blank for unlisted entities).
#[derive(Clone, Debug, Deserialize)]
pub struct Corp {
    pub corp_code: String,
    pub corp_name: String,
    #[serde(default)]
    pub stock_code: String,
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
    <list>
        <corp_code>00126380</corp_code>
        <corp_name>삼성전자</corp_name>
        <stock_code>005930</stock_code>
        <modify_date>20240102</modify_date>
    </list>
    <list>
        <corp_code>00434003</corp_code>
        <corp_name>비상장홀딩스</corp_name>
        <stock_code> </stock_code>
        <modify_date>20240102</modify_date>
    </list>
    <list>
        <corp_code>00164742</corp_code>
        <corp_name>현대자동차</corp_name>
        <stock_code>005380</stock_code>
        <modify_date>20240102</modify_date>
    </list>
</result>"#;

    fn write_catalog(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("corpCode.xml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(CATALOG_XML.as_bytes()).unwrap();
        path
    }

    #[test]
    fn unlisted_corps_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let corps = load_companies(&write_catalog(&dir)).unwrap();

        assert_eq!(corps.len(), 2);
        assert!(corps.iter().all(|corp| !corp.stock_code.trim().is_empty()));
    }

    #[test]
    fn catalog_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let corps = load_companies(&write_catalog(&dir)).unwrap();

        assert_eq!(corps[0].corp_code, "00126380");
        assert_eq!(corps[0].corp_name, "삼성전자");
        assert_eq!(corps[1].corp_code, "00164742");
        assert_eq!(corps[1].stock_code, "005380");
    }

    #[tokio::test]
    async fn cached_catalog_skips_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(&dir);

        // unreachable catalog url: a network call would fail the test
        let mut cfg = Config::new("key", dir.path());
        cfg.catalog_url = "http://127.0.0.1:1/api/corpCode.xml".to_string();

        let client = crate::std_client_build();
        let found = ensure_catalog(&client, &cfg).await.unwrap();
        assert_eq!(found, path);
    }
}
