use crate::error::{Error, Result};
use serde::Deserialize;

const GITHUB_CONTENTS_ENDPOINT: &str = "https://api.github.com/repos/{owner}/{repo}/contents/{dir}";
const USER_AGENT: &str = "micropinouts/0.0.1";
const PART_ARCHIVE_SUFFIX: &str = ".fzpz";

/// One item of a GitHub contents listing.
#[derive(Deserialize, Debug, Clone)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub download_url: Option<String>,
}

/// A part archive available for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArchive {
    pub name: String,
    pub path: String,
    pub download_url: String,
}

pub struct FritzingApi {
    client: reqwest::Client,
}

impl FritzingApi {
    pub fn new() -> Result<Self> {
        Ok(FritzingApi {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
        })
    }

    /// Lists the `.fzpz` part archives in one directory of a GitHub repository.
    pub async fn list_part_archives(
        &self,
        owner: &str,
        repo: &str,
        dir: &str,
    ) -> Result<Vec<RemoteArchive>> {
        let url = contents_url(owner, repo, dir);
        let res = self.client.get(&url).send().await?;
        if !res.status().is_success() {
            return Err(Error::Archive(format!(
                "listing {url} failed with status {}",
                res.status()
            )));
        }
        let entries = res.json::<Vec<ContentEntry>>().await?;
        let archives = part_archives(entries);
        log::info!("found {} part archives in {owner}/{repo}/{dir}", archives.len());
        Ok(archives)
    }

    /// Downloads one part archive.
    pub async fn get_part_archive(&self, url: &str) -> Result<bytes::Bytes> {
        let res = self.client.get(url).send().await?;
        if res.status().is_success() {
            let body = res.bytes().await?;
            log::info!("downloaded {} bytes from {url}", body.len());
            Ok(body)
        } else {
            Err(Error::Archive(format!(
                "no part archive at {url} (status {})",
                res.status()
            )))
        }
    }
}

pub fn contents_url(owner: &str, repo: &str, dir: &str) -> String {
    GITHUB_CONTENTS_ENDPOINT
        .replace("{owner}", owner)
        .replace("{repo}", repo)
        .replace("{dir}", dir.trim_matches('/'))
}

/// Keeps downloadable files named like part archives.
pub fn part_archives(entries: Vec<ContentEntry>) -> Vec<RemoteArchive> {
    entries
        .into_iter()
        .filter(|e| e.kind == "file")
        .filter(|e| e.name.to_ascii_lowercase().ends_with(PART_ARCHIVE_SUFFIX))
        .filter_map(|e| {
            Some(RemoteArchive {
                download_url: e.download_url?,
                name: e.name,
                path: e.path,
            })
        })
        .collect()
}
