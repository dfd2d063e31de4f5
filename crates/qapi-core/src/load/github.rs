use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{Loader, RepositoryHost, RepositoryInfo};
use crate::config::GithubConfig;
use crate::error::LoadError;
use crate::source::FileDescriptor;

const USER_AGENT: &str = concat!("qapi/", env!("CARGO_PKG_VERSION"));
const COMMITS_PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
    download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    owner: OwnerResponse,
}

#[derive(Debug, Deserialize)]
struct OwnerResponse {
    login: String,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
}

/// Reads query files from a hosted repository through the platform's REST API.
#[derive(Debug, Clone)]
pub struct GithubLoader {
    owner: String,
    repo: String,
    revision: Option<String>,
    api_base_url: String,
    raw_base_url: String,
    access_token: Option<String>,
    client: Client,
}

impl GithubLoader {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        revision: Option<String>,
        config: &GithubConfig,
    ) -> Result<Self, LoadError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            owner: owner.into(),
            repo: repo.into(),
            revision,
            api_base_url: config.api_base_url.clone(),
            raw_base_url: config.raw_base_url.clone(),
            access_token: config.access_token.clone(),
            client,
        })
    }

    fn repo_url(&self) -> String {
        format!("{}repos/{}/{}", self.api_base_url, self.owner, self.repo)
    }

    fn contents_url(&self) -> String {
        match &self.revision {
            Some(rev) => format!("{}/contents?ref={rev}", self.repo_url()),
            None => format!("{}/contents", self.repo_url()),
        }
    }

    fn commits_url(&self, page: usize) -> String {
        format!(
            "{}/commits?per_page={COMMITS_PER_PAGE}&page={page}",
            self.repo_url()
        )
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        match &self.access_token {
            Some(token) => builder.header(AUTHORIZATION, format!("token {token}")),
            None => builder,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, LoadError> {
        debug!("GET {url}");
        let response = self.request(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.json::<T>().map_err(|e| LoadError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Fetch a text resource. A 404 yields `None`.
    fn get_optional_text(&self, url: &str) -> Result<Option<String>, LoadError> {
        debug!("GET {url}");
        let response = self.request(url).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(Some(response.text()?))
    }
}

impl Loader for GithubLoader {
    fn fetch_files(&self) -> Result<Vec<FileDescriptor>, LoadError> {
        let entries: Vec<ContentEntry> = self.get_json(&self.contents_url())?;
        let raw = self.raw_repo_uri();
        Ok(entries
            .into_iter()
            .filter(|e| e.entry_type == "file")
            .map(|e| FileDescriptor {
                download_url: e
                    .download_url
                    .unwrap_or_else(|| format!("{raw}{}", e.path)),
                name: e.name,
                path: e.path,
            })
            .collect())
    }

    fn text_for(&self, file: &FileDescriptor) -> Result<String, LoadError> {
        self.get_optional_text(&file.download_url)?
            .ok_or_else(|| LoadError::Status {
                url: file.download_url.clone(),
                status: StatusCode::NOT_FOUND.as_u16(),
            })
    }

    fn raw_repo_uri(&self) -> String {
        let revision = self.revision.as_deref().unwrap_or("master");
        format!(
            "{}{}/{}/{revision}/",
            self.raw_base_url, self.owner, self.repo
        )
    }
}

impl RepositoryHost for GithubLoader {
    fn repository(&self) -> Result<RepositoryInfo, LoadError> {
        let repo: RepoResponse = self.get_json(&self.repo_url())?;
        Ok(RepositoryInfo {
            name: repo.name,
            owner_login: repo.owner.login,
            owner_url: repo.owner.html_url,
        })
    }

    fn commits(&self) -> Result<Vec<String>, LoadError> {
        let mut shas = Vec::new();
        for page in 1.. {
            let batch: Vec<CommitEntry> = self.get_json(&self.commits_url(page))?;
            let len = batch.len();
            shas.extend(batch.into_iter().map(|c| c.sha));
            if len < COMMITS_PER_PAGE {
                break;
            }
        }
        Ok(shas)
    }

    fn api_repo_uri(&self) -> String {
        self.repo_url()
    }
}
