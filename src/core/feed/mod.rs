use reqwest::Client;

use crate::core::naming::{parse_for_site, PtMovie, Site};
use crate::utils::{Error, SyncResult};

/// RSS link to retrieve HDChina movies, the passkey is appended at request time.
pub const HDC_RSS_URL: &str = "https://hdchina.org/torrentrss.php?rows=50&cat17=1&cat9=1&isize=1";
/// RSS link to retrieve Putao movies, no passkey needed.
pub const PUTAO_RSS_URL: &str =
    "https://pt.sjtu.edu.cn/torrentrss.php?rows=50&cat401=1&cat402=1&cat403=1&sta1=1&sta3=1&isize=1";
pub const HDC_PASSKEY_ENV_VAR: &str = "HDC_PASSKEY";

/// Where a feed's passkey comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Passkey {
    /// Read from this environment variable on every request.
    Env(String),
    /// Given directly, e.g. through the config file.
    Value(String),
}

/// One tracker feed: where to fetch it and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub site: Site,
    pub url: String,
    pub passkey: Option<Passkey>,
}

impl FeedSource {
    pub fn new(site: Site, url: &str, passkey: Option<Passkey>) -> Self {
        Self {
            site,
            url: url.to_string(),
            passkey,
        }
    }

    /// The URL to fetch. An environment passkey is looked up on every call,
    /// so an unset variable fails the request rather than the process.
    pub fn resolve_url(&self) -> SyncResult<String> {
        match &self.passkey {
            Some(Passkey::Env(var)) => add_passkey(&self.url, var),
            Some(Passkey::Value(value)) if !value.is_empty() => {
                Ok(with_passkey(&self.url, value))
            }
            Some(Passkey::Value(_)) => Err(Error::MissingPasskey(self.site.to_string())),
            None => Ok(self.url.clone()),
        }
    }
}

pub fn add_passkey(url: &str, env_var: &str) -> SyncResult<String> {
    match std::env::var(env_var) {
        Ok(value) if !value.is_empty() => Ok(with_passkey(url, &value)),
        _ => Err(Error::MissingEnvVar(env_var.to_string())),
    }
}

fn with_passkey(url: &str, value: &str) -> String {
    format!("{url}&passkey={value}")
}

pub async fn fetch_feed(client: &Client, url: &str) -> SyncResult<rss::Channel> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: redact_passkey(url),
            status,
        });
    }

    let bytes = response.bytes().await?;
    let channel = rss::Channel::read_from(&bytes[..])?;
    Ok(channel)
}

/// Fetch `source` and parse every item. Errors are returned to the caller,
/// which decides whether a failed feed is fatal.
pub async fn fetch_movies(
    client: &Client,
    source: &FeedSource,
    url: &str,
) -> SyncResult<Vec<PtMovie>> {
    let channel = fetch_feed(client, url).await?;
    tracing::info!(
        "got {} feed from {}, contains {} items",
        source.site,
        channel.title(),
        channel.items().len()
    );
    Ok(parse_feed_items(channel.items(), source.site))
}

pub fn parse_feed_items(items: &[rss::Item], site: Site) -> Vec<PtMovie> {
    items.iter().map(|item| parse_feed_item(item, site)).collect()
}

pub fn parse_feed_item(item: &rss::Item, site: Site) -> PtMovie {
    let mut info = parse_for_site(item.title().unwrap_or_default(), site);
    if let Some(size) = enclosure_size(item) {
        info.size = size;
    }

    PtMovie {
        id: item.link().map(extract_id).unwrap_or_default(),
        info,
        site_name: site.name().to_string(),
    }
}

/// Byte length advertised by the item's enclosure, if it is a valid number.
/// The value must be digits only, surrounding whitespace included.
pub fn enclosure_size(item: &rss::Item) -> Option<u64> {
    let length = item.enclosure()?.length();
    if length.is_empty() {
        return None;
    }
    length.parse::<u64>().ok()
}

/// Everything after the last `id=` in `url`, trimmed. The value runs to the
/// end of the string, later query parameters included.
pub fn extract_id(url: &str) -> String {
    match url.rfind("id=") {
        Some(i) => url[i + 3..].trim().to_string(),
        None => String::new(),
    }
}

fn redact_passkey(url: &str) -> String {
    match url.find("&passkey=") {
        Some(i) => format!("{}&passkey=***", &url[..i]),
        None => url.to_string(),
    }
}
