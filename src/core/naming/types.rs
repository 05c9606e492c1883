use serde::Serialize;

/// Trackers we know how to read. Each one publishes titles with its own
/// bracket conventions, see `parse_for_site`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    HdChina,
    Putao,
}

pub const HDC_SITE_NAME: &str = "HDChina";
pub const PUTAO_SITE_NAME: &str = "Putao";

impl Site {
    pub fn name(&self) -> &'static str {
        match self {
            Site::HdChina => HDC_SITE_NAME,
            Site::Putao => PUTAO_SITE_NAME,
        }
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quality {
    pub resolution: String, // "1080p", "2160p"
    pub source: String,     // "BluRay", "WEB-DL"
    pub video_codec: String,
    pub audio_codec: String,
    pub group: String,
    pub hdr: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInfo {
    pub title: String,
    pub original_title: String,
    pub year: Option<u16>,
    pub quality: Quality,
    pub size: u64,
}

/// A parsed listing tagged with the tracker it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PtMovie {
    pub id: String,
    #[serde(flatten)]
    pub info: MovieInfo,
    pub site_name: String,
}
