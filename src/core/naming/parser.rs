use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::types::{MovieInfo, Quality, Site};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(19|20)\d{2}$").unwrap());
static RESOLUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(480[pi]|576[pi]|720p|1080[pi]|2160p|4k|8k)\b").unwrap());
static SOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(Remux|Blu[-. ]?Ray|BDRip|BRRip|WEB[-. ]?DL|WEBRip|WEB|HDTV|HDRip|DVDRip|DVD)\b")
        .unwrap()
});
static VCODEC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(x265|x264|h\.?265|h\.?264|hevc|avc)\b").unwrap());
// Channel layouts are glued to the codec ("DDP5.1", "AAC2.0").
static ACODEC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(DDP|DD\+|EAC3|AC3|DTS(?:-HD)?|TrueHD|AAC|FLAC)(?:\d\.\d)?(?:[^A-Za-z0-9]|$)")
        .unwrap()
});
static HDR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(HDR10\+?|HDR|HLG)\b").unwrap());
static GROUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-([A-Za-z0-9_@]+)$").unwrap());
static BRACKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[【]([^\[\]【】]*)[\]】]").unwrap());

/// Category tags Putao prefixes to its titles. They are not names.
const PUTAO_CATEGORIES: &[&str] = &[
    "欧美", "大陆", "港台", "日韩", "日本", "韩国", "华语", "其他", "电影", "纪录", "动漫",
];

#[derive(Debug, Clone, Copy)]
enum AltNameRule {
    LastCjk,
    FirstNonCategory,
}

/// Parse a release title using the generic bracket rules.
pub fn parse(raw: &str) -> MovieInfo {
    parse_with(raw, AltNameRule::LastCjk)
}

/// Parse a release title the way `site` publishes it.
pub fn parse_for_site(raw: &str, site: Site) -> MovieInfo {
    match site {
        Site::HdChina => parse_with(raw, AltNameRule::LastCjk),
        Site::Putao => parse_with(raw, AltNameRule::FirstNonCategory),
    }
}

fn parse_with(raw: &str, rule: AltNameRule) -> MovieInfo {
    let normalized: String = raw.nfkc().collect();
    let (rest, segments) = split_brackets(normalized.trim());

    let alt_name = match rule {
        AltNameRule::LastCjk => segments.iter().rev().find(|s| has_cjk(s)),
        AltNameRule::FirstNonCategory => segments
            .iter()
            .find(|s| has_cjk(s) && !PUTAO_CATEGORIES.contains(&s.as_str())),
    }
    .map(|s| first_alias(s));

    let mut release = rest.trim().to_string();
    if release.is_empty() {
        // Everything was bracketed: the release name is the latin segment.
        release = segments
            .iter()
            .rev()
            .find(|s| !has_cjk(s))
            .cloned()
            .unwrap_or_default();
    }

    let mut info = parse_release_name(&release);
    info.title = match alt_name {
        Some(name) if !name.is_empty() => name,
        _ => info.original_title.clone(),
    };
    info
}

fn split_brackets(s: &str) -> (String, Vec<String>) {
    let segments = BRACKET_RE
        .captures_iter(s)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|seg| !seg.is_empty())
        .collect();
    let rest = BRACKET_RE.replace_all(s, " ").into_owned();
    (rest, segments)
}

fn first_alias(segment: &str) -> String {
    segment.split('/').next().unwrap_or(segment).trim().to_string()
}

fn has_cjk(s: &str) -> bool {
    s.chars().any(|c| {
        matches!(c,
            '\u{3040}'..='\u{30FF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{AC00}'..='\u{D7AF}')
    })
}

fn is_strong_tag(token: &str) -> bool {
    RESOLUTION_RE.is_match(token) || VCODEC_RE.is_match(token)
}

fn is_tag(token: &str) -> bool {
    is_strong_tag(token) || SOURCE_RE.is_match(token)
}

/// Parse a dot/space separated scene name such as
/// `Movie.Name.2020.1080p.BluRay.x264-GROUP`. Title fields are left empty
/// when nothing title-like precedes the tags.
pub fn parse_release_name(release: &str) -> MovieInfo {
    let s = release.trim();
    let mut quality = Quality::default();

    let mut body = s;
    if let Some(caps) = GROUP_RE.captures(s) {
        // `WEB-DL` at the very end is a source, not a group
        let trailing_source = SOURCE_RE.find_iter(s).any(|m| m.end() == s.len());
        if let (false, Some(whole), Some(group)) = (trailing_source, caps.get(0), caps.get(1)) {
            let candidate = &s[..whole.start()];
            if candidate.split(['.', ' ', '_']).any(is_tag) {
                quality.group = group.as_str().to_string();
                body = candidate;
            }
        }
    }

    let tokens: Vec<&str> = body
        .split(['.', ' ', '_', '(', ')'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    // The year sits before resolution/codec. A year-like first token is part
    // of the title ("2012.2009.1080p").
    let strong_idx = tokens
        .iter()
        .position(|t| is_strong_tag(t))
        .unwrap_or(tokens.len());
    let year_idx = (1..strong_idx).rev().find(|&i| YEAR_RE.is_match(tokens[i]));

    let (title_tokens, year, tags_start) = match year_idx {
        Some(i) => (&tokens[..i], tokens[i].parse::<u16>().ok(), i + 1),
        None => {
            let tag_idx = tokens.iter().position(|t| is_tag(t)).unwrap_or(tokens.len());
            (&tokens[..tag_idx], None, tag_idx)
        }
    };

    // Tags are only read past the title, "Charlotte's.Web" is not a source.
    let tags = tokens[tags_start..].join(".");
    if let Some(m) = RESOLUTION_RE.find(&tags) {
        quality.resolution = canonical_resolution(m.as_str());
    }
    if let Some(m) = SOURCE_RE.find(&tags) {
        quality.source = canonical_source(m.as_str());
    }
    if let Some(m) = VCODEC_RE.find(&tags) {
        quality.video_codec = canonicalize_video_codec(m.as_str());
    }
    if let Some(codec) = ACODEC_RE.captures(&tags).and_then(|caps| caps.get(1)) {
        quality.audio_codec = canonical_audio_codec(codec.as_str());
    }
    quality.hdr = HDR_RE.is_match(&tags);

    let original_title = title_tokens
        .iter()
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    MovieInfo {
        title: original_title.clone(),
        original_title,
        year,
        quality,
        size: 0,
    }
}

fn canonical_resolution(s: &str) -> String {
    let l = s.to_ascii_lowercase();
    match l.as_str() {
        "4k" => "2160p".to_string(),
        "8k" => "4320p".to_string(),
        _ => l,
    }
}

fn canonical_source(s: &str) -> String {
    let compact: String = s
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    match compact.as_str() {
        "remux" => "Remux",
        "bluray" => "BluRay",
        "bdrip" => "BDRip",
        "brrip" => "BRRip",
        "webdl" => "WEB-DL",
        "webrip" => "WEBRip",
        "web" => "WEB",
        "hdtv" => "HDTV",
        "hdrip" => "HDRip",
        "dvdrip" => "DVDRip",
        "dvd" => "DVD",
        _ => s,
    }
    .to_string()
}

fn canonical_audio_codec(s: &str) -> String {
    if s == "DD+" {
        "DDP".to_string()
    } else {
        s.to_string()
    }
}

fn canonicalize_video_codec(s: &str) -> String {
    let l = s.to_ascii_lowercase();
    if l.contains("265") || l == "hevc" {
        "x265".to_string()
    } else if l.contains("264") || l == "avc" {
        "x264".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_scene_name() {
        let info = parse("Movie.Name.2020.1080p.BluRay-GROUP");
        assert_eq!(info.title, "Movie Name");
        assert_eq!(info.original_title, "Movie Name");
        assert_eq!(info.year, Some(2020));
        assert_eq!(info.quality.resolution, "1080p");
        assert_eq!(info.quality.source, "BluRay");
        assert_eq!(info.quality.group, "GROUP");
        assert_eq!(info.size, 0);
    }

    #[test]
    fn parses_full_tag_set() {
        let info = parse("The.Matrix.1999.2160p.UHD.Blu-ray.HDR10.HEVC.TrueHD.7.1-CtrlHD");
        assert_eq!(info.original_title, "The Matrix");
        assert_eq!(info.year, Some(1999));
        assert_eq!(info.quality.resolution, "2160p");
        assert_eq!(info.quality.source, "BluRay");
        assert_eq!(info.quality.video_codec, "x265");
        assert_eq!(info.quality.audio_codec, "TrueHD");
        assert_eq!(info.quality.group, "CtrlHD");
        assert!(info.quality.hdr);
    }

    #[test]
    fn hdchina_trailing_chinese_name() {
        let info = parse_for_site(
            "Inception 2010 1080p BluRay x264 DTS-WiKi [盗梦空间/全面启动]",
            Site::HdChina,
        );
        assert_eq!(info.title, "盗梦空间");
        assert_eq!(info.original_title, "Inception");
        assert_eq!(info.year, Some(2010));
        assert_eq!(info.quality.video_codec, "x264");
        assert_eq!(info.quality.audio_codec, "DTS");
        assert_eq!(info.quality.group, "WiKi");
    }

    #[test]
    fn putao_skips_category_tags() {
        let info = parse_for_site(
            "[欧美][星际穿越][Interstellar.2014.1080p.BluRay.x264-SPARKS]",
            Site::Putao,
        );
        assert_eq!(info.title, "星际穿越");
        assert_eq!(info.original_title, "Interstellar");
        assert_eq!(info.year, Some(2014));
        assert_eq!(info.quality.group, "SPARKS");
    }

    #[test]
    fn site_rules_pick_different_names() {
        let raw = "[大陆][流浪地球][Extra] The.Wandering.Earth.2019.1080p.WEB-DL [国语]";
        assert_eq!(parse_for_site(raw, Site::Putao).title, "流浪地球");
        assert_eq!(parse_for_site(raw, Site::HdChina).title, "国语");
    }

    #[test]
    fn fullwidth_brackets_are_normalized() {
        let info = parse("［黑客帝国］The.Matrix.1999.720p.HDTV");
        assert_eq!(info.title, "黑客帝国");
        assert_eq!(info.original_title, "The Matrix");
        assert_eq!(info.quality.resolution, "720p");
        assert_eq!(info.quality.source, "HDTV");
    }

    #[test]
    fn trailing_web_dl_is_not_a_group() {
        let info = parse("Movie.Name.2021.1080p.WEB-DL");
        assert_eq!(info.quality.source, "WEB-DL");
        assert_eq!(info.quality.group, "");
    }

    #[test]
    fn numeric_titles_keep_their_number() {
        let info = parse("2012.2009.1080p.BluRay.x264-HDChina");
        assert_eq!(info.original_title, "2012");
        assert_eq!(info.year, Some(2009));

        let info = parse("Blade.Runner.2049.2017.1080p.WEB-DL.DDP5.1.H.264-NTG");
        assert_eq!(info.original_title, "Blade Runner 2049");
        assert_eq!(info.year, Some(2017));
        assert_eq!(info.quality.video_codec, "x264");
    }

    #[test]
    fn source_word_inside_title_before_year() {
        let info = parse("Charlotte's.Web.2006.1080p.BluRay.x264-GROUP");
        assert_eq!(info.original_title, "Charlotte's Web");
        assert_eq!(info.year, Some(2006));
        assert_eq!(info.quality.source, "BluRay");

        let info = parse("The.Web.2019.1080p.WEB-DL");
        assert_eq!(info.original_title, "The Web");
        assert_eq!(info.quality.source, "WEB-DL");

        let info = parse("The.Web.2019.1080p.x264");
        assert_eq!(info.quality.source, "");
    }

    #[test]
    fn hdr_word_in_title_is_not_a_flag() {
        let info = parse("HDR.Story.2015.720p.WEB");
        assert_eq!(info.original_title, "HDR Story");
        assert!(!info.quality.hdr);
    }

    #[test]
    fn audio_codec_with_channel_layout() {
        let cases = [
            ("Dune.2021.2160p.WEB-DL.DDP5.1.Atmos.H.265-FLUX", "DDP"),
            ("Dune.2021.1080p.WEB-DL.DD+5.1.H.264-FLUX", "DDP"),
            ("Up.2009.720p.BluRay.AAC2.0.x264-GROUP", "AAC"),
            ("Heat.1995.1080p.BluRay.DTS-HD.MA.5.1.x264-GROUP", "DTS-HD"),
            ("Heat.1995.1080p.BluRay.EAC3.x264-GROUP", "EAC3"),
        ];
        for (raw, codec) in cases {
            assert_eq!(parse(raw).quality.audio_codec, codec, "{raw}");
        }
        assert_eq!(parse("Heat.1995.1080p.BluRay.DDPA.x264").quality.audio_codec, "");
    }

    #[test]
    fn missing_year_uses_tags_as_boundary() {
        let info = parse("Some.Movie.BluRay.x264");
        assert_eq!(info.original_title, "Some Movie");
        assert_eq!(info.year, None);
        assert_eq!(info.quality.group, "");
    }

    #[test]
    fn hyphenated_title_without_tags_keeps_dash() {
        let info = parse("Spider-Man");
        assert_eq!(info.original_title, "Spider-Man");
        assert_eq!(info.quality.group, "");
    }

    #[test]
    fn only_chinese_name() {
        let info = parse("[霸王别姬]");
        assert_eq!(info.title, "霸王别姬");
        assert_eq!(info.original_title, "");
        assert_eq!(info.year, None);
    }

    #[test]
    fn garbage_never_panics() {
        for raw in [
            "",
            " ",
            "-",
            "[]",
            "【",
            "]]][[[",
            "....",
            "-GROUP",
            "1999",
            "🎬.2020.🎞️-💥",
            "a\u{0}b\u{FFFF}.1080p",
        ] {
            let info = parse(raw);
            assert_eq!(info.size, 0);
            let _ = parse_for_site(raw, Site::Putao);
        }
        assert_eq!(parse("").title, "");
        assert_eq!(parse("1999").year, None);
    }
}
