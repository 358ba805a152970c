//! Social platform table: host matching, username extraction, probe URLs and
//! body heuristics.
//!
//! Each platform carries its own rules as a closed enum variant instead of a
//! string-keyed dispatch table, so adding a platform is a compile-time event.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Platforms the engine knows how to recognize and probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Instagram,
    X,
    Facebook,
    YouTube,
    TikTok,
    LinkedIn,
    GitHub,
    Pinterest,
    Reddit,
    Telegram,
    Medium,
}

/// All known platforms, in probe order.
pub const ALL_PLATFORMS: &[Platform] = &[
    Platform::Instagram,
    Platform::X,
    Platform::Facebook,
    Platform::YouTube,
    Platform::TikTok,
    Platform::LinkedIn,
    Platform::GitHub,
    Platform::Pinterest,
    Platform::Reddit,
    Platform::Telegram,
    Platform::Medium,
];

/// Platform subset that drives the social availability score.
pub const CRITICAL_PLATFORMS: &[Platform] = &[
    Platform::Instagram,
    Platform::X,
    Platform::Facebook,
    Platform::YouTube,
    Platform::TikTok,
    Platform::LinkedIn,
];

static HOST_PATTERNS: Lazy<Vec<(Platform, Regex)>> = Lazy::new(|| {
    vec![
        (Platform::Instagram, Regex::new(r"(?i)^(www\.)?instagram\.com$").unwrap()),
        (Platform::X, Regex::new(r"(?i)^(www\.|mobile\.)?(twitter|x)\.com$").unwrap()),
        (Platform::Facebook, Regex::new(r"(?i)^(www\.|m\.)?(facebook|fb)\.com$").unwrap()),
        (Platform::YouTube, Regex::new(r"(?i)^(www\.|m\.)?youtube\.com$").unwrap()),
        (Platform::TikTok, Regex::new(r"(?i)^(www\.)?tiktok\.com$").unwrap()),
        (Platform::LinkedIn, Regex::new(r"(?i)^([a-z]{2}\.|www\.)?linkedin\.com$").unwrap()),
        (Platform::GitHub, Regex::new(r"(?i)^(www\.)?github\.com$").unwrap()),
        (Platform::Pinterest, Regex::new(r"(?i)^(www\.)?pinterest(\.[a-z]{2,3})?\.com$").unwrap()),
        (Platform::Reddit, Regex::new(r"(?i)^(www\.|old\.)?reddit\.com$").unwrap()),
        (Platform::Telegram, Regex::new(r"(?i)^t\.me$").unwrap()),
        (Platform::Medium, Regex::new(r"(?i)^(www\.)?medium\.com$").unwrap()),
    ]
});

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::X => "x",
            Platform::Facebook => "facebook",
            Platform::YouTube => "youtube",
            Platform::TikTok => "tiktok",
            Platform::LinkedIn => "linkedin",
            Platform::GitHub => "github",
            Platform::Pinterest => "pinterest",
            Platform::Reddit => "reddit",
            Platform::Telegram => "telegram",
            Platform::Medium => "medium",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        ALL_PLATFORMS.iter().copied().find(|p| {
            p.name() == name || (name == "twitter" && *p == Platform::X)
        })
    }

    /// Match a hostname to a platform.
    pub fn from_host(host: &str) -> Option<Self> {
        HOST_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(host))
            .map(|(p, _)| *p)
    }

    /// Canonical profile URL probed for a username.
    pub fn profile_url(&self, username: &str) -> String {
        let username = username.trim_start_matches('@');
        match self {
            Platform::Instagram => format!("https://www.instagram.com/{}/", username),
            Platform::X => format!("https://x.com/{}", username),
            Platform::Facebook => format!("https://www.facebook.com/{}", username),
            Platform::YouTube => format!("https://www.youtube.com/@{}", username),
            Platform::TikTok => format!("https://www.tiktok.com/@{}", username),
            Platform::LinkedIn => format!("https://www.linkedin.com/company/{}", username),
            Platform::GitHub => format!("https://github.com/{}", username),
            Platform::Pinterest => format!("https://www.pinterest.com/{}/", username),
            Platform::Reddit => format!("https://www.reddit.com/user/{}/", username),
            Platform::Telegram => format!("https://t.me/{}", username),
            Platform::Medium => format!("https://medium.com/@{}", username),
        }
    }

    /// Body phrases that prove the profile does NOT exist even under HTTP 200.
    /// Several platforms serve soft-404 pages with a 200 status.
    pub fn negative_markers(&self) -> &'static [&'static str] {
        match self {
            Platform::Instagram => &[
                "sorry, this page isn't available",
                "page not found",
            ],
            Platform::X => &["this account doesn't exist", "account suspended"],
            Platform::Facebook => &[
                "this content isn't available right now",
                "page isn't available",
            ],
            Platform::YouTube => &["this page isn't available", "404 not found"],
            Platform::TikTok => &["couldn't find this account", "page not available"],
            Platform::LinkedIn => &["page not found", "this page doesn't exist"],
            Platform::GitHub => &["not found", "page not found"],
            Platform::Pinterest => &["sorry! we couldn't find that page"],
            Platform::Reddit => &[
                "sorry, nobody on reddit goes by that name",
                "page not found",
            ],
            Platform::Telegram => &[],
            Platform::Medium => &["page not found", "out of nothing, something"],
        }
    }

    /// Body markers that positively identify a real profile page.
    pub fn positive_markers(&self) -> &'static [&'static str] {
        match self {
            Platform::Instagram => &["\"profilepage_", "og:type\" content=\"profile"],
            Platform::X => &["profile:username", "followers_count"],
            Platform::Facebook => &["og:type\" content=\"profile", "pagelikes"],
            Platform::YouTube => &["\"canonicalbaseurl\"", "subscribercounttext"],
            Platform::TikTok => &["\"uniqueid\":", "followercount"],
            Platform::LinkedIn => &["organization", "\"companypage\""],
            Platform::GitHub => &["itemprop=\"name\"", "contributions"],
            Platform::Pinterest => &["profile_follower_count", "og:type\" content=\"profile"],
            Platform::Reddit => &["\"kind\": \"t2\"", "karma"],
            Platform::Telegram => &["tgme_page_title", "tgme_page_extra"],
            Platform::Medium => &["profile/he", "og:type\" content=\"profile"],
        }
    }
}

/// Extract a social username from an observed URL, applying per-platform
/// exceptions. Returns None when the URL is not a profile-shaped path.
pub fn extract_username(url: &str) -> Option<(Platform, String)> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let platform = Platform::from_host(host)?;

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let raw = match platform {
        Platform::YouTube => match segments.first().copied() {
            // /@handle, /channel/<id>, /c/<name>, /user/<name>
            Some(first) if first.starts_with('@') => Some(first),
            Some("channel") | Some("c") | Some("user") => segments.get(1).copied(),
            _ => None,
        },
        Platform::TikTok | Platform::Medium => match segments.first().copied() {
            Some(first) if first.starts_with('@') => Some(first),
            _ => None,
        },
        Platform::LinkedIn => match segments.first().copied() {
            Some("in") | Some("company") | Some("school") => segments.get(1).copied(),
            _ => None,
        },
        Platform::Reddit => match segments.first().copied() {
            Some("user") | Some("u") => segments.get(1).copied(),
            _ => None,
        },
        Platform::Facebook => match segments.first().copied() {
            // profile.php?id=123 carries a numeric id, not a handle
            Some("profile.php") => None,
            Some("people") => segments.get(1).copied(),
            Some(first) if !is_reserved_segment(platform, first) => Some(first),
            _ => None,
        },
        _ => match segments.first().copied() {
            Some(first) if !is_reserved_segment(platform, first) => Some(first),
            _ => None,
        },
    }?;

    let username = raw.trim_start_matches('@').trim_end_matches('/');
    if username.is_empty() || username.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((platform, username.to_string()))
}

/// Path segments that are platform features, not usernames.
fn is_reserved_segment(platform: Platform, segment: &str) -> bool {
    let seg = segment.to_lowercase();
    let common = [
        "search", "explore", "about", "help", "home", "login", "signup", "settings",
        "privacy", "terms", "tag", "tags", "hashtag", "share", "intent", "stories",
    ];
    if common.contains(&seg.as_str()) {
        return true;
    }
    let per_platform: &[&str] = match platform {
        Platform::Instagram => &["p", "reel", "reels", "tv", "accounts"],
        Platform::X => &["i", "messages", "notifications", "compose"],
        Platform::Facebook => &["pages", "groups", "events", "marketplace", "watch"],
        Platform::GitHub => &["orgs", "topics", "features", "marketplace", "sponsors"],
        Platform::Pinterest => &["pin", "ideas", "today"],
        Platform::Reddit => &["r", "comments", "subreddits"],
        _ => &[],
    };
    per_platform.contains(&seg.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_handle() {
        let (platform, username) = extract_username("https://instagram.com/linkpulse/").unwrap();
        assert_eq!(platform, Platform::Instagram);
        assert_eq!(username, "linkpulse");
    }

    #[test]
    fn test_extract_strips_at_prefix() {
        let (platform, username) = extract_username("https://www.tiktok.com/@linkpulse").unwrap();
        assert_eq!(platform, Platform::TikTok);
        assert_eq!(username, "linkpulse");
    }

    #[test]
    fn test_extract_youtube_variants() {
        for url in [
            "https://www.youtube.com/@linkpulse",
            "https://www.youtube.com/c/linkpulse",
            "https://www.youtube.com/user/linkpulse",
        ] {
            let (platform, username) = extract_username(url).unwrap();
            assert_eq!(platform, Platform::YouTube, "url {}", url);
            assert_eq!(username, "linkpulse");
        }
        // Bare /watch paths are not profiles
        assert!(extract_username("https://www.youtube.com/watch?v=abc").is_none());
    }

    #[test]
    fn test_facebook_profile_php_is_not_a_handle() {
        assert!(extract_username("https://www.facebook.com/profile.php?id=1234567").is_none());
        let (_, username) = extract_username("https://www.facebook.com/linkpulse").unwrap();
        assert_eq!(username, "linkpulse");
    }

    #[test]
    fn test_reserved_segments_rejected() {
        assert!(extract_username("https://instagram.com/p/Cabc123/").is_none());
        assert!(extract_username("https://twitter.com/i/flow/login").is_none());
        assert!(extract_username("https://github.com/topics/rust").is_none());
    }

    #[test]
    fn test_twitter_and_x_both_map_to_x() {
        let (a, _) = extract_username("https://twitter.com/linkpulse").unwrap();
        let (b, _) = extract_username("https://x.com/linkpulse").unwrap();
        assert_eq!(a, Platform::X);
        assert_eq!(b, Platform::X);
    }

    #[test]
    fn test_non_platform_host() {
        assert!(extract_username("https://linkpulse.com/about").is_none());
    }

    #[test]
    fn test_profile_urls_normalize_at() {
        assert_eq!(
            Platform::TikTok.profile_url("@linkpulse"),
            "https://www.tiktok.com/@linkpulse"
        );
        assert_eq!(
            Platform::GitHub.profile_url("linkpulse"),
            "https://github.com/linkpulse"
        );
    }
}
