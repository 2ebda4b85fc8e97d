//! Detection of user agents that mishandle `SameSite=None` cookies, after
//! Chromium's list of incompatible clients.

use std::sync::OnceLock;

use regex::Regex;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static CELL: OnceLock<Regex> = OnceLock::new();
            CELL.get_or_init(|| Regex::new($re).expect("invalid user agent pattern"))
        }
    };
}

pattern!(ios_version, r"\(iP.+; CPU .*OS (\d+)[_\d]*.*\) AppleWebKit/");
pattern!(macosx_version, r"\(Macintosh;.*Mac OS X (\d+)_(\d+)[_\d]*.*\) AppleWebKit/");
pattern!(safari, r"Version/.* Safari/");
pattern!(
    mac_embedded_browser,
    r"^Mozilla/[\.\d]+ \(Macintosh;.*Mac OS X [_\d]+\) AppleWebKit/[\.\d]+ \(KHTML, like Gecko\)$"
);
pattern!(chromium_version, r"Chrom[^ /]+/(\d+)[\.\d]* ");
pattern!(uc_browser_version, r"UCBrowser/(\d+)\.(\d+)\.(\d+)[\.\d]* ");

fn capture(re: &Regex, user_agent: &str, group: usize) -> Option<u32> {
    re.captures(user_agent)?.get(group)?.as_str().parse().ok()
}

pub fn should_set_same_site_to_none(user_agent: &str) -> bool {
    !user_agent.is_empty() && !is_same_site_none_incompatible(user_agent)
}

pub fn is_same_site_none_incompatible(user_agent: &str) -> bool {
    has_webkit_same_site_bug(user_agent) || drops_unrecognized_same_site_cookies(user_agent)
}

fn has_webkit_same_site_bug(user_agent: &str) -> bool {
    is_ios_version(12, user_agent)
        || (is_macosx_version(10, 14, user_agent)
            && (is_safari(user_agent) || is_mac_embedded_browser(user_agent)))
}

fn drops_unrecognized_same_site_cookies(user_agent: &str) -> bool {
    if is_uc_browser(user_agent) {
        return !is_uc_browser_version_at_least(12, 13, 2, user_agent);
    }
    is_chromium_based(user_agent)
        && is_chromium_version_at_least(51, user_agent)
        && !is_chromium_version_at_least(67, user_agent)
}

fn is_ios_version(major: u32, user_agent: &str) -> bool {
    capture(ios_version(), user_agent, 1) == Some(major)
}

fn is_macosx_version(major: u32, minor: u32, user_agent: &str) -> bool {
    capture(macosx_version(), user_agent, 1) == Some(major)
        && capture(macosx_version(), user_agent, 2) == Some(minor)
}

fn is_safari(user_agent: &str) -> bool {
    safari().is_match(user_agent) && !is_chromium_based(user_agent)
}

fn is_mac_embedded_browser(user_agent: &str) -> bool {
    mac_embedded_browser().is_match(user_agent)
}

fn is_chromium_based(user_agent: &str) -> bool {
    user_agent.contains("Chrome") || user_agent.contains("Chromium")
}

fn is_chromium_version_at_least(major: u32, user_agent: &str) -> bool {
    matches!(capture(chromium_version(), user_agent, 1), Some(v) if v >= major)
}

fn is_uc_browser(user_agent: &str) -> bool {
    user_agent.contains("UCBrowser/")
}

fn is_uc_browser_version_at_least(major: u32, minor: u32, build: u32, user_agent: &str) -> bool {
    let caps = match uc_browser_version().captures(user_agent) {
        Some(caps) => caps,
        None => return false,
    };
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    match (part(1), part(2), part(3)) {
        (Some(found_major), Some(found_minor), Some(found_build)) => {
            (found_major, found_minor, found_build) >= (major, minor, build)
        }
        _ => false,
    }
}
