//! Scraper for gobuster directory-enumeration output

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[allow(clippy::expect_used)] // Static initialization with hardcoded regexes
static STATUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Status:\s*(\d+)").expect("Hardcoded status regex should be valid"));

#[allow(clippy::expect_used)]
static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Size:\s*(\d+)").expect("Hardcoded size regex should be valid"));

// Only absolute redirect targets count; relative ones like `[--> login.php]`
// carry no location worth following.
#[allow(clippy::expect_used)]
static REDIRECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\s*-->\s*(https?://[^\]\s]+)\s*\]")
        .expect("Hardcoded redirect regex should be valid")
});

/// Directory vs file hint for a discovered endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Directory,
    File,
    Unknown,
}

/// A single discovered endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    pub status: Option<u16>,
    pub size: Option<u64>,
    pub redirect: Option<String>,
    pub kind: EndpointKind,
}

/// Parsed result of one gobuster run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GobusterScan {
    /// Run metadata from `[+] Key: value` banner lines, keys normalized
    pub metadata: BTreeMap<String, String>,
    pub endpoints: Vec<Endpoint>,
}

/// Parse gobuster stdout into metadata and endpoints
pub fn parse(stdout: &str) -> GobusterScan {
    let mut scan = GobusterScan::default();

    for line in stdout.lines() {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("[+]") {
            if let Some((key, value)) = rest.split_once(':') {
                scan.metadata.insert(
                    key.trim().to_lowercase().replace(' ', "_"),
                    value.trim().to_string(),
                );
            }
        } else if line.starts_with('/') {
            if let Some(endpoint) = parse_endpoint_line(line) {
                scan.endpoints.push(endpoint);
            }
        }
    }

    scan
}

fn parse_endpoint_line(line: &str) -> Option<Endpoint> {
    let (path, rest) = line.split_once('(')?;
    let path = path.trim().to_lowercase();

    let status = STATUS_RE
        .captures(rest)
        .and_then(|c| c[1].parse::<u16>().ok());
    let size = SIZE_RE.captures(rest).and_then(|c| c[1].parse::<u64>().ok());
    let redirect = REDIRECT_RE.captures(rest).map(|c| c[1].to_string());
    let kind = classify(&path, status, redirect.as_deref());

    Some(Endpoint {
        path,
        status,
        size,
        redirect,
        kind,
    })
}

/// Classify an endpoint as directory, file, or unknown
pub fn classify(path: &str, status: Option<u16>, redirect: Option<&str>) -> EndpointKind {
    if let Some(redirect) = redirect {
        if redirect.ends_with('/') {
            return EndpointKind::Directory;
        }
    }

    if path.rsplit('/').next().is_some_and(|segment| segment.contains('.')) {
        return EndpointKind::File;
    }

    if matches!(status, Some(301) | Some(302)) && redirect.is_some() {
        return EndpointKind::Directory;
    }

    EndpointKind::Unknown
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const SAMPLE_OUTPUT: &str = "\
===============================================================
Gobuster v3.6
by OJ Reeves (@TheColonial) & Christian Mehlmauer (@firefart)
===============================================================
[+] Url:                     http://192.168.56.103
[+] Method:                  GET
[+] Threads:                 10
[+] Wordlist:                /usr/share/wordlists/dirb/common.txt
[+] Negative Status codes:   404
[+] Timeout:                 10s
===============================================================
Starting gobuster in directory enumeration mode
===============================================================
/.hta                 (Status: 403) [Size: 278]
/css                  (Status: 301) [Size: 316] [--> http://192.168.56.103/css/]
/index.php            (Status: 302) [Size: 0] [--> login.php]
/server-status        (Status: 403) [Size: 281]
===============================================================
Finished
===============================================================
";

    #[test]
    fn test_metadata_normalized() {
        let scan = parse(SAMPLE_OUTPUT);
        assert_eq!(
            scan.metadata.get("url").map(String::as_str),
            Some("http://192.168.56.103")
        );
        assert_eq!(
            scan.metadata.get("negative_status_codes").map(String::as_str),
            Some("404")
        );
        assert_eq!(
            scan.metadata.get("wordlist").map(String::as_str),
            Some("/usr/share/wordlists/dirb/common.txt")
        );
    }

    #[test]
    fn test_endpoints_parsed() {
        let scan = parse(SAMPLE_OUTPUT);
        assert_eq!(scan.endpoints.len(), 4);

        let hta = &scan.endpoints[0];
        assert_eq!(hta.path, "/.hta");
        assert_eq!(hta.status, Some(403));
        assert_eq!(hta.size, Some(278));
        assert_eq!(hta.redirect, None);
        assert_eq!(hta.kind, EndpointKind::File);

        let css = &scan.endpoints[1];
        assert_eq!(css.status, Some(301));
        assert_eq!(css.redirect.as_deref(), Some("http://192.168.56.103/css/"));
        assert_eq!(css.kind, EndpointKind::Directory);
    }

    #[test]
    fn test_classify_redirect_to_slash_is_directory() {
        assert_eq!(
            classify("/admin", Some(301), Some("http://x/admin/")),
            EndpointKind::Directory
        );
    }

    #[test]
    fn test_classify_dotted_segment_is_file() {
        assert_eq!(classify("/index.php", Some(302), Some("login.php")), EndpointKind::File);
    }

    #[test]
    fn test_classify_redirect_status_without_slash_is_directory() {
        assert_eq!(
            classify("/admin", Some(302), Some("http://x/login")),
            EndpointKind::Directory
        );
    }

    #[test]
    fn test_relative_redirect_is_not_captured() {
        let scan = parse("/admin                (Status: 302) [Size: 0] [--> login]\n");
        assert_eq!(scan.endpoints.len(), 1);
        assert_eq!(scan.endpoints[0].redirect, None);
        assert_eq!(scan.endpoints[0].kind, EndpointKind::Unknown);

        // The sample's relative php redirect still classifies by extension.
        let scan = parse(SAMPLE_OUTPUT);
        let index = &scan.endpoints[2];
        assert_eq!(index.path, "/index.php");
        assert_eq!(index.redirect, None);
        assert_eq!(index.kind, EndpointKind::File);
    }

    #[test]
    fn test_classify_plain_path_is_unknown() {
        assert_eq!(classify("/admin", Some(403), None), EndpointKind::Unknown);
    }

    #[test]
    fn test_empty_output() {
        let scan = parse("");
        assert!(scan.metadata.is_empty());
        assert!(scan.endpoints.is_empty());
    }
}
