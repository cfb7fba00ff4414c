use crate::url::parts::split_url;
use crate::{UrlError, UrlResult};

/// Encodes a host into its ASCII-compatible (IDNA) form
///
/// Uses the strict UTS #46 profile: non-ASCII labels become `xn--` punycode,
/// uppercase is folded, and anything outside letters, digits, hyphens and
/// dots (underscores, brackets, spaces) is rejected.
///
/// # Examples
///
/// ```
/// use aaaa_sieve::url::encode_host;
///
/// assert_eq!(encode_host("bücher.example").unwrap(), "xn--bcher-kva.example");
/// assert_eq!(encode_host("EXAMPLE.com").unwrap(), "example.com");
/// assert!(encode_host("under_score.example").is_err());
/// ```
pub fn encode_host(host: &str) -> UrlResult<String> {
    idna::domain_to_ascii_strict(host).map_err(|e| UrlError::Encoding {
        host: host.to_string(),
        reason: e.to_string(),
    })
}

/// Normalizes a single URL line by IDNA-encoding its host
///
/// The line is trimmed first. Everything except the host is kept verbatim;
/// no scheme is added and no trailing slash is introduced. Bracketed IPv6
/// literals are not domain names and pass through untouched.
///
/// # Arguments
///
/// * `line` - One raw line of input
///
/// # Returns
///
/// * `Ok(String)` - The line with its host re-encoded
/// * `Err(UrlError)` - The line has no host or the host cannot be encoded
///
/// # Examples
///
/// ```
/// use aaaa_sieve::url::normalize_entry;
///
/// let url = normalize_entry("  http://Bücher.example/Katalog  ").unwrap();
/// assert_eq!(url, "http://xn--bcher-kva.example/Katalog");
/// ```
pub fn normalize_entry(line: &str) -> UrlResult<String> {
    let line = line.trim();
    let parts = split_url(line);

    if parts.host.is_empty() {
        return Err(UrlError::MissingHost(line.to_string()));
    }

    if parts.host.starts_with('[') {
        return Ok(line.to_string());
    }

    let encoded = encode_host(parts.host)?;
    Ok(parts.with_host(&encoded))
}
