use crate::{UrlError, UrlResult};
use ::url::{Host, ParseError, Url};

/// A URL line split around its host
///
/// Splitting is purely syntactic: nothing is validated or decoded, so
/// `prefix + userinfo@ + host + :port + rest` always rebuilds the input.
/// Lines without a scheme are accepted; their authority runs up to the
/// first `/`, `?` or `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    /// Everything before the authority (`"https://"`, `"//"` or `""`)
    pub prefix: &'a str,

    /// Userinfo without the trailing `@`
    pub userinfo: Option<&'a str>,

    /// Host as written, including brackets for IPv6 literals
    pub host: &'a str,

    /// Port without the leading `:`
    pub port: Option<&'a str>,

    /// Path, query and fragment
    pub rest: &'a str,
}

impl<'a> UrlParts<'a> {
    /// Rebuilds the line with `host` substituted for the original host
    pub fn with_host(&self, host: &str) -> String {
        let mut rebuilt = String::with_capacity(
            self.prefix.len() + host.len() + self.rest.len() + 16,
        );
        rebuilt.push_str(self.prefix);
        if let Some(userinfo) = self.userinfo {
            rebuilt.push_str(userinfo);
            rebuilt.push('@');
        }
        rebuilt.push_str(host);
        if let Some(port) = self.port {
            rebuilt.push(':');
            rebuilt.push_str(port);
        }
        rebuilt.push_str(self.rest);
        rebuilt
    }
}

/// Splits a URL line into prefix, authority components and remainder
///
/// # Examples
///
/// ```
/// use aaaa_sieve::url::split_url;
///
/// let parts = split_url("https://user@example.com:8443/a?b#c");
/// assert_eq!(parts.prefix, "https://");
/// assert_eq!(parts.userinfo, Some("user"));
/// assert_eq!(parts.host, "example.com");
/// assert_eq!(parts.port, Some("8443"));
/// assert_eq!(parts.rest, "/a?b#c");
/// ```
pub fn split_url(line: &str) -> UrlParts<'_> {
    let prefix_len = match line.find("://") {
        Some(idx) if is_scheme(&line[..idx]) => idx + 3,
        _ if line.starts_with("//") => 2,
        _ => 0,
    };
    let (prefix, after) = line.split_at(prefix_len);

    let authority_len = after
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(after.len());
    let (authority, rest) = after.split_at(authority_len);

    let (userinfo, host_port) = match authority.rfind('@') {
        Some(idx) => (Some(&authority[..idx]), &authority[idx + 1..]),
        None => (None, authority),
    };

    let (host, port) = split_host_port(host_port);

    UrlParts {
        prefix,
        userinfo,
        host,
        port,
        rest,
    }
}

/// Extracts the host that should be looked up for a URL line
///
/// The line is parsed with [`url::Url`]. Lines without a scheme are parsed
/// as `https://` URLs. Userinfo and port are dropped, IPv6 literals lose
/// their brackets, and domains come back lowercased in ASCII form.
///
/// # Examples
///
/// ```
/// use aaaa_sieve::url::extract_host;
///
/// assert_eq!(extract_host("https://Example.com:8080/path").unwrap(), "example.com");
/// assert_eq!(extract_host("example.org/page").unwrap(), "example.org");
/// assert!(extract_host("http://:8080/nohost").is_err());
/// ```
pub fn extract_host(line: &str) -> UrlResult<String> {
    let line = line.trim();
    let missing = || UrlError::MissingHost(line.to_string());

    let parsed = match Url::parse(line) {
        Ok(url) if url.has_host() || line.contains("://") => url,
        // "example.com:8080/x" parses as scheme "example.com" with no host
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => {
            let candidate = match line.strip_prefix("//") {
                Some(rest) => format!("https://{rest}"),
                None if line.starts_with('/') => return Err(missing()),
                None => format!("https://{line}"),
            };
            Url::parse(&candidate).map_err(|_| missing())?
        }
        Err(_) => return Err(missing()),
    };

    match parsed.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => Ok(domain.to_lowercase()),
        Some(Host::Ipv4(addr)) => Ok(addr.to_string()),
        Some(Host::Ipv6(addr)) => Ok(addr.to_string()),
        _ => Err(missing()),
    }
}

/// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

fn split_host_port(host_port: &str) -> (&str, Option<&str>) {
    if host_port.starts_with('[') {
        return match host_port.find(']') {
            Some(end) => {
                let (host, tail) = host_port.split_at(end + 1);
                (host, tail.strip_prefix(':'))
            }
            None => (host_port, None),
        };
    }

    match host_port.rfind(':') {
        Some(idx) => (&host_port[..idx], Some(&host_port[idx + 1..])),
        None => (host_port, None),
    }
}
