//! Remote repository addresses
//!
//! A release configuration names its upstream with either a URL
//! (`https://github.com/org/repo.git`, `ssh://git@host:22/org/repo.git`)
//! or the scp-like shorthand git accepts (`git@github.com:org/repo.git`).

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

/// Why a string is not a usable remote address
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteUrlError {
    /// Blank input
    #[error("remote URL is empty")]
    Empty,

    /// Scheme git cannot push to
    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    /// URL without a host
    #[error("remote URL has no host")]
    MissingHost,

    /// URL without a repository path
    #[error("remote URL has no repository path")]
    MissingPath,

    /// Neither a URL nor scp-like syntax
    #[error("{0}")]
    Malformed(String),
}

/// Transport used to reach the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// `ssh://` URLs and scp-like `user@host:path`
    Ssh,
    /// `https://`
    Https,
    /// `http://`
    Http,
    /// `git://`
    Git,
    /// `file://`
    File,
}

impl Transport {
    /// Get transport name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Https => "https",
            Self::Http => "http",
            Self::Git => "git",
            Self::File => "file",
        }
    }

    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "ssh" | "git+ssh" | "ssh+git" => Some(Self::Ssh),
            "https" | "git+https" => Some(Self::Https),
            "http" | "git+http" => Some(Self::Http),
            "git" => Some(Self::Git),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

/// A parsed remote repository address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    raw: String,
    transport: Transport,
    user: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: String,
}

fn scp_like() -> &'static Regex {
    static SCP_LIKE: OnceLock<Regex> = OnceLock::new();
    SCP_LIKE.get_or_init(|| {
        Regex::new(r"^(?:([^@/\s]+)@)?([^:/\s]+):([^\s]+)$").expect("scp-like pattern is valid")
    })
}

impl RemoteUrl {
    /// Parse a remote address
    pub fn parse(input: &str) -> Result<Self, RemoteUrlError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(RemoteUrlError::Empty);
        }

        if raw.contains("://") {
            Self::parse_url(raw)
        } else {
            Self::parse_scp_like(raw)
        }
    }

    fn parse_url(raw: &str) -> Result<Self, RemoteUrlError> {
        let url = Url::parse(raw).map_err(|e| RemoteUrlError::Malformed(e.to_string()))?;
        let transport = Transport::from_scheme(url.scheme())
            .ok_or_else(|| RemoteUrlError::UnsupportedScheme(url.scheme().to_string()))?;

        let host = url.host_str().filter(|h| !h.is_empty()).map(str::to_string);
        if host.is_none() && transport != Transport::File {
            return Err(RemoteUrlError::MissingHost);
        }

        let path = url.path().to_string();
        if path.trim_matches('/').is_empty() {
            return Err(RemoteUrlError::MissingPath);
        }

        let user = Some(url.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Ok(Self {
            raw: raw.to_string(),
            transport,
            user,
            host,
            port: url.port(),
            path,
        })
    }

    fn parse_scp_like(raw: &str) -> Result<Self, RemoteUrlError> {
        let caps = scp_like().captures(raw).ok_or_else(|| {
            RemoteUrlError::Malformed("expected a URL or scp-like user@host:path".to_string())
        })?;

        let path = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
        if path.trim_matches('/').is_empty() {
            return Err(RemoteUrlError::MissingPath);
        }

        Ok(Self {
            raw: raw.to_string(),
            transport: Transport::Ssh,
            user: caps.get(1).map(|m| m.as_str().to_string()),
            host: caps.get(2).map(|m| m.as_str().to_string()),
            port: None,
            path: path.to_string(),
        })
    }

    /// The address as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Transport used to reach the remote
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// User name, if any (`git` in `git@github.com:org/repo.git`)
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Host name; `None` only for `file://` remotes
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Explicit port
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Repository path as written
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Repository path without leading slash, trailing slash or `.git` suffix
    pub fn slug(&self) -> &str {
        let trimmed = self.path.trim_matches('/');
        trimmed.strip_suffix(".git").unwrap_or(trimmed)
    }

    /// Whether two addresses point at the same repository, regardless of transport
    pub fn same_repository(&self, other: &RemoteUrl) -> bool {
        let same_host = match (self.host(), other.host()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };
        same_host && self.slug() == other.slug()
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for RemoteUrl {
    type Err = RemoteUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scp_like() {
        let remote =
            RemoteUrl::parse("git@github.com:telekom/gateway-issuer-service-go.git").unwrap();
        assert_eq!(remote.transport(), Transport::Ssh);
        assert_eq!(remote.user(), Some("git"));
        assert_eq!(remote.host(), Some("github.com"));
        assert_eq!(remote.slug(), "telekom/gateway-issuer-service-go");
    }

    #[test]
    fn test_parse_https() {
        let remote = RemoteUrl::parse("https://github.com/org/repo.git").unwrap();
        assert_eq!(remote.transport(), Transport::Https);
        assert_eq!(remote.user(), None);
        assert_eq!(remote.host(), Some("github.com"));
        assert_eq!(remote.slug(), "org/repo");
    }

    #[test]
    fn test_parse_ssh_url_with_port() {
        let remote = RemoteUrl::parse("ssh://git@gitlab.example.com:2222/group/project.git").unwrap();
        assert_eq!(remote.transport(), Transport::Ssh);
        assert_eq!(remote.port(), Some(2222));
        assert_eq!(remote.host(), Some("gitlab.example.com"));
        assert_eq!(remote.slug(), "group/project");
    }

    #[test]
    fn test_parse_git_plus_https() {
        let remote = RemoteUrl::parse("git+https://github.com/org/repo.git").unwrap();
        assert_eq!(remote.transport(), Transport::Https);
    }

    #[test]
    fn test_parse_file_url() {
        let remote = RemoteUrl::parse("file:///srv/git/repo.git").unwrap();
        assert_eq!(remote.transport(), Transport::File);
        assert_eq!(remote.host(), None);
        assert_eq!(remote.slug(), "srv/git/repo");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(RemoteUrl::parse("   "), Err(RemoteUrlError::Empty));
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        assert_eq!(
            RemoteUrl::parse("ftp://example.com/repo.git"),
            Err(RemoteUrlError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_rejects_missing_path() {
        assert_eq!(
            RemoteUrl::parse("https://github.com/"),
            Err(RemoteUrlError::MissingPath)
        );
        assert_eq!(
            RemoteUrl::parse("git@github.com:"),
            Err(RemoteUrlError::Malformed(
                "expected a URL or scp-like user@host:path".to_string()
            ))
        );
    }

    #[test]
    fn test_rejects_plain_words() {
        assert!(RemoteUrl::parse("not a url").is_err());
        assert!(RemoteUrl::parse("repo.git").is_err());
    }

    #[test]
    fn test_same_repository_across_transports() {
        let ssh = RemoteUrl::parse("git@github.com:Org/repo.git").unwrap();
        let https = RemoteUrl::parse("https://GitHub.com/Org/repo").unwrap();
        let other = RemoteUrl::parse("https://github.com/Org/other.git").unwrap();

        assert!(ssh.same_repository(&https));
        assert!(!ssh.same_repository(&other));
    }

    #[test]
    fn test_display_keeps_input() {
        let raw = "git@host:org/repo.git";
        assert_eq!(RemoteUrl::parse(raw).unwrap().to_string(), raw);
    }
}
