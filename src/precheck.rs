//! Connectivity precheck
//!
//! Runs once before any worker starts. If the hosting platform cannot be
//! reached the whole batch is abandoned with a single diagnostic instead of
//! one failed clone per repository.

use std::fmt;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use url::Url;

use crate::error::{Error, Result};

/// A one-shot reachability check.
pub trait Connectivity: Send + Sync {
    fn check(&self) -> Result<()>;
}

/// Always reachable. Used when the caller opts out of the precheck.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipPrecheck;

impl Connectivity for SkipPrecheck {
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Probe {
    Directory(PathBuf),
    Tcp { host: String, port: u16 },
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::Directory(path) => write!(f, "{}", path.display()),
            Probe::Tcp { host, port } => write!(f, "{}:{}", host, port),
        }
    }
}

/// Probes the host behind a platform base URL.
///
/// - `file://` URLs and bare local paths: the directory must exist.
/// - `http`, `https`, `ssh`, `git` URLs: a TCP connection to the host.
/// - scp-like addresses (`git@host:org`): a TCP connection to port 22.
#[derive(Debug, Clone)]
pub struct RemoteConnectivity {
    probe: Probe,
    timeout: Duration,
}

impl RemoteConnectivity {
    pub fn for_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let probe = probe_for(base_url.trim())?;
        Ok(Self { probe, timeout })
    }

    /// Human-readable probe target, e.g. `github.com:443`.
    pub fn target(&self) -> String {
        self.probe.to_string()
    }
}

impl Connectivity for RemoteConnectivity {
    fn check(&self) -> Result<()> {
        debug!("precheck: probing {}", self.probe);
        match &self.probe {
            Probe::Directory(path) => {
                if path.is_dir() {
                    Ok(())
                } else {
                    Err(Error::Unreachable {
                        target: self.target(),
                        message: "directory does not exist".to_string(),
                    })
                }
            }
            Probe::Tcp { host, port } => {
                let unreachable = |message: String| Error::Unreachable {
                    target: self.target(),
                    message,
                };

                let addrs: Vec<_> = (host.as_str(), *port)
                    .to_socket_addrs()
                    .map_err(|e| unreachable(format!("could not resolve host: {}", e)))?
                    .collect();

                let mut last_error = None;
                for addr in addrs {
                    match TcpStream::connect_timeout(&addr, self.timeout) {
                        Ok(_) => return Ok(()),
                        Err(e) => last_error = Some(e),
                    }
                }

                Err(unreachable(match last_error {
                    Some(e) => e.to_string(),
                    None => "host resolved to no addresses".to_string(),
                }))
            }
        }
    }
}

fn probe_for(base_url: &str) -> Result<Probe> {
    if base_url.is_empty() {
        return Err(Error::invalid_spec("platform base url is empty"));
    }

    if !base_url.contains("://") {
        if let Some(host) = scp_host(base_url) {
            return Ok(Probe::Tcp {
                host: host.to_string(),
                port: 22,
            });
        }
        return Ok(Probe::Directory(PathBuf::from(base_url)));
    }

    let url = Url::parse(base_url)?;
    if url.scheme() == "file" {
        let path = url
            .to_file_path()
            .map_err(|_| Error::invalid_spec(format!("'{}' is not a local file url", base_url)))?;
        return Ok(Probe::Directory(path));
    }

    let host = url
        .host_str()
        .ok_or_else(|| Error::invalid_spec(format!("'{}' has no host", base_url)))?
        .to_string();
    let port = url
        .port_or_known_default()
        .or(match url.scheme() {
            "ssh" | "git+ssh" => Some(22),
            "git" => Some(9418),
            _ => None,
        })
        .ok_or_else(|| {
            Error::invalid_spec(format!("no known port for scheme '{}'", url.scheme()))
        })?;

    Ok(Probe::Tcp { host, port })
}

/// Host part of `user@host:path`, if `address` has that shape.
///
/// Like git, a `/` before the first `:` makes the address a local path.
fn scp_host(address: &str) -> Option<&str> {
    let (user_host, _path) = address.split_once(':')?;
    if user_host.contains('/') {
        return None;
    }
    let (_user, host) = user_host.rsplit_once('@')?;
    if host.is_empty() {
        return None;
    }
    Some(host)
}
