//! Voter identity resolution.
//!
//! A voter is identified by network address: the first entry of
//! `X-Forwarded-For` when it holds a valid IP, otherwise the peer address of
//! the connection. The forwarded header is client-controlled, so the identity
//! can be spoofed by anyone able to reach the server directly. This is a known
//! weakness of address-based deduplication and is accepted as-is.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use tracing::debug;

use crate::http::HttpError;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const MAX_VOTER_IDENTITY_LEN: usize = 45;

/// Caller identity used as the ledger's deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoterIdentity(String);

impl VoterIdentity {
    pub fn from_ip(ip: IpAddr) -> Self {
        let rendered = ip.to_string();
        assert!(
            rendered.len() <= MAX_VOTER_IDENTITY_LEN,
            "Rendered IP exceeds column bound"
        );
        Self(rendered)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn resolve_voter_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<VoterIdentity> {
    if let Some(ip) = first_forwarded_ip(headers) {
        return Some(VoterIdentity::from_ip(ip));
    }
    peer.map(|addr| VoterIdentity::from_ip(addr.ip()))
}

fn first_forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let raw = headers.get(FORWARDED_FOR_HEADER)?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() {
        return None;
    }
    match first.parse::<IpAddr>() {
        Ok(ip) => Some(ip),
        Err(_) => {
            debug!(forwarded = first, "Ignoring unparsable X-Forwarded-For entry");
            None
        }
    }
}

impl<S> FromRequestParts<S> for VoterIdentity
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let peer = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|ConnectInfo(addr)| addr);

        resolve_voter_identity(&parts.headers, peer).ok_or_else(|| {
            HttpError::new(
                StatusCode::BAD_REQUEST,
                "Unable to determine client address".to_string(),
            )
        })
    }
}
