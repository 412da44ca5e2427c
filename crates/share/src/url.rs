//! Reading and writing the `share` query parameter.

use foundation::GeoExtent;
use tracing::warn;

use crate::codec::{ShareError, SharePayload, decode, encode};

/// Query parameter that carries the share token.
pub const URL_PARAM_SHARE: &str = "share";

/// Start-up configuration recovered from a share link.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShareConfig {
    /// Normalized extent to generate on load.
    pub extent: GeoExtent,
    pub hide_map: bool,
}

/// Read the share parameter of `url`, if any.
///
/// A missing parameter and an undecodable token both yield `None`; the
/// latter is logged so the page falls back to the default view.
pub fn share_config_from_url(url: &str) -> Option<ShareConfig> {
    let (_, query, _) = split_url(url);
    let raw = query_param(query?, URL_PARAM_SHARE)?;
    if raw.is_empty() {
        return None;
    }

    match decode(&raw) {
        Ok(payload) => Some(ShareConfig {
            extent: payload.extent.normalize()?,
            hide_map: payload.hide_map,
        }),
        Err(err) => {
            warn!("ignoring share parameter: {err}");
            None
        }
    }
}

/// `url` with its share parameter set to the token for `payload`.
///
/// Other parameters and the fragment are preserved.
pub fn build_share_url(url: &str, payload: &SharePayload) -> Result<String, ShareError> {
    let token = encode(payload)?;
    let (base, query, fragment) = split_url(url);

    let mut pairs: Vec<String> = query
        .map(|q| {
            q.split('&')
                .filter(|pair| !pair.is_empty() && param_name(pair) != URL_PARAM_SHARE)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    pairs.push(format!("{URL_PARAM_SHARE}={}", escape_token(&token)));

    Ok(assemble(base, &pairs, fragment))
}

/// `url` without its share parameter.
pub fn strip_share_param(url: &str) -> String {
    let (base, query, fragment) = split_url(url);
    let pairs: Vec<String> = query
        .map(|q| {
            q.split('&')
                .filter(|pair| !pair.is_empty() && param_name(pair) != URL_PARAM_SHARE)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    assemble(base, &pairs, fragment)
}

fn split_url(url: &str) -> (&str, Option<&str>, Option<&str>) {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    match rest.split_once('?') {
        Some((base, query)) => (base, Some(query), fragment),
        None => (rest, None, fragment),
    }
}

fn assemble(base: &str, pairs: &[String], fragment: Option<&str>) -> String {
    let mut out = base.to_string();
    if !pairs.is_empty() {
        out.push('?');
        out.push_str(&pairs.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn param_name(pair: &str) -> &str {
    pair.split_once('=').map(|(k, _)| k).unwrap_or(pair)
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| percent_decode(v))
}

// Tokens never contain spaces, so a literal `+` is kept as `+` rather than
// read as form-encoded whitespace.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]))
        {
            out.push((hi << 4) | lo);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn escape_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            '+' => out.push_str("%2B"),
            '/' => out.push_str("%2F"),
            '=' => out.push_str("%3D"),
            other => out.push(other),
        }
    }
    out
}
