// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Function reference parsing.
//!
//! A processor is addressed by a reference string which comes in five
//! forms, tried in strict priority order (first match wins):
//!
//! 1. `name::$<id>` — pinned to a pre-registered reference by opaque id
//! 2. `name::user:password@registry/image:tag[@sha256:<hex>]`
//! 3. `name::user:password/image:tag[@sha256:<hex>]`
//! 4. `name::image:tag[@sha256:<hex>]`
//! 5. bare `name` — local-only processor with an empty image reference
//!
//! Forms 2 and 3 embed credentials directly; for form 4 the resolver
//! consults the credential store and attaches the record whose reference
//! prefix is the longest prefix of the image path, if any.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ReferenceError;
use crate::resolver::credentials::CredentialStore;

/// A parsed, immutable processor reference.
///
/// `reference` is the canonical image string (registry, path, tag and
/// optional digest joined back together), `$<id>` for pinned references,
/// or empty for local-only processors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionReference {
    #[serde(rename = "processorId")]
    pub processor_id: String,
    pub user: Option<String>,
    pub token: Option<String>,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "syncRef")]
    pub sync: bool,
}

impl FunctionReference {
    /// True when the reference carries embedded registry credentials.
    pub fn has_credentials(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

static PINNED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[^:]+)::\$(?P<ref>[a-f0-9-]+)$").expect("regex: pinned reference")
});

static AUTH_WITH_REGISTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<name>[^:]+)::(?P<user>[^:]+):(?P<password>[^@]+)@(?P<registry>[^/]+)/(?P<path>.+?):(?P<tag>[^@]+)(?:@(?P<digest>sha256:[a-f0-9]+))?$",
    )
    .expect("regex: authenticated reference with registry")
});

static AUTH_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<name>[^:]+)::(?P<user>[^:]+):(?P<password>[^/]+)/(?P<path>[^:]+):(?P<tag>[^@]+)(?:@(?P<digest>sha256:[a-f0-9]+))?$",
    )
    .expect("regex: authenticated reference without registry")
});

static UNAUTHENTICATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<name>[^:]+)::(?P<path>[^:]+):(?P<tag>[^@]+)(?:@(?P<digest>sha256:[a-f0-9]+))?$",
    )
    .expect("regex: unauthenticated reference")
});

static LOCAL_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("regex: local-only reference"));

fn image_string(path: &str, tag: &str, digest: Option<&str>) -> String {
    match digest {
        Some(digest) => format!("{path}:{tag}@{digest}"),
        None => format!("{path}:{tag}"),
    }
}

/// Parses a reference string without consulting any credential store.
pub fn parse(input: &str) -> Result<FunctionReference, ReferenceError> {
    if let Some(caps) = PINNED.captures(input) {
        return Ok(FunctionReference {
            processor_id: caps["name"].to_string(),
            user: None,
            token: None,
            reference: format!("${}", &caps["ref"]),
            sync: true,
        });
    }

    if let Some(caps) = AUTH_WITH_REGISTRY.captures(input) {
        let path = format!("{}/{}", &caps["registry"], &caps["path"]);
        return Ok(FunctionReference {
            processor_id: caps["name"].to_string(),
            user: Some(caps["user"].to_string()),
            token: Some(caps["password"].to_string()),
            reference: image_string(&path, &caps["tag"], caps.name("digest").map(|m| m.as_str())),
            sync: true,
        });
    }

    if let Some(caps) = AUTH_BARE.captures(input) {
        return Ok(FunctionReference {
            processor_id: caps["name"].to_string(),
            user: Some(caps["user"].to_string()),
            token: Some(caps["password"].to_string()),
            reference: image_string(
                &caps["path"],
                &caps["tag"],
                caps.name("digest").map(|m| m.as_str()),
            ),
            sync: true,
        });
    }

    if let Some(caps) = UNAUTHENTICATED.captures(input) {
        return Ok(FunctionReference {
            processor_id: caps["name"].to_string(),
            user: None,
            token: None,
            reference: image_string(
                &caps["path"],
                &caps["tag"],
                caps.name("digest").map(|m| m.as_str()),
            ),
            sync: true,
        });
    }

    if LOCAL_ONLY.is_match(input) {
        return Ok(FunctionReference {
            processor_id: input.to_string(),
            user: None,
            token: None,
            reference: String::new(),
            sync: false,
        });
    }

    Err(ReferenceError::InvalidFormat {
        input: input.to_string(),
    })
}

/// Parses a reference string and opportunistically attaches credentials.
///
/// Only credential-free image references are looked up: among all stored
/// image logins, the record whose reference prefix is the longest prefix
/// of the image path wins. Absence of any match is not an error; the
/// reference is returned unauthenticated.
pub fn resolve(
    input: &str,
    store: &dyn CredentialStore,
) -> Result<FunctionReference, ReferenceError> {
    let mut parsed = parse(input)?;
    if parsed.has_credentials() || parsed.reference.is_empty() || parsed.reference.starts_with('$')
    {
        return Ok(parsed);
    }

    let matched = store
        .image_logins()
        .into_iter()
        .filter(|login| parsed.reference.starts_with(&login.reference))
        .max_by_key(|login| login.reference.len());

    if let Some(login) = matched {
        tracing::debug!(
            reference = %parsed.reference,
            prefix = %login.reference,
            "attached stored registry credentials"
        );
        parsed.user = Some(login.user);
        parsed.token = Some(login.token);
    }
    Ok(parsed)
}
