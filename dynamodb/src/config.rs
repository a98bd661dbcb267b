/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Client configuration: the region and the endpoint requests are sent to.

use http::Uri;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use tracing::warn;

const DEFAULT_REGION: Region = Region::from_static("us-east-1");

/// The region to send requests to.
///
/// Unless an endpoint is configured explicitly, the region selects
/// `https://dynamodb.<region>.amazonaws.com`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region(Cow<'static, str>);

impl Region {
    pub fn new(region: impl Into<Cow<'static, str>>) -> Self {
        Self(region.into())
    }

    pub const fn from_static(region: &'static str) -> Self {
        Self(Cow::Borrowed(region))
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration of a [`Client`](crate::Client).
///
/// ```
/// use dynamodb::{Config, Region};
///
/// let config = Config::builder()
///     .region(Region::new("eu-west-1"))
///     .build();
/// assert_eq!(config.endpoint().to_string(), "https://dynamodb.eu-west-1.amazonaws.com/");
///
/// let local = Config::builder()
///     .endpoint("http://localhost:8000".parse().unwrap())
///     .build();
/// assert_eq!(local.endpoint().host(), Some("localhost"));
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    region: Region,
    endpoint: Uri,
}

impl Config {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Reads `AWS_REGION` (then `AWS_DEFAULT_REGION`) and `DYNAMODB_ENDPOINT`.
    ///
    /// Falls back to `us-east-1` when no region is set.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let region = var("AWS_REGION")
            .or_else(|| var("AWS_DEFAULT_REGION"))
            .filter(|region| !region.is_empty())
            .map(Region::new);
        let endpoint = var("DYNAMODB_ENDPOINT").and_then(|endpoint| match endpoint.parse() {
            Ok(uri) => Some(uri),
            Err(err) => {
                warn!(endpoint = %endpoint, error = %err, "ignoring invalid DYNAMODB_ENDPOINT");
                None
            }
        });
        Builder { region, endpoint }.build()
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }
}

#[derive(Clone, Debug, Default)]
pub struct Builder {
    region: Option<Region>,
    endpoint: Option<Uri>,
}

impl Builder {
    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Overrides the regional endpoint, e.g. `http://localhost:8000` for DynamoDB Local.
    pub fn endpoint(mut self, endpoint: Uri) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn build(self) -> Config {
        let region = self.region.unwrap_or(DEFAULT_REGION);
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| regional_endpoint(&region));
        Config { region, endpoint }
    }
}

fn regional_endpoint(region: &Region) -> Uri {
    let authority = format!("dynamodb.{}.amazonaws.com", region);
    Uri::builder()
        .scheme("https")
        .authority(authority.as_str())
        .path_and_query("/")
        .build()
        .unwrap_or_else(|_| Uri::from_static("https://dynamodb.us-east-1.amazonaws.com/"))
}
