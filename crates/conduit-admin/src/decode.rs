//! Request decoding
//!
//! Each endpoint names one [`Decode`] type. Decoding reads the body at most
//! once and fails with a [`DecodeError`] before any manager is called.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{FromRequestParts, Path};
use http::request::Parts;
use serde::de::DeserializeOwned;

use crate::classify::Category;

/// Decode-time rejection
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to read request body: {0}")]
    BodyRead(String),
    #[error("failed to parse request body: {0}")]
    JsonUnmarshal(String),
    #[error("{name} is empty")]
    MissingParam { name: &'static str },
    #[error("filters are not found")]
    MissingFilters,
    #[error("{reason}")]
    InvalidParam { name: &'static str, reason: String },
}

impl DecodeError {
    pub const fn category(&self) -> Category {
        match self {
            Self::BodyRead(_) => Category::RequestBodyRead,
            Self::JsonUnmarshal(_) => Category::JsonUnmarshal,
            Self::MissingParam { .. } => Category::MissingParam,
            Self::MissingFilters => Category::MissingFilters,
            Self::InvalidParam { .. } => Category::InvalidParam,
        }
    }
}

/// Raw request pieces handed to a decoder
pub struct Input {
    parts: Parts,
    body: Body,
    body_limit: usize,
}

impl Input {
    pub const fn new(parts: Parts, body: Body, body_limit: usize) -> Self {
        Self {
            parts,
            body,
            body_limit,
        }
    }

    /// Non-empty value of a path parameter
    pub async fn path_param(&mut self, name: &'static str) -> Result<String, DecodeError> {
        let params = Path::<HashMap<String, String>>::from_request_parts(&mut self.parts, &())
            .await
            .map(|Path(params)| params)
            .unwrap_or_default();

        params
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
            .ok_or(DecodeError::MissingParam { name })
    }

    /// Read the whole body and deserialize it as JSON
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, DecodeError> {
        let bytes = axum::body::to_bytes(self.body, self.body_limit)
            .await
            .map_err(|e| DecodeError::BodyRead(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| DecodeError::JsonUnmarshal(e.to_string()))
    }

    pub fn query(&self) -> QueryParams {
        QueryParams::parse(self.parts.uri.query().unwrap_or_default())
    }
}

/// A typed request value produced from raw request pieces
#[async_trait]
pub trait Decode: Sized + Send {
    async fn decode(input: Input) -> Result<Self, DecodeError>;
}

/// Requests that carry nothing the manager needs
#[async_trait]
impl Decode for () {
    async fn decode(_input: Input) -> Result<Self, DecodeError> {
        Ok(())
    }
}

/// JSON request body
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T> Decode for JsonBody<T>
where
    T: DeserializeOwned + Send,
{
    async fn decode(input: Input) -> Result<Self, DecodeError> {
        input.json().await.map(Self)
    }
}

/// The `id` path parameter
pub struct PathId(pub String);

#[async_trait]
impl Decode for PathId {
    async fn decode(mut input: Input) -> Result<Self, DecodeError> {
        input.path_param("id").await.map(Self)
    }
}

/// The `id` path parameter followed by a JSON body
///
/// The id is checked first; a missing id never reads the body.
pub struct PathIdWithBody<T>(pub String, pub T);

#[async_trait]
impl<T> Decode for PathIdWithBody<T>
where
    T: DeserializeOwned + Send,
{
    async fn decode(mut input: Input) -> Result<Self, DecodeError> {
        let id = input.path_param("id").await?;
        let body = input.json().await?;
        Ok(Self(id, body))
    }
}

/// Parsed query string
///
/// Repeated keys accumulate and `name[]` is treated as `name`.
#[derive(Debug, Default)]
pub struct QueryParams {
    values: HashMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let key = key.strip_suffix("[]").unwrap_or(&*key).to_string();
            values.entry(key).or_default().push(value.into_owned());
        }

        Self { values }
    }

    /// Every non-empty value of `name`
    pub fn all(&self, name: &str) -> Vec<String> {
        self.values
            .get(name)
            .map(|values| values.iter().filter(|v| !v.is_empty()).cloned().collect())
            .unwrap_or_default()
    }

    /// First non-empty value of `name`
    pub fn first(&self, name: &str) -> Option<String> {
        self.values
            .get(name)
            .and_then(|values| values.iter().find(|v| !v.is_empty()))
            .cloned()
    }

    /// First value of `name` parsed as `T`, if present
    pub fn parse_as<T>(&self, name: &'static str) -> Result<Option<T>, DecodeError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.first(name)
            .map(|raw| {
                raw.parse().map_err(|e| DecodeError::InvalidParam {
                    name,
                    reason: format!("{name} must be a valid number, got `{raw}`: {e}"),
                })
            })
            .transpose()
    }

    /// First value of `name`, or a missing-param rejection
    pub fn required(&self, name: &'static str) -> Result<String, DecodeError> {
        self.first(name).ok_or(DecodeError::MissingParam { name })
    }
}
