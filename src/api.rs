use std::io::Read;

use percent_encoding::{AsciiSet, CONTROLS, PercentEncode, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::Profile;

/// Declares an enum whose variants map to fixed strings on the wire. Unknown
/// strings are kept in an `Unknown` variant, so newer servers can't break
/// deserialization.
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($code:literal => $variant:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum $name {
            $(
                #[doc = $code]
                $variant,
            )*
            /// A value this client does not know about.
            Unknown(String),
        }

        impl $name {
            /// The representation of this value on the wire.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $code,)*
                    $name::Unknown(s) => s,
                }
            }

            fn from_code(s: &str) -> Self {
                match s {
                    $($code => $name::$variant,)*
                    _ => $name::Unknown(s.to_owned()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from_code(s))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s = <std::borrow::Cow<'de, str>>::deserialize(d)?;
                Ok(Self::from_code(&s))
            }
        }
    };
}

pub mod account;
pub mod category;
pub mod compound;
pub mod database;
mod error;
pub mod feature;
pub mod job;
mod paginate;
pub mod project;
pub mod quant;
mod query;
pub mod run;
pub mod spectrum;
pub mod statistics;
pub mod tag;

#[cfg(all(test, feature = "_integration-tests"))]
pub(crate) mod testutil;

pub use error::*;
pub use paginate::*;
pub use query::*;

/// Characters that must be escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Escapes a path parameter, e.g. a project or tag name.
pub(crate) fn segment(s: &str) -> PercentEncode<'_> {
    utf8_percent_encode(s, PATH_SEGMENT)
}

/// Implemented by types that can be sent as requests to the SIRIUS API.
pub trait ApiRequest: Sized {
    /// The corresponding response type.
    type Response: ApiResponse;

    /// The path that the request should take.
    fn path(&self) -> String;

    /// The method to use.
    fn method(&self) -> http::Method {
        http::Method::GET
    }

    /// The serializable request body.
    fn body(&self) -> Option<impl Serialize> {
        None::<&()>
    }

    /// The query string parameters.
    fn query(&self) -> Option<QueryParams> {
        None
    }

    /// The media type the response is expected in.
    fn accept(&self) -> &'static str {
        "application/json"
    }

    /// Consume the request and return an [http::Request] suitable for passing
    /// to your favorite HTTP client.
    fn into_request(self, profile: &Profile) -> Result<http::Request<String>, http::Error> {
        let method = self.method();
        let mut parts = profile.api_endpoint.clone().into_parts();

        // Keep any prefix configured on the endpoint, e.g. behind a reverse
        // proxy.
        let mut path = parts
            .path_and_query
            .as_ref()
            .map(|pq| pq.path().trim_end_matches('/').to_owned())
            .unwrap_or_default();
        path.push_str(&self.path());

        if let Some(qs) = self.query().filter(|q| !q.is_empty()) {
            path.push('?');
            path.push_str(&qs.encode());
        }

        parts.path_and_query = Some(path.parse()?);

        let uri = http::Uri::from_parts(parts)?;
        let mut req = http::Request::builder()
            .method(method)
            .uri(uri)
            .header(http::header::ACCEPT, self.accept())
            .header(http::header::USER_AGENT, &profile.user_agent);

        if let Some(api_key) = &profile.api_key {
            req = req.header(http::header::AUTHORIZATION, format!("Bearer {api_key}"));
        }

        if let Some(body) = self.body() {
            let body_str =
                serde_json::to_string(&body).expect("JSON serialization should be infallible");
            req.header(http::header::CONTENT_TYPE, "application/json")
                .header(http::header::CONTENT_LENGTH, body_str.len())
                .body(body_str)
        } else {
            req.body("".to_string())
        }
    }

    /// Request a specific page of results.
    fn paginate(self, page: u32, size: Option<u32>, sort: &[String]) -> PaginatedRequest<'_, Self> {
        PaginatedRequest {
            base: self,
            page,
            size,
            sort,
        }
    }
}

/// Implemented by types that can be read as responses from the SIRIUS API.
pub trait ApiResponse: Sized {
    /// Read the response from an [http::Response] object.
    fn from_response(resp: http::Response<impl Read>) -> Result<Self, ApiError> {
        let (parts, body) = resp.into_parts();
        Self::from_response_parts(parts, body)
    }

    /// Read the response from pre-parsed parts. Useful for async HTTP clients
    /// where the body must be collected before parsing.
    fn from_response_parts(parts: http::response::Parts, body: impl Read)
    -> Result<Self, ApiError>;
}

/// A private trait for types that are deserialized directly from a JSON
/// response body.
pub(crate) trait DataResponse: for<'de> Deserialize<'de> {}

impl<T: DataResponse> DataResponse for Vec<T> {}
impl DataResponse for String {}
impl DataResponse for bool {}
impl DataResponse for f64 {}

impl<T: DataResponse> ApiResponse for T {
    fn from_response_parts(
        parts: http::response::Parts,
        body: impl Read,
    ) -> Result<Self, ApiError> {
        if !parts.status.is_success() {
            return Err(ApiError::from_body(parts.status, body));
        }

        parse_json(parts.status, body)
    }
}

pub(crate) fn parse_json<T>(status: http::StatusCode, body: impl Read) -> Result<T, ApiError>
where
    T: for<'de> Deserialize<'de>,
{
    let de = &mut serde_json::Deserializer::from_reader(body);
    serde_path_to_error::deserialize(de).map_err(|e| {
        tracing::error!("Failed to parse API response: {e:#?}");
        ApiError::InvalidResponse(status, e)
    })
}

// For API methods that return no content.
impl ApiResponse for () {
    fn from_response_parts(
        parts: http::response::Parts,
        body: impl Read,
    ) -> Result<Self, ApiError> {
        if !parts.status.is_success() {
            return Err(ApiError::from_body(parts.status, body));
        }

        Ok(())
    }
}

/// A response body that is plain text rather than JSON, e.g. CSV exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainText(pub String);

impl ApiResponse for PlainText {
    fn from_response_parts(
        parts: http::response::Parts,
        mut body: impl Read,
    ) -> Result<Self, ApiError> {
        if !parts.status.is_success() {
            return Err(ApiError::from_body(parts.status, body));
        }

        let mut s = String::new();
        body.read_to_string(&mut s)
            .map_err(|e| ApiError::Body(parts.status, e))?;
        Ok(PlainText(s))
    }
}

impl std::fmt::Display for PlainText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
