//! API operations concerning the user account the server is logged in with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{ApiRequest, DataResponse, PlainText, QueryParams};

/// The account the server is logged in with.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// The user id.
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    /// The user name.
    pub username: Option<String>,
    /// The email address.
    pub user_email: Option<String>,
    /// The URL of the user's avatar.
    #[serde(rename = "gravatarURL")]
    pub gravatar_url: Option<String>,
    /// Available subscriptions. Only set if requested.
    pub subscriptions: Option<Vec<Subscription>>,
    /// The subscription used for web services.
    pub active_subscription_id: Option<String>,
}

impl DataResponse for AccountInfo {}

/// A license for the platform's web services.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// The subscription id.
    pub sid: String,
    /// The id of the owner.
    pub subscriber_id: Option<String>,
    /// The name of the owner.
    pub subscriber_name: Option<String>,
    /// When the subscription ends.
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub expiration_date: Option<DateTime<Utc>>,
    /// When the subscription started.
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub start_date: Option<DateTime<Utc>>,
    /// Whether queries are limited.
    pub count_queries: Option<bool>,
    /// The maximal number of instances, if limited.
    pub instance_limit: Option<i32>,
    /// Days an instance counts against the limit.
    pub instance_hash_recording_time: Option<i32>,
    /// Queries allowed per instance.
    pub max_queries_per_instance: Option<i32>,
    /// Accounts allowed on the subscription.
    pub max_user_accounts: Option<i32>,
    /// The web service endpoint.
    pub service_url: Option<String>,
    /// A description.
    pub description: Option<String>,
    /// A display name.
    pub name: Option<String>,
    /// A link to the terms of service.
    pub tos: Option<String>,
    /// A link to the privacy policy.
    pub pp: Option<String>,
}

impl DataResponse for Subscription {}

impl Subscription {
    /// Whether the subscription ended before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|end| end < now)
    }
}

// Dates arrive either as epoch milliseconds or as RFC 3339 strings,
// depending on the server's serializer settings.
mod timestamp {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(DateTime<Utc>),
    }

    pub(super) fn deserialize<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(d)? {
            None => Ok(None),
            Some(Raw::Text(t)) => Ok(Some(t)),
            Some(Raw::Millis(ms)) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {ms}"))),
        }
    }
}

/// Credentials to log in with. Either a password or a refresh token.
#[derive(Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCredentials {
    /// The user name or email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// The password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// A refresh token, instead of a password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "********"),
            )
            .finish()
    }
}

/// Get the account the server is logged in with.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetAccountInfo {
    /// Include the available subscriptions.
    pub include_subs: Option<bool>,
}

impl ApiRequest for GetAccountInfo {
    type Response = AccountInfo;

    fn path(&self) -> String {
        "/api/account/".to_string()
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("includeSubs", self.include_subs))
    }
}

/// List the subscriptions of the logged-in account.
#[derive(Debug, Clone, Copy)]
pub struct GetSubscriptions;

impl ApiRequest for GetSubscriptions {
    type Response = Vec<Subscription>;

    fn path(&self) -> String {
        "/api/account/subscriptions".to_string()
    }
}

/// Check whether the server is logged in.
#[derive(Debug, Clone, Copy)]
pub struct IsLoggedIn;

impl ApiRequest for IsLoggedIn {
    type Response = bool;

    fn path(&self) -> String {
        "/api/account/isLoggedIn".to_string()
    }
}

/// Log the server in.
#[derive(Debug, Clone)]
pub struct Login<'a> {
    /// The credentials.
    pub credentials: &'a AccountCredentials,
    /// Accept the terms of service of the subscription.
    pub accept_terms: bool,
    /// Fail if already logged in, instead of logging out first.
    pub fail_when_logged_in: Option<bool>,
    /// Include the available subscriptions in the response.
    pub include_subs: Option<bool>,
}

impl ApiRequest for Login<'_> {
    type Response = AccountInfo;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        "/api/account/login".to_string()
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .param("acceptTerms", self.accept_terms)
                .opt_param("failWhenLoggedIn", self.fail_when_logged_in)
                .opt_param("includeSubs", self.include_subs),
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.credentials)
    }
}

/// Log the server out.
#[derive(Debug, Clone, Copy)]
pub struct Logout;

impl ApiRequest for Logout {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        "/api/account/logout".to_string()
    }
}

/// Select the subscription used for web services.
#[derive(Debug, Clone)]
pub struct SelectSubscription<'a> {
    /// The subscription id.
    pub sid: &'a str,
}

impl ApiRequest for SelectSubscription<'_> {
    type Response = AccountInfo;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        "/api/account/subscriptions/select-active".to_string()
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().param("sid", self.sid))
    }
}

/// Get the URL to create a new account at.
#[derive(Debug, Clone, Copy)]
pub struct GetSignUpUrl;

impl ApiRequest for GetSignUpUrl {
    type Response = PlainText;

    fn path(&self) -> String {
        "/api/account/signUpURL".to_string()
    }

    fn accept(&self) -> &'static str {
        "text/plain;charset=UTF-8"
    }
}
