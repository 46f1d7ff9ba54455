use std::{
    collections::BTreeMap,
    env,
    fs::File,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The endpoint a locally started SIRIUS service listens on by default.
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8080";

/// An error encountered while loading or resolving a configuration profile.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to load config file")]
    Io(#[from] io::Error),
    #[error("Invalid configuration")]
    Invalid(#[from] serde_yaml::Error),
    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),
    #[error("API key contains invalid characters")]
    InvalidApiKey,
    #[error("Invalid URI")]
    InvalidUri(#[from] http::uri::InvalidUri),
}

/// A fully resolved configuration profile for talking to a SIRIUS service.
#[derive(Clone, Serialize)]
pub struct Profile {
    /// The name of the profile.
    pub name: String,
    /// The base URI of the REST API, e.g. `http://localhost:8080`.
    #[serde(serialize_with = "serialize_uri")]
    pub api_endpoint: http::Uri,
    /// An optional bearer token, for services running behind an
    /// authenticating proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// The user-agent used on requests. Intended for internal use.
    #[serde(skip)]
    pub user_agent: String,
    /// The config file this profile was loaded from, or the canonical one if
    /// no config file exists. Unset if there is no home directory.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

fn serialize_uri<S: serde::Serializer>(uri: &http::Uri, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(uri)
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("api_endpoint", &self.api_endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "********"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// A profile stored in the config file.
#[derive(Debug, Default, Clone, Deserialize)]
struct ConfigProfile {
    pub(crate) api_endpoint: Option<String>,
    pub(crate) api_key: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct Config {
    #[serde(default)]
    profiles: BTreeMap<String, ConfigProfile>,
}

impl Profile {
    /// Build a profile for the given endpoint without consulting any
    /// configuration file or environment variable.
    pub fn with_endpoint(api_endpoint: &str) -> Result<Self, Error> {
        Ok(Self {
            name: "default".to_owned(),
            api_endpoint: api_endpoint.parse()?,
            api_key: None,
            user_agent: make_ua(None),
            config_path: find_config(),
        })
    }

    /// Load the given profile from the SIRIUS client configuration file
    /// (usually ~/.config/sirius.yaml). If no configuration file is present,
    /// then the configuration will be loaded solely from the environment.
    ///
    /// If `SIRIUS_PROFILE` is set, that will be used to select the profile.
    /// Otherwise the profile `default` will be used.
    ///
    /// The following environment variables can override the corresponding
    /// values in the config file:
    ///
    /// | Environment Variable    | Config Value   |
    /// |-------------------------|----------------|
    /// | `SIRIUS_API_KEY`        | `api_key`      |
    /// | `SIRIUS_API_ENDPOINT`   | `api_endpoint` |
    pub fn from_default_env() -> Result<Self, Error> {
        if let Ok(s) = env::var("SIRIUS_PROFILE") {
            Self::from_env(&s)
        } else {
            Self::from_env("default")
        }
    }

    /// Load the given profile from the SIRIUS client configuration file
    /// (usually ~/.config/sirius.yaml). If no configuration file is present,
    /// then the configuration will be loaded solely from the environment.
    ///
    /// Unlike [Profile::load], a profile missing from an existing file is not
    /// an error for the `default` profile: the built-in endpoint is used.
    pub fn from_env(name: &str) -> Result<Self, Error> {
        let overrides = ConfigProfile {
            api_endpoint: env::var("SIRIUS_API_ENDPOINT").ok(),
            api_key: env::var("SIRIUS_API_KEY").ok(),
        };

        Self::resolve(name, find_config(), overrides)
    }

    fn resolve(
        name: &str,
        config_path: Option<PathBuf>,
        overrides: ConfigProfile,
    ) -> Result<Self, Error> {
        let profile = match config_path.as_deref().map(|p| read_profile(p, name)) {
            Some(Ok(p)) => p,
            Some(Err(Error::Io(e))) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no config file found");
                Default::default()
            }
            Some(Err(Error::ProfileNotFound(_))) if name == "default" => {
                debug!("no default profile in config file");
                Default::default()
            }
            Some(Err(e)) => return Err(e),
            None => {
                debug!("no home directory, using the environment only");
                Default::default()
            }
        };

        let api_endpoint = overrides
            .api_endpoint
            .as_deref()
            .or(profile.api_endpoint.as_deref())
            .unwrap_or(DEFAULT_API_ENDPOINT)
            .parse()?;

        let api_key = overrides.api_key.or(profile.api_key);
        if api_key.as_ref().is_some_and(|k| !k.is_ascii()) {
            return Err(Error::InvalidApiKey);
        }

        Ok(Self {
            name: name.to_owned(),
            api_endpoint,
            api_key,
            user_agent: make_ua(None),
            config_path,
        })
    }

    /// Modifies the user-agent to have a different prefix. Intended for
    /// internal use.
    #[doc(hidden)]
    pub fn with_ua_product(self, ua_product: &str) -> Self {
        Self {
            user_agent: make_ua(Some(ua_product)),
            ..self
        }
    }

    /// Load the given profile (or 'default') from the configuration file
    /// (usually ~/.config/sirius.yaml). Does not read any environment
    /// variables.
    ///
    /// Usually, you will want to use [Profile::from_env] instead.
    pub fn load(name: Option<&str>) -> Result<Self, Error> {
        let file = find_config().ok_or_else(no_home)?;
        Self::read(&file, name)
    }

    /// Iterate through all profiles in the configuration file (usually
    /// ~/.config/sirius.yaml). Does not read any environment variables.
    pub fn load_all() -> Result<impl Iterator<Item = Self>, Error> {
        let path = find_config().ok_or_else(no_home)?;
        Self::read_all(path)
    }

    /// Load the given profile (or 'default') from the given file, which must
    /// be a valid configuration file. Does not read any environment
    /// variables.
    ///
    /// Usually, you will want to use [Profile::from_env] instead.
    pub fn read(path: impl AsRef<Path>, name: Option<&str>) -> Result<Self, Error> {
        let path = path.as_ref();
        let name = name.unwrap_or("default").to_owned();
        let profile = read_profile(path, &name)?;
        Self::from_raw(profile, name, path.to_owned())
    }

    /// Read all profiles from the given file, which must be a valid
    /// configuration file. Does not read any environment variables.
    pub fn read_all(path: impl AsRef<Path>) -> Result<impl Iterator<Item = Self>, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;

        let profiles: Result<Vec<_>, Error> = config
            .profiles
            .into_iter()
            .map(|(name, raw)| Profile::from_raw(raw, name, path.to_owned()))
            .collect();

        Ok(profiles?.into_iter())
    }

    fn from_raw(raw: ConfigProfile, name: String, path: PathBuf) -> Result<Self, Error> {
        let ConfigProfile {
            api_endpoint,
            api_key,
        } = raw;

        let api_endpoint = api_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_API_ENDPOINT)
            .parse()?;
        if api_key.as_ref().is_some_and(|k| !k.is_ascii()) {
            return Err(Error::InvalidApiKey);
        }

        Ok(Self {
            name,
            api_endpoint,
            api_key,
            user_agent: make_ua(None),
            config_path: Some(path),
        })
    }
}

fn no_home() -> Error {
    Error::Io(io::Error::other("No $HOME found for the current user"))
}

fn find_config() -> Option<PathBuf> {
    let home = env::home_dir()?;

    let canonical = home.join(".config/sirius.yaml");
    if canonical.exists() {
        return Some(canonical);
    }

    // Try some fallback paths, and if that doesn't work, return the error from
    // the canonical location.
    for fallback in [
        ".config/sirius.yml",
        ".sirius/config.yaml",
        ".sirius/config.yml",
    ] {
        let path = home.join(fallback);
        if path.exists() {
            return Some(path);
        }
    }

    Some(canonical)
}

fn read_profile(p: &Path, name: &str) -> Result<ConfigProfile, Error> {
    let file = File::open(p)?;
    let mut config: Config = serde_yaml::from_reader(file).map_err(Error::Invalid)?;
    let Some(config_profile) = config.profiles.remove(name) else {
        return Err(Error::ProfileNotFound(name.to_string()));
    };

    debug!(path = %p.display(), "loaded config file");

    Ok(config_profile)
}

fn make_ua(product: Option<&str>) -> String {
    format!(
        "{}/{}",
        product.unwrap_or("sirius-client-rs"),
        env!("SIRIUS_CLIENT_VERSION")
    )
}

#[cfg(test)]
mod test {
    use std::io::Write as _;

    use assert_matches::assert_matches;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn read_named_profile() {
        let f = write_config(
            "profiles:\n  default:\n    api_endpoint: http://localhost:9090\n  remote:\n    api_endpoint: https://sirius.example.com\n    api_key: abc123\n",
        );

        let profile = Profile::read(f.path(), Some("remote")).unwrap();
        assert_eq!(profile.name, "remote");
        assert_eq!(profile.api_endpoint.host(), Some("sirius.example.com"));
        assert_eq!(profile.api_key.as_deref(), Some("abc123"));

        let profile = Profile::read(f.path(), None).unwrap();
        assert_eq!(profile.name, "default");
        assert_eq!(profile.api_endpoint.port_u16(), Some(9090));
        assert_eq!(profile.api_key, None);
    }

    #[test]
    fn missing_endpoint_uses_default() {
        let f = write_config("profiles:\n  default: {}\n");
        let profile = Profile::read(f.path(), None).unwrap();
        assert_eq!(profile.api_endpoint.host(), Some("localhost"));
        assert_eq!(profile.api_endpoint.port_u16(), Some(8080));
    }

    #[test]
    fn missing_profile() {
        let f = write_config("profiles:\n  default: {}\n");
        let err = Profile::read(f.path(), Some("nope")).unwrap_err();
        assert_matches!(err, Error::ProfileNotFound(name) if name == "nope");
    }

    #[test]
    fn non_ascii_api_key() {
        let f = write_config("profiles:\n  default:\n    api_key: \"schlüssel\"\n");
        let err = Profile::read(f.path(), None).unwrap_err();
        assert_matches!(err, Error::InvalidApiKey);
    }

    #[test]
    fn read_all_profiles() {
        let f = write_config("profiles:\n  a: {}\n  b:\n    api_key: k\n");
        let names: Vec<_> = Profile::read_all(f.path())
            .unwrap()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn resolve_without_home_uses_environment() {
        let overrides = ConfigProfile {
            api_endpoint: Some("http://sirius.internal:9000".to_owned()),
            api_key: Some("k".to_owned()),
        };

        let profile = Profile::resolve("default", None, overrides).unwrap();
        assert_eq!(profile.api_endpoint.host(), Some("sirius.internal"));
        assert_eq!(profile.api_key.as_deref(), Some("k"));
        assert_eq!(profile.config_path, None);

        let profile = Profile::resolve("staging", None, ConfigProfile::default()).unwrap();
        assert_eq!(profile.name, "staging");
        assert_eq!(profile.api_endpoint.port_u16(), Some(8080));
    }

    #[test]
    fn resolve_prefers_environment_over_file() {
        let f = write_config(
            "profiles:\n  default:\n    api_endpoint: http://localhost:9090\n    api_key: file\n",
        );
        let overrides = ConfigProfile {
            api_endpoint: None,
            api_key: Some("env".to_owned()),
        };

        let profile = Profile::resolve("default", Some(f.path().to_owned()), overrides).unwrap();
        assert_eq!(profile.api_endpoint.port_u16(), Some(9090));
        assert_eq!(profile.api_key.as_deref(), Some("env"));
    }

    #[test]
    fn debug_hides_api_key() {
        let mut profile = Profile::with_endpoint("http://localhost:8080").unwrap();
        profile.api_key = Some("supersecret".to_owned());
        let dbg = format!("{profile:?}");
        assert!(!dbg.contains("supersecret"));
    }
}
