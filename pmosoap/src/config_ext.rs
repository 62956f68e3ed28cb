//! Extension pour intégrer le client SOAP dans pmoconfig
//!
//! Ce module fournit le trait `SoapConfigExt` qui ajoute à `pmoconfig::Config`
//! les réglages du transport HTTP et la version SOAP par défaut.
//!
//! ```yaml
//! soap:
//!   default_version: "1.1"
//!   transport:
//!     timeout_secs: 100
//!     user_agent: pmosoap/0.1.0
//!     gzip: true
//!     deflate: true
//!     proxy: ~
//!     title_case_headers: false
//! ```
//!
//! # Exemple
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmosoap::SoapConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//! config.set_soap_timeout_secs(30)?;
//! println!("SOAP timeout: {}s", config.get_soap_timeout_secs()?);
//! # Ok(())
//! # }
//! ```

use crate::client::SoapClient;
use crate::error::Result as SoapResult;
use crate::transport::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT, ReqwestTransport, TransportBuilder,
};
use crate::version::SoapVersion;
use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::Value;
use std::time::Duration;
use tracing::info;

const VERSION_PATH: &[&str] = &["soap", "default_version"];
const TIMEOUT_PATH: &[&str] = &["soap", "transport", "timeout_secs"];
const USER_AGENT_PATH: &[&str] = &["soap", "transport", "user_agent"];
const GZIP_PATH: &[&str] = &["soap", "transport", "gzip"];
const DEFLATE_PATH: &[&str] = &["soap", "transport", "deflate"];
const PROXY_PATH: &[&str] = &["soap", "transport", "proxy"];
const TITLE_CASE_PATH: &[&str] = &["soap", "transport", "title_case_headers"];

/// Trait d'extension pour gérer la configuration SOAP dans pmoconfig
///
/// # Auto-persist des valeurs par défaut
///
/// Les getters persistent la valeur par défaut quand la clé est absente ou
/// invalide, sauf pour le proxy qui reste non défini.
pub trait SoapConfigExt {
    /// Version SOAP utilisée quand l'appelant n'en précise pas (défaut: 1.1)
    fn get_soap_default_version(&self) -> Result<SoapVersion>;

    fn set_soap_default_version(&self, version: SoapVersion) -> Result<()>;

    /// Timeout des requêtes HTTP en secondes (défaut: 100)
    fn get_soap_timeout_secs(&self) -> Result<u64>;

    fn set_soap_timeout_secs(&self, timeout_secs: u64) -> Result<()>;

    /// User-Agent envoyé avec chaque requête
    fn get_soap_user_agent(&self) -> Result<String>;

    fn set_soap_user_agent(&self, user_agent: &str) -> Result<()>;

    /// Décompression gzip automatique des réponses (défaut: activée)
    fn get_soap_gzip(&self) -> Result<bool>;

    fn set_soap_gzip(&self, enabled: bool) -> Result<()>;

    /// Décompression deflate automatique des réponses (défaut: activée)
    fn get_soap_deflate(&self) -> Result<bool>;

    fn set_soap_deflate(&self, enabled: bool) -> Result<()>;

    /// URL du proxy HTTP, `None` si aucun
    fn get_soap_proxy(&self) -> Result<Option<String>>;

    /// Définit ou efface (`None`) le proxy HTTP
    fn set_soap_proxy(&self, proxy: Option<&str>) -> Result<()>;

    /// Noms de headers HTTP/1 en casse titre, pour les serveurs SOAP
    /// sensibles à la casse (défaut: désactivé)
    fn get_soap_title_case_headers(&self) -> Result<bool>;

    fn set_soap_title_case_headers(&self, enabled: bool) -> Result<()>;
}

impl SoapConfigExt for Config {
    fn get_soap_default_version(&self) -> Result<SoapVersion> {
        match self.get_value(VERSION_PATH) {
            Ok(Value::String(s)) => Ok(s.parse::<SoapVersion>()?),
            Ok(Value::Number(n)) => Ok(n.to_string().parse::<SoapVersion>()?),
            _ => {
                self.set_soap_default_version(SoapVersion::default())?;
                Ok(SoapVersion::default())
            }
        }
    }

    fn set_soap_default_version(&self, version: SoapVersion) -> Result<()> {
        self.set_value(VERSION_PATH, Value::String(version.as_str().to_string()))
    }

    fn get_soap_timeout_secs(&self) -> Result<u64> {
        match self.get_value(TIMEOUT_PATH) {
            Ok(Value::Number(n)) if n.as_u64().is_some_and(|secs| secs > 0) => {
                Ok(n.as_u64().unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
            }
            _ => {
                self.set_soap_timeout_secs(DEFAULT_REQUEST_TIMEOUT_SECS)?;
                Ok(DEFAULT_REQUEST_TIMEOUT_SECS)
            }
        }
    }

    fn set_soap_timeout_secs(&self, timeout_secs: u64) -> Result<()> {
        self.set_value(
            TIMEOUT_PATH,
            Value::Number(serde_yaml::Number::from(timeout_secs)),
        )
    }

    fn get_soap_user_agent(&self) -> Result<String> {
        match self.get_value(USER_AGENT_PATH) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_soap_user_agent(DEFAULT_USER_AGENT)?;
                Ok(DEFAULT_USER_AGENT.to_string())
            }
        }
    }

    fn set_soap_user_agent(&self, user_agent: &str) -> Result<()> {
        self.set_value(USER_AGENT_PATH, Value::String(user_agent.to_string()))
    }

    fn get_soap_gzip(&self) -> Result<bool> {
        match self.get_value(GZIP_PATH) {
            Ok(Value::Bool(b)) => Ok(b),
            _ => {
                self.set_soap_gzip(true)?;
                Ok(true)
            }
        }
    }

    fn set_soap_gzip(&self, enabled: bool) -> Result<()> {
        self.set_value(GZIP_PATH, Value::Bool(enabled))
    }

    fn get_soap_deflate(&self) -> Result<bool> {
        match self.get_value(DEFLATE_PATH) {
            Ok(Value::Bool(b)) => Ok(b),
            _ => {
                self.set_soap_deflate(true)?;
                Ok(true)
            }
        }
    }

    fn set_soap_deflate(&self, enabled: bool) -> Result<()> {
        self.set_value(DEFLATE_PATH, Value::Bool(enabled))
    }

    fn get_soap_proxy(&self) -> Result<Option<String>> {
        match self.get_value(PROXY_PATH) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s)),
            _ => Ok(None),
        }
    }

    fn set_soap_proxy(&self, proxy: Option<&str>) -> Result<()> {
        let value = proxy
            .map(|p| Value::String(p.to_string()))
            .unwrap_or(Value::Null);
        self.set_value(PROXY_PATH, value)
    }

    fn get_soap_title_case_headers(&self) -> Result<bool> {
        match self.get_value(TITLE_CASE_PATH) {
            Ok(Value::Bool(b)) => Ok(b),
            _ => {
                self.set_soap_title_case_headers(false)?;
                Ok(false)
            }
        }
    }

    fn set_soap_title_case_headers(&self, enabled: bool) -> Result<()> {
        self.set_value(TITLE_CASE_PATH, Value::Bool(enabled))
    }
}

impl TransportBuilder {
    /// Create a builder initialised from the `soap.transport` section
    pub fn from_config(config: &Config) -> SoapResult<Self> {
        let mut builder = TransportBuilder::new()
            .timeout(Duration::from_secs(config.get_soap_timeout_secs()?))
            .user_agent(config.get_soap_user_agent()?)
            .gzip(config.get_soap_gzip()?)
            .deflate(config.get_soap_deflate()?)
            .title_case_headers(config.get_soap_title_case_headers()?);

        if let Some(proxy) = config.get_soap_proxy()? {
            builder = builder.proxy(proxy);
        }

        Ok(builder)
    }
}

impl SoapClient {
    /// Create a client from the global pmoconfig configuration
    pub fn from_config() -> SoapResult<Self> {
        Self::with_config(&pmoconfig::get_config())
    }

    /// Create a client from the `soap` section of `config`
    ///
    /// The transport follows `soap.transport`, and `soap.default_version`
    /// becomes the version of [`SoapClient::call_default`].
    pub fn with_config(config: &Config) -> SoapResult<Self> {
        let transport: ReqwestTransport = TransportBuilder::from_config(config)?.build()?;
        let version = config.get_soap_default_version()?;
        info!(
            version = %version,
            timeout_secs = config.get_soap_timeout_secs()?,
            "SOAP client configured from pmoconfig"
        );
        Ok(SoapClient::with_transport(transport).with_default_version(version))
    }
}
