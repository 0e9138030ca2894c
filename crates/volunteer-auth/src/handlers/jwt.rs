//! JWT Identity Verifier
//!
//! Validates RS256 access tokens issued by an Auth0-style tenant, using the
//! tenant's JWKS endpoint for signing keys.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use volunteer_core::IdentityRef;

use crate::error::{AuthError, Result};
use crate::types::VerifiedIdentity;
use crate::verifier::IdentityVerifier;

/// Configuration for the trusted token issuer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtVerifierConfig {
    /// Expected issuer (`iss` claim)
    pub issuer: String,

    /// URL to fetch JWKS from
    pub jwks_url: String,

    /// Expected audience (`aud` claim)
    pub audience: String,

    /// Allowed algorithms (default: RS256)
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,
}

fn default_algorithms() -> Vec<String> {
    vec!["RS256".to_string()]
}

impl JwtVerifierConfig {
    /// Configuration for an Auth0 tenant domain such as `volunteer.eu.auth0.com`
    pub fn auth0(domain: &str, audience: impl Into<String>) -> Self {
        let domain = domain.trim_end_matches('/');
        Self {
            issuer: format!("https://{}/", domain),
            jwks_url: format!("https://{}/.well-known/jwks.json", domain),
            audience: audience.into(),
            algorithms: default_algorithms(),
        }
    }
}

/// JWKS (JSON Web Key Set) document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// Individual JWK (JSON Web Key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    /// Key ID
    pub kid: Option<String>,
    /// Key type
    pub kty: String,
    /// Use (sig for signing)
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// RSA modulus
    pub n: Option<String>,
    /// RSA exponent
    pub e: Option<String>,
}

/// Claims read from an access token
#[derive(Debug, Deserialize)]
struct AccessClaims {
    sub: Option<String>,
    iss: Option<String>,
    exp: Option<i64>,
    permissions: Option<Vec<String>>,
}

/// JWT identity verifier
pub struct JwtVerifier {
    config: JwtVerifierConfig,
    /// JWKS cache (url -> JWKS)
    jwks_cache: Cache<String, Arc<JwkSet>>,
    /// Keys supplied up front instead of fetched
    pinned_keys: Option<Arc<JwkSet>>,
    http_client: reqwest::Client,
}

impl JwtVerifier {
    /// Create a verifier that fetches signing keys on demand
    pub fn new(config: JwtVerifierConfig) -> Self {
        Self {
            config,
            jwks_cache: Cache::builder()
                .time_to_live(Duration::from_secs(3600))
                .max_capacity(16)
                .build(),
            pinned_keys: None,
            http_client: reqwest::Client::new(),
        }
    }

    /// Use a fixed key set and never contact the JWKS endpoint
    pub fn with_keys(mut self, keys: JwkSet) -> Self {
        self.pinned_keys = Some(Arc::new(keys));
        self
    }

    /// Fetch JWKS (with caching)
    async fn fetch_jwks(&self) -> Result<Arc<JwkSet>> {
        if let Some(keys) = &self.pinned_keys {
            return Ok(keys.clone());
        }

        let url = &self.config.jwks_url;
        if let Some(cached) = self.jwks_cache.get(url).await {
            debug!(url = %url, "Using cached JWKS");
            return Ok(cached);
        }

        debug!(url = %url, "Fetching JWKS");
        let jwks: JwkSet = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let jwks = Arc::new(jwks);
        self.jwks_cache.insert(url.clone(), jwks.clone()).await;
        Ok(jwks)
    }

    fn find_key<'a>(&self, jwks: &'a JwkSet, kid: &str) -> Result<&'a Jwk> {
        jwks.keys
            .iter()
            .find(|k| k.kid.as_deref() == Some(kid))
            .ok_or_else(|| AuthError::KeyNotFound(kid.to_string()))
    }

    fn decoding_key(&self, jwk: &Jwk) -> Result<DecodingKey> {
        if jwk.kty != "RSA" {
            return Err(AuthError::UnsupportedAlgorithm(format!("key type {}", jwk.kty)));
        }
        let n = jwk
            .n
            .as_ref()
            .ok_or_else(|| AuthError::MalformedToken("signing key missing RSA modulus".into()))?;
        let e = jwk
            .e
            .as_ref()
            .ok_or_else(|| AuthError::MalformedToken("signing key missing RSA exponent".into()))?;

        DecodingKey::from_rsa_components(n, e).map_err(|e| AuthError::MalformedToken(e.to_string()))
    }

    fn check_algorithm(&self, alg: Algorithm) -> Result<()> {
        let name = format!("{:?}", alg);
        if self.config.algorithms.iter().any(|allowed| *allowed == name) {
            Ok(())
        } else {
            Err(AuthError::UnsupportedAlgorithm(name))
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    fn description(&self) -> &str {
        "JWT/JWKS verifier"
    }

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity> {
        // Step 1: Header gives the key id and algorithm
        let header =
            decode_header(token).map_err(|e| AuthError::MalformedToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidHeader("Authorization malformed".into()))?;
        self.check_algorithm(header.alg)?;

        // Step 2: Signing key
        let jwks = self.fetch_jwks().await?;
        let jwk = self.find_key(&jwks, &kid)?;
        let decoding_key = self.decoding_key(jwk)?;

        // Step 3: Signature, expiry, audience and issuer
        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);

        let claims = decode::<AccessClaims>(token, &decoding_key, &validation)?.claims;

        // Step 4: Permissions must be present, even if empty
        let permissions = claims.permissions.ok_or(AuthError::PermissionsMissing)?;

        let subject = claims
            .sub
            .and_then(IdentityRef::new)
            .ok_or_else(|| AuthError::InvalidClaims("missing subject".into()))?;

        let mut identity = VerifiedIdentity::new(subject).with_permissions(permissions);
        if let Some(iss) = claims.iss {
            identity = identity.with_issuer(iss);
        }
        if let Some(exp_time) = claims.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single()) {
            identity = identity.with_expires_at(exp_time);
        }

        debug!(
            subject = %identity.subject,
            permissions = identity.permissions.len(),
            "Access token verified"
        );

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth0_config() {
        let config = JwtVerifierConfig::auth0("volunteer.eu.auth0.com/", "volunteer-api");

        assert_eq!(config.issuer, "https://volunteer.eu.auth0.com/");
        assert_eq!(
            config.jwks_url,
            "https://volunteer.eu.auth0.com/.well-known/jwks.json"
        );
        assert_eq!(config.audience, "volunteer-api");
        assert_eq!(config.algorithms, vec!["RS256"]);
    }

    #[test]
    fn test_algorithm_allow_list() {
        let verifier = JwtVerifier::new(JwtVerifierConfig::auth0("tenant", "aud"));

        assert!(verifier.check_algorithm(Algorithm::RS256).is_ok());
        assert!(matches!(
            verifier.check_algorithm(Algorithm::HS256),
            Err(AuthError::UnsupportedAlgorithm(_))
        ));
    }

    #[tokio::test]
    async fn test_garbage_token_is_malformed() {
        let verifier = JwtVerifier::new(JwtVerifierConfig::auth0("tenant", "aud"))
            .with_keys(JwkSet { keys: vec![] });

        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert_eq!(err.code(), "invalid_header");
        assert_eq!(err.status(), 400);
    }
}
