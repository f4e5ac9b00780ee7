use base64::prelude::{Engine, BASE64_STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use time::OffsetDateTime;
use tweet_datasets_common::Credentials;

use crate::error::TwitterError;

/// The four tokens required to sign a request, validated out of the
/// optional fields the credentials file may leave unset.
#[derive(Debug, Clone)]
pub(crate) struct OauthKeys {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl TryFrom<&Credentials> for OauthKeys {
    type Error = TwitterError;

    fn try_from(credentials: &Credentials) -> Result<Self, Self::Error> {
        fn require(field: &Option<String>, name: &'static str) -> Result<String, TwitterError> {
            field.clone().ok_or(TwitterError::MissingCredential(name))
        }

        Ok(Self {
            consumer_key: require(&credentials.consumer_key, "consumer_key")?,
            consumer_secret: require(&credentials.consumer_secret, "consumer_secret")?,
            token: require(&credentials.oauth_token, "oauth_token")?,
            token_secret: require(&credentials.oauth_token_secret, "oauth_token_secret")?,
        })
    }
}

/// Build the `Authorization: OAuth ...` header for one request, per
/// OAuth 1.0a with HMAC-SHA1.
pub(crate) fn authorization_header(
    keys: &OauthKeys,
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> Result<String, TwitterError> {
    let now = OffsetDateTime::now_utc();
    let timestamp = now.unix_timestamp().to_string();
    let nonce = format!("{:x}", now.unix_timestamp_nanos());
    build_header(keys, method, url, params, &timestamp, &nonce)
}

fn build_header(
    keys: &OauthKeys,
    method: &str,
    url: &str,
    params: &[(String, String)],
    timestamp: &str,
    nonce: &str,
) -> Result<String, TwitterError> {
    let oauth_params = [
        ("oauth_consumer_key", keys.consumer_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", keys.token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let mut signed: Vec<(&str, &str)> = oauth_params.to_vec();
    signed.extend(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let signature = sign(keys, method, url, &signed)?;

    let mut fields = oauth_params.to_vec();
    fields.push(("oauth_signature", signature.as_str()));
    fields.sort_unstable();
    let joined = fields
        .iter()
        .map(|(k, v)| format!(r#"{}="{}""#, k, percent(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {joined}"))
}

/// HMAC-SHA1 signature over the normalized base string, keyed by the
/// consumer and token secrets.
fn sign(
    keys: &OauthKeys,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
) -> Result<String, TwitterError> {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent(k), percent(v)))
        .collect();
    encoded.sort_unstable();
    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let base = format!("{}&{}&{}", method, percent(url), percent(&normalized));

    let key = format!(
        "{}&{}",
        percent(&keys.consumer_secret),
        percent(&keys.token_secret)
    );
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| TwitterError::Sign(e.to_string()))?;
    mac.update(base.as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

// RFC 3986 percent-encoding, which is what OAuth's parameter encoding
// requires. `urlencoding` leaves exactly the unreserved set alone.
fn percent(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    // The worked example from the OAuth 1.0a signing documentation.
    fn keys() -> OauthKeys {
        OauthKeys {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".to_string(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        }
    }

    #[test]
    fn known_signature_vector() {
        let params = [
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ("include_entities", "true"),
            ("oauth_consumer_key", "xvz1evFS4wEEPTGEFPHBog"),
            ("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1318622958"),
            (
                "oauth_token",
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            ),
            ("oauth_version", "1.0"),
        ];
        let signature = sign(
            &keys(),
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &params,
        )
        .unwrap();
        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn header_contains_signature_and_all_oauth_fields() {
        let params = [("q".to_string(), "NCAA".to_string())];
        let header = build_header(
            &keys(),
            "GET",
            "https://api.twitter.com/1.1/search/tweets.json",
            &params,
            "1318622958",
            "abc123",
        )
        .unwrap();

        assert!(header.starts_with("OAuth "));
        for field in [
            "oauth_consumer_key=",
            "oauth_nonce=\"abc123\"",
            "oauth_signature=",
            "oauth_signature_method=\"HMAC-SHA1\"",
            "oauth_timestamp=\"1318622958\"",
            "oauth_token=",
            "oauth_version=\"1.0\"",
        ] {
            assert!(header.contains(field), "missing {field} in {header}");
        }
        // Request parameters are signed but never placed in the header.
        assert!(!header.contains("q="));
    }

    #[test]
    fn missing_credential_is_named() {
        let credentials = Credentials {
            consumer_key: Some("ck".to_string()),
            ..Default::default()
        };
        let err = OauthKeys::try_from(&credentials).unwrap_err();
        assert!(matches!(
            err,
            TwitterError::MissingCredential("consumer_secret")
        ));
    }

    #[test]
    fn percent_encoding_is_rfc3986() {
        assert_eq!(percent("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent("safe-_.~"), "safe-_.~");
    }
}
