use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::borrow::Cow;

use crate::config::Credentials;
use crate::encoder_oauth1::{percent_encode, percent_encode_cow};
use crate::parameters::Parameter;
use crate::v1::values::*;

type HmacSha1 = Hmac<Sha1>;

/// Contents signed with OAuth1a.
#[derive(Clone, Debug)]
pub struct SignedContent<'a> {
    pub signature: String,
    pub base_string: String,
    pub nonce: Cow<'a, str>,
    pub timestamp: i64,
    /// Percent-encoded `oauth_*` protocol parameters, without the signature.
    pub oauth_params: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

impl SignedContent<'_> {
    /// Value of the `Authorization` header, parameters in alphabetical order.
    pub fn authorization_header(&self) -> String {
        let signature = percent_encode(&self.signature).to_string();
        let mut params = self
            .oauth_params
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect::<Vec<(&str, &str)>>();
        params.push((OAUTH_PARAM_KEY_SIGNATURE, signature.as_str()));
        params.sort();
        let fields = params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, v))
            .collect::<Vec<String>>()
            .join(", ");
        format!("{} {}", OAUTH_HEADER, fields)
    }
}

/// HMAC-SHA1 signer bound to one request's method and endpoint.
pub struct Signer<'a> {
    credentials: &'a Credentials,
    endpoint: Cow<'a, str>,
    http_method: Cow<'a, str>,
    nonce: Cow<'a, str>,
    timestamp: i64,
}

impl<'a> Signer<'a> {
    pub fn new<TEndpoint, THttpMethod, TNonce>(
        credentials: &'a Credentials,
        endpoint: TEndpoint,
        http_method: THttpMethod,
        nonce: TNonce,
        timestamp: i64,
    ) -> Self
    where
        TEndpoint: Into<Cow<'a, str>>,
        THttpMethod: Into<Cow<'a, str>>,
        TNonce: Into<Cow<'a, str>>,
    {
        Signer {
            credentials,
            endpoint: endpoint.into(),
            http_method: http_method.into(),
            nonce: nonce.into(),
            timestamp,
        }
    }

    /// Signs the request over `parameters`, the signable request parameters
    /// in raw (not yet encoded) form.
    pub fn sign<K>(self, parameters: Vec<(K, Parameter<'_>)>) -> SignedContent<'a>
    where
        K: AsRef<str>,
    {
        let oauth_params = build_basic_params(
            &self.credentials.consumer_key,
            &self.credentials.token,
            self.nonce.clone(),
            self.timestamp,
        );
        let user_params = parameters
            .iter()
            .map(|(k, v)| {
                (
                    percent_encode_cow(k.as_ref()).into_owned(),
                    percent_encode_cow(v.to_string()).into_owned(),
                )
            })
            .map(|(k, v)| (Cow::Owned(k), Cow::Owned(v)))
            .collect::<Vec<(Cow<str>, Cow<str>)>>();

        // join two parameters and sort by alphabetical order
        let mut payload = [oauth_params.clone(), user_params].concat();
        payload.sort();

        let base_string = signature_base_string(&self.http_method, &self.endpoint, &payload);
        let signature = generate_signature_hmacsha1(
            &self.credentials.consumer_secret,
            &self.credentials.token_secret,
            &base_string,
        );
        SignedContent {
            signature,
            base_string,
            nonce: self.nonce,
            timestamp: self.timestamp,
            oauth_params,
        }
    }
}

fn build_basic_params<'a>(
    consumer_key: &str,
    token: &str,
    nonce: Cow<'a, str>,
    timestamp: i64,
) -> Vec<(Cow<'a, str>, Cow<'a, str>)> {
    let params: Vec<(&str, Cow<str>)> = vec![
        (OAUTH_PARAM_KEY_CONSUMER_KEY, Cow::Owned(consumer_key.to_owned())),
        (OAUTH_PARAM_KEY_NONCE, nonce),
        (
            OAUTH_PARAM_KEY_SIGNATURE_METHOD,
            Cow::Borrowed(OAUTH_VALUE_SIGMETHOD_HMACSHA1),
        ),
        (OAUTH_PARAM_KEY_TIMESTAMP, Cow::Owned(timestamp.to_string())),
        (OAUTH_PARAM_KEY_TOKEN, Cow::Owned(token.to_owned())),
        (OAUTH_PARAM_KEY_VERSION, Cow::Borrowed(OAUTH_VALUE_VERSION)),
    ];

    params
        .into_iter()
        .map(|(k, v)| (Cow::Borrowed(k), Cow::Owned(percent_encode_cow(v).into_owned())))
        .collect()
}

/// Builds `METHOD&endpoint&params` from already-encoded, sorted parameters.
pub fn signature_base_string<K, V>(
    http_method: &str,
    endpoint: &str,
    encoded_params: &[(K, V)],
) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let http_method = http_method.to_ascii_uppercase();
    let encoded_params = encoded_params
        .iter()
        .filter(|(k, _)| k.as_ref() != OAUTH_PARAM_KEY_REALM)
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect::<Vec<String>>()
        .join("&");
    // get/post parameters end up encoded twice
    format!(
        "{}&{}&{}",
        percent_encode(&http_method),
        percent_encode(endpoint),
        percent_encode(&encoded_params)
    )
}

pub fn generate_signature_hmacsha1(
    consumer_secret: &str,
    token_secret: &str,
    base_string: &str,
) -> String {
    let sign_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    // HMAC accepts keys of any length
    let mut mac = match HmacSha1::new_from_slice(sign_key.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA1 accepts keys of any size"),
    };
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
