use serde_json::Value;
use std::fmt;
use url::Url;

use crate::config::Credentials;
use crate::encoder_oauth1::percent_encode;
use crate::error::Result;
use crate::parameters::{primitive_parameters, signable_parameters, Parameter, ParameterMap};
use crate::util;
use crate::v1::{Entropy, Signer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }

    /// Whether parameters travel as a JSON body rather than a query string.
    pub fn carries_body(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

/// Whether the top-level primitive fields of a JSON body join the
/// signature base string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BodySigning {
    #[default]
    Excluded,
    Included,
}

impl From<bool> for BodySigning {
    fn from(included: bool) -> Self {
        if included {
            BodySigning::Included
        } else {
            BodySigning::Excluded
        }
    }
}

/// An unsigned request: method, target and parameters.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: Url,
    pub params: ParameterMap,
}

/// A request ready for the wire. GET requests never carry a body and
/// POST/PUT requests never gain a query string.
#[derive(Clone, Debug)]
pub struct SignedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub authorization: String,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, url: Url, params: ParameterMap) -> Self {
        RequestDescriptor {
            method,
            url,
            params,
        }
    }

    pub fn sign(
        self,
        credentials: &Credentials,
        entropy: &dyn Entropy,
        body_signing: BodySigning,
    ) -> Result<SignedRequest> {
        let RequestDescriptor {
            method,
            mut url,
            params,
        } = self;

        let (url, body) = if method.carries_body() {
            (url, Some(Value::Object(params)))
        } else {
            append_query(&mut url, &primitive_parameters(&params)?);
            (url, None)
        };

        let (endpoint, queries) = util::url_to_endpoint_and_queries(&url);
        let mut signable = queries
            .iter()
            .map(|(k, v)| (k.to_string(), Parameter::from(v.as_ref())))
            .collect::<Vec<(String, Parameter)>>();
        if let (Some(Value::Object(fields)), BodySigning::Included) = (&body, body_signing) {
            signable.extend(
                signable_parameters(fields)
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v)),
            );
        }

        let signed = Signer::new(
            credentials,
            endpoint,
            method.as_str(),
            entropy.nonce(),
            entropy.timestamp(),
        )
        .sign(signable);
        let authorization = signed.authorization_header();

        Ok(SignedRequest {
            method,
            url,
            authorization,
            body,
        })
    }
}

/// Appends `params` to the query string with the same encoding used for
/// signing.
fn append_query(url: &mut Url, params: &[(&str, Parameter<'_>)]) {
    if params.is_empty() {
        return;
    }
    let mut pairs = url.query().map(str::to_owned).into_iter().collect::<Vec<String>>();
    pairs.extend(params.iter().map(|(k, v)| {
        format!("{}={}", percent_encode(k), percent_encode(&v.to_string()))
    }));
    url.set_query(Some(&pairs.join("&")));
}
