//! Extraction of webhook parameters and ZPL text from request bodies.

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::{header, HeaderMap, Method};

/// Decode a raw request body into ZPL text.
///
/// Valid UTF-8 is used as is. Anything else is decoded one byte per
/// character (ISO-8859-1), which cannot fail.
pub fn decode_body(body: &[u8]) -> String {
    match std::str::from_utf8(body) {
        Ok(text) => text.to_string(),
        Err(_) => body.iter().map(|&b| char::from(b)).collect(),
    }
}

fn has_mime(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

/// Whether the request body is an HTML form rather than raw ZPL.
pub fn is_form_body(headers: &HeaderMap) -> bool {
    has_mime(headers, "application/x-www-form-urlencoded")
}

/// Whether the request body is a `multipart/form-data` upload.
pub fn is_multipart_body(headers: &HeaderMap) -> bool {
    has_mime(headers, "multipart/form-data")
}

/// Webhook parameters collected from a query string or form body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrintParams {
    pub token: Option<String>,
    pub zpl: Option<String>,
}

impl PrintParams {
    /// Parse `token` and `zpl` out of an `application/x-www-form-urlencoded`
    /// string. Empty values count as absent; the first non-empty occurrence wins.
    pub fn parse(encoded: &[u8]) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(encoded) {
            params.fill(&key, value.into_owned());
        }
        params
    }

    /// Record `value` for `key` unless it is empty or already set.
    fn fill(&mut self, key: &str, value: String) {
        if value.is_empty() {
            return;
        }
        let slot = match key {
            "token" => &mut self.token,
            "zpl" => &mut self.zpl,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    /// Fill parameters missing here from `fallback`.
    pub fn or(self, fallback: PrintParams) -> Self {
        Self {
            token: self.token.or(fallback.token),
            zpl: self.zpl.or(fallback.zpl),
        }
    }
}

// =============================================================================
// Body Extractor
// =============================================================================

/// Body of a print request, classified by method and `Content-Type`.
#[derive(Debug)]
pub enum PrintBody {
    /// Nothing was read; only POST bodies are considered.
    Empty,

    /// The ZPL document itself.
    Raw(Bytes),

    /// Parameters from a urlencoded or multipart form. Never sent to the
    /// printer as is.
    Fields(PrintParams),
}

impl<S> FromRequest<S> for PrintBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.method() != Method::POST {
            return Ok(PrintBody::Empty);
        }

        if is_multipart_body(req.headers()) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            let params = read_multipart(multipart)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(PrintBody::Fields(params));
        }

        let form = is_form_body(req.headers());
        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if form {
            Ok(PrintBody::Fields(PrintParams::parse(&body)))
        } else {
            Ok(PrintBody::Raw(body))
        }
    }
}

/// Collect `token` and `zpl` from multipart fields. A `zpl` file part is
/// decoded the same way as a raw body.
async fn read_multipart(mut multipart: Multipart) -> Result<PrintParams, MultipartError> {
    let mut params = PrintParams::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "token" => {
                let value = field.text().await?;
                params.fill(&name, value);
            }
            "zpl" => {
                let data = field.bytes().await?;
                params.fill(&name, decode_body(&data));
            }
            _ => {}
        }
    }

    Ok(params)
}
