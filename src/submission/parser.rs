use axum::http::{HeaderMap, Method};

use crate::models::SubmissionRequest;

/// Name of the form field carrying the JSON-encoded submission.
pub const REQUEST_FIELD: &str = "request";

/// Look up the `request` form field the way a classic form handler does.
///
/// For POST, PUT and PATCH an urlencoded body is searched before the query
/// string, a multipart body after it. Anything else only consults the query
/// string. A missing field is returned as an empty string.
pub async fn request_field(
    method: &Method,
    headers: &HeaderMap,
    query: Option<&str>,
    body: bytes::Bytes,
) -> Result<String, String> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let has_body = [Method::POST, Method::PUT, Method::PATCH].contains(method);
    let from_query = query.and_then(|q| find_urlencoded(q.as_bytes()));

    if has_body && content_type.contains("application/x-www-form-urlencoded") {
        return Ok(find_urlencoded(&body).or(from_query).unwrap_or_default());
    }

    if has_body && content_type.contains("multipart/form-data") {
        if let Some(value) = from_query {
            return Ok(value);
        }
        return Ok(find_multipart(content_type, body).await?.unwrap_or_default());
    }

    Ok(from_query.unwrap_or_default())
}

fn find_urlencoded(input: &[u8]) -> Option<String> {
    form_urlencoded::parse(input)
        .find(|(k, _)| k == REQUEST_FIELD)
        .map(|(_, v)| v.into_owned())
}

/// Parse multipart form data using multer.
async fn find_multipart(content_type: &str, body: bytes::Bytes) -> Result<Option<String>, String> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        if field.name() != Some(REQUEST_FIELD) {
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        return Ok(Some(value));
    }

    Ok(None)
}

/// Decode the field value. A JSON `null` decodes to an all-empty request.
pub fn decode(raw: &[u8]) -> Result<SubmissionRequest, String> {
    serde_json::from_slice::<Option<SubmissionRequest>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(|e| e.to_string())
}
