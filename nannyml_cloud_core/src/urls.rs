use url::Url;

use crate::CoreError;

fn strip_terminal_segment<'a>(path: &'a str, segment: &str) -> &'a str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.ends_with(segment) {
        let new_len = trimmed.len().saturating_sub(segment.len());
        return trimmed[..new_len].trim_end_matches('/');
    }
    trimmed
}

/// Normalize a NannyML Cloud base URL by stripping `/api/graphql` and `/api` suffixes.
pub fn normalize_cloud_base(url: &str) -> Result<Url, CoreError> {
    let mut parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CoreError::invalid_argument(format!(
                "unsupported scheme: {other}"
            )))
        }
    }
    let mut path = parsed.path().to_string();
    path = strip_terminal_segment(&path, "/graphql").to_string();
    path = strip_terminal_segment(&path, "/api").to_string();
    parsed.set_path(path.trim_end_matches('/'));
    parsed.set_query(None);
    parsed.set_fragment(None);
    Ok(parsed)
}

/// GraphQL endpoint (`{base}/api/graphql`) for a NannyML Cloud URL.
pub fn graphql_endpoint(url: &str) -> Result<String, CoreError> {
    let base = normalize_cloud_base(url)?;
    Ok(format!(
        "{}/api/graphql",
        base.as_str().trim_end_matches('/')
    ))
}
