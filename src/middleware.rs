use axum::extract::Request;
use axum::http::{header, Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Strip trailing slashes from any path other than `/`. GET requests get a
/// permanent redirect to the normalized path; everything else is forwarded
/// internally with the rewritten URI.
pub async fn normalize_trailing_slash(mut req: Request, next: Next) -> Response {
    let Some(normalized) = normalized_path(req.uri().path()) else {
        return next.run(req).await;
    };

    let target = match req.uri().query() {
        Some(query) => format!("{normalized}?{query}"),
        None => normalized,
    };

    if req.method() == Method::GET {
        return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]).into_response();
    }

    if let Ok(uri) = target.parse::<Uri>() {
        *req.uri_mut() = uri;
    }
    next.run(req).await
}

fn normalized_path(path: &str) -> Option<String> {
    if path == "/" || !path.ends_with('/') {
        return None;
    }
    let stripped = path.trim_end_matches('/');
    if stripped.is_empty() {
        Some("/".to_string())
    } else {
        Some(stripped.to_string())
    }
}
