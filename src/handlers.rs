use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use tracing::{error, info};

use crate::models::Post;
use crate::posts::PostError;
use crate::state::AppState;

const HOT_RELOAD_SCRIPT: &str = r#"
<script>
    const socket = new WebSocket("ws://" + window.location.host + "/ws");
    socket.onmessage = (event) => {
        if (event.data === "reload") {
            window.location.reload();
        }
    };
</script>
"#;

pub async fn list_page(State(state): State<Arc<AppState>>) -> Response {
    info!("blog list handler dispatched");

    let listings = match state.posts.all_listings() {
        Ok(listings) => listings,
        Err(err) => return listing_failure(err),
    };

    let context = json!({
        "posts": listings,
        "settings": &state.settings,
    });
    render(&state, "index", &context, StatusCode::OK)
}

pub async fn post_page(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!(%slug, "blog post handler dispatched");

    let (post, status) = match state.posts.find_post_by_path(&slug) {
        Ok(Some(post)) => (post, StatusCode::OK),
        Ok(None) => (Post::not_found(), StatusCode::NOT_FOUND),
        Err(err) => return post_failure(&slug, err),
    };

    let listings = match state.posts.all_listings() {
        Ok(listings) => listings,
        Err(err) => return listing_failure(err),
    };

    let context = json!({
        "post": post,
        "listings": listings,
        "settings": &state.settings,
    });
    render(&state, "post", &context, status)
}

fn render(
    state: &AppState,
    template: &str,
    context: &serde_json::Value,
    status: StatusCode,
) -> Response {
    match state.renderer.render_page(template, context) {
        Ok(mut html) => {
            if state.settings.is_development() {
                html = html.replace("</body>", &format!("{HOT_RELOAD_SCRIPT}</body>"));
            }
            (status, Html(html)).into_response()
        }
        Err(err) => {
            error!(%template, error = %err, "template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "template rendering failed").into_response()
        }
    }
}

fn listing_failure(err: PostError) -> Response {
    error!(error = %err, "failed to build post listings");
    (StatusCode::INTERNAL_SERVER_ERROR, "failed to read posts").into_response()
}

fn post_failure(slug: &str, err: PostError) -> Response {
    error!(%slug, error = %err, "failed to load post");
    (StatusCode::INTERNAL_SERVER_ERROR, "failed to load post").into_response()
}

#[cfg(test)]
mod tests {
    use super::{list_page, post_page};
    use crate::markdown::CmarkRenderer;
    use crate::posts::PostService;
    use crate::settings::Settings;
    use crate::state::{AppState, RouterState};
    use crate::templates::HandlebarsRenderer;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    fn write_fixture(dir: &Path) {
        let templates = dir.join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(
            templates.join("layout.hbs"),
            "<html><body>{{> @partial-block}}</body></html>",
        )
        .unwrap();
        fs::write(
            templates.join("index.hbs"),
            "{{#> layout}}{{#each posts}}<a href=\"{{this.url}}\">{{this.title}}</a> {{this.date}} {{{this.blurb}}}{{/each}}{{/layout}}",
        )
        .unwrap();
        fs::write(
            templates.join("post.hbs"),
            "{{#> layout}}<h1>{{post.title}}</h1><time>{{post.date}}</time>{{{post.content}}}{{#each listings}}<a href=\"{{this.url}}\">{{this.title}}</a>{{/each}}{{/layout}}",
        )
        .unwrap();

        let post_dir = dir.join("content/hello-world");
        fs::create_dir_all(&post_dir).unwrap();
        fs::write(
            post_dir.join("index.md"),
            "---\ntitle: \"Hi\"\ndate: \"2021-03-01\"\n---\nFirst paragraph.\n\nSecond paragraph.\n",
        )
        .unwrap();

        let broken_dir = dir.join("content/broken");
        fs::create_dir_all(&broken_dir).unwrap();
        fs::write(broken_dir.join("index.md"), "no delimiters here\n").unwrap();
    }

    fn app(dir: &Path) -> Router {
        let state = Arc::new(AppState {
            posts: PostService::new(dir.join("content"), Box::new(CmarkRenderer::new())),
            renderer: Box::new(HandlebarsRenderer::from_dir(&dir.join("templates")).unwrap()),
            settings: Settings::default(),
        });
        let (tx, _) = broadcast::channel(1);
        Router::new()
            .route("/", get(list_page))
            .route("/{post}", get(post_page))
            .with_state(RouterState {
                app: state,
                broadcaster: tx,
            })
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn index_lists_posts_with_blurbs() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());

        let response = app(dir.path())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("<a href=\"/hello-world\">hello world</a>"));
        assert!(body.contains("March 01, 2021"));
        assert!(body.contains("First paragraph."));
        assert!(!body.contains("Second paragraph."));
    }

    #[tokio::test]
    async fn post_page_renders_the_whole_body() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());

        let response = app(dir.path())
            .oneshot(Request::get("/hello-world").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("<h1>Hi</h1>"));
        assert!(body.contains("<time>March 01, 2021</time>"));
        assert!(body.contains("<p>First paragraph.</p>"));
        assert!(body.contains("<p>Second paragraph.</p>"));
        // sidebar listing
        assert!(body.contains("<a href=\"/hello-world\">hello world</a>"));
    }

    #[tokio::test]
    async fn unknown_slug_is_a_404_placeholder() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());

        let response = app(dir.path())
            .oneshot(Request::get("/no-such-post").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("Page not found"));
    }

    #[tokio::test]
    async fn malformed_post_is_a_500_not_a_placeholder() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());

        let response = app(dir.path())
            .oneshot(Request::get("/broken").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
