use axum::{Json, response::Html};
use utoipa::OpenApi;

use crate::app::openapi::ApiDoc;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
const SWAGGER_UI_DIST: &str = "https://unpkg.com/swagger-ui-dist@5";

/// Swagger UI shell pointed at the generated document.
fn swagger_ui_page(title: &str, spec_url: &str) -> String {
    format!(
        r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>{title}</title>
  <link rel="stylesheet" href="{SWAGGER_UI_DIST}/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="{SWAGGER_UI_DIST}/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{ url: "{spec_url}", dom_id: "#swagger-ui", deepLinking: true }});
  </script>
</body>
</html>
"##
    )
}

pub async fn swagger_ui() -> Html<String> {
    let doc = ApiDoc::openapi();
    Html(swagger_ui_page(&doc.info.title, OPENAPI_JSON_PATH))
}

pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
