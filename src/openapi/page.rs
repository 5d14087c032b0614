use super::types::ApiDescription;
use minijinja::{context, Environment};
use std::fmt;

/// Where the viewer's script and stylesheet are loaded from.
pub const SWAGGER_UI_BASE: &str = "https://unpkg.com/swagger-ui-dist@3";

const DOCS_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{{ title|escape }}</title>
    <link rel="stylesheet" href="{{ viewer_base }}/swagger-ui.css" />
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script id="api-description" type="application/json">{{ description }}</script>
    <script src="{{ viewer_base }}/swagger-ui-bundle.js"></script>
    <script>
      window.onload = function () {
        window.ui = SwaggerUIBundle({
          spec: JSON.parse(document.getElementById('api-description').textContent),
          dom_id: '#swagger-ui',
        });
      };
    </script>
  </body>
</html>
"#;

/// Failure to render the documentation page.
#[derive(Debug)]
pub enum DocsError {
    Serialize(serde_json::Error),
    Template(minijinja::Error),
}

impl fmt::Display for DocsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocsError::Serialize(e) => write!(f, "failed to serialize API description: {e}"),
            DocsError::Template(e) => write!(f, "failed to render docs page: {e}"),
        }
    }
}

impl std::error::Error for DocsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocsError::Serialize(e) => Some(e),
            DocsError::Template(e) => Some(e),
        }
    }
}

/// Render the HTML page embedding `description` inline for the viewer.
///
/// The embedded JSON has every `</` written as `<\/` so no string inside the
/// description can close the surrounding script element.
///
/// # Errors
///
/// Returns [`DocsError`] if the description cannot be serialized or the
/// template fails to render.
pub fn render_docs_page(description: &ApiDescription) -> Result<String, DocsError> {
    let json = description.to_json().map_err(DocsError::Serialize)?;
    let embedded = json.replace("</", "<\\/");

    // No auto-escaping for "tpl"; the title is escaped explicitly.
    let mut env = Environment::new();
    env.add_template("tpl", DOCS_TEMPLATE)
        .map_err(DocsError::Template)?;
    let tmpl = env.get_template("tpl").map_err(DocsError::Template)?;
    tmpl.render(context! {
        title => description.info.title,
        viewer_base => SWAGGER_UI_BASE,
        description => embedded,
    })
    .map_err(DocsError::Template)
}

/// Pull the embedded description back out of a rendered page.
#[must_use]
pub fn extract_embedded_description(page: &str) -> Option<String> {
    let open = r#"<script id="api-description" type="application/json">"#;
    let start = page.find(open)? + open.len();
    let len = page[start..].find("</script>")?;
    Some(page[start..start + len].replace("<\\/", "</"))
}
