//! HTML pages embedded from the `templates/` directory.

use include_dir::{Dir, include_dir};

use crate::HandlerError;

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Returns the contents of an embedded page.
///
/// # Errors
///
/// Returns [`HandlerError::MissingPage`] if no such page was embedded or it
/// is not UTF-8.
pub fn page(name: &str) -> Result<&'static str, HandlerError> {
    TEMPLATES
        .get_file(name)
        .and_then(|f| f.contents_utf8())
        .ok_or_else(|| HandlerError::MissingPage {
            name: name.to_string(),
        })
}

/// Fills `{{key}}` placeholders in an embedded page.
///
/// Values are inserted verbatim; callers escape any user text.
///
/// # Errors
///
/// Returns [`HandlerError::MissingPage`] if the page does not exist.
pub fn render(name: &str, values: &[(&str, &str)]) -> Result<String, HandlerError> {
    let mut html = page(name)?.to_string();
    for (key, value) in values {
        html = html.replace(&format!("{{{{{key}}}}}"), value);
    }
    Ok(html)
}
