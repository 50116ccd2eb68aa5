//! Fixed-position legend overlay.

use std::fmt::Write as _;

use rescue_radar_severity_models::LegendEntry;

use crate::html::escape_html;

/// Renders a legend box pinned to the bottom-left corner of the page.
///
/// Each entry is drawn as a Font Awesome map marker in the entry's colour
/// followed by its label.
#[must_use]
pub fn legend_html(title: &str, entries: &[LegendEntry]) -> String {
    let mut html = String::from(
        "<div class=\"rescue-radar-legend\" style=\"\
         position: fixed; bottom: 50px; left: 50px; width: 220px; \
         background-color: white; border: 2px solid grey; z-index: 9999; \
         font-size: 14px; padding: 10px;\">\n",
    );

    writeln!(html, "  <strong>{}</strong><br>", escape_html(title)).unwrap();
    for entry in entries {
        writeln!(
            html,
            "  <i class=\"fa fa-map-marker fa-2x\" style=\"color:{color}\"></i>&nbsp;{label}<br>",
            color = entry.color,
            label = escape_html(&entry.label),
        )
        .unwrap();
    }
    html.push_str("</div>\n");
    html
}
