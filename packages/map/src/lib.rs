#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive map documents for Rescue Radar results.
//!
//! A [`MapDocument`] is a Leaflet map centred on one point with a set of
//! coloured markers, optional popups and optional HTML overlays (such as
//! the severity legend). Documents are rendered entirely in memory:
//!
//! - [`MapDocument::render`] yields a complete standalone HTML page.
//! - [`MapDocument::render_fragment`] yields a `<div>` plus the scripts it
//!   needs, for embedding inside another page.
//!
//! Every document gets its own element id, so several maps can be
//! rendered concurrently or embedded in the same page without clashing.
//! Leaflet, Leaflet.awesome-markers and Font Awesome are loaded from
//! public CDNs by the browser.

pub mod html;
pub mod legend;

use std::fmt::Write as _;

use rescue_radar_severity_models::MarkerColor;

use crate::html::{escape_html, js_number, js_string};

/// Zoom level used for every result map.
pub const DEFAULT_ZOOM: u8 = 10;

const HEAD_ASSETS: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet@1.9.3/dist/leaflet.css"/>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.2.2/dist/css/bootstrap.min.css"/>
<link rel="stylesheet" href="https://netdna.bootstrapcdn.com/bootstrap/3.0.0/css/bootstrap-glyphicons.css"/>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@fortawesome/fontawesome-free@6.2.0/css/all.min.css"/>
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css"/>
<script src="https://cdn.jsdelivr.net/npm/leaflet@1.9.3/dist/leaflet.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js"></script>
"#;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl LatLng {
    /// Creates a point.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The `(0, 0)` fallback used when a place cannot be resolved.
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    fn js(self) -> String {
        format!("[{}, {}]", js_number(self.lat), js_number(self.lon))
    }
}

/// Raster tile source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Attribution shown in the map corner (HTML allowed).
    pub attribution: String,
    /// Maximum zoom level the source serves.
    pub max_zoom: u8,
}

impl TileLayer {
    /// Standard `OpenStreetMap` tiles.
    #[must_use]
    pub fn openstreetmap() -> Self {
        Self {
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            max_zoom: 19,
        }
    }

    /// Esri World Topographic tiles.
    #[must_use]
    pub fn esri_world_topo() -> Self {
        Self {
            url_template:
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}"
                    .to_string(),
            attribution: "Esri, USGS, NOAA".to_string(),
            max_zoom: 18,
        }
    }
}

/// Popup attached to a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// Popup body. Inserted as HTML; callers escape any user text.
    pub html: String,
    /// Maximum popup width in pixels.
    pub max_width: u32,
}

/// A coloured pin on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Pin position.
    pub location: LatLng,
    /// Pin colour.
    pub color: MarkerColor,
    /// Optional popup opened on click.
    pub popup: Option<Popup>,
}

/// An in-memory Leaflet map.
#[derive(Debug, Clone)]
pub struct MapDocument {
    id: String,
    center: LatLng,
    zoom: u8,
    tiles: TileLayer,
    markers: Vec<Marker>,
    overlays: Vec<String>,
}

impl MapDocument {
    /// Creates an empty map with `OpenStreetMap` tiles.
    #[must_use]
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self {
            id: format!("map_{}", uuid::Uuid::new_v4().simple()),
            center,
            zoom,
            tiles: TileLayer::openstreetmap(),
            markers: Vec::new(),
            overlays: Vec::new(),
        }
    }

    /// Replaces the tile layer.
    #[must_use]
    pub fn with_tiles(mut self, tiles: TileLayer) -> Self {
        self.tiles = tiles;
        self
    }

    /// Adds a marker.
    pub fn add_marker(&mut self, marker: Marker) -> &mut Self {
        self.markers.push(marker);
        self
    }

    /// Adds a raw HTML overlay placed after the map element (e.g. a legend).
    pub fn add_overlay(&mut self, html: impl Into<String>) -> &mut Self {
        self.overlays.push(html.into());
        self
    }

    /// Element id of the map container.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Centre of the map.
    #[must_use]
    pub const fn center(&self) -> LatLng {
        self.center
    }

    /// Markers added so far.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Renders a complete HTML page containing only this map.
    #[must_use]
    pub fn render(&self) -> String {
        let mut page = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n\
             <meta http-equiv=\"content-type\" content=\"text/html; charset=UTF-8\"/>\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no\"/>\n",
        );
        page.push_str(HEAD_ASSETS);
        writeln!(
            page,
            "<style>html, body {{ width: 100%; height: 100%; margin: 0; padding: 0; }} \
             #{id} {{ position: absolute; top: 0; bottom: 0; left: 0; right: 0; }}</style>",
            id = self.id
        )
        .unwrap();
        page.push_str("</head>\n<body>\n");
        writeln!(page, "<div id=\"{}\"></div>", self.id).unwrap();
        for overlay in &self.overlays {
            page.push_str(overlay);
        }
        page.push_str(&self.script());
        page.push_str("</body>\n</html>\n");
        page
    }

    /// Renders an embeddable fragment with a fixed-height container.
    #[must_use]
    pub fn render_fragment(&self) -> String {
        let mut html = String::from(HEAD_ASSETS);
        writeln!(
            html,
            "<div id=\"{}\" style=\"width: 100%; height: 500px;\"></div>",
            self.id
        )
        .unwrap();
        for overlay in &self.overlays {
            html.push_str(overlay);
        }
        html.push_str(&self.script());
        html
    }

    fn script(&self) -> String {
        let id = &self.id;
        let mut js = String::from("<script>\n");
        writeln!(
            js,
            "var {id} = L.map({}, {{center: {}, zoom: {}, zoomControl: true}});",
            js_string(id),
            self.center.js(),
            self.zoom,
        )
        .unwrap();
        writeln!(
            js,
            "L.tileLayer({}, {{attribution: {}, maxZoom: {}}}).addTo({id});",
            js_string(&self.tiles.url_template),
            js_string(&self.tiles.attribution),
            self.tiles.max_zoom,
        )
        .unwrap();
        for (i, marker) in self.markers.iter().enumerate() {
            writeln!(
                js,
                "var {id}_marker_{i} = L.marker({}, {{icon: L.AwesomeMarkers.icon({{\
                 icon: \"info-sign\", prefix: \"glyphicon\", iconColor: \"white\", markerColor: {}}})}}).addTo({id});",
                marker.location.js(),
                js_string(marker.color.as_ref()),
            )
            .unwrap();
            if let Some(popup) = &marker.popup {
                writeln!(
                    js,
                    "{id}_marker_{i}.bindPopup(L.popup({{maxWidth: {}}}).setContent({}));",
                    popup.max_width,
                    js_string(&popup.html),
                )
                .unwrap();
            }
        }
        js.push_str("</script>\n");
        js
    }
}

/// Builds popup HTML from label/value rows, escaping both.
#[must_use]
pub fn popup_rows(rows: &[(&str, String)]) -> String {
    let mut html = String::from("<div style=\"font-size: 16px;\">\n");
    for (label, value) in rows {
        writeln!(
            html,
            "  <strong>{}:</strong> {}<br>",
            escape_html(label),
            escape_html(value)
        )
        .unwrap();
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MapDocument {
        let mut map = MapDocument::new(LatLng::new(25.6, 85.1), DEFAULT_ZOOM)
            .with_tiles(TileLayer::esri_world_topo());
        map.add_marker(Marker {
            location: LatLng::new(25.6, 85.1),
            color: MarkerColor::Red,
            popup: Some(Popup {
                html: popup_rows(&[("Place", "Patna".to_string())]),
                max_width: 250,
            }),
        });
        map
    }

    #[test]
    fn renders_standalone_page() {
        let map = sample();
        let page = map.render();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(&format!("<div id=\"{}\"></div>", map.id())));
        assert!(page.contains("center: [25.6, 85.1], zoom: 10"));
        assert!(page.contains("World_Topo_Map"));
        assert!(page.contains("\"Esri, USGS, NOAA\""));
        assert!(page.contains("markerColor: \"red\""));
        assert!(page.contains("maxWidth: 250"));
        assert!(page.contains("Patna"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn fragment_has_no_document_wrapper() {
        let map = sample();
        let fragment = map.render_fragment();
        assert!(!fragment.contains("<html>"));
        assert!(fragment.contains("height: 500px"));
        assert!(fragment.contains("leaflet.js"));
    }

    #[test]
    fn overlays_follow_map_container() {
        let mut map = sample();
        map.add_overlay("<div id=\"legend\">legend</div>");
        let page = map.render();
        let container = page.find(&format!("id=\"{}\"", map.id())).unwrap();
        let legend = page.find("id=\"legend\"").unwrap();
        assert!(legend > container);
    }

    #[test]
    fn each_document_has_a_unique_id() {
        let a = MapDocument::new(LatLng::origin(), DEFAULT_ZOOM);
        let b = MapDocument::new(LatLng::origin(), DEFAULT_ZOOM);
        assert_ne!(a.id(), b.id());
        assert!(a.id().starts_with("map_"));
    }

    #[test]
    fn popup_text_is_escaped() {
        let html = popup_rows(&[("Place", "<script>alert(1)</script>".to_string())]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<strong>Place:</strong>"));
    }

    #[test]
    fn defaults_to_openstreetmap_tiles() {
        let map = MapDocument::new(LatLng::origin(), DEFAULT_ZOOM);
        assert!(map.render().contains("tile.openstreetmap.org"));
        assert_eq!(map.center(), LatLng::origin());
        assert!(map.markers().is_empty());
    }
}
