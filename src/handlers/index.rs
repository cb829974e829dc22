//! Map page handler.
//!
//! Serves a small Leaflet page that fetches `/layer` and draws each feature
//! as a circle marker using the style carried on the feature.

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::layer::LAYER_NAME;
use crate::state::AppState;

const LEAFLET_VERSION: &str = "1.9.4";

/// Handle GET / requests
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let (lat, lon) = match state.dataset.gdf().mean_point() {
        Some(center) => (center.y(), center.x()),
        None => (0.0, 0.0),
    };
    Html(render_page(LAYER_NAME, lat, lon))
}

fn render_page(title: &str, lat: f64, lon: f64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
  <style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
  <div id="map"></div>
  <script>
    const map = L.map('map').setView([{lat}, {lon}], 3);
    L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
      attribution: '&copy; OpenStreetMap contributors'
    }}).addTo(map);

    fetch('layer')
      .then((response) => response.json())
      .then((collection) => {{
        const hover = collection.layer.hover_style;
        const layer = L.geoJSON(collection, {{
          pointToLayer: (feature, latlng) =>
            L.circleMarker(latlng, feature.style),
          onEachFeature: (feature, marker) => {{
            const value = feature.properties[collection.layer.objective];
            marker.bindTooltip(collection.layer.objective + ': ' + value);
            marker.on('mouseover', () => marker.setStyle(hover));
            marker.on('mouseout', () => marker.setStyle(feature.style));
          }},
        }}).addTo(map);
        if (layer.getBounds().isValid()) {{
          map.fitBounds(layer.getBounds());
        }}
      }});
  </script>
</body>
</html>
"#,
        title = title,
        version = LEAFLET_VERSION,
        lat = lat,
        lon = lon,
    )
}
