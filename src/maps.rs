//! Map-service URL construction for extracted candidates. Pure string
//! building; the server never calls these services itself.

pub fn maps_search_url(lat: f64, lon: f64) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={:.6},{:.6}",
        lat, lon
    )
}

pub fn street_view_url(lat: f64, lon: f64) -> String {
    format!(
        "https://www.google.com/maps/@?api=1&map_action=pano&viewpoint={:.6},{:.6}",
        lat, lon
    )
}

pub fn earth_url(lat: f64, lon: f64) -> String {
    format!(
        "https://earth.google.com/web/@{:.6},{:.6},1000a,35y,0h,0t,0r",
        lat, lon
    )
}

pub fn osm_url(lat: f64, lon: f64) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={:.6}&mlon={:.6}&zoom=16",
        lat, lon
    )
}
