//! Common test utilities
//!
//! A small catalog served by wiremock:
//!
//! - Europe: France (Landes, Pays Basque > North, La Torche), Portugal
//! - North America: USA (California > Mavericks)
//! - Antarctica: no countries

#![allow(dead_code)]

use std::path::Path;
use surfatlas::config::Config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CONTINENT_INDEX_HTML: &str = include_str!("../fixtures/html/continent_index.html");
pub const COUNTRY_FRANCE_HTML: &str = include_str!("../fixtures/html/country_france.html");
pub const ZONE_LANDES_HTML: &str = include_str!("../fixtures/html/zone_landes.html");
pub const SPOT_MAVERICKS_HTML: &str = include_str!("../fixtures/html/spot_mavericks.html");

/// Paths of every page in the fixture catalog
pub mod paths {
    pub const ROOT: &str = "/";
    pub const FRANCE: &str = "/spot/Europe/France/";
    pub const LANDES: &str = "/spot/Europe/France/Landes/";
    pub const HOSSEGOR: &str = "/spot/Europe/France/Landes/hossegor/";
    pub const SEIGNOSSE: &str = "/spot/Europe/France/Landes/seignosse/";
    pub const BASQUE: &str = "/spot/Europe/France/Pays_Basque/";
    pub const NORTH: &str = "/spot/Europe/France/Pays_Basque/North/";
    pub const GUETHARY: &str = "/spot/Europe/France/Pays_Basque/North/guethary/";
    pub const LA_TORCHE: &str = "/spot/Europe/France/la_torche/";
    pub const PORTUGAL: &str = "/spot/Europe/Portugal/";
    pub const SUPERTUBOS: &str = "/spot/Europe/Portugal/supertubos/";
    pub const USA: &str = "/spot/North_America/USA/";
    pub const CALIFORNIA: &str = "/spot/North_America/USA/California/";
    pub const MAVERICKS: &str = "/spot/North_America/USA/California/mavericks/";
}

/// Country or zone page listing sub-zones and spots as `(name, path)` pairs
pub fn region_page(title: &str, zones: &[(&str, &str)], spots: &[(&str, &str)]) -> String {
    let rows = |links: &[(&str, &str)]| {
        links
            .iter()
            .map(|(name, href)| format!("<tr><td><a href=\"{href}\">{name}</a></td></tr>"))
            .collect::<String>()
    };

    let mut body = format!(
        "<div id=\"wanna-country-tab-about\"><p style=\"display:inline\">About {title}.</p></div>"
    );
    if !zones.is_empty() {
        body.push_str(&format!(
            "<h3 class=\"wanna-item\">Zones</h3><table>{}</table>",
            rows(zones)
        ));
    }
    if !spots.is_empty() {
        body.push_str(&format!(
            "<h3 class=\"wanna-item\">Surf Spots</h3><table>{}</table>",
            rows(spots)
        ));
    }

    format!("<html><head><title>{title} - Wannasurf</title></head><body>{body}</body></html>")
}

/// Spot page with coordinates and a swell row
pub fn spot_page(name: &str, lat: f64, lon: f64, swell: &str) -> String {
    format!(
        r#"<html><head><title>{name} - Wannasurf</title></head><body>
        <h3 class="wanna-item">{name} Access</h3>
        <p><span class="wanna-item-label">Wave quality:</span> Regional classic</p>
        <p><span class="wanna-item-label-gps">Latitude:</span> {lat}</p>
        <p><span class="wanna-item-label-gps">Longitude:</span> {lon}</p>
        <table id="wanna-season-table">
          <thead><tr><th></th><th>Jan/Feb</th><th>Sep/Oct</th></tr></thead>
          <tbody><tr><td>Typical Swell Size</td><td>{swell}</td><td>{swell}</td></tr></tbody>
        </table>
        </body></html>"#
    )
}

/// Mount one HTML page
pub async fn mount_page(server: &MockServer, page_path: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body.into()),
        )
        .mount(server)
        .await;
}

/// Mount a failing page
pub async fn mount_status(server: &MockServer, page_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount every page of the fixture catalog except those in `skip`
pub async fn mount_site_except(server: &MockServer, skip: &[&str]) {
    use paths::*;

    let pages: Vec<(&str, String)> = vec![
        (ROOT, CONTINENT_INDEX_HTML.to_string()),
        (FRANCE, COUNTRY_FRANCE_HTML.to_string()),
        (LANDES, ZONE_LANDES_HTML.to_string()),
        (HOSSEGOR, spot_page("Hossegor", 43.664, -1.444, "Large")),
        (SEIGNOSSE, spot_page("Seignosse", 43.69, -1.44, "Medium")),
        (BASQUE, region_page("Pays Basque", &[("North", NORTH)], &[])),
        (NORTH, region_page("North", &[], &[("Guethary", GUETHARY)])),
        (GUETHARY, spot_page("Guethary", 43.42, -1.61, "Large")),
        (LA_TORCHE, spot_page("La Torche", 47.84, -4.35, "Medium")),
        (
            PORTUGAL,
            region_page("Portugal", &[], &[("Supertubos", SUPERTUBOS)]),
        ),
        (SUPERTUBOS, spot_page("Supertubos", 39.34, -9.36, "Medium")),
        (USA, region_page("USA", &[("California", CALIFORNIA)], &[])),
        (
            CALIFORNIA,
            region_page("California", &[], &[("Mavericks", MAVERICKS)]),
        ),
        (MAVERICKS, SPOT_MAVERICKS_HTML.to_string()),
    ];

    for (page_path, body) in pages {
        if !skip.contains(&page_path) {
            mount_page(server, page_path, body).await;
        }
    }
}

/// Mount the whole fixture catalog
pub async fn mount_site(server: &MockServer) {
    mount_site_except(server, &[]).await;
}

/// Configuration pointing at a mock server, writing under `out`
pub fn test_config(server: &MockServer, out: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = format!("{}/", server.uri());
    config.crawler.delay_secs = 0.0;
    config.crawler.request_timeout_secs = 5;
    config.crawler.max_retries = 1;
    config.crawler.retry_base_delay_ms = 1;
    config.output.csv_dir = out.join("output_csv");
    config.output.workbook_dir = out.join("excel_output");
    config
}
