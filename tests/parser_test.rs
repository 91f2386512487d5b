//! Parser tests against the HTML fixtures

mod common;

use surfatlas::models::{SeasonBucket, SeasonMetric};
use surfatlas::parser::{ChildKind, PageKind, PageParser, ParsedPage};
use surfatlas::utils::error::ParseError;

const SITE: &str = "https://www.wannasurf.com";

fn url(path: &str) -> String {
    format!("{SITE}{path}")
}

#[test]
fn test_continent_index_fixture() {
    let page = PageParser::new()
        .parse(common::CONTINENT_INDEX_HTML, &url("/"), PageKind::ContinentIndex)
        .unwrap()
        .into_index()
        .unwrap();

    assert_eq!(page.groups, vec!["Europe", "North America", "Antarctica"]);
    let europe: Vec<_> = page.children_in("Europe").map(|c| c.name.as_str()).collect();
    assert_eq!(europe, vec!["France", "Portugal"]);
    assert_eq!(page.children_in("Antarctica").count(), 0);
    assert!(page.children.iter().all(|c| c.kind == ChildKind::Country));
    // The forum link sits outside every continent table
    assert!(!page.children.iter().any(|c| c.url.contains("forum")));
}

#[test]
fn test_country_fixture() {
    let page = PageParser::new()
        .parse(
            common::COUNTRY_FRANCE_HTML,
            &url(common::paths::FRANCE),
            PageKind::CountryIndex,
        )
        .unwrap()
        .into_index()
        .unwrap();

    assert_eq!(page.title.as_deref(), Some("France"));
    assert_eq!(
        page.info.about.as_deref(),
        Some("Atlantic beach breaks, reef points in the Basque country.")
    );
    assert_eq!(page.info.at_a_glance.as_deref(), Some("Capital: Paris"));

    let best = page.info.seasons.get(&SeasonMetric::BestSurfingSeason).unwrap();
    assert_eq!(best.get(SeasonBucket::JanFeb), None);
    assert_eq!(best.get(SeasonBucket::SepOct), Some("Best"));

    let zones: Vec<_> = page.children_of(ChildKind::Zone).map(|c| c.name.as_str()).collect();
    assert_eq!(zones, vec!["Landes", "Pays Basque"]);
    let spots: Vec<_> = page.children_of(ChildKind::Spot).collect();
    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].url, url(common::paths::LA_TORCHE));
}

#[test]
fn test_zone_fixture() {
    let page = PageParser::new()
        .parse(
            common::ZONE_LANDES_HTML,
            &url(common::paths::LANDES),
            PageKind::RegionIndex,
        )
        .unwrap()
        .into_index()
        .unwrap();

    assert_eq!(page.title.as_deref(), Some("Landes"));
    assert_eq!(page.info.about, None, "placeholder text is dropped");
    assert_eq!(
        page.info.map_url.as_deref(),
        Some("https://www.wannasurf.com/img/maps/landes.jpg")
    );
    let spots: Vec<_> = page.children_of(ChildKind::Spot).map(|c| c.name.as_str()).collect();
    assert_eq!(spots, vec!["Hossegor - La Graviere", "Seignosse"]);
}

#[test]
fn test_mavericks_fixture() {
    let spot = PageParser::new()
        .parse(
            common::SPOT_MAVERICKS_HTML,
            &url(common::paths::MAVERICKS),
            PageKind::SpotDetail,
        )
        .unwrap()
        .into_spot()
        .unwrap();

    assert_eq!(spot.name, "Mavericks");
    assert_eq!(spot.access_type.as_deref(), Some("boat"));
    assert_eq!(spot.walk.as_deref(), Some("15 mn"));
    assert_eq!(spot.experience.as_deref(), Some("Pros or kamikaze only"));
    assert_eq!(spot.best_tide_position.as_deref(), Some("Low"));
    assert_eq!(spot.best_tide_movement, None);
    assert_eq!(spot.extra.get("Crowd").map(String::as_str), Some("Locals only"));
    assert_eq!(
        spot.additional_information.as_deref(),
        Some("Big wave spot. Cold water, sharks.")
    );

    let coords = spot.coordinates.unwrap();
    assert_eq!(coords.latitude(), 37.4);
    assert_eq!(coords.longitude(), -122.5);

    assert_eq!(spot.season().get(SeasonBucket::NovDec), Some("Large"));
    assert!(spot
        .water_temperature
        .as_deref()
        .unwrap()
        .starts_with("Jan/Feb: 12"));
}

#[test]
fn test_generated_spot_page() {
    let html = common::spot_page("Supertubos", 39.34, -9.36, "Medium");
    let parsed = PageParser::new()
        .parse(&html, &url(common::paths::SUPERTUBOS), PageKind::SpotDetail)
        .unwrap();

    let ParsedPage::SpotDetail(spot) = parsed else {
        panic!("expected a spot page");
    };
    assert_eq!(spot.name, "Supertubos");
    assert_eq!(spot.wave_quality.as_deref(), Some("Regional classic"));
    assert_eq!(spot.season().get(SeasonBucket::SepOct), Some("Medium"));
}

#[test]
fn test_error_page_is_malformed_for_every_kind() {
    let html = "<html><head><title>Error</title></head><body><h1>Oops</h1></body></html>";
    for kind in [
        PageKind::ContinentIndex,
        PageKind::RegionIndex,
        PageKind::SpotDetail,
    ] {
        let result = PageParser::new().parse(html, &url("/spot/x/"), kind);
        assert!(
            matches!(result, Err(ParseError::Malformed { kind: k, .. }) if k == kind),
            "{kind} page should be malformed"
        );
    }
}
