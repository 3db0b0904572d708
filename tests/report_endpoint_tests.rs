mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use actix_web::{http::header, http::StatusCode, test, web, App};
use natal_report_server::configure_api;
use natal_report_server::report::PageConfig;
use serde_json::{json, Value};

use common::*;

fn report_body(planet_interpretation: &str, house_count: usize) -> Value {
    let houses: Vec<Value> = (1..=house_count)
        .map(|n| json!({ "house": n, "sign": ZODIAC[(n - 1) % 12] }))
        .collect();
    json!({
        "subject": {
            "name": "Rina",
            "email": "rina@example.com",
            "dateOfBirth": "1994-03-21",
            "timeOfBirth": "06:45",
            "placeOfBirth": "Jakarta",
            "selectedLocation": jakarta()
        },
        "result": {
            "big3": { "ascendant": "Leo", "sun": "Aries", "moon": "Cancer" },
            "planets": [
                { "name": "Ascendant", "sign": "Leo" },
                { "name": "Sun", "sign": "Aries" },
                { "name": "Moon", "sign": "Cancer" }
            ],
            "houses": houses,
            "planetInterpretation": planet_interpretation,
            "houseInterpretation": "**First house** in Aries"
        }
    })
}

fn numbered_lines(prefix: &str, count: usize) -> String {
    (1..=count)
        .map(|n| format!("{}-{}", prefix, n))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn layout(body: &Value) -> Vec<Value> {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(
                Arc::new(MockAstrology::new(empty_payload(), empty_payload())),
                Arc::new(MockNarrator::new()),
                Arc::new(StubRenderer::new()),
            )))
            .configure(configure_api),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/api/report/layout")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let pages: Value = test::read_body_json(resp).await;
    pages.as_array().cloned().unwrap_or_default()
}

fn op_bottom(op: &Value) -> f64 {
    let y = op["y"].as_f64().unwrap();
    match op["kind"].as_str().unwrap() {
        "text" => y + op["line_height"].as_f64().unwrap(),
        _ => {
            let rows = op["rows"].as_array().unwrap().len() as f64;
            y + op["row_height"].as_f64().unwrap() * (rows + 1.0)
        }
    }
}

fn house_tables(pages: &[Value]) -> Vec<(u64, Value)> {
    pages
        .iter()
        .flat_map(|page| {
            let number = page["number"].as_u64().unwrap();
            page["ops"]
                .as_array()
                .unwrap()
                .iter()
                .filter(|op| op["kind"] == "table" && op["header"][0] == "House")
                .map(move |op| (number, op.clone()))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[actix_web::test]
async fn test_house_table_split_repeats_header() {
    // 20 narrative lines push the houses table near the bottom of page one
    let pages = layout(&report_body(&numbered_lines("planet-line", 20), 12)).await;

    let fragments = house_tables(&pages);
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].0 + 1, fragments[1].0);
    for (_, grid) in &fragments {
        assert_eq!(grid["header"], json!(["House", "Sign"]));
        assert!(grid["rows"].as_array().unwrap().len() >= 2);
    }

    let rows: Vec<Value> = fragments
        .iter()
        .flat_map(|(_, grid)| grid["rows"].as_array().unwrap().clone())
        .collect();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0], json!(["1", "Aries"]));
    assert_eq!(rows[11], json!(["12", "Pisces"]));
}

#[actix_web::test]
async fn test_every_op_stays_inside_the_margins() {
    let pages = layout(&report_body(&numbered_lines("planet-line", 150), 12)).await;
    let config = PageConfig::default();
    let limit = (config.page_height - config.margin) as f64 + 1e-3;

    assert!(pages.len() >= 3);
    for page in &pages {
        for op in page["ops"].as_array().unwrap() {
            assert!(op["y"].as_f64().unwrap() >= config.margin as f64 - 1e-3);
            assert!(op_bottom(op) <= limit, "op overflows page {}: {}", page["number"], op);
        }
    }
}

#[actix_web::test]
async fn test_narrative_survives_pagination_in_order() {
    let pages = layout(&report_body(&numbered_lines("planet-line", 150), 12)).await;

    let numbers: Vec<u64> = pages.iter().map(|p| p["number"].as_u64().unwrap()).collect();
    let expected: Vec<u64> = (1..=pages.len() as u64).collect();
    assert_eq!(numbers, expected);

    let narrative: Vec<String> = pages
        .iter()
        .flat_map(|page| page["ops"].as_array().unwrap().clone())
        .filter(|op| op["kind"] == "text")
        .filter_map(|op| op["text"].as_str().map(str::to_string))
        .filter(|text| text.starts_with("planet-line-"))
        .collect();

    let expected: Vec<String> = (1..=150).map(|n| format!("planet-line-{}", n)).collect();
    assert_eq!(narrative, expected);
}

#[actix_web::test]
async fn test_layout_uses_sanitized_narrative() {
    let pages = layout(&report_body("```markdown\n**Bold** planets\n```", 12)).await;

    let texts: Vec<String> = pages
        .iter()
        .flat_map(|page| page["ops"].as_array().unwrap().clone())
        .filter_map(|op| op["text"].as_str().map(str::to_string))
        .collect();

    assert!(texts.contains(&"Bold planets".to_string()));
    assert!(texts.contains(&"First house in Aries".to_string()));
    assert!(texts.iter().all(|t| !t.contains("**") && !t.contains("```")));
}

#[actix_web::test]
async fn test_pdf_is_returned_as_attachment() {
    let renderer = Arc::new(StubRenderer::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(
                Arc::new(MockAstrology::new(empty_payload(), empty_payload())),
                Arc::new(MockNarrator::new()),
                renderer.clone(),
            )))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/report/pdf")
        .set_json(report_body("Short planets text", 12))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap(), "application/pdf");
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
    assert!(disposition.contains("spirit-personality-analysis.pdf"));

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF"));
    assert_eq!(renderer.pages_seen.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_snapshot_is_returned_as_png() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(
                Arc::new(MockAstrology::new(empty_payload(), empty_payload())),
                Arc::new(MockNarrator::new()),
                Arc::new(StubRenderer::new()),
            )))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/report/snapshot")
        .set_json(report_body("Short planets text", 12))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap(), "image/png");
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
    assert!(disposition.contains("spirit-personality-analysis.png"));
}

#[actix_web::test]
async fn test_undecodable_report_body_returns_error_json() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(
                Arc::new(MockAstrology::new(empty_payload(), empty_payload())),
                Arc::new(MockNarrator::new()),
                Arc::new(StubRenderer::new()),
            )))
            .configure(configure_api),
    )
    .await;

    let mut body = report_body("Short planets text", 12);
    body.as_object_mut().unwrap().remove("result");
    let req = test::TestRequest::post()
        .uri("/api/report/pdf")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["kind"], "ValidationError");
    assert!(json["error"].as_str().unwrap().contains("result"));
}
