use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::quote::router::quote_handler;

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("json body")))
        .expect("request builds")
}

#[tokio::test]
async fn quote_handler_returns_itemized_calculation() {
    let (service, _, _) = build_service();

    let response = quote_handler(
        State(service),
        axum::Json(payload("2024-07-01", "2024-07-08", &["u1"], 4)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["calculation"]["basePrice"], 700);
    assert_eq!(body["calculation"]["touristTax"], 28);
    assert_eq!(body["calculation"]["totalPrice"], 778);
    assert_eq!(body["calculation"]["deposit"], 233);
    assert_eq!(body["calculation"]["balanceDue"], 545);
    assert_eq!(body["calculation"]["unitPrices"]["u1"], 700);
    assert_eq!(body["hasEnoughBeds"], true);
}

#[tokio::test]
async fn quote_route_rejects_reversed_dates() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/quote",
            json!({
                "checkIn": "2024-07-08",
                "checkOut": "2024-07-01",
                "unitIds": ["u1"],
                "adults": 2
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["kind"], "invalid_date_range");
}

#[tokio::test]
async fn quote_route_labels_each_halting_error() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let cases = [
        (
            json!({ "checkIn": "2024-07-01", "checkOut": "2024-07-08", "unitIds": ["villa"] }),
            "unknown_unit",
        ),
        (
            json!({ "checkIn": "2024-07-01", "checkOut": "2024-07-08", "unitIds": [] }),
            "no_units_selected",
        ),
        (
            json!({ "checkIn": "luglio", "checkOut": "2024-07-08", "unitIds": ["u1"] }),
            "invalid_date_range",
        ),
    ];

    for (body, expected) in cases {
        let response = router
            .clone()
            .oneshot(json_request("POST", "/api/v1/quote", body))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response_json(response).await["kind"], expected);
    }
}

#[tokio::test]
async fn quote_route_accepts_numeric_unit_ids() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/quote",
            json!({
                "checkIn": "2024-07-01",
                "checkOut": "2024-07-08",
                "unitIds": [1],
                "adults": 4
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["calculation"]["unitPrices"]["u1"], 700);
    assert_eq!(body["selectedUnitsAvailable"], true);
}

#[tokio::test]
async fn quote_route_flags_capacity_shortfall_without_failing() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/quote",
            json!({
                "checkIn": "2024-07-01",
                "checkOut": "2024-07-04",
                "unitIds": ["u2"],
                "adults": 2,
                "children": [
                    { "isUnder12": true, "sleepsInCrib": true },
                    { "isUnder12": false }
                ]
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["hasEnoughBeds"], false);
    assert_eq!(body["guests"]["effectiveGuestCount"], 3);
    assert_eq!(body["guests"]["taxableGuests"], 3);
}

#[tokio::test]
async fn availability_route_reports_every_unit() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/reservations",
            json!([{
                "id": 7,
                "unitIds": ["u1"],
                "startDate": "2024-08-12",
                "endDate": "2024-08-20",
                "status": "active"
            }]),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/availability",
            json!({ "checkIn": "2024-08-10", "checkOut": "2024-08-15" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["units"][0]["unitId"], "u1");
    assert_eq!(body["units"][0]["available"], false);
    assert_eq!(body["units"][0]["conflicts"][0], "7");
    assert_eq!(body["units"][1]["available"], true);
}

#[tokio::test]
async fn seasonal_prices_route_counts_usable_entries() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/seasonal-prices/2024")
                .body(Body::from(
                    r#"[{"unitId":"u1","weekStart":"2024-07-01","weekEnd":"2024-07-07","price":910},{"unitId":"u1"}]"#,
                ))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["year"], 2024);
    assert_eq!(body["entries"], 1);
}

#[tokio::test]
async fn units_route_lists_catalog() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/units")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body[0]["stringId"], "u1");
    assert_eq!(body[1]["bedCount"], 2);
}
