//! HTTP handler functions for the rental-map API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use rental_map_data::Datasets;
use rental_map_quartiles::{
    Metric, crime_quartiles, parks_quartiles, schools_quartiles,
};
use rental_map_server_models::{ApiHealth, NeighbourhoodSummary, QuartileSummary};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_loaded: state.store.is_loaded(),
    })
}

/// Resolves the loaded snapshot, turning a load failure into a
/// retryable 503.
async fn loaded_datasets(state: &AppState) -> Result<Arc<Datasets>, HttpResponse> {
    state.store.load_all().await.map_err(|e| {
        log::error!("Dataset load failed: {e}");
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "error": "Datasets unavailable, retry shortly"
        }))
    })
}

/// `GET /api/neighbourhoods`
///
/// Sorted canonical names of every boundary neighbourhood.
pub async fn neighbourhoods(state: web::Data<AppState>) -> HttpResponse {
    match loaded_datasets(&state).await {
        Ok(datasets) => HttpResponse::Ok().json(datasets.neighbourhood_names()),
        Err(resp) => resp,
    }
}

/// `GET /api/neighbourhoods/{name}`
///
/// Joined per-neighbourhood view: crime, rent (direct or
/// zone-inherited), school/park counts, and quartile rankings.
pub async fn neighbourhood(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let datasets = match loaded_datasets(&state).await {
        Ok(datasets) => datasets,
        Err(resp) => return resp,
    };

    let name = path.into_inner();
    let Some(feature) = datasets.neighbourhood_by_name(&name) else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Unknown neighbourhood: {name}")
        }));
    };
    let canonical = feature.properties.canonical_name();

    let crime_map = crime_quartiles(datasets.crime_records());
    let schools_map = schools_quartiles(datasets.schools(), datasets.neighbourhoods());
    let parks_map = parks_quartiles(datasets.parks(), datasets.neighbourhoods());

    let summary = NeighbourhoodSummary {
        crime: datasets.crime_by_neighbourhood(&name).cloned(),
        rent: datasets.rent_by_neighbourhood(&name),
        school_count: datasets.schools_in(&name).len(),
        park_count: datasets.parks_in(&name).len(),
        quartiles: QuartileSummary {
            crime: crime_map.get(&canonical).cloned(),
            schools: schools_map.get(&canonical).cloned(),
            parks: parks_map.get(&canonical).cloned(),
        },
        name: canonical,
    };

    HttpResponse::Ok().json(summary)
}

/// `GET /api/quartiles/{metric}`
///
/// Full canonical-name to ranking map for one metric.
pub async fn quartiles_for_metric(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let raw = path.into_inner();
    let Ok(metric) = raw.parse::<Metric>() else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Unknown metric: {raw}")
        }));
    };

    let datasets = match loaded_datasets(&state).await {
        Ok(datasets) => datasets,
        Err(resp) => return resp,
    };

    let map = match metric {
        Metric::Crime => crime_quartiles(datasets.crime_records()),
        Metric::Schools => schools_quartiles(datasets.schools(), datasets.neighbourhoods()),
        Metric::Parks => parks_quartiles(datasets.parks(), datasets.neighbourhoods()),
    };

    HttpResponse::Ok().json(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configure_api;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use rental_map_data::{DataLoadError, DataStore, DatasetFetcher};
    use rental_map_data_models::DatasetKind;
    use rental_map_zones::ZoneMapping;
    use serde_json::json;

    struct StubFetcher;

    #[async_trait]
    impl DatasetFetcher for StubFetcher {
        async fn fetch(&self, kind: DatasetKind) -> Result<serde_json::Value, DataLoadError> {
            let payload = match kind {
                DatasetKind::Crime => json!({ "crime_by_neighbourhood": [{
                    "neighbourhood_name": "Downtown",
                    "violent_weapons_crimes_total_2025": 42,
                    "violent_weapons_crimes_monthly_avg": 3.5,
                }]}),
                DatasetKind::Rent => json!({ "rent_by_neighbourhood": [{
                    "neighbourhood_name": "EDMONTON",
                    "studio": 1000.0,
                    "1_bedroom": 1200.0,
                    "2_bedroom": 1400.0,
                    "3_bedroom_plus": null,
                    "total_avg": 1250.0,
                }]}),
                DatasetKind::Schools | DatasetKind::Parks => json!({
                    "type": "FeatureCollection",
                    "features": [{
                        "type": "Feature",
                        "properties": { "neighbourhood_name": "Downtown" },
                        "geometry": null,
                    }],
                }),
                DatasetKind::Neighbourhoods => json!({
                    "type": "FeatureCollection",
                    "features": [{
                        "type": "Feature",
                        "properties": { "name": "Downtown", "district": "Central" },
                        "geometry": null,
                    }],
                }),
            };
            Ok(payload)
        }
    }

    fn test_state() -> web::Data<AppState> {
        let mapping = ZoneMapping::from_json_str(r#"{ "DOWNTOWN": "EDMONTON" }"#).unwrap();
        web::Data::new(AppState {
            store: Arc::new(DataStore::new(Arc::new(StubFetcher), mapping)),
        })
    }

    #[actix_web::test]
    async fn summary_joins_all_datasets() {
        let app =
            test::init_service(App::new().app_data(test_state()).configure(configure_api)).await;

        let req = test::TestRequest::get()
            .uri("/api/neighbourhoods/downtown")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["name"], "DOWNTOWN");
        assert_eq!(body["crime"]["violent_weapons_crimes_total_2025"], 42);
        assert_eq!(body["schoolCount"], 1);
        assert_eq!(body["parkCount"], 1);
        // Rent came through the zone mapping, so the provenance marker
        // must be present on the wire.
        assert_eq!(body["rent"]["_inheritedFrom"], "EDMONTON");
        assert_eq!(body["quartiles"]["crime"]["tier"], 1);
    }

    #[actix_web::test]
    async fn unknown_neighbourhood_is_404() {
        let app =
            test::init_service(App::new().app_data(test_state()).configure(configure_api)).await;

        let req = test::TestRequest::get()
            .uri("/api/neighbourhoods/Atlantis")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unknown_metric_is_400() {
        let app =
            test::init_service(App::new().app_data(test_state()).configure(configure_api)).await;

        let req = test::TestRequest::get()
            .uri("/api/quartiles/rent")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn health_reports_load_state() {
        let state = test_state();
        let app = test::init_service(
            App::new().app_data(state.clone()).configure(configure_api),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["dataLoaded"], false);

        state.store.load_all().await.unwrap();

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["dataLoaded"], true);
    }
}
