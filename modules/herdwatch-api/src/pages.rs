use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use herdwatch_common::ScenarioParams;
use herdwatch_engine::{filter_and_score, monthly_counts};

use crate::components::{render_dashboard, DashboardData};
use crate::AppState;

/// SSR dashboard. The initial render uses the default scenario (cutoff
/// at the latest date, Asia/Europe preselected, enhancement on); the
/// page's own script refetches the JSON endpoints as controls change.
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Response {
    let dataset = &state.dataset;
    let Some((min_date, max_date)) = dataset.date_range() else {
        return (StatusCode::SERVICE_UNAVAILABLE, "no outbreak data loaded").into_response();
    };

    let scenario = ScenarioParams {
        cutoff: max_date,
        regions: dataset.default_regions(),
        enhanced: true,
    };
    let (subset, assessment) = filter_and_score(dataset, &scenario);
    let monthly = monthly_counts(&subset);

    let data = DashboardData {
        record_count: dataset.len(),
        min_date,
        max_date,
        regions: dataset.regions().to_vec(),
        scenario,
        subset_size: subset.len(),
        assessment,
        monthly,
    };

    Html(render_dashboard(data)).into_response()
}
