use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};

use crate::config::DefaultsConfig;
use crate::omdb::{MovieSearchResponse, SearchQuery};
use crate::search::{validate, SearchCriteria, YearRule};
use crate::server::AppState;
use crate::util::QueryParams;
use crate::view::{render_page, PageModel};

/// Turn request parameters into a search, substituting the configured
/// defaults for anything missing. A `year` that is present but blank or
/// non-numeric means "no year filter", the same as an empty form field.
pub fn resolve_query(params: &QueryParams, defaults: &DefaultsConfig) -> SearchQuery {
    let page = params.number("page", 1).clamp(1, u32::MAX as i64) as u32;

    SearchQuery {
        title: Some(
            params
                .get("title")
                .map(str::to_string)
                .unwrap_or_else(|| defaults.title.clone()),
        ),
        year: if params.has("year") {
            params.optional_number("year", None)
        } else {
            defaults.year
        },
        page,
    }
}

/// `GET /api/movies?page=&year=&title=`
pub async fn get_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<MovieSearchResponse> {
    let query = resolve_query(&params, &state.config.defaults);
    Json(state.source.search(&query).await)
}

/// `GET /`: the search page with its first page of results already filled in.
pub async fn index_page(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Html<String> {
    let defaults = &state.config.defaults;
    let criteria = SearchCriteria::from_query(&params, defaults);
    let query = resolve_query(&params, defaults);
    let response = state.source.search(&query).await;

    let rule = YearRule::from_strict(state.config.validation.strict_year);
    let model = PageModel {
        errors: validate(&criteria, rule),
        criteria,
        total_results: response.total_results,
        movies: response.result,
    };

    Html(render_page(&model))
}
