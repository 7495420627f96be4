use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::search::SearchParams;
use crate::services::SearchService;

static SEARCH_SERVICE: Lazy<SearchService> = Lazy::new(SearchService::new_lazy);

pub async fn search(
    req: HttpRequest,
    query: web::Query<SearchParams>,
) -> ActixResult<HttpResponse> {
    SEARCH_SERVICE.search(&req, query.into_inner()).await
}

pub fn configure_search_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/search")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(search)),
    );
}
