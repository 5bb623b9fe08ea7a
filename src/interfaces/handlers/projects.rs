use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::project::{ProjectCard, ProjectListResponse, ProjectQuery},
    errors::AppError,
    use_cases::project_filter::{available_technologies, ProjectCatalog, ProjectFilter},
    AppState,
};

#[instrument(skip(state, req), fields(query = %req.query_string()))]
pub async fn list_projects(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let query = ProjectQuery::from_query_string(req.query_string());
    query.validate()?;

    let catalog = ProjectCatalog::new(state.content_handler.list_projects().await)
        .with_filter(ProjectFilter::new(query.search, query.tech));

    let visible = catalog.visible();
    let response = ProjectListResponse {
        projects: visible
            .iter()
            .map(|project| ProjectCard::from_project(project, &state.images))
            .collect(),
        technologies: catalog.technologies().to_vec(),
        total: catalog.projects().len(),
        visible: visible.len(),
        filtered: catalog.filter.is_active(),
        summary: catalog.summary(),
    };

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state))]
pub async fn get_featured_projects(state: web::Data<AppState>) -> impl Responder {
    let cards: Vec<ProjectCard> = state
        .content_handler
        .featured_projects()
        .await
        .iter()
        .map(|project| ProjectCard::from_project(project, &state.images))
        .collect();

    HttpResponse::Ok().json(cards)
}

#[instrument(skip(state))]
pub async fn get_technologies(state: web::Data<AppState>) -> impl Responder {
    let projects = state.content_handler.list_projects().await;
    HttpResponse::Ok().json(available_technologies(&projects))
}
