use actix_web::{get, web, HttpResponse, Responder};
use futures::future::join;
use tracing::instrument;

use crate::{
    entities::{
        post::{HomePageResponse, PostListItem},
        project::ProjectCard,
    },
    AppState,
};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Portfolio Site API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "home": "/api/v1/home",
            "projects": "/api/v1/projects",
            "posts": "/api/v1/blog/posts",
            "health": "/health"
        }
    }))
}

/// Featured projects and latest posts, fetched side by side. Either half
/// comes back empty on its own if its fetch fails.
#[instrument(skip(state))]
pub async fn home_page(state: web::Data<AppState>) -> impl Responder {
    let handler = &state.content_handler;
    let (projects, posts) = join(handler.featured_projects(), handler.latest_posts()).await;

    HttpResponse::Ok().json(HomePageResponse {
        featured_projects: projects
            .iter()
            .map(|project| ProjectCard::from_project(project, &state.images))
            .collect(),
        latest_posts: posts
            .iter()
            .map(|post| PostListItem::from_summary(post, &state.images))
            .collect(),
    })
}
