use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::post::{PostDetail, PostListItem},
    errors::AppError,
    AppState,
};

#[instrument(skip(state))]
pub async fn get_all_blog_posts(state: web::Data<AppState>) -> impl Responder {
    let posts: Vec<PostListItem> = state
        .content_handler
        .list_posts()
        .await
        .iter()
        .map(|post| PostListItem::from_summary(post, &state.images))
        .collect();

    HttpResponse::Ok().json(posts)
}

#[instrument(skip(state))]
pub async fn get_latest_blog_posts(state: web::Data<AppState>) -> impl Responder {
    let posts: Vec<PostListItem> = state
        .content_handler
        .latest_posts()
        .await
        .iter()
        .map(|post| PostListItem::from_summary(post, &state.images))
        .collect();

    HttpResponse::Ok().json(posts)
}

#[instrument(skip(state))]
pub async fn get_blog_post_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state
        .content_handler
        .post_by_slug(&slug)
        .await
        .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(PostDetail::from_post(&post, &state.images)))
}
