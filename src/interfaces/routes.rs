use actix_web::web;

use crate::handlers::{home::{home, home_page}, system::health_check};

mod blog;
mod json_error;
mod projects;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .route("/home", web::get().to(home_page))
            .configure(projects::config_routes)
            .configure(blog::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
