use actix_web::{error::PathError, web};

use crate::{errors::AppError, handlers::json_error::route_not_found};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.default_service(web::route().to(route_not_found));
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        path_error(err).into()
    }));
}

fn path_error(err: PathError) -> AppError {
    AppError::BadRequest(format!("Invalid path: {}", err))
}
