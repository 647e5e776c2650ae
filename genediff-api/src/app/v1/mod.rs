use actix_web::{Scope, web};

pub mod catalog;
pub mod compare;

pub fn routes(app: Scope) -> Scope {
    app
        .service(web::resource("compare")
            .route(web::post().to(compare::compare)))
        .service(web::resource("catalog")
            .route(web::get().to(catalog::status)))
        .service(web::resource("catalog/reload")
            .route(web::post().to(catalog::reload)))
}
