use actix_web::web;

use crate::{
    handlers::{contact::submit_contact, system},
    notifiers::Notifier,
    repositories::submission::SubmissionRepository,
};

mod json_error;

pub fn configure_routes<R, N>(cfg: &mut web::ServiceConfig)
where
    R: SubmissionRepository + 'static,
    N: Notifier + 'static,
{
    cfg.service(web::resource("/contact").route(web::post().to(submit_contact::<R, N>)));
    cfg.service(system::health_check);

    cfg.configure(json_error::config_routes);
    cfg.default_service(web::route().to(system::not_found));
}
