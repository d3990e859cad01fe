use actix_web::{http::header, web, HttpRequest, HttpResponse};

use crate::{
    entities::{response::ApiResponse, submission::{ContactForm, RequestContext}},
    errors::AppError,
    notifiers::Notifier,
    repositories::submission::SubmissionRepository,
    utils::get_client_ip::get_client_ip,
    AppState,
};

pub const SUBMISSION_RECEIVED_MESSAGE: &str =
    "Thank you for your message. We'll get back to you soon!";

pub async fn submit_contact<R, N>(
    req: HttpRequest,
    state: web::Data<AppState<R, N>>,
    form: web::Json<ContactForm>,
) -> Result<HttpResponse, AppError>
where
    R: SubmissionRepository,
    N: Notifier,
{
    let ctx = RequestContext {
        client_addr: get_client_ip(&req, state.trust_forwarded_for),
        user_agent: req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("Unknown")
            .to_string(),
    };

    tracing::info!(
        method = %req.method(),
        path = %req.path(),
        client = %ctx.client_addr,
        user_agent = %ctx.user_agent,
        "incoming contact request"
    );

    let receipt = state
        .contact_handler
        .handle_submission(form.into_inner(), &ctx)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SUBMISSION_RECEIVED_MESSAGE).with_data(receipt)))
}
