use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::components::TemplateName;
use crate::errors::WikiError;
use crate::routing::{dispatch_route, resolve, Action, Outcome, PageHandlers, Title};
use crate::types::{AppState, Page, SaveForm};

/// Build the HTTP router over the wiki state
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .fallback(handle_page)
        .with_state(state)
}

/// Handle root path requests
pub async fn handle_root(State(state): State<AppState>) -> Response {
    let location = Action::View.path_for(&state.front_page);
    log::info!("Root request, redirecting to '{}'", location);
    Outcome::Redirect(location).into_response()
}

/// Handle every `/view/`, `/edit/` and `/save/` request.
///
/// The route is resolved and the method checked before the request body is
/// touched, so a bad path is a 404 whatever was posted to it.
pub async fn handle_page(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, WikiError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    log::info!("Page request received: {} '{}'", method, path);

    let route = resolve(&method, &path)?;
    let form = match route.action {
        Action::Save => {
            if !is_urlencoded(request.headers()) {
                log::warn!("Save to '{}' is not a urlencoded form", path);
                return Err(WikiError::UnsupportedForm);
            }
            match Bytes::from_request(request, &state).await {
                Ok(raw) => Some(SaveForm::from_urlencoded(&raw)),
                Err(rejection) => {
                    log::warn!("Rejected form for '{}': {}", path, rejection);
                    return Ok(rejection.into_response());
                }
            }
        }
        Action::View | Action::Edit => None,
    };

    let outcome = dispatch_route(&state, &route, form)?;
    Ok(outcome.into_response())
}

fn is_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

impl AppState {
    fn render(&self, template: TemplateName, page: &Page) -> Result<Outcome, WikiError> {
        let bytes = self.renderer.render(template, page)?;
        log::debug!("Rendered {} for '{}', {} bytes", template.as_str(), page.title, bytes.len());
        Ok(Outcome::Render(bytes))
    }
}

impl PageHandlers for AppState {
    fn view(&self, title: &Title) -> Result<Outcome, WikiError> {
        match self.store.load(title) {
            Ok(page) => self.render(TemplateName::View, &page),
            Err(WikiError::PageNotFound(_)) => {
                log::info!("Page '{}' not found, sending to editor", title);
                Ok(Outcome::Redirect(Action::Edit.path_for(title)))
            }
            Err(e) => Err(e),
        }
    }

    fn edit(&self, title: &Title) -> Result<Outcome, WikiError> {
        let page = match self.store.load(title) {
            Ok(page) => page,
            Err(WikiError::PageNotFound(_)) => {
                log::info!("Editing new page '{}'", title);
                Page::blank(title.clone())
            }
            Err(e) => return Err(e),
        };
        self.render(TemplateName::Edit, &page)
    }

    fn save(&self, title: &Title, body: Vec<u8>) -> Result<Outcome, WikiError> {
        let created = !self.store.exists(title);
        let page = Page::new(title.clone(), body);
        self.store.save(&page)?;
        if created {
            log::info!("Created page '{}'", title);
        } else {
            log::info!("Updated page '{}'", title);
        }
        Ok(Outcome::Redirect(Action::View.path_for(title)))
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Render(bytes) => Html(bytes).into_response(),
            Outcome::Redirect(location) => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
        }
    }
}
