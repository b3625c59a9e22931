use axum::http::Method;

use crate::errors::WikiError;
use crate::routing::Title;
use crate::types::SaveForm;

/// The three things a page URL can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Save,
}

impl Action {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "view" => Some(Action::View),
            "edit" => Some(Action::Edit),
            "save" => Some(Action::Save),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Edit => "edit",
            Action::Save => "save",
        }
    }

    /// Whether `method` may be used with this action.
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            Action::View | Action::Edit => method == Method::GET || method == Method::HEAD,
            Action::Save => method == Method::POST,
        }
    }

    /// URL path of this action for `title`
    pub fn path_for(&self, title: &Title) -> String {
        format!("/{}/{}", self.as_str(), title)
    }
}

/// A request path resolved into an action and a validated title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub action: Action,
    pub title: Title,
}

impl Route {
    /// Resolve a raw request path.
    ///
    /// Only the whole path `/{view|edit|save}/{title}` matches; there is no
    /// trailing slash, no extra segment, and no decoding of escapes.
    pub fn resolve(path: &str) -> Result<Self, WikiError> {
        let rest = path.strip_prefix('/').ok_or(WikiError::InvalidPath)?;
        let (segment, raw_title) = rest.split_once('/').ok_or(WikiError::InvalidPath)?;
        let action = Action::from_segment(segment).ok_or(WikiError::InvalidPath)?;
        let title = Title::parse(raw_title)?;
        Ok(Route { action, title })
    }
}

/// What a handler wants sent back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A fully rendered page
    Render(Vec<u8>),
    /// A 302 to the given location
    Redirect(String),
}

/// The view/edit/save capabilities a page server provides.
pub trait PageHandlers {
    fn view(&self, title: &Title) -> Result<Outcome, WikiError>;
    fn edit(&self, title: &Title) -> Result<Outcome, WikiError>;
    fn save(&self, title: &Title, body: Vec<u8>) -> Result<Outcome, WikiError>;
}

/// Resolve `path` and check that `method` fits the action it names.
pub fn resolve(method: &Method, path: &str) -> Result<Route, WikiError> {
    let route = match Route::resolve(path) {
        Ok(route) => route,
        Err(e) => {
            log::warn!("No route for '{}'", path);
            return Err(e);
        }
    };
    if !route.action.allows(method) {
        log::warn!("{} not allowed on '{}'", method, path);
        return Err(WikiError::MethodNotAllowed);
    }
    Ok(route)
}

/// Resolve `path`, check `method`, and run the matching handler.
pub fn dispatch<H>(
    handlers: &H,
    method: &Method,
    path: &str,
    form: Option<SaveForm>,
) -> Result<Outcome, WikiError>
where
    H: PageHandlers + ?Sized,
{
    let route = resolve(method, path)?;
    dispatch_route(handlers, &route, form)
}

/// Run the handler for an already resolved and method-checked route.
pub fn dispatch_route<H>(
    handlers: &H,
    route: &Route,
    form: Option<SaveForm>,
) -> Result<Outcome, WikiError>
where
    H: PageHandlers + ?Sized,
{
    log::debug!("Dispatching {} for '{}'", route.action.as_str(), route.title);
    match route.action {
        Action::View => handlers.view(&route.title),
        Action::Edit => handlers.edit(&route.title),
        Action::Save => {
            let body = form.map(|f| f.body).unwrap_or_default();
            handlers.save(&route.title, body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl PageHandlers for Recorder {
        fn view(&self, title: &Title) -> Result<Outcome, WikiError> {
            self.calls.borrow_mut().push(format!("view {title}"));
            Ok(Outcome::Render(b"view".to_vec()))
        }

        fn edit(&self, title: &Title) -> Result<Outcome, WikiError> {
            self.calls.borrow_mut().push(format!("edit {title}"));
            Ok(Outcome::Render(b"edit".to_vec()))
        }

        fn save(&self, title: &Title, body: Vec<u8>) -> Result<Outcome, WikiError> {
            let body = String::from_utf8(body).unwrap();
            self.calls.borrow_mut().push(format!("save {title} {body}"));
            Ok(Outcome::Redirect(Action::View.path_for(title)))
        }
    }

    #[test]
    fn resolves_each_action() {
        let route = Route::resolve("/view/FrontPage").unwrap();
        assert_eq!(route.action, Action::View);
        assert_eq!(route.title.as_str(), "FrontPage");
        assert_eq!(Route::resolve("/edit/a1").unwrap().action, Action::Edit);
        assert_eq!(Route::resolve("/save/a1").unwrap().action, Action::Save);
    }

    #[test]
    fn rejects_partial_and_traversal_paths() {
        let bad = [
            "",
            "/",
            "/view",
            "/view/",
            "/view/../etc",
            "/view/..",
            "/view/%2e%2e",
            "/view/a/b",
            "/view/foo/",
            "/view/foo.txt",
            "/delete/foo",
            "/View/foo",
            "//view/foo",
            "view/foo",
            "/view/foo?x=1",
        ];
        for path in bad {
            assert!(
                matches!(Route::resolve(path), Err(WikiError::InvalidPath)),
                "{path:?} should not resolve"
            );
        }
    }

    #[test]
    fn unmatched_paths_invoke_no_handler() {
        let recorder = Recorder::default();
        for path in ["/view/../etc", "/view/", "/delete/foo"] {
            let result = dispatch(&recorder, &Method::GET, path, None);
            assert!(matches!(result, Err(WikiError::InvalidPath)));
        }
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn wrong_method_invokes_no_handler() {
        let recorder = Recorder::default();
        let result = dispatch(&recorder, &Method::GET, "/save/Page", None);
        assert!(matches!(result, Err(WikiError::MethodNotAllowed)));
        let result = dispatch(&recorder, &Method::POST, "/view/Page", None);
        assert!(matches!(result, Err(WikiError::MethodNotAllowed)));
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn dispatches_to_matching_handler() {
        let recorder = Recorder::default();
        dispatch(&recorder, &Method::GET, "/view/A", None).unwrap();
        dispatch(&recorder, &Method::HEAD, "/edit/B", None).unwrap();
        let outcome = dispatch(
            &recorder,
            &Method::POST,
            "/save/C",
            Some(SaveForm { body: b"hi".to_vec() }),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Redirect("/view/C".into()));
        assert_eq!(*recorder.calls.borrow(), vec!["view A", "edit B", "save C hi"]);
    }

    #[test]
    fn save_without_form_stores_empty_body() {
        let recorder = Recorder::default();
        dispatch(&recorder, &Method::POST, "/save/Blank", None).unwrap();
        assert_eq!(*recorder.calls.borrow(), vec!["save Blank "]);
    }
}
