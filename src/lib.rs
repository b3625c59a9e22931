//! Flatwiki - a small wiki server that keeps each page in its own text file
//!
//! Requests for `/view/{title}`, `/edit/{title}` and `/save/{title}` are
//! resolved by [`routing`], served by [`handlers`] against a [`PageStore`],
//! and rendered through a [`Renderer`].

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod routing;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use components::{Renderer, TemplateName, TemplateSet};
pub use config::Config;
pub use errors::WikiError;
pub use routing::{Action, Outcome, PageHandlers, Route, Title};
pub use services::PageStore;
pub use types::{AppState, Page, SaveForm};
