pub mod templates;

pub use templates::{Renderer, Template, TemplateName, TemplateSet};
