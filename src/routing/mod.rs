pub mod dispatch;
pub mod title;

pub use dispatch::{dispatch, dispatch_route, resolve, Action, Outcome, PageHandlers, Route};
pub use title::Title;
