mod form;
mod landing;
mod url;

pub use form::UrlField;
pub use landing::{landing_handler, method_not_allowed, LANDING_TEXT};
pub use url::{redirect_handler, shorten_handler};
