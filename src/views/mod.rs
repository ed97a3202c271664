//! View models rendered by the browser.
//!
//! Each module holds the state and copy for one part of the site; routes
//! serialize them as JSON.

pub mod auth_form;
pub mod catalog;
pub mod contact;
pub mod dashboard;
pub mod landing;
pub mod picker;
pub mod screen;
