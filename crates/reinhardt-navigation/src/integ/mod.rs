//! Hooks for collaborators outside the router: localization and layouts.

mod i18n;
mod layout;

pub use i18n::Localizer;
pub use layout::{LayoutRegistry, LayoutWrapper};
