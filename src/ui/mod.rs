/// UI module exports
pub mod popup;

mod bridge;
mod components;
mod debounce;
pub mod session;
mod site_list;
