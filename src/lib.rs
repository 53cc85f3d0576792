//! formfield - a terminal renderer for declarative form fields.
//!
//! The centerpiece is the [`taglist`] control: a filterable multi-select
//! that shows the chosen values as removable tags and offers the remaining
//! options in a dropdown. Options come from the field definition or from a
//! remote JSON endpoint, resolved by [`source`].

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod logging;
pub mod source;
pub mod taglist;
pub mod tasks;
pub mod ui;
