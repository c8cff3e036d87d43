//! Small rendering helpers shared by screens and panels.

pub mod popup;
pub mod readout;
pub mod sub_tabs;
