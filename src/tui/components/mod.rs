// Components module - UI pieces rendered around every view
//
// - Title bar: route tabs, server, activity spinner
// - Status bar: key hints
// - Logs panel: the console's own tracing output
// - Toast: transient notices

pub mod logs_panel;
pub mod scrollbar;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

pub use toast::Toast;
