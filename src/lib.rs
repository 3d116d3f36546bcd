pub mod dispatch;
pub mod editor;
pub mod model;
pub mod panel;
pub mod relay;
pub mod store;
