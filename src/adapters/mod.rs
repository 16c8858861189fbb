// Adapters layer: concrete implementations for external systems (http, output views).

pub mod http;
pub mod view;
