mod app;
pub use app::Skinamp;
