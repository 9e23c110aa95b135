mod aggregator;
mod loader;
pub mod markup;

pub use aggregator::Aggregator;
pub use loader::FileLoader;
