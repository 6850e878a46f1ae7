/// Layered name resolution over the frozen catalog
mod chain;
mod name_resolver;

pub use name_resolver::NameResolver;
