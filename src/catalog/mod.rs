mod dimension_catalog;

pub use dimension_catalog::DimensionCatalog;
