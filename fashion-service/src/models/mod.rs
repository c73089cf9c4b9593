pub mod fashion;

pub use fashion::FashionItem;
