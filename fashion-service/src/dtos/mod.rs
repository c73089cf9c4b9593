pub mod fashions;

pub use fashions::FashionResponse;
