pub mod gigatron128k;
pub mod gigatron64k;
pub mod gt1_loader;
pub mod registry;

pub use gigatron128k::Gigatron128k;
pub use gigatron64k::Gigatron64k;
