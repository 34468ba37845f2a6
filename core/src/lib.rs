pub mod core;

pub mod audio;
pub mod boot;
pub mod fsm;
pub mod gt1;
pub mod input;
pub mod loader;
pub mod sys;
pub mod v6502;
pub mod vcpu;
pub mod video;

pub mod prelude {
    pub use crate::core::machine::{InputButton, Machine};
    pub use crate::core::{CoreConfig, Gigatron};
    pub use crate::core::ram::RamSize;
    pub use crate::input::ControllerType;
}
