pub mod assembler;
pub mod launcher;
pub mod package;
pub mod platform;
pub mod process;
pub mod registry;
pub mod runtime;
