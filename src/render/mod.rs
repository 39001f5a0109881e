//! The two renderings of a record: canonical JSON and a readable dev-mode block.

pub mod human;
pub mod machine;

pub use human::HumanRenderer;
pub use machine::{CanonicalLine, MachineRenderer};
