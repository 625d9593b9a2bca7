pub mod check;
pub mod listen;
pub mod pipeline;
pub mod replay;
pub mod rules;
