// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod messages;
pub mod numeric;
pub mod parser;
pub mod status;

pub use messages::Command;
pub use parser::Parser;
pub use status::write_status;
