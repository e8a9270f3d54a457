pub mod belief;
pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod ids;
pub mod scenario;
pub mod terrain;
pub mod trace;

#[cfg(test)]
mod tests;
