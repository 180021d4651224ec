pub mod check;
pub mod common;
pub mod generate;

#[cfg(test)]
mod check_tests;
#[cfg(test)]
mod generate_tests;
