pub mod errors;
pub mod db;
pub mod school;

#[cfg(test)]
mod tests;
