pub mod admin;
pub mod delivery;
pub mod documents;
pub mod health;

#[cfg(test)]
mod tests;
