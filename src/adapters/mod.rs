pub mod compiler;
pub mod document;
pub mod filler;
pub mod list;
pub mod operation_cache;
pub mod random;
pub mod resolvers;
pub mod schema;
pub mod thunk;

#[cfg(test)]
mod filler_test;
