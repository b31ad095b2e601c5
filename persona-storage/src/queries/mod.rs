pub mod historic_ops;
pub mod profile_crud;
pub mod rating_ops;
