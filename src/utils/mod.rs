pub mod response_builder;
