//! Integration tests for the authentication engine.

mod helpers;

mod cookie_test;
mod jwt_test;
mod lifecycle_test;
