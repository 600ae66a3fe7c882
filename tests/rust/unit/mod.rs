//! Unit tests - pure rendering and escaping, no executor involved

mod escape_tests;
