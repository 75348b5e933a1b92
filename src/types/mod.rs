//! This module defines the strongly-typed element representations used by the
//! byte-level dispatcher.

pub mod element_type;

pub use element_type::ElementType;
