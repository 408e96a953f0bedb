//! Synthetic file tree generation and randomized churn, for exercising
//! backup and sync tools against a tree that keeps changing underneath them.

#![allow(clippy::enum_variant_names, clippy::module_inception)]

pub mod application;
pub mod cli;
pub mod ext;
pub mod mutators;
pub mod random;
pub mod tree;
pub mod walker;
