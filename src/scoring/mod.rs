// src/scoring/mod.rs

pub mod aggregator;

pub use aggregator::{
    aggregate_score, assemble, assemble_weighted, build_section, overall_score, rounded_mean,
    CategoryWeights,
};
