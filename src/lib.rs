//! # filmframe
//!
//! Film looks, cube LUTs and captioned frames for photographs.
//!
//! # Architecture: Two Stages
//!
//! A photo goes through two independent stages:
//!
//! ```text
//! 1. Grade   RGB photo  →  RGB photo   (filter key + strength, or a cube LUT)
//! 2. Frame   RGB photo  →  RGB canvas  (layout key + caption + logos)
//! ```
//!
//! Both are pure functions of their inputs (plus a grain seed), so each can
//! be tested without fonts, photos or the other stage. [`render`] chains
//! them with decode and encode for the CLI.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`filters`] | Filter registry and engine: classic looks, film stocks, LUT slots |
//! | [`lut`] | `.cube` parsing, trilinear lookup, shared table cache |
//! | [`compose`] | Layout keys, caption parsing, geometry plans and painting |
//! | [`metadata`] | Camera make, model, lens and exposure from EXIF |
//! | [`imaging`] | Decode/encode backend, buffer operations, text and palette seams |
//! | [`config`] | `filmframe.toml` loading, merging and validation |
//! | [`render`] | Decode → grade → frame → encode for one photo |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Strength
//!
//! Every filter takes a strength in `[0, 1]`. Each look is calibrated at
//! 0.5; a multiplicative parameter with baseline `b` becomes
//! `1 + (b − 1)·s/0.5`, so 0 is neutral and 1 doubles the look's deviation.
//! See [`filters::tone::scale_factor`].
//!
//! ## Filters Never Fail A Render
//!
//! Unknown filter keys are the identity, and anything that goes wrong inside
//! a filter (a missing cube file included) is logged and answered with the
//! ungraded photo. Layout keys are different: an unknown one is a
//! configuration error, because there is no sensible frame to fall back to.
//!
//! ## Geometry As Data
//!
//! Layouts compute a [`compose::LayoutPlan`] (canvas size, element boxes,
//! text origins) from the target size, measured caption widths and logo
//! sizes. Only [`compose::plan::paint`] touches pixels. Frame proportions
//! live in an immutable [`compose::StyleConstants`] built per call.

pub mod compose;
pub mod config;
pub mod filters;
pub mod imaging;
pub mod lut;
pub mod metadata;
pub mod output;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;
