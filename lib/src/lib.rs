// BEGIN - Embark standard lints v0.4
// do not change or add/remove here, but one can add exceptions after this section
// for more info see: <https://github.com/EmbarkStudios/rust-ecosystem/issues/59>
#![deny(unsafe_code)]
#![warn(
    clippy::all,
    clippy::await_holding_lock,
    clippy::char_lit_as_u8,
    clippy::checked_conversions,
    clippy::dbg_macro,
    clippy::debug_assert_with_mut_call,
    clippy::doc_markdown,
    clippy::empty_enum,
    clippy::enum_glob_use,
    clippy::exit,
    clippy::expl_impl_clone_on_copy,
    clippy::explicit_deref_methods,
    clippy::explicit_into_iter_loop,
    clippy::fallible_impl_from,
    clippy::filter_map_next,
    clippy::float_cmp_const,
    clippy::fn_params_excessive_bools,
    clippy::if_let_mutex,
    clippy::implicit_clone,
    clippy::imprecise_flops,
    clippy::inefficient_to_string,
    clippy::invalid_upcast_comparisons,
    clippy::large_types_passed_by_value,
    clippy::let_unit_value,
    clippy::linkedlist,
    clippy::lossy_float_literal,
    clippy::macro_use_imports,
    clippy::manual_ok_or,
    clippy::map_err_ignore,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::match_on_vec_items,
    clippy::match_same_arms,
    clippy::match_wildcard_for_single_variants,
    clippy::mem_forget,
    clippy::mismatched_target_os,
    clippy::mut_mut,
    clippy::mutex_integer,
    clippy::needless_borrow,
    clippy::needless_continue,
    clippy::option_option,
    clippy::path_buf_push_overwrite,
    clippy::ptr_as_ptr,
    clippy::ref_option_ref,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_functions_in_if_condition,
    clippy::semicolon_if_nothing_returned,
    clippy::string_add_assign,
    clippy::string_add,
    clippy::string_lit_as_bytes,
    clippy::string_to_string,
    clippy::todo,
    clippy::trait_duplication_in_bounds,
    clippy::unimplemented,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::useless_transmute,
    clippy::verbose_file_reads,
    clippy::zero_sized_map_values,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms
)]
// END - Embark standard lints v0.4

//! `patch-extract` draws labeled patch triplets from a corpus of images, for
//! training patch similarity models.
//!
//! Every sample picks two images from the corpus (uniformly, with
//! replacement, so both may be the same image) and cuts three square patches:
//!
//! 1. An **anchor**, placed uniformly at random in the first image
//! 2. A **positive**, in the first image, whose center is drawn from a normal
//!    distribution around the anchor's center
//! 3. A **negative**, placed uniformly at random in the second image
//!
//! Patches never cross an image border. Positions that would are rejected and
//! drawn again, rather than clamped, so that positives keep the shape of a
//! normal distribution truncated to the image.
//!
//! ## Usage
//! A `Session` is built via a `SessionBuilder`, which follows the builder
//! pattern, and writes its triplets to a `TripletSink`.
//!
//! ```no_run
//! let session = patch_extract::Session::builder()
//!     .patch_size(32)
//!     .samples(100)
//!     .stddev(5.0)
//!     .load_corpus("imgs/*.png".parse().expect("invalid pattern"))
//!     .build().expect("failed to build session");
//!
//! // Writes 0000000_patch_1.png, ... and index1.txt, index2.txt, index3.txt
//! session.run_to_dir("patch_output", None).expect("failed to extract patches");
//! ```
mod corpus;
mod errors;
mod patch;
pub mod sampler;
pub mod session;
mod triplet;
mod utils;

pub use image;

pub use corpus::{CorpusPattern, CorpusPicker};
pub use errors::{Error, InvalidRange, PatchTooLarge, ProximityUnsatisfiable};
pub use patch::{extract_patch, Coord, PatchRect, Role};
pub use sampler::PositionSampler;
pub use session::{
    sample_id, DirectorySink, GeneratorProgress, OutputFormat, ProgressUpdate, RunSummary,
    Session, SessionBuilder, TripletSink,
};
pub use triplet::{Patch, Triplet, TripletGenerator};
pub use utils::{load_dynamic_image, ImageSource};

/// Simple dimensions struct
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

impl Dims {
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

struct Parameters {
    patch_size: u32,
    samples: u32,
    stddev: f64,
    seed: Option<u64>,
    max_attempts: u32,
    output_format: OutputFormat,
    skip_failed_samples: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            patch_size: 32,
            samples: 100,
            stddev: 5.0,
            seed: None,
            max_attempts: sampler::DEFAULT_MAX_ATTEMPTS,
            output_format: OutputFormat::Png,
            skip_failed_samples: false,
        }
    }
}
