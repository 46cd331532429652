#![warn(rust_2018_idioms)]

pub mod codec;
pub mod error;
pub mod layer_control;
pub mod mock;
pub mod platform;
pub mod simulcast;
pub mod stream;
pub mod track;
pub mod transport;

pub use error::Error;

pub(crate) const UNSPECIFIED_STR: &str = "Unspecified";

/// Length of the random identifiers handed out to streams and tracks.
pub(crate) const GENERATED_ID_LEN: usize = 32;

pub(crate) fn generate_random_id() -> String {
    use rand::distr::{Alphanumeric, SampleString};

    Alphanumeric.sample_string(&mut rand::rng(), GENERATED_ID_LEN)
}
