//! Image helpers for UI code.
//!
//! - `reference.rs`: bundler image imports → URL
//! - `preload.rs`: preload hints for a document head
//! - `load.rs`: wait for an image to finish loading

pub mod load;
pub mod preload;
pub mod reference;

pub use load::{await_image_load, HttpImageSource, ImageLoadError, ImageSource, LoadSettler};
pub use preload::{preload_images, DocumentHead, HeadHints, LinkHint};
pub use reference::{ImageRef, Resolved};
