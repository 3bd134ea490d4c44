//! # find-similar-images
//!
//! Groups the images of a directory by identical perceptual hash.
//!
//! ## Usage
//! ```bash
//! find-similar-images ahash ~/Photos
//! find-similar-images whash-db4 ~/Photos --output json
//! ```

mod cli;

use imagehash::Result;

fn main() -> Result<()> {
    imagehash::init_tracing();
    cli::run()
}
