//! Types for error handling go here.
use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum SurfconnError {
        /// The caller handed in data the operation cannot work with: shape
        /// or length mismatches, empty required selections, non-finite
        /// coordinates, or a non-positive search radius. The first field
        /// names the offending input.
        InvalidInput(what: &'static str, reason: String) {
            display("invalid {}: {}", what, reason)
        }
        /// Two hemispheres were set up to select the voxels of the same
        /// tissue-class code, so their writes would collide.
        OverlappingSelection(code: i32) {
            display("more than one hemisphere selects voxels with tissue code {}", code)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }
    }
}

impl SurfconnError {
    /// Shorthand for a length or shape mismatch on the named input.
    pub(crate) fn size_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        SurfconnError::InvalidInput(what, format!("expected {} entries, got {}", expected, actual))
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, SurfconnError>;
