//! Error Types
//!
//! All failures surface at skeleton construction time. Per-frame paths
//! (`Skeleton::setup`, vertex deformation) are infallible: malformed runtime
//! data degrades to identity transforms instead of propagating errors.

use thiserror::Error;

/// The main error type for the marionette crate.
///
/// Every variant describes a defect in a skeleton description that is
/// rejected while building; none of them can occur once a [`crate::Skeleton`]
/// exists.
#[derive(Error, Debug)]
pub enum MarionetteError {
    // ========================================================================
    // Skeleton description errors
    // ========================================================================
    /// Two bones in the same description share a name.
    #[error("Two bones with the same name: {name}")]
    DuplicateBoneName {
        /// The offending bone name
        name: String,
    },

    /// A bone or constraint references an index outside the bone array.
    #[error("Bone index out of bounds: {context} (index: {index}, bones: {count})")]
    BoneIndexOutOfBounds {
        /// Description of what was being resolved
        context: &'static str,
        /// The invalid index
        index: usize,
        /// Number of bones in the description
        count: usize,
    },

    // ========================================================================
    // Constraint decoding errors
    // ========================================================================
    /// The constraint kind tag is not one of the known fourcc codes.
    #[error("Unknown constraint kind '{tag}'")]
    UnknownConstraintKind {
        /// The tag as read from the description
        tag: String,
    },

    /// A coordinate-system code outside the known encoding.
    #[error("Unknown coordinate system: {0}")]
    UnknownCoordinateSystem(u8),

    /// A mix-mode code outside the known encoding.
    #[error("Unknown mix mode: {0}")]
    UnknownMixMode(u8),
}

/// Alias for `Result<T, MarionetteError>`.
pub type Result<T> = std::result::Result<T, MarionetteError>;
