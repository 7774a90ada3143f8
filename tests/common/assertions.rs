//! Custom test assertions
//!
//! Provides domain-specific assertions for generation results and images.

use photo_studio::GenerationResult;
use photo_studio::utils::error::ErrorCategory;

/// Assertions for GenerationResult
pub trait GenerationResultAssertions {
    /// Assert an image came back and no error was recorded
    fn assert_succeeded(&self);

    /// Assert the single error slot holds `category`
    fn assert_failed_with(&self, category: ErrorCategory);
}

impl GenerationResultAssertions for GenerationResult {
    fn assert_succeeded(&self) {
        assert!(
            self.error.is_none(),
            "Expected success, got error {:?}",
            self.error
        );
        assert!(self.image.is_some(), "Expected a generated image");
    }

    fn assert_failed_with(&self, category: ErrorCategory) {
        let error = self
            .error
            .as_ref()
            .unwrap_or_else(|| panic!("Expected a {:?} error, got success", category));
        assert_eq!(
            error.category, category,
            "Unexpected error category for message {:?}",
            error.message
        );
    }
}

/// Assert decoded image dimensions
#[macro_export]
macro_rules! assert_dimensions {
    ($bytes:expr, $width:expr, $height:expr) => {
        let decoded = image::load_from_memory(&$bytes).expect("decodable image");
        assert_eq!(
            (decoded.width(), decoded.height()),
            ($width, $height),
            "unexpected image dimensions"
        );
    };
}
