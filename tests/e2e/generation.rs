//! E2E test for image composition
//!
//! Makes a real API call.
//! Run with: cargo test -- --ignored

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{jpeg_asset, png_asset};
    use crate::skip_without_env;
    use photo_studio::core::assets::AssetSlot;
    use photo_studio::core::providers::gemini::{GeminiClient, GeminiConfig};
    use photo_studio::{RequestPhase, Studio};

    #[tokio::test]
    #[ignore]
    async fn test_real_generation() {
        skip_without_env!("GEMINI_API_KEY");

        let key = std::env::var("GEMINI_API_KEY").unwrap();
        let client = GeminiClient::new(GeminiConfig::new(key)).unwrap();
        let mut studio = Studio::new(client);
        studio.select(AssetSlot::Person, jpeg_asset(512, 768));
        studio.select(AssetSlot::Object, png_asset(512, 512));

        studio.generate().await;
        // the model may refuse abstract inputs; either outcome must be well formed
        let view = studio.view();
        match view.image() {
            Some(image) => {
                assert!(image.mime_type.starts_with("image/"));
                assert!(!image.bytes.is_empty());
                assert_eq!(studio.phase(), RequestPhase::Succeeded);
            }
            None => {
                assert!(view.error_banner().is_some());
                assert_eq!(studio.phase(), RequestPhase::Failed);
            }
        }
    }
}
