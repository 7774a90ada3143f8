//! Studio session integration tests
//!
//! Asset selection, prompt editing, generation, the result view and saving,
//! end to end against a mock server.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{generated_png_base64, jpeg_bytes, png_bytes, temp_image};
    use crate::common::gemini::{MockGemini, candidate_response, image_part, text_part};
    use photo_studio::core::assets::{AssetSlot, ImageAsset};
    use photo_studio::core::presentation::LightboxEvent;
    use photo_studio::{OptionState, RequestPhase, Studio};

    #[tokio::test]
    async fn test_generate_and_save() {
        let mock = MockGemini::start().await;
        mock.respond_with(
            200,
            candidate_response(vec![
                image_part("image/jpeg", &generated_png_base64()),
                text_part("Done."),
            ]),
        )
        .await;

        let person = temp_image(&jpeg_bytes(300, 400), ".jpg");
        let object = temp_image(&png_bytes(200, 200), ".png");

        let mut studio = Studio::new(mock.client());
        studio.select(AssetSlot::Person, ImageAsset::from_path(person.path()).unwrap());
        studio.select(AssetSlot::Object, ImageAsset::from_path(object.path()).unwrap());

        let view = studio.generate().await;
        assert!(!view.is_loading());
        assert!(view.error_banner().is_none());
        assert_eq!(view.advisory(), Some("Done."));
        assert_eq!(
            view.download_filename().as_deref(),
            Some("ai-photo-studio-generated.jpeg")
        );

        let out = tempfile::tempdir().unwrap();
        let saved = view.save(out.path()).await.unwrap();
        assert_eq!(saved, out.path().join("ai-photo-studio-generated.jpeg"));
        assert!(tokio::fs::metadata(&saved).await.unwrap().len() > 0);
        assert_eq!(studio.phase(), RequestPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_edited_prompt_is_sent_until_options_change() {
        let mock = MockGemini::start().await;
        mock.respond_with(
            200,
            candidate_response(vec![image_part("image/png", &generated_png_base64())]),
        )
        .await;

        let mut studio = Studio::with_options(mock.client(), OptionState::default());
        studio.select(AssetSlot::Person, ImageAsset::from_bytes(png_bytes(20, 30)));
        studio.select(AssetSlot::Object, ImageAsset::from_bytes(png_bytes(30, 20)));

        studio.edit_prompt("Put the guitar in their hands.");
        studio.generate().await;

        studio.update_options(|options| options.lighting = "golden hour sunlight".to_string());
        studio.generate().await;

        let bodies = mock.received_bodies().await;
        assert_eq!(bodies.len(), 2);
        let last_text = |i: usize| {
            bodies[i]["contents"][0]["parts"]
                .as_array()
                .unwrap()
                .last()
                .unwrap()["text"]
                .as_str()
                .unwrap()
                .to_string()
        };
        assert_eq!(last_text(0), "Put the guitar in their hands.");
        assert!(last_text(1).contains("golden hour sunlight"));
    }

    #[tokio::test]
    async fn test_lightbox_follows_result() {
        let mock = MockGemini::start().await;
        mock.respond_with(
            200,
            candidate_response(vec![image_part("image/png", &generated_png_base64())]),
        )
        .await;

        let mut studio = Studio::new(mock.client());
        assert!(!studio.view_mut().open_lightbox());

        studio.select(AssetSlot::Person, ImageAsset::from_bytes(png_bytes(8, 8)));
        studio.select(AssetSlot::Object, ImageAsset::from_bytes(png_bytes(8, 8)));
        studio.generate().await;

        let view = studio.view_mut();
        assert!(view.open_lightbox());
        assert!(view.lightbox().is_scroll_locked());
        assert!(view.handle_lightbox(LightboxEvent::ImageClick));
        assert!(!view.handle_lightbox(LightboxEvent::BackdropClick));
        assert!(!view.lightbox().is_scroll_locked());
    }
}
