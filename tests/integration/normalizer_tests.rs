//! Normalizer integration tests
//!
//! Real encoded images through the whole read, decode, render and encode
//! pipeline.

#[cfg(test)]
mod tests {
    use crate::assert_dimensions;
    use crate::common::fixtures::{
        encode, gif_bytes, jpeg_bytes, png_bytes, temp_image, webp_bytes,
    };
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
    use photo_studio::StudioError;
    use photo_studio::core::assets::ImageAsset;
    use photo_studio::core::normalizer::{MAX_DIMENSION, normalize_image};

    // ==================== Output Format ====================

    #[tokio::test]
    async fn test_jpeg_stays_jpeg() {
        let asset = ImageAsset::from_bytes(jpeg_bytes(480, 640));
        let normalized = normalize_image(&asset, "16:9").await.unwrap();

        assert_eq!(normalized.mime_type, "image/jpeg");
        assert_eq!((normalized.width, normalized.height), (1024, 576));

        let bytes = normalized.decoded_bytes().unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        assert_dimensions!(bytes, 1024, 576);
    }

    #[tokio::test]
    async fn test_webp_stays_webp_with_alpha() {
        let asset = ImageAsset::from_bytes(webp_bytes(64, 64));
        assert_eq!(asset.mime_type(), "image/webp");

        let normalized = normalize_image(&asset, "3:4").await.unwrap();
        assert_eq!(normalized.mime_type, "image/webp");

        let decoded = image::load_from_memory(&normalized.decoded_bytes().unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (768, 1024));
        assert!(decoded.color().has_alpha());
    }

    #[tokio::test]
    async fn test_other_formats_become_png() {
        let asset = ImageAsset::from_bytes(gif_bytes(40, 30));
        assert_eq!(asset.mime_type(), "image/gif");

        let normalized = normalize_image(&asset, "1:1").await.unwrap();
        assert_eq!(normalized.mime_type, "image/png");
        let bytes = normalized.decoded_bytes().unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        assert_dimensions!(bytes, 1024, 1024);
    }

    // ==================== Geometry ====================

    #[tokio::test]
    async fn test_longer_side_is_max_dimension() {
        for ratio in ["1:1", "16:9", "9:16", "4:3", "3:4", "21:9", "1.91:1"] {
            let asset = ImageAsset::from_bytes(png_bytes(123, 77));
            let normalized = normalize_image(&asset, ratio).await.unwrap();
            assert_eq!(
                normalized.width.max(normalized.height),
                MAX_DIMENSION,
                "ratio {}",
                ratio
            );
        }
    }

    #[tokio::test]
    async fn test_center_crop_of_wide_source() {
        // left half black, right half white; a centered square keeps both
        let img = RgbImage::from_fn(200, 100, |x, _| {
            if x < 100 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let bytes = encode(&DynamicImage::ImageRgb8(img), ImageFormat::Png);
        let asset = ImageAsset::from_bytes(bytes);

        let normalized = normalize_image(&asset, "1:1").await.unwrap();
        let decoded = image::load_from_memory(&normalized.decoded_bytes().unwrap())
            .unwrap()
            .to_rgb8();

        assert_eq!(decoded.dimensions(), (1024, 1024));
        assert!(decoded.get_pixel(10, 512)[0] < 20);
        assert!(decoded.get_pixel(1013, 512)[0] > 235);
    }

    #[tokio::test]
    async fn test_center_crop_of_tall_source() {
        // top third red, middle third green, bottom third blue
        let img = RgbImage::from_fn(90, 300, |_, y| match y {
            0..100 => Rgb([255, 0, 0]),
            100..200 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        });
        let bytes = encode(&DynamicImage::ImageRgb8(img), ImageFormat::Png);
        let asset = ImageAsset::from_bytes(bytes);

        // crop height = 90 / (16/9) = 50.625, centered inside the green band
        let normalized = normalize_image(&asset, "16:9").await.unwrap();
        let decoded = image::load_from_memory(&normalized.decoded_bytes().unwrap())
            .unwrap()
            .to_rgb8();

        for (x, y) in [(0, 0), (1023, 575), (512, 288)] {
            let pixel = decoded.get_pixel(x, y);
            assert!(pixel[1] > 200 && pixel[0] < 50 && pixel[2] < 50, "{:?}", pixel);
        }
    }

    // ==================== File-backed Assets ====================

    #[tokio::test]
    async fn test_file_asset() {
        let file = temp_image(&png_bytes(50, 80), ".png");
        let asset = ImageAsset::from_path(file.path()).unwrap();

        let normalized = normalize_image(&asset, "9:16").await.unwrap();
        assert_eq!((normalized.width, normalized.height), (576, 1024));
    }

    #[tokio::test]
    async fn test_file_removed_after_selection() {
        let file = temp_image(&png_bytes(10, 10), ".png");
        let asset = ImageAsset::from_path(file.path()).unwrap();
        drop(file);

        let err = normalize_image(&asset, "1:1").await.unwrap_err();
        assert!(matches!(err, StudioError::Read { .. }));
        assert!(err.is_preprocessing());
    }

    #[tokio::test]
    async fn test_mislabelled_file_is_decoded_by_content() {
        let file = temp_image(&jpeg_bytes(40, 40), ".png");
        let asset = ImageAsset::from_path(file.path()).unwrap();
        assert_eq!(asset.mime_type(), "image/png");

        let normalized = normalize_image(&asset, "1:1").await.unwrap();
        assert_eq!(normalized.mime_type, "image/png");
    }

    // ==================== Failures ====================

    #[tokio::test]
    async fn test_invalid_ratios() {
        let asset = ImageAsset::from_bytes(png_bytes(10, 10));
        for ratio in ["abc:def", "4-3", "0:1", "16:0", ":", "1:1:1"] {
            let err = normalize_image(&asset, ratio).await.unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Invalid aspect ratio provided: {}", ratio)
            );
        }
    }

    #[tokio::test]
    async fn test_truncated_image() {
        let mut bytes = png_bytes(64, 64);
        bytes.truncate(bytes.len() / 2);
        let asset = ImageAsset::from_bytes_with_mime(bytes, "image/png");

        let err = normalize_image(&asset, "1:1").await.unwrap_err();
        assert!(matches!(err, StudioError::Decode(_)));
    }
}
