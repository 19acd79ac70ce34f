use crate::core::{Document, Selector};

pub fn hero_video<D: Document>(doc: &D) -> Option<D::Node> {
    doc.query(&Selector::class("hero-video"))
}

/// Autoplay is skipped for users asking for less motion or less data.
pub fn should_use_fallback(reduced_motion: bool, save_data: bool) -> bool {
    reduced_motion || save_data
}

/// Hides the video and shows the still image in its place.
pub fn show_fallback<D: Document>(doc: &D) {
    if let Some(video) = hero_video(doc) {
        doc.set_style(&video, "display", "none");
    }
    if let Some(fallback) = doc.query(&Selector::class("hero-fallback")) {
        doc.set_style(&fallback, "display", "block");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::{MemoryDocument, BODY};

    #[test]
    fn fallback_swaps_video_for_image() {
        let doc = MemoryDocument::new();
        let video = doc.add(BODY, "video", &[("class", "hero-video")], "");
        let image = doc.add(BODY, "img", &[("class", "hero-fallback")], "");

        assert!(!should_use_fallback(false, false));
        assert!(should_use_fallback(true, false));
        assert!(should_use_fallback(false, true));

        show_fallback(&doc);
        assert_eq!(doc.style(video, "display").as_deref(), Some("none"));
        assert_eq!(doc.style(image, "display").as_deref(), Some("block"));
    }
}
