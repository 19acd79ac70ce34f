//! The shared `#toast-region` live region.

use crate::core::Document;

pub const TOAST_REGION: &str = "toast-region";

/// Returns the toast region, creating it hidden at the end of `<body>` the
/// first time.
pub fn ensure_region<D: Document>(doc: &D) -> Option<D::Node> {
    if let Some(region) = doc.by_id(TOAST_REGION) {
        return Some(region);
    }
    let body = doc.body()?;
    let region = doc.create_element("div")?;
    doc.set_attribute(&region, "id", TOAST_REGION);
    doc.set_attribute(&region, "role", "status");
    doc.set_attribute(&region, "aria-live", "polite");
    doc.set_attribute(&region, "aria-atomic", "true");
    doc.set_attribute(&region, "class", "toast");
    doc.set_style(&region, "display", "none");
    doc.append_child(&body, &region);
    Some(region)
}

pub fn show<D: Document>(doc: &D, region: &D::Node, message: &str) {
    doc.set_text(region, message);
    doc.set_style(region, "display", "block");
    doc.add_class(region, "show");
}

/// First hide phase: starts the fade-out.
pub fn fade<D: Document>(doc: &D, region: &D::Node) {
    doc.remove_class(region, "show");
}

/// Second hide phase, after the fade.
pub fn hide<D: Document>(doc: &D, region: &D::Node) {
    doc.set_style(region, "display", "none");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::MemoryDocument;

    #[test]
    fn region_is_created_once_and_cycles() {
        let doc = MemoryDocument::new();
        let region = ensure_region(&doc).unwrap();
        assert_eq!(ensure_region(&doc), Some(region));
        assert_eq!(doc.attribute(&region, "aria-live").as_deref(), Some("polite"));
        assert_eq!(doc.style(region, "display").as_deref(), Some("none"));

        show(&doc, &region, "Copied!");
        assert_eq!(doc.text(&region), "Copied!");
        assert!(doc.has_class(&region, "show"));

        fade(&doc, &region);
        hide(&doc, &region);
        assert!(!doc.has_class(&region, "show"));
        assert_eq!(doc.style(region, "display").as_deref(), Some("none"));
    }
}
