//! Image preparation before insertion: limit layout shift when a fragment
//! lands by reserving space for images that declare no dimensions, and default
//! them to lazy loading and async decode.

use super::NodeRef;

const PLACEHOLDER_STYLE: &str = "aspect-ratio:16/9;width:100%;height:auto";

/// Adjust every `<img>` under `fragment` that lacks explicit dimensions.
pub fn prepare_images(fragment: &NodeRef) {
    for node in fragment.descendants() {
        if !node.is_element("img") {
            continue;
        }
        if node.has_attribute("width") || node.has_attribute("height") {
            continue;
        }
        if !node.has_attribute("style") {
            node.set_attribute("style", PLACEHOLDER_STYLE);
        }
        if !node.has_attribute("loading") {
            node.set_attribute("loading", "lazy");
        }
        if !node.has_attribute("decoding") {
            node.set_attribute("decoding", "async");
        }
    }
}
