//! Node image loading.

use std::collections::HashMap;

use log::warn;
use web_sys::HtmlImageElement;

/// Lazily created `<img>` elements keyed by source URL.
///
/// Images load asynchronously; [`ImageCache::ready`] only returns an image once
/// the browser has decoded it, so the renderer draws a placeholder until then.
#[derive(Default)]
pub struct ImageCache {
	images: HashMap<String, Option<HtmlImageElement>>,
}

impl ImageCache {
	/// Start loading `src` if this is the first request for it.
	pub fn request(&mut self, src: &str) {
		if self.images.contains_key(src) {
			return;
		}
		let image = match HtmlImageElement::new() {
			Ok(img) => {
				img.set_src(src);
				Some(img)
			}
			Err(e) => {
				warn!("connections: could not create image for {}: {:?}", src, e);
				None
			}
		};
		self.images.insert(src.to_string(), image);
	}

	/// The decoded image for `src`, if it finished loading.
	pub fn ready(&self, src: &str) -> Option<&HtmlImageElement> {
		self.images
			.get(src)
			.and_then(Option::as_ref)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}
}
