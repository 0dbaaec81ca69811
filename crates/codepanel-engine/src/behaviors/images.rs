//! Image captions and placement hints taken from alt text.
//!
//! Authors append modifiers to an image's alt text: `:left` and `:right` float
//! the image, `:inline` keeps it in the text flow without a caption. Whatever
//! alt text remains becomes a numbered caption below the image.

use codepanel_config::PageSettings;

use crate::dom::Document;

pub const POST_CONTENT: &str = "post_content";
pub const CAPTION: &str = "img_alt";
pub const INLINE: &str = "inline";

const INLINE_MODIFIER: &str = ":inline";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Float {
    Left,
    Right,
}

impl Float {
    fn modifier(self) -> &'static str {
        match self {
            Float::Left => ":left",
            Float::Right => ":right",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Float::Left => "float_left",
            Float::Right => "float_right",
        }
    }
}

/// Alt text split into caption and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltText {
    pub caption: String,
    pub floats: Vec<Float>,
    pub inline: bool,
}

impl AltText {
    pub fn parse(alt: &str) -> Self {
        let mut caption = alt.to_string();
        let mut floats = Vec::new();
        for float in [Float::Left, Float::Right] {
            if caption.contains(float.modifier()) {
                caption = caption.replacen(float.modifier(), "", 1);
                floats.push(float);
            }
        }
        let inline = caption.contains(INLINE_MODIFIER);
        if inline {
            caption = caption.replacen(INLINE_MODIFIER, "", 1);
        }

        Self {
            caption: caption.trim().to_string(),
            floats,
            inline,
        }
    }

    pub fn wants_caption(&self) -> bool {
        !self.caption.is_empty() && !self.inline
    }
}

/// Caption text for the image at `position` (1-based).
pub fn caption_text(settings: &PageSettings, position: usize, caption: &str) -> String {
    if settings.show_image_position {
        format!("{} {position}: {caption}", settings.image_position_label)
    } else {
        caption.to_string()
    }
}

/// Process every image inside `.post_content`. Returns the number of captions
/// inserted.
pub fn caption_images<D: Document>(doc: &mut D, settings: &PageSettings) -> usize {
    let root = doc.root();
    let Some(post) = doc.elements_by_class(&root, POST_CONTENT).into_iter().next() else {
        return 0;
    };

    let mut position = 0;
    for image in doc.elements_by_tag(&post, "img") {
        doc.set_attribute(&image, "loading", "lazy");
        let alt = AltText::parse(&doc.attribute(&image, "alt").unwrap_or_default());

        for float in &alt.floats {
            doc.add_class(&image, float.class_name());
        }
        if alt.inline {
            doc.add_class(&image, INLINE);
        }
        if !alt.wants_caption() {
            continue;
        }

        position += 1;
        doc.set_data(&image, "pos", &position.to_string());

        let Some(caption) = doc.create_element("p") else {
            continue;
        };
        doc.add_class(&caption, CAPTION);
        doc.set_text(&caption, &caption_text(settings, position, &alt.caption));
        insert_after(doc, &image, &caption);
    }
    position
}

fn insert_after<D: Document>(doc: &mut D, node: &D::Node, new: &D::Node) {
    let Some(parent) = doc.parent(node) else {
        return;
    };
    match doc.next_sibling(node) {
        Some(next) => doc.insert_before(&parent, new, &next),
        None => doc.append_child(&parent, new),
    }
}
