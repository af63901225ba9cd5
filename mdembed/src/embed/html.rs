//! Embedding images referenced by raw HTML `<img>` tags
//!
//! The fragment is parsed with html5ever into an rcdom tree, every `img`
//! under `<body>` gets its `src` replaced by a `data:` URI, and the children of
//! the `<body>` the parser wrapped the fragment in are serialized back.

use super::{asset, EmbedOptions};
use crate::error::{RenderError, RenderResult};
use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, serialize, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Embed every local image in `html`.
///
/// Fragments without an `<img` are returned unchanged, so HTML the parser
/// would otherwise normalise is only touched when it holds an image.
pub fn embed_fragment(html: &str, options: &EmbedOptions) -> RenderResult<String> {
    if !html.to_ascii_lowercase().contains("<img") {
        return Ok(html.to_string());
    }

    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let Some(body) = find_body(&dom.document) else {
        return Ok(html.to_string());
    };

    for img in find_elements(&body, "img") {
        embed_img(&img, options)?;
    }
    serialize_children(&body)
}

fn local_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn find_child(parent: &Handle, name: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| local_name(child) == Some(name))
        .cloned()
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = find_child(document, "html")?;
    find_child(&html, "body")
}

/// Elements named `name` below `root`, in document order.
fn find_elements(root: &Handle, name: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if local_name(&node) == Some(name) {
            found.push(node.clone());
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    found
}

fn attribute(attrs: &[Attribute], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|attr| &*attr.name.local == name)
        .map(|attr| attr.value.to_string())
}

fn set_attribute(attrs: &mut Vec<Attribute>, name: &str, value: String) {
    match attrs.iter_mut().find(|attr| &*attr.name.local == name) {
        Some(attr) => attr.value = value.into(),
        None => attrs.push(Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.into(),
        }),
    }
}

/// Replace the `src` of one `img`; `width` and `height` are only added when
/// the tag sets neither.
fn embed_img(img: &Handle, options: &EmbedOptions) -> RenderResult<()> {
    let NodeData::Element { attrs, .. } = &img.data else {
        return Ok(());
    };
    let Some(src) = attribute(&attrs.borrow(), "src") else {
        return Ok(());
    };
    let Some(embedded) = asset::resolve(&src, options)? else {
        return Ok(());
    };

    let mut attrs = attrs.borrow_mut();
    let sized = attribute(&attrs, "width").is_some() || attribute(&attrs, "height").is_some();
    if let Some((width, height)) = embedded.size.filter(|_| !sized) {
        set_attribute(&mut attrs, "width", width.to_string());
        set_attribute(&mut attrs, "height", height.to_string());
    }
    set_attribute(&mut attrs, "src", embedded.data_uri);
    Ok(())
}

fn serialize_children(parent: &Handle) -> RenderResult<String> {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    let mut output = Vec::new();
    for child in parent.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone())
            .map_err(|e| RenderError::Html(e.to_string()))?;
    }
    String::from_utf8(output).map_err(|e| RenderError::Html(e.to_string()))
}
