//! Arena-backed document
//!
//! Nodes are never freed; detaching an element only unlinks it from its
//! parent, so an [`ElementId`] stays valid for the life of the page.

use scraper::{ElementRef, Html};

use crate::error::PageError;
use crate::style;
use crate::Result;

/// Stable handle to an element of a [`Page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<usize>,
    children: Vec<usize>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct Page {
    nodes: Vec<Node>,
    root: usize,
}

impl Page {
    /// Parse a full HTML document
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let source = doc.root_element();

        let mut page = Self {
            nodes: Vec::new(),
            root: 0,
        };
        let root = page.push_element(source.value().name(), source.value().attrs());
        page.root = root;
        page.import_children(source, root);

        tracing::debug!(nodes = page.nodes.len(), "Imported document");
        page
    }

    pub fn new() -> Self {
        Self::parse("")
    }

    pub fn document_element(&self) -> ElementId {
        ElementId(self.root)
    }

    pub fn body(&self) -> Option<ElementId> {
        self.children(self.document_element())
            .into_iter()
            .find(|el| self.tag_name(*el) == "body")
    }

    // === Tree construction ===

    fn push_element<'a, I>(&mut self, tag: &str, attrs: I) -> usize
    where
        I: Iterator<Item = (&'a str, &'a str)>,
    {
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
                attrs: attrs
                    .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
                    .collect(),
            },
        });
        self.nodes.len() - 1
    }

    fn push_text(&mut self, text: &str) -> usize {
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Text(text.to_string()),
        });
        self.nodes.len() - 1
    }

    fn import_children(&mut self, source: ElementRef<'_>, parent: usize) {
        for child in source.children() {
            if let Some(child_el) = ElementRef::wrap(child) {
                let id = self.push_element(child_el.value().name(), child_el.value().attrs());
                self.link(parent, id, None);
                self.import_children(child_el, id);
            } else if let Some(text) = child.value().as_text() {
                let id = self.push_text(&**text);
                self.link(parent, id, None);
            }
        }
    }

    fn link(&mut self, parent: usize, child: usize, index: Option<usize>) {
        self.unlink(child);
        let children = &mut self.nodes[parent].children;
        match index {
            Some(i) if i <= children.len() => children.insert(i, child),
            _ => children.push(child),
        }
        self.nodes[child].parent = Some(parent);
    }

    fn unlink(&mut self, node: usize) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|c| *c != node);
        }
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        ElementId(self.push_element(tag, std::iter::empty()))
    }

    /// Move `child` to the end of `parent`'s children
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if self.contains(child, parent) {
            return Err(PageError::Hierarchy { parent, child });
        }
        self.link(parent.0, child.0, None);
        Ok(())
    }

    /// Insert `new` as the next sibling of `reference`
    pub fn insert_after(&mut self, reference: ElementId, new: ElementId) -> Result<()> {
        let parent = self.nodes[reference.0]
            .parent
            .ok_or(PageError::Detached(reference))?;
        if self.contains(new, ElementId(parent)) {
            return Err(PageError::Hierarchy {
                parent: ElementId(parent),
                child: new,
            });
        }

        self.unlink(new.0);
        let index = self.nodes[parent]
            .children
            .iter()
            .position(|c| *c == reference.0)
            .map(|i| i + 1);
        self.link(parent, new.0, index);
        Ok(())
    }

    /// Replace the children of `el` with the parsed fragment
    pub fn set_inner_html(&mut self, el: ElementId, html: &str) {
        for child in std::mem::take(&mut self.nodes[el.0].children) {
            self.nodes[child].parent = None;
        }

        let fragment = Html::parse_fragment(html);
        self.import_children(fragment.root_element(), el.0);
    }

    // === Queries ===

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.nodes[el.0].parent.map(ElementId)
    }

    /// Element children, in order
    pub fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.nodes[el.0]
            .children
            .iter()
            .filter(|c| matches!(self.nodes[**c].kind, NodeKind::Element { .. }))
            .map(|c| ElementId(*c))
            .collect()
    }

    pub fn has_child_nodes(&self, el: ElementId) -> bool {
        !self.nodes[el.0].children.is_empty()
    }

    /// Element descendants of `el` in document order, excluding `el`
    pub fn descendants(&self, el: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[el.0].children.iter().rev().copied().collect();

        while let Some(node) = stack.pop() {
            if let NodeKind::Element { .. } = self.nodes[node].kind {
                out.push(ElementId(node));
                stack.extend(self.nodes[node].children.iter().rev());
            }
        }

        out
    }

    /// Whether `el` is `ancestor` or sits beneath it
    pub fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        let mut current = Some(el.0);
        while let Some(node) = current {
            if node == ancestor.0 {
                return true;
            }
            current = self.nodes[node].parent;
        }
        false
    }

    fn attached(&self) -> Vec<ElementId> {
        let root = self.document_element();
        let mut all = vec![root];
        all.extend(self.descendants(root));
        all
    }

    pub fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.attached()
            .into_iter()
            .find(|el| self.attr(*el, "id") == Some(id))
    }

    /// Attached elements carrying attribute `name`, in document order
    pub fn elements_with_attr(&self, name: &str) -> Vec<ElementId> {
        self.attached()
            .into_iter()
            .filter(|el| self.has_attr(*el, name))
            .collect()
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<ElementId> {
        self.attached()
            .into_iter()
            .filter(|el| self.tag_name(*el).eq_ignore_ascii_case(tag))
            .collect()
    }

    /// Nearest element from `el` upwards (inclusive) that has `class`
    pub fn closest_with_class(&self, el: ElementId, class: &str) -> Option<ElementId> {
        let mut current = Some(el);
        while let Some(candidate) = current {
            if self.has_class(candidate, class) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    pub fn tag_name(&self, el: ElementId) -> &str {
        match &self.nodes[el.0].kind {
            NodeKind::Element { tag, .. } => tag,
            NodeKind::Text(_) => "#text",
        }
    }

    pub fn text_content(&self, el: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(el.0, &mut out);
        out
    }

    fn collect_text(&self, node: usize, out: &mut String) {
        match &self.nodes[node].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for child in &self.nodes[node].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    // === Attributes ===

    fn attrs(&self, el: ElementId) -> &[(String, String)] {
        match &self.nodes[el.0].kind {
            NodeKind::Element { attrs, .. } => attrs,
            NodeKind::Text(_) => &[],
        }
    }

    fn attrs_mut(&mut self, el: ElementId) -> Option<&mut Vec<(String, String)>> {
        match &mut self.nodes[el.0].kind {
            NodeKind::Element { attrs, .. } => Some(attrs),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attr(&self, el: ElementId, name: &str) -> Option<&str> {
        self.attrs(el)
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, el: ElementId, name: &str) -> bool {
        self.attr(el, name).is_some()
    }

    pub fn set_attr(&mut self, el: ElementId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(attrs) = self.attrs_mut(el) {
            match attrs.iter_mut().find(|(n, _)| *n == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name, value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, el: ElementId, name: &str) {
        if let Some(attrs) = self.attrs_mut(el) {
            attrs.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        }
    }

    /// Read a `data-*` attribute
    pub fn data(&self, el: ElementId, key: &str) -> Option<&str> {
        self.attr(el, &format!("data-{}", key))
    }

    pub fn set_data(&mut self, el: ElementId, key: &str, value: &str) {
        self.set_attr(el, &format!("data-{}", key), value);
    }

    pub fn remove_data(&mut self, el: ElementId, key: &str) {
        self.remove_attr(el, &format!("data-{}", key));
    }

    // === Classes ===

    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.attr(el, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, el: ElementId, class: &str) {
        if self.has_class(el, class) {
            return;
        }
        let classes = match self.attr(el, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class)
            }
            _ => class.to_string(),
        };
        self.set_attr(el, "class", &classes);
    }

    pub fn remove_class(&mut self, el: ElementId, class: &str) {
        if !self.has_class(el, class) {
            return;
        }
        let classes = self
            .attr(el, "class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(el, "class", &classes);
    }

    pub fn toggle_class(&mut self, el: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(el, class);
        } else {
            self.remove_class(el, class);
        }
    }

    // === Inline style ===

    pub fn style(&self, el: ElementId, prop: &str) -> Option<String> {
        let prop = prop.to_ascii_lowercase();
        style::parse(self.attr(el, "style")?)
            .into_iter()
            .find(|(p, _)| *p == prop)
            .map(|(_, v)| v)
    }

    pub fn set_style(&mut self, el: ElementId, prop: &str, value: &str) {
        let prop = prop.to_ascii_lowercase();
        let mut decls = style::parse(self.attr(el, "style").unwrap_or_default());
        match decls.iter_mut().find(|(p, _)| *p == prop) {
            Some((_, v)) => *v = value.to_string(),
            None => decls.push((prop, value.to_string())),
        }
        self.set_attr(el, "style", &style::serialize(&decls));
    }

    pub fn show(&mut self, el: ElementId) {
        self.set_style(el, "display", "block");
    }

    pub fn hide(&mut self, el: ElementId) {
        self.set_style(el, "display", "none");
    }

    pub fn is_hidden(&self, el: ElementId) -> bool {
        self.style(el, "display").as_deref() == Some("none")
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<!DOCTYPE html>
        <html><body>
            <div id="main-frame"><main><p>Hello <b>world</b></p></main></div>
            <div style="text-align:center">
                <iframe id="video" width="560" data-cookiecategory="performance"
                        data-src="https://video.example/embed"></iframe>
            </div>
            <script data-cookiecategory="targeting" type="text/plain">track();</script>
        </body></html>"#;

    #[test]
    fn test_parse_and_query() {
        let page = Page::parse(DOC);

        assert!(page.body().is_some());
        let frame = page.element_by_id("main-frame").unwrap();
        assert_eq!(page.tag_name(frame), "div");
        assert_eq!(page.text_content(frame), "Hello world");

        let gated = page.elements_with_attr("data-cookiecategory");
        assert_eq!(gated.len(), 2);
        assert_eq!(page.tag_name(gated[0]), "iframe");
        assert_eq!(page.tag_name(gated[1]), "script");
        assert_eq!(page.text_content(gated[1]), "track();");
        assert_eq!(
            page.data(gated[0], "src"),
            Some("https://video.example/embed")
        );
    }

    #[test]
    fn test_classes_and_style() {
        let mut page = Page::parse(DOC);
        let frame = page.element_by_id("main-frame").unwrap();

        page.add_class(frame, "unreadable-display");
        page.add_class(frame, "unreadable-display");
        assert_eq!(page.attr(frame, "class"), Some("unreadable-display"));
        page.toggle_class(frame, "unreadable-display", false);
        assert!(!page.has_class(frame, "unreadable-display"));

        let video = page.element_by_id("video").unwrap();
        let container = page.parent(video).unwrap();
        assert_eq!(page.style(container, "text-align").as_deref(), Some("center"));

        page.hide(video);
        assert!(page.is_hidden(video));
        page.show(video);
        assert!(!page.is_hidden(video));
    }

    #[test]
    fn test_insert_after_and_inner_html() {
        let mut page = Page::parse(DOC);
        let video = page.element_by_id("video").unwrap();
        let container = page.parent(video).unwrap();

        let notice = page.create_element("div");
        page.set_attr(notice, "id", "notice");
        page.set_inner_html(notice, r#"<p>Blocked <span class="cta">enable</span></p>"#);
        page.insert_after(video, notice).unwrap();

        assert_eq!(page.children(container), vec![video, notice]);
        assert_eq!(page.element_by_id("notice"), Some(notice));
        assert_eq!(page.text_content(notice), "Blocked enable");

        let span = page
            .descendants(notice)
            .into_iter()
            .find(|el| page.has_class(*el, "cta"))
            .unwrap();
        assert_eq!(page.closest_with_class(span, "cta"), Some(span));
        assert!(page.contains(notice, span));
    }

    #[test]
    fn test_detached_insert_fails() {
        let mut page = Page::new();
        let orphan = page.create_element("div");
        let other = page.create_element("div");

        assert!(matches!(
            page.insert_after(orphan, other),
            Err(PageError::Detached(_))
        ));
        assert!(page.element_by_id("anything").is_none());
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let mut page = Page::new();
        let body = page.body().unwrap();
        let outer = page.create_element("div");
        let inner = page.create_element("div");

        page.append_child(body, outer).unwrap();
        page.append_child(outer, inner).unwrap();
        assert!(page.append_child(inner, outer).is_err());
    }
}
