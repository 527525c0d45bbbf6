//! Navigation over node sets
//!
//! Every combinator wraps the parent sequence in a new producer and returns
//! immediately. Nothing is walked until a reducer drives the result, and a
//! `false` from the consumer unwinds through every nested loop at once.

use dom::Node;

use crate::error::QueryError;
use crate::seq::Seq;
use crate::set::{ResultSet, ValueSet};

/// A lazy set of document nodes
pub type NodeSet = ResultSet<Node>;

impl ResultSet<Node> {
    /// Set holding just `node`
    pub fn single(node: Node) -> Self {
        ResultSet::Lazy(Seq::once(node))
    }

    /// The elements of this set named `name`, in order. Other nodes,
    /// text and comments included, are skipped.
    pub fn filter_by_name(&self, name: impl Into<String>) -> NodeSet {
        let name = name.into();
        self.derive(move |parent| {
            Seq::from_fn(move |consume| {
                parent.produce(|node| {
                    if node.tag_name() == Some(name.as_str()) {
                        return consume(node);
                    }
                    true
                })
            })
        })
    }

    /// Direct children of every node, concatenated in set order
    pub fn children(&self) -> NodeSet {
        self.derive(|parent| {
            Seq::from_fn(move |consume| {
                parent.produce(|node| {
                    for child in node.children() {
                        if !consume(child) {
                            return false;
                        }
                    }
                    true
                })
            })
        })
    }

    /// Each node followed by its whole subtree in document order, one node
    /// after another
    pub fn descendants_inclusive(&self) -> NodeSet {
        self.derive(|parent| {
            Seq::from_fn(move |consume| {
                parent.produce(|node| {
                    if !consume(node.clone()) {
                        return false;
                    }
                    for descendant in node.descendants() {
                        if !consume(descendant) {
                            return false;
                        }
                    }
                    true
                })
            })
        })
    }

    /// Value of attribute `name` for every node, one result per node.
    /// Nodes without it yield `NotFound` instead of being skipped.
    pub fn attribute(&self, name: impl Into<String>) -> ValueSet {
        let name = name.into();
        self.derive(move |parent| {
            Seq::from_fn(move |consume| {
                parent.produce(|node| {
                    let value = node
                        .attr(&name)
                        .map(str::to_owned)
                        .ok_or(QueryError::NotFound);
                    consume(value)
                })
            })
        })
    }

    /// Text content of every node's subtree
    pub fn text(&self) -> ValueSet {
        self.derive(|parent| {
            Seq::from_fn(move |consume| parent.produce(|node| consume(Ok(node.text_content()))))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{Document, DomNode, ROOT_ID};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    /// #document
    ///   html
    ///     head
    ///     body
    ///       div#main.box
    ///         p "one"
    ///         p.note "two"
    ///       <!-- c -->
    ///       div
    fn sample() -> NodeSet {
        let mut doc = Document::new();
        let html = doc.append_child(ROOT_ID, DomNode::element("html")).unwrap();
        doc.append_child(html, DomNode::element("head")).unwrap();
        let body = doc.append_child(html, DomNode::element("body")).unwrap();
        let main = doc
            .append_child(
                body,
                DomNode::element("div")
                    .with_attr("class", "box")
                    .with_attr("id", "main"),
            )
            .unwrap();
        let p1 = doc.append_child(main, DomNode::element("p")).unwrap();
        doc.append_child(p1, DomNode::text("one")).unwrap();
        let p2 = doc
            .append_child(main, DomNode::element("p").with_attr("class", "note"))
            .unwrap();
        doc.append_child(p2, DomNode::text("two")).unwrap();
        doc.append_child(body, DomNode::comment("c")).unwrap();
        doc.append_child(body, DomNode::element("div")).unwrap();
        NodeSet::single(Node::root(Arc::new(doc)))
    }

    fn names(set: &NodeSet) -> Vec<String> {
        set.enumerate()
            .to_vec()
            .iter()
            .map(|n| n.node_name().to_string())
            .collect()
    }

    fn failed() -> NodeSet {
        NodeSet::failed(QueryError::upstream(std::io::Error::other("parse failed")))
    }

    /// A set whose sequence panics if anything drives it
    fn exploding() -> NodeSet {
        NodeSet::from_seq(Seq::from_fn(|_| panic!("sequence evaluated")))
    }

    /// Wraps a set and records every node pulled through it
    fn recorded(set: &NodeSet, log: Rc<RefCell<Vec<String>>>) -> NodeSet {
        set.derive(move |parent| {
            Seq::from_fn(move |consume| {
                parent.produce(|node| {
                    log.borrow_mut().push(node.node_name().to_string());
                    consume(node)
                })
            })
        })
    }

    #[test]
    fn test_children() {
        let html = sample().children();
        assert_eq!(names(&html), vec!["html"]);
        assert_eq!(names(&html.children()), vec!["head", "body"]);
        assert_eq!(
            names(&html.children().children()),
            vec!["div", "#comment", "div"]
        );
    }

    #[test]
    fn test_children_concatenates_in_set_order() {
        let divs = sample().descendants_inclusive().filter_by_name("div");
        assert_eq!(names(&divs.children()), vec!["p", "p"]);

        let body_and_divs = sample()
            .descendants_inclusive()
            .filter_by_name("body")
            .children();
        assert_eq!(
            names(&body_and_divs.children()),
            vec!["p", "p"] // the comment and the empty div have none
        );
    }

    #[test]
    fn test_filter_by_name_skips_other_nodes() {
        let all = sample().descendants_inclusive();
        assert_eq!(names(&all.filter_by_name("p")), vec!["p", "p"]);
        // Non-element nodes never match, even by their node name
        assert!(names(&all.filter_by_name("#comment")).is_empty());
        assert!(names(&all.filter_by_name("#text")).is_empty());
        assert!(all.filter_by_name("table").first_or_error().unwrap_err().is_not_found());
    }

    #[test]
    fn test_descendants_inclusive_document_order() {
        assert_eq!(
            names(&sample().descendants_inclusive()),
            vec![
                "#document", "html", "head", "body", "div", "p", "#text", "p", "#text",
                "#comment", "div"
            ]
        );
    }

    #[test]
    fn test_descendants_inclusive_per_node() {
        let ps = sample().descendants_inclusive().filter_by_name("p");
        assert_eq!(
            names(&ps.descendants_inclusive()),
            vec!["p", "#text", "p", "#text"]
        );
    }

    #[test]
    fn test_attribute_projection() {
        let main = sample().descendants_inclusive().filter_by_name("div");
        let main = NodeSet::single(main.first_or_error().unwrap());

        assert_eq!(main.attribute("id").first_or_error().unwrap(), "main");
        assert_eq!(main.attribute("class").first_and_unique_or_error().unwrap(), "box");
        assert!(main
            .attribute("missing")
            .first_or_error()
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_attribute_yields_one_result_per_node() {
        // Three p-like nodes, only the second has x="v"
        let mut doc = Document::new();
        for attr in [None, Some("v"), None] {
            let mut node = DomNode::element("p");
            if let Some(v) = attr {
                node = node.with_attr("x", v);
            }
            doc.append_child(ROOT_ID, node).unwrap();
        }
        let ps = NodeSet::single(Node::root(Arc::new(doc))).children();
        let values = ps.attribute("x");

        let items = values.collect().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[0].as_ref().unwrap_err().is_not_found());
        assert_eq!(items[1].as_ref().unwrap(), "v");
        assert!(items[2].as_ref().unwrap_err().is_not_found());

        // Missing attributes still count as produced items...
        assert!(values.first_and_unique_or_error().unwrap_err().is_too_many());
        // ...unless the caller keeps only the successful ones
        assert_eq!(values.successes().first_and_unique_or_error().unwrap(), "v");
        // and the first item is the first node's failure
        assert!(values.first_or_error().unwrap_err().is_not_found());
    }

    #[test]
    fn test_attribute_duplicate_keys_first_wins() {
        let mut doc = Document::new();
        doc.append_child(
            ROOT_ID,
            DomNode::element("a").with_attr("id", "1").with_attr("id", "2"),
        )
        .unwrap();
        let a = NodeSet::single(Node::root(Arc::new(doc))).children();
        assert_eq!(a.attribute("id").first_and_unique_or_error().unwrap(), "1");
    }

    #[test]
    fn test_text_projection() {
        let ps = sample().descendants_inclusive().filter_by_name("p");
        let texts: Vec<_> = ps.text().collect().unwrap().into_iter().flatten().collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_failed_set_short_circuits_everything() {
        let set = failed();
        let derived = set
            .children()
            .descendants_inclusive()
            .filter_by_name("p")
            .children();

        assert_eq!(
            derived.first_or_error().unwrap_err().to_string(),
            "parse failed"
        );
        assert_eq!(
            set.filter_by_name("x").first_and_unique_or_error().unwrap_err().to_string(),
            "parse failed"
        );
        assert_eq!(
            set.attribute("id").first_or_error().unwrap_err().to_string(),
            "parse failed"
        );
        assert_eq!(set.children().enumerate().count(), 0);
        assert!(set.text().is_failed());
    }

    #[test]
    fn test_combinators_are_lazy() {
        let set = exploding();
        let derived = set
            .filter_by_name("a")
            .children()
            .descendants_inclusive()
            .attribute("href");
        assert!(!derived.is_failed());
        let _ = derived.enumerate();
    }

    #[test]
    fn test_children_stop_early() {
        // Three divs; stopping after the first child must not touch the others
        let mut doc = Document::new();
        for _ in 0..3 {
            let div = doc.append_child(ROOT_ID, DomNode::element("div")).unwrap();
            doc.append_child(div, DomNode::element("span")).unwrap();
            doc.append_child(div, DomNode::element("span")).unwrap();
        }
        let log = Rc::new(RefCell::new(Vec::new()));
        let divs = recorded(
            &NodeSet::single(Node::root(Arc::new(doc))).children(),
            Rc::clone(&log),
        );

        let first = divs.children().first_or_error().unwrap();
        assert_eq!(first.tag_name(), Some("span"));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_descendants_stop_early() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let roots = recorded(&sample().children(), Rc::clone(&log));

        let mut seen = 0;
        roots.descendants_inclusive().enumerate().produce(|_| {
            seen += 1;
            seen < 3
        });
        assert_eq!(seen, 3);
        assert_eq!(*log.borrow(), vec!["html"]);
    }

    #[test]
    fn test_unique_stops_on_second_item() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let all = recorded(&sample().descendants_inclusive(), Rc::clone(&log));

        assert!(all.first_and_unique_or_error().unwrap_err().is_too_many());
        assert_eq!(*log.borrow(), vec!["#document", "html"]);
    }
}
