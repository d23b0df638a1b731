//! DocBook XML → [`Document`] tree.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Error, Result};
use crate::model::{Document, Node, NodeId, NodeKind};

/// Parse DocBook XML text into a document tree.
///
/// Element names are matched by local name, so both namespaced
/// (`<d:para>` / `xmlns="http://docbook.org/ns/docbook"`) and plain DocBook
/// are accepted. Text before an element's first child becomes its text;
/// text after a child (up to the next sibling) becomes the child's tail.
/// Comments, processing instructions and the doctype are dropped.
pub fn parse_document(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut doc = Document::new();
    let mut stack: Vec<NodeId> = vec![NodeId::ROOT];
    let mut saw_root_element = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name();
                let kind = NodeKind::from_local_name(local_name(name.as_ref()));
                let parent = current(&stack);
                if parent == NodeId::ROOT && saw_root_element {
                    return Err(Error::InvalidDocument(
                        "more than one root element".to_string(),
                    ));
                }
                saw_root_element = true;
                let id = doc.alloc_node(Node::new(kind));
                doc.append_child(parent, id);
                stack.push(id);
            }
            Event::Empty(e) => {
                let name = e.name();
                let kind = NodeKind::from_local_name(local_name(name.as_ref()));
                let parent = current(&stack);
                if parent == NodeId::ROOT && saw_root_element {
                    return Err(Error::InvalidDocument(
                        "more than one root element".to_string(),
                    ));
                }
                saw_root_element = true;
                let id = doc.alloc_node(Node::new(kind));
                doc.append_child(parent, id);
            }
            Event::End(_) => {
                if stack.len() <= 1 {
                    return Err(Error::InvalidDocument(
                        "closing tag without matching opening tag".to_string(),
                    ));
                }
                stack.pop();
            }
            Event::Text(e) => {
                push_text(&mut doc, &stack, &String::from_utf8_lossy(e.as_ref()));
            }
            Event::CData(e) => {
                push_text(&mut doc, &stack, &String::from_utf8_lossy(e.as_ref()));
            }
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                match resolve_entity(&entity) {
                    Some(resolved) => push_text(&mut doc, &stack, &resolved),
                    None => {
                        log::debug!("Keeping unknown entity reference &{entity};");
                        push_text(&mut doc, &stack, &format!("&{entity};"));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() > 1 {
        return Err(Error::InvalidDocument(format!(
            "{} element(s) left unclosed at end of input",
            stack.len() - 1
        )));
    }
    if !saw_root_element {
        return Err(Error::InvalidDocument("no root element".to_string()));
    }

    Ok(doc)
}

fn current(stack: &[NodeId]) -> NodeId {
    stack.last().copied().unwrap_or(NodeId::ROOT)
}

/// Attach character data to the open element: as its text if it has no
/// children yet, otherwise as the tail of its last child.
fn push_text(doc: &mut Document, stack: &[NodeId], text: &str) {
    let parent = current(stack);
    if parent == NodeId::ROOT || text.is_empty() {
        return;
    }
    match doc.node(parent).and_then(|n| n.last_child) {
        Some(last) => doc.extend_tail(last, text),
        None => doc.extend_text(parent, text),
    }
}

fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve predefined and numeric character references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        "nbsp" => return Some("\u{a0}".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}
