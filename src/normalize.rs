use crate::atoms::AtomNode;
use log::debug;

/// Splice away containers with an empty header.
///
/// Children are pruned first. A pruned child that is a container with an
/// empty header and at least one child is replaced, in place, by its
/// children. Empty-header containers without children stay where they are.
/// The node passed in is never itself removed, only its descendants.
pub fn prune(node: AtomNode) -> AtomNode {
    match node {
        AtomNode::Container { header, children } => {
            let mut kept = Vec::with_capacity(children.len());
            for child in children {
                match prune(child) {
                    AtomNode::Container { header: h, children: grandkids }
                        if h.is_empty() && !grandkids.is_empty() =>
                    {
                        debug!("splicing {} children of empty-header container into '{}'", grandkids.len(), header.typ);
                        kept.extend(grandkids);
                    }
                    other => kept.push(other),
                }
            }
            AtomNode::Container { header, children: kept }
        }
        leaf => leaf,
    }
}
