use kuchikikiki::NodeRef;

/// One structural change to the tree.
#[derive(Debug, Clone)]
pub enum Edit {
  /// Insert `node` as the first child of `parent`.
  Prepend { parent: NodeRef, node: NodeRef },
  /// Insert `node` immediately before `anchor`.
  InsertBefore { anchor: NodeRef, node: NodeRef },
  /// Remove `node` from its parent.
  Detach(NodeRef),
}

/// Edits planned while walking a snapshot of the tree, applied together once
/// the walk is over so that no iterator observes a half-edited sibling list.
#[derive(Debug, Default)]
pub struct EditScript {
  edits: Vec<Edit>,
}

impl EditScript {
  pub fn push(&mut self, edit: Edit) {
    self.edits.push(edit);
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.edits.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.edits.is_empty()
  }

  /// Apply every edit in the order it was planned.
  pub fn apply(self) {
    for edit in self.edits {
      match edit {
        Edit::Prepend { parent, node } => parent.prepend(node),
        Edit::InsertBefore { anchor, node } => anchor.insert_before(node),
        Edit::Detach(node) => node.detach(),
      }
    }
  }
}
