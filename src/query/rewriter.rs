use super::{identifier::Identifier, relation::Relation};

/// Renames one column across a sequence of relations.
#[derive(Debug, Clone, Copy)]
pub struct RelationRewriter<'a> {
    from: &'a Identifier,
    to: &'a Identifier,
}

impl<'a> RelationRewriter<'a> {
    pub fn new(from: &'a Identifier, to: &'a Identifier) -> Self {
        RelationRewriter { from, to }
    }

    pub fn rewrite(&self, relations: &[Relation]) -> Vec<Relation> {
        relations.iter().map(|r| self.rewrite_relation(r)).collect()
    }

    pub fn rewrite_relation(&self, relation: &Relation) -> Relation {
        if relation.applies_to(self.from) {
            relation.rename_identifier(self.from, self.to)
        } else {
            relation.clone()
        }
    }

    /// Number of column references the rewrite would touch.
    pub fn occurrences(&self, relations: &[Relation]) -> usize {
        relations
            .iter()
            .flat_map(|r| r.columns())
            .filter(|id| *id == self.from)
            .count()
    }
}
