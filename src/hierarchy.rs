use std::fmt;

/// The manufacturing hierarchy entity types.
///
/// This enum plus [`EntityKind::children`] is the single source of truth
/// for cascade topology. A new entity type must be registered here or
/// cascades silently stop at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    Component,
    Assembly,
    Piece,
    Article,
}

/// A child table edge: which entity type to descend into and the foreign
/// key column on the child that references the current entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildEdge {
    pub kind: EntityKind,
    pub fk_column: &'static str,
}

const PROJECT_CHILDREN: &[ChildEdge] = &[
    ChildEdge { kind: EntityKind::Component, fk_column: "project_guid" },
    ChildEdge { kind: EntityKind::Assembly, fk_column: "project_guid" },
    ChildEdge { kind: EntityKind::Piece, fk_column: "project_guid" },
    ChildEdge { kind: EntityKind::Article, fk_column: "project_guid" },
];

const COMPONENT_CHILDREN: &[ChildEdge] = &[
    ChildEdge { kind: EntityKind::Assembly, fk_column: "component_guid" },
    ChildEdge { kind: EntityKind::Piece, fk_column: "component_guid" },
    ChildEdge { kind: EntityKind::Article, fk_column: "component_guid" },
];

const ASSEMBLY_CHILDREN: &[ChildEdge] = &[
    ChildEdge { kind: EntityKind::Piece, fk_column: "assembly_guid" },
];

const NO_CHILDREN: &[ChildEdge] = &[];

const COMPONENT_PARENTS: &[(EntityKind, &str)] = &[(EntityKind::Project, "project_guid")];
const ASSEMBLY_PARENTS: &[(EntityKind, &str)] = &[(EntityKind::Component, "component_guid")];
const PIECE_PARENTS: &[(EntityKind, &str)] = &[
    (EntityKind::Assembly, "assembly_guid"),
    (EntityKind::Component, "component_guid"),
];
const ARTICLE_PARENTS: &[(EntityKind, &str)] = &[(EntityKind::Component, "component_guid")];

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Project,
        EntityKind::Component,
        EntityKind::Assembly,
        EntityKind::Piece,
        EntityKind::Article,
    ];

    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::Component => "components",
            EntityKind::Assembly => "assemblies",
            EntityKind::Piece => "pieces",
            EntityKind::Article => "articles",
        }
    }

    /// Children to cascade into, in the order they are walked.
    pub fn children(self) -> &'static [ChildEdge] {
        match self {
            EntityKind::Project => PROJECT_CHILDREN,
            EntityKind::Component => COMPONENT_CHILDREN,
            EntityKind::Assembly => ASSEMBLY_CHILDREN,
            EntityKind::Piece | EntityKind::Article => NO_CHILDREN,
        }
    }

    /// Foreign key columns on this entity's own row that point at its
    /// possible immediate parents, nearest ancestor first. A `Piece`
    /// hangs off its assembly when `assembly_guid` is set, otherwise
    /// directly off its component.
    pub fn parent_columns(self) -> &'static [(EntityKind, &'static str)] {
        match self {
            EntityKind::Project => &[],
            EntityKind::Component => COMPONENT_PARENTS,
            EntityKind::Assembly => ASSEMBLY_PARENTS,
            EntityKind::Piece => PIECE_PARENTS,
            EntityKind::Article => ARTICLE_PARENTS,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Project => "project",
            EntityKind::Component => "component",
            EntityKind::Assembly => "assembly",
            EntityKind::Piece => "piece",
            EntityKind::Article => "article",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_kind_is_reachable_from_project() {
        let mut seen = HashSet::new();
        let mut stack = vec![EntityKind::Project];
        while let Some(kind) = stack.pop() {
            if seen.insert(kind) {
                for edge in kind.children() {
                    stack.push(edge.kind);
                }
            }
        }
        for kind in EntityKind::ALL {
            assert!(seen.contains(&kind), "{kind} unreachable from project");
        }
    }

    #[test]
    fn leaves_have_no_children() {
        assert!(EntityKind::Piece.children().is_empty());
        assert!(EntityKind::Article.children().is_empty());
    }

    #[test]
    fn table_names_are_unique() {
        let tables: HashSet<_> = EntityKind::ALL.iter().map(|k| k.table()).collect();
        assert_eq!(tables.len(), EntityKind::ALL.len());
    }

    #[test]
    fn parent_edges_mirror_child_edges() {
        // Every (parent, fk) pair in parent_columns must exist as a
        // child edge on that parent, with the same fk column.
        for kind in EntityKind::ALL {
            for (parent, fk) in kind.parent_columns() {
                assert!(
                    parent
                        .children()
                        .iter()
                        .any(|e| e.kind == kind && e.fk_column == *fk),
                    "{parent} has no child edge to {kind} via {fk}"
                );
            }
        }
    }

    #[test]
    fn piece_prefers_assembly_parent() {
        let parents = EntityKind::Piece.parent_columns();
        assert_eq!(parents[0].1, "assembly_guid");
        assert_eq!(parents[1].1, "component_guid");
    }
}
