//! Owned OSM entities as handed to a [`Handler`](crate::parser::Handler).

use std::{collections::BTreeMap, fmt};

use osmpbfreader::{OsmId, OsmObj};
use smartstring::alias::String;

/// Tags attached to a single entity, keyed by tag key.
pub type Tags = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: i64,
    pub tags: Tags,
    pub lon: f64,
    pub lat: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Way {
    pub id: i64,
    pub tags: Tags,
    pub refs: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    pub id: i64,
    pub tags: Tags,
    pub members: Vec<Member>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    Node,
    Way,
    Relation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub id: i64,
    pub element_type: ElementType,
    pub role: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Node => "node",
            ElementType::Way => "way",
            ElementType::Relation => "relation",
        };
        f.write_str(name)
    }
}

fn convert_tags(tags: &osmpbfreader::Tags) -> Tags {
    tags.iter()
        .map(|(k, v)| (String::from(k.as_str()), String::from(v.as_str())))
        .collect()
}

impl From<OsmObj> for Element {
    fn from(obj: OsmObj) -> Self {
        match obj {
            OsmObj::Node(n) => Element::Node(Node {
                id: n.id.0,
                tags: convert_tags(&n.tags),
                lon: n.lon(),
                lat: n.lat(),
            }),
            OsmObj::Way(w) => Element::Way(Way {
                id: w.id.0,
                tags: convert_tags(&w.tags),
                refs: w.nodes.iter().map(|node_id| node_id.0).collect(),
            }),
            OsmObj::Relation(r) => Element::Relation(Relation {
                id: r.id.0,
                tags: convert_tags(&r.tags),
                members: r
                    .refs
                    .iter()
                    .map(|member| {
                        let (id, element_type) = match member.member {
                            OsmId::Node(node_id) => (node_id.0, ElementType::Node),
                            OsmId::Way(way_id) => (way_id.0, ElementType::Way),
                            OsmId::Relation(rel_id) => (rel_id.0, ElementType::Relation),
                        };
                        Member {
                            id,
                            element_type,
                            role: String::from(member.role.as_str()),
                        }
                    })
                    .collect(),
            }),
        }
    }
}
