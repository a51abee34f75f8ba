use std::collections::BTreeMap;

use log::info;
use smartstring::alias::String;

use crate::{
    element::{Node, Relation, Tags, Way},
    parser::Handler,
};

/// Keys whose tags get counted. Membership is exact, not by prefix.
pub const RETAIN_KEYS: &[&str] = &[
    "building",
    "highway",
    "footway",
    "cycleway",
    "surface",
    "railway",
    "amenity",
    "public_transport",
    "bridge",
    "embankment",
    "tunnel",
    "bicycle",
    "oneway",
    "natural",
    "lanes",
    "landuse",
    "RLIS:bicycle",
    "CCGIS:bicycle",
];

/// Key prefixes considered not worth importing. Only listed in the report;
/// counting goes by [`RETAIN_KEYS`].
pub const SKIP_KEYS: &[&str] = &[
    "name", "note", "operator", "source", "tiger:", "nhd", "zip", "RLIS:", "gnis", "addr:",
    "import", "created", "CCGIS", "website",
];

pub const NODE_PROGRESS_INTERVAL: u64 = 10_000;
pub const WAY_PROGRESS_INTERVAL: u64 = 10_000;
pub const RELATION_PROGRESS_INTERVAL: u64 = 1_000;

pub type TagCounts = BTreeMap<(String, String), u64>;
pub type KeyWeights = BTreeMap<String, u64>;
pub type RoleCounts = BTreeMap<String, u64>;

pub fn tag_weight(key: &str, value: &str) -> u64 {
    (key.len() + value.len() + 2) as u64
}

pub fn is_retained(key: &str) -> bool {
    RETAIN_KEYS.contains(&key)
}

pub fn matches_skip_list(key: &str) -> bool {
    SKIP_KEYS.iter().any(|prefix| key.starts_with(prefix))
}

#[derive(Clone, Debug, Default)]
pub struct TagCounter {
    pub node_tags: TagCounts,
    pub way_tags: TagCounts,
    pub rel_tags: TagCounts,
    pub key_weights: KeyWeights,
    pub role_weights: RoleCounts,
    pub n_nodes: u64,
    pub n_ways: u64,
    pub n_relations: u64,
}

impl TagCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every retained tag in `tags` to `target` and its weight to
    /// `key_weights`.
    pub fn count_tags(key_weights: &mut KeyWeights, target: &mut TagCounts, tags: &Tags) {
        for (key, value) in tags.iter() {
            if !is_retained(key) {
                continue;
            }
            *key_weights.entry(key.clone()).or_default() += tag_weight(key, value);
            *target.entry((key.clone(), value.clone())).or_default() += 1;
        }
    }

    pub fn log_summary(&self) {
        info!(
            "{} nodes, {} ways, {} relations; {} retained keys, {} roles",
            self.n_nodes,
            self.n_ways,
            self.n_relations,
            self.key_weights.len(),
            self.role_weights.len()
        );
    }
}

impl Handler for TagCounter {
    fn nodes(&mut self, nodes: &[Node]) {
        let Self {
            node_tags,
            key_weights,
            n_nodes,
            ..
        } = self;
        for node in nodes {
            *n_nodes += 1;
            if *n_nodes % NODE_PROGRESS_INTERVAL == 0 {
                info!("{} nodes", n_nodes);
            }
            Self::count_tags(key_weights, node_tags, &node.tags);
        }
    }

    fn ways(&mut self, ways: &[Way]) {
        let Self {
            way_tags,
            key_weights,
            n_ways,
            ..
        } = self;
        for way in ways {
            *n_ways += 1;
            if *n_ways % WAY_PROGRESS_INTERVAL == 0 {
                info!("{} ways", n_ways);
            }
            Self::count_tags(key_weights, way_tags, &way.tags);
        }
    }

    fn relations(&mut self, relations: &[Relation]) {
        let Self {
            rel_tags,
            key_weights,
            role_weights,
            n_relations,
            ..
        } = self;
        for rel in relations {
            *n_relations += 1;
            if *n_relations % RELATION_PROGRESS_INTERVAL == 0 {
                info!("{} relations", n_relations);
            }
            for member in rel.members.iter() {
                *role_weights.entry(member.role.clone()).or_default() += 1;
            }
            Self::count_tags(key_weights, rel_tags, &rel.tags);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementType, Member};
    use rstest::rstest;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (String::from(*k), String::from(*v)))
            .collect()
    }

    fn way(pairs: &[(&str, &str)]) -> Way {
        Way {
            id: 1,
            tags: tags(pairs),
            refs: vec![1, 2],
        }
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (String::from(k), String::from(v))
    }

    #[rstest]
    #[case::highway("highway", true)]
    #[case::colon_key("RLIS:bicycle", true)]
    #[case::name("name", false)]
    #[case::prefix_only("highway:lanes", false)]
    #[case::case_sensitive("Highway", false)]
    fn retain_is_exact_membership(#[case] key: &str, #[case] retained: bool) {
        assert_eq!(is_retained(key), retained);
    }

    #[rstest]
    #[case::exact("name", true)]
    #[case::prefix("tiger:county", true)]
    #[case::addr("addr:street", true)]
    #[case::retained_key("highway", false)]
    fn skip_list_is_prefix_match(#[case] key: &str, #[case] skipped: bool) {
        assert_eq!(matches_skip_list(key), skipped);
    }

    #[test]
    fn weight_is_byte_length_plus_two() {
        assert_eq!(tag_weight("highway", "residential"), 20);
        assert_eq!(tag_weight("", ""), 2);
        assert_eq!(tag_weight("name", "Zürich"), 4 + 7 + 2);
    }

    #[test]
    fn single_way_counts_only_retained_tags() {
        let mut counter = TagCounter::new();
        counter.ways(&[way(&[("highway", "residential"), ("name", "Main St")])]);

        assert_eq!(counter.n_ways, 1);
        assert_eq!(counter.way_tags.len(), 1);
        assert_eq!(counter.way_tags[&pair("highway", "residential")], 1);
        assert_eq!(counter.key_weights.len(), 1);
        assert_eq!(counter.key_weights["highway"], 20);
        assert!(!counter.key_weights.contains_key("name"));
        assert!(counter.node_tags.is_empty());
        assert!(counter.rel_tags.is_empty());
    }

    #[test]
    fn same_way_twice_doubles_count_and_weight() {
        let mut counter = TagCounter::new();
        let w = way(&[("highway", "residential"), ("name", "Main St")]);
        counter.ways(&[w.clone()]);
        counter.ways(&[w]);

        assert_eq!(counter.n_ways, 2);
        assert_eq!(counter.way_tags[&pair("highway", "residential")], 2);
        assert_eq!(counter.key_weights["highway"], 40);
    }

    #[test]
    fn key_weights_accumulate_across_kinds() {
        let mut counter = TagCounter::new();
        counter.nodes(&[Node {
            id: 1,
            tags: tags(&[("railway", "station"), ("amenity", "cafe")]),
            lon: 13.4,
            lat: 52.5,
        }]);
        counter.ways(&[way(&[("railway", "rail")])]);
        counter.relations(&[Relation {
            id: 3,
            tags: tags(&[("railway", "rail")]),
            members: vec![],
        }]);

        let expected = tag_weight("railway", "station") + 2 * tag_weight("railway", "rail");
        assert_eq!(counter.key_weights["railway"], expected);
        assert_eq!(counter.key_weights["amenity"], tag_weight("amenity", "cafe"));
        assert_eq!(counter.node_tags[&pair("railway", "station")], 1);
        assert_eq!(counter.way_tags[&pair("railway", "rail")], 1);
        assert_eq!(counter.rel_tags[&pair("railway", "rail")], 1);
    }

    #[test]
    fn relation_members_count_roles() {
        let member = |id, element_type, role: &str| Member {
            id,
            element_type,
            role: String::from(role),
        };
        let mut counter = TagCounter::new();
        counter.relations(&[
            Relation {
                id: 1,
                tags: tags(&[("type", "multipolygon"), ("landuse", "forest")]),
                members: vec![
                    member(10, ElementType::Way, "outer"),
                    member(11, ElementType::Way, "inner"),
                    member(12, ElementType::Way, "inner"),
                ],
            },
            Relation {
                id: 2,
                tags: Tags::new(),
                members: vec![
                    member(20, ElementType::Node, ""),
                    member(21, ElementType::Relation, "outer"),
                ],
            },
        ]);

        assert_eq!(counter.n_relations, 2);
        assert_eq!(counter.role_weights["inner"], 2);
        assert_eq!(counter.role_weights["outer"], 2);
        assert_eq!(counter.role_weights[""], 1);
        assert_eq!(counter.role_weights.values().sum::<u64>(), 5);
        assert_eq!(counter.rel_tags.len(), 1);
        assert_eq!(counter.rel_tags[&pair("landuse", "forest")], 1);
    }

    #[test]
    fn count_tags_initialises_fresh_pairs_to_one() {
        let mut weights = KeyWeights::new();
        let mut target = TagCounts::new();
        TagCounter::count_tags(&mut weights, &mut target, &tags(&[("oneway", "yes")]));

        assert_eq!(target[&pair("oneway", "yes")], 1);
        assert_eq!(weights["oneway"], tag_weight("oneway", "yes"));
    }
}
