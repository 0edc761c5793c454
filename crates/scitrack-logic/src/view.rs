//! Filtered, grouped views over available entries.
//!
//! Reconciliation output stays a flat list; this module derives the
//! hierarchies a front end shows:
//!
//! | Mode | Levels |
//! |------|--------|
//! | [`GroupBy::Body`] | body → situation → biome → entries |
//! | [`GroupBy::Experiment`] | experiment → body → situation → entries |
//! | [`GroupBy::Situation`] | situation → body → biome → entries |
//!
//! Entries without a biome hang directly off the situation (or body)
//! level. Every level is a sorted list: names ascending, situations in
//! declaration order. Each group carries a [`GroupTally`] built from its
//! children, so its status never depends on visiting order.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::identifier::Situation;
use crate::reconcile::{AvailableEntry, CompletionStatus, GroupTally};

/// Narrow available entries by body and/or experiment type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub body: Option<String>,
    pub experiment_type: Option<String>,
}

impl Filter {
    pub fn matches(&self, entry: &AvailableEntry) -> bool {
        self.body
            .as_deref()
            .map_or(true, |b| entry.body_display_name == b)
            && self
                .experiment_type
                .as_deref()
                .map_or(true, |t| entry.id.experiment_type() == t)
    }

    pub fn apply<'a>(&self, entries: &'a [AvailableEntry]) -> Vec<&'a AvailableEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    #[default]
    Body,
    Experiment,
    Situation,
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "body" => Ok(GroupBy::Body),
            "experiment" => Ok(GroupBy::Experiment),
            "situation" => Ok(GroupBy::Situation),
            other => Err(format!(
                "unknown grouping {other:?} (expected body, experiment or situation)"
            )),
        }
    }
}

/// One level of the grouped view.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub label: String,
    pub tally: GroupTally,
    pub children: Vec<Group<'a>>,
    /// Entries attached directly at this level.
    pub entries: Vec<&'a AvailableEntry>,
}

impl Group<'_> {
    pub fn status(&self) -> CompletionStatus {
        self.tally.status()
    }
}

/// Sort key: rank orders situations, label orders everything else.
type Key = (usize, String);

fn name_key(label: &str) -> Key {
    (0, label.to_string())
}

fn situation_key(situation: Situation) -> Key {
    let rank = Situation::all()
        .iter()
        .position(|s| *s == situation)
        .unwrap_or(0);
    (rank, situation.label().to_string())
}

fn path(entry: &AvailableEntry, by: GroupBy) -> Vec<Key> {
    let id = &entry.id;
    let mut keys = match by {
        GroupBy::Body => vec![
            name_key(&entry.body_display_name),
            situation_key(id.situation()),
        ],
        GroupBy::Situation => vec![
            situation_key(id.situation()),
            name_key(&entry.body_display_name),
        ],
        GroupBy::Experiment => vec![
            name_key(&entry.display_name),
            name_key(&entry.body_display_name),
            situation_key(id.situation()),
        ],
    };
    if by != GroupBy::Experiment {
        if let Some(biome) = id.biome() {
            keys.push(name_key(biome));
        }
    }
    keys
}

#[derive(Default)]
struct Node<'a> {
    entries: Vec<&'a AvailableEntry>,
    children: BTreeMap<Key, Node<'a>>,
}

impl<'a> Node<'a> {
    fn insert(&mut self, path: &[Key], entry: &'a AvailableEntry) {
        match path.split_first() {
            None => self.entries.push(entry),
            Some((head, rest)) => self
                .children
                .entry(head.clone())
                .or_default()
                .insert(rest, entry),
        }
    }

    fn into_children(self, by: GroupBy) -> Vec<Group<'a>> {
        self.children
            .into_iter()
            .map(|((_, label), node)| node.into_group(label, by))
            .collect()
    }

    fn into_group(mut self, label: String, by: GroupBy) -> Group<'a> {
        match by {
            GroupBy::Experiment => self.entries.sort_by(|a, b| {
                (a.id.biome().unwrap_or(""), &a.id).cmp(&(b.id.biome().unwrap_or(""), &b.id))
            }),
            _ => self
                .entries
                .sort_by(|a, b| (&a.display_name, &a.id).cmp(&(&b.display_name, &b.id))),
        }
        let entries = std::mem::take(&mut self.entries);
        let children = self.into_children(by);
        let tally = children
            .iter()
            .map(|c| c.tally)
            .sum::<GroupTally>()
            .merge(entries.iter().copied().sum());
        Group {
            label,
            tally,
            children,
            entries,
        }
    }
}

/// Group entries into top-level groups for `by`.
pub fn group<'a, I>(entries: I, by: GroupBy) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a AvailableEntry>,
{
    let mut root = Node::default();
    for entry in entries {
        root.insert(&path(entry, by), entry);
    }
    root.into_children(by)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::ExperimentId;

    fn entry(
        ty: &str,
        name: &str,
        body: &str,
        situation: Situation,
        biome: Option<&str>,
        remaining_value: f64,
    ) -> AvailableEntry {
        AvailableEntry {
            id: ExperimentId::new(ty, body, situation, biome),
            display_name: name.into(),
            body_display_name: body.into(),
            remaining_value,
            is_partial: remaining_value < 1.0,
        }
    }

    fn sample() -> Vec<AvailableEntry> {
        use Situation::*;
        vec![
            entry("surfaceSample", "Surface Sample", "Mun", SrfLanded, Some("Midlands"), 30.0),
            entry("surfaceSample", "Surface Sample", "Mun", SrfLanded, Some("Highlands"), 0.0),
            entry("crewReport", "Crew Report", "Mun", InSpaceLow, None, 5.0),
            entry("crewReport", "Crew Report", "Kerbin", SrfLanded, Some("Shores"), 0.05),
            entry("evaReport", "EVA Report", "Mun", SrfLanded, Some("Midlands"), 8.0),
        ]
    }

    #[test]
    fn groups_by_body_situation_biome() {
        let entries = sample();
        let groups = group(&entries, GroupBy::Body);
        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Kerbin", "Mun"]);

        let mun = &groups[1];
        let situations: Vec<_> = mun.children.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(situations, vec!["Surface (Landed)", "Space (Low)"]);

        // No biome: entry sits directly under the situation.
        let space = &mun.children[1];
        assert!(space.children.is_empty());
        assert_eq!(space.entries.len(), 1);

        let landed = &mun.children[0];
        let biomes: Vec<_> = landed.children.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(biomes, vec!["Highlands", "Midlands"]);
        let midlands: Vec<_> = landed.children[1]
            .entries
            .iter()
            .map(|e| e.display_name.as_str())
            .collect();
        assert_eq!(midlands, vec!["EVA Report", "Surface Sample"]);
    }

    #[test]
    fn group_status_is_bottom_up() {
        let entries = sample();
        let groups = group(&entries, GroupBy::Body);
        assert_eq!(groups[0].status(), CompletionStatus::Complete);
        assert_eq!(groups[1].status(), CompletionStatus::Partial);
        assert_eq!(groups[1].tally.members, 4);
        assert_eq!(groups[1].tally.complete, 1);
        assert_eq!(groups[1].tally.remaining_value, 43.0);
        let highlands = &groups[1].children[0].children[0];
        assert_eq!(highlands.status(), CompletionStatus::Complete);
        let space = &groups[1].children[1];
        assert_eq!(space.status(), CompletionStatus::Unstarted);
    }

    #[test]
    fn groups_by_experiment_then_body_then_situation() {
        let entries = sample();
        let groups = group(&entries, GroupBy::Experiment);
        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Crew Report", "EVA Report", "Surface Sample"]);

        let sample = &groups[2];
        assert_eq!(sample.children.len(), 1);
        let landed = &sample.children[0].children[0];
        assert_eq!(landed.label, "Surface (Landed)");
        let biomes: Vec<_> = landed.entries.iter().map(|e| e.id.biome()).collect();
        assert_eq!(biomes, vec![Some("Highlands"), Some("Midlands")]);
    }

    #[test]
    fn groups_by_situation_in_declaration_order() {
        let entries = sample();
        let groups = group(&entries, GroupBy::Situation);
        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Surface (Landed)", "Space (Low)"]);
        let bodies: Vec<_> = groups[0].children.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(bodies, vec!["Kerbin", "Mun"]);
    }

    #[test]
    fn filter_by_body_and_type() {
        let entries = sample();
        let filter = Filter {
            body: Some("Mun".into()),
            experiment_type: Some("surfaceSample".into()),
        };
        assert_eq!(filter.apply(&entries).len(), 2);
        assert_eq!(Filter::default().apply(&entries).len(), entries.len());

        let grouped = group(filter.apply(&entries), GroupBy::Body);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].tally.members, 2);
    }

    #[test]
    fn parses_group_by() {
        assert_eq!("Body".parse::<GroupBy>(), Ok(GroupBy::Body));
        assert_eq!("situation".parse::<GroupBy>(), Ok(GroupBy::Situation));
        assert!("planet".parse::<GroupBy>().is_err());
    }
}
