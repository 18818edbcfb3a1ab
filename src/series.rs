//! Series resolution and rendering.
//!
//! A series is a named, ordered collection of documents sharing a
//! `series.id`, ordered by an integer `part`. The build is two-phase:
//!
//! 1. **Resolve** — one pass over all documents groups them by series id
//!    and sorts each group by part, producing a [`SeriesIndex`].
//! 2. **Render** — per-document and tag renders consult the index.
//!
//! Documents are immutable inputs; all derived state lives in the index.
//! This replaces the mutate-a-field-on-every-member approach with an
//! explicitly keyed lookup table, so render order can never observe a
//! half-resolved graph. The index gives any member O(1) access to its
//! full ordered sibling list.
//!
//! The tag form is the exception: it sorts for itself, so a series tag in
//! page content renders correctly even before (or without) a resolve
//! pass.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Data-quality findings from a resolve pass. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesWarning {
    /// Two members of one series share a `part` value. Their relative
    /// order falls back to document order.
    #[error("series '{series_id}' has multiple parts numbered {part}")]
    DuplicatePart { series_id: String, part: i64 },
}

/// Series membership attached to a document's front matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub id: String,
    pub part: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,
}

/// A document as this pipeline sees it: identity, display title, and
/// optional series membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesEntry>,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            series: None,
        }
    }

    /// Build a document from a host's free-form string-keyed metadata.
    ///
    /// Only the `series` key is interpreted; a present-but-malformed
    /// value is treated as no series membership.
    pub fn from_metadata(
        id: impl Into<String>,
        title: impl Into<String>,
        metadata: &serde_json::Value,
    ) -> Self {
        let series = metadata
            .get("series")
            .and_then(|v| serde_json::from_value(v.clone()).ok());
        Self {
            id: id.into(),
            title: title.into(),
            series,
        }
    }
}

/// One ordered member of a resolved series.
///
/// Carries everything rendering needs, so renders never go back to the
/// document set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesMember {
    pub doc_id: String,
    pub title: String,
    pub short_title: Option<String>,
    pub part: i64,
}

impl SeriesMember {
    /// Display label: `short_title` if present, else the document title.
    pub fn label(&self) -> &str {
        self.short_title.as_deref().unwrap_or(&self.title)
    }
}

fn member_of(doc: &Document, series: &SeriesEntry) -> SeriesMember {
    SeriesMember {
        doc_id: doc.id.clone(),
        title: doc.title.clone(),
        short_title: series.short_title.clone(),
        part: series.part,
    }
}

/// Lookup table produced by the resolve pass: every series' ordered
/// member list, plus a document index for sibling lookup.
#[derive(Debug, Default)]
pub struct SeriesIndex {
    groups: BTreeMap<String, Vec<SeriesMember>>,
    doc_series: HashMap<String, String>,
}

impl SeriesIndex {
    /// Run the resolve pass: group by series id, sort each group by part
    /// ascending. Documents without series metadata join no group.
    ///
    /// The sort is stable, so members tied on `part` keep document order;
    /// each tie is reported as a [`SeriesWarning::DuplicatePart`].
    /// Grouping is one pass and each group sorts independently, so the
    /// whole thing is O(N log N) in the number of documents.
    pub fn resolve(docs: &[Document]) -> (Self, Vec<SeriesWarning>) {
        let mut groups: BTreeMap<String, Vec<SeriesMember>> = BTreeMap::new();
        let mut doc_series = HashMap::new();

        for doc in docs {
            let Some(series) = &doc.series else { continue };
            groups
                .entry(series.id.clone())
                .or_default()
                .push(member_of(doc, series));
            doc_series.insert(doc.id.clone(), series.id.clone());
        }

        let mut warnings = Vec::new();
        for (series_id, members) in &mut groups {
            members.sort_by_key(|m| m.part);
            for pair in members.windows(2) {
                if pair[0].part == pair[1].part {
                    warnings.push(SeriesWarning::DuplicatePart {
                        series_id: series_id.clone(),
                        part: pair[0].part,
                    });
                }
            }
        }

        (
            Self {
                groups,
                doc_series,
            },
            warnings,
        )
    }

    /// Ordered members of a series, if any document declared it.
    pub fn members(&self, series_id: &str) -> Option<&[SeriesMember]> {
        self.groups.get(series_id).map(Vec::as_slice)
    }

    /// Ordered members of the series a document belongs to — the
    /// back-reference every member carries, without document mutation.
    pub fn members_for_doc(&self, doc_id: &str) -> Option<&[SeriesMember]> {
        self.members(self.doc_series.get(doc_id)?)
    }

    /// Resolved series ids, in sorted order.
    pub fn series_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Render an ordered part list as a single container.
///
/// An empty member list renders an empty container, not an error.
pub fn render_part_list(members: &[SeriesMember]) -> Markup {
    html! {
        div class="series_container" {
            @for member in members {
                div class="series_part" { (member.label()) }
            }
        }
    }
}

/// Tag form: render the part list for a series id.
///
/// Self-contained — filters and sorts the documents itself rather than
/// relying on a prior resolve pass, so the tag works anywhere in page
/// content.
pub fn render_series_tag(series_id: &str, docs: &[Document]) -> Markup {
    let mut members: Vec<SeriesMember> = docs
        .iter()
        .filter_map(|doc| {
            let series = doc.series.as_ref()?;
            (series.id == series_id).then(|| member_of(doc, series))
        })
        .collect();
    members.sort_by_key(|m| m.part);
    render_part_list(&members)
}

/// Per-document form: the part list of the series this document belongs
/// to, or `None` if it belongs to none.
pub fn render_series_for_doc(index: &SeriesIndex, doc_id: &str) -> Option<Markup> {
    index.members_for_doc(doc_id).map(render_part_list)
}
