//! # User Profile
//!
//! Structured accumulator of long-term user facts, split into fixed facet
//! buckets. Facts are append-only and provenance-tagged with the session
//! that produced them; consolidation never overwrites a prior fact.
//! Contradiction resolution is left to the context consumer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The fixed facet buckets of a user profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileFacet {
    BasicInfo,
    Preferences,
    Constraints,
    Goals,
    Personality,
    Social,
    EmotionalNeeds,
    CoreValues,
    SignificantEvents,
}

impl ProfileFacet {
    /// All facets, in rendering order.
    pub const ALL: [ProfileFacet; 9] = [
        ProfileFacet::BasicInfo,
        ProfileFacet::Preferences,
        ProfileFacet::Constraints,
        ProfileFacet::Goals,
        ProfileFacet::Personality,
        ProfileFacet::Social,
        ProfileFacet::EmotionalNeeds,
        ProfileFacet::CoreValues,
        ProfileFacet::SignificantEvents,
    ];

    /// Human-readable label used when rendering the profile.
    pub fn label(&self) -> &'static str {
        match self {
            ProfileFacet::BasicInfo => "Basic info",
            ProfileFacet::Preferences => "Preferences",
            ProfileFacet::Constraints => "Constraints",
            ProfileFacet::Goals => "Goals",
            ProfileFacet::Personality => "Personality",
            ProfileFacet::Social => "Social",
            ProfileFacet::EmotionalNeeds => "Emotional needs",
            ProfileFacet::CoreValues => "Core values",
            ProfileFacet::SignificantEvents => "Significant events",
        }
    }
}

/// A single profile fact with its originating session tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileFact {
    /// The fact text
    pub text: String,
    /// Session (task) the fact was extracted from
    pub session_id: String,
}

impl ProfileFact {
    pub fn new(text: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            session_id: session_id.into(),
        }
    }

    /// Renders the fact with its provenance tag, e.g. `vegetarian [session-3]`.
    pub fn render(&self) -> String {
        format!("{} [{}]", self.text, self.session_id)
    }
}

/// New facts per facet, produced by one consolidation run.
pub type ProfileIncrement = BTreeMap<ProfileFacet, Vec<ProfileFact>>;

/// Append-only, facet-bucketed user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    facets: BTreeMap<ProfileFacet, Vec<ProfileFact>>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Facts currently stored under a facet.
    pub fn facts(&self, facet: ProfileFacet) -> &[ProfileFact] {
        self.facets.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total fact count across all facets.
    pub fn fact_count(&self) -> usize {
        self.facets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.values().all(Vec::is_empty)
    }

    /// Appends a fact to a facet.
    ///
    /// The only permitted dedupe: a fact whose exact text already exists in
    /// the same facet is skipped. Returns true when the fact was added.
    pub fn append(&mut self, facet: ProfileFacet, fact: ProfileFact) -> bool {
        let bucket = self.facets.entry(facet).or_default();
        if bucket.iter().any(|existing| existing.text == fact.text) {
            return false;
        }
        bucket.push(fact);
        true
    }

    /// Applies a whole increment; returns the number of facts added.
    pub fn apply_increment(&mut self, increment: &ProfileIncrement) -> usize {
        let mut added = 0;
        for (facet, facts) in increment {
            for fact in facts {
                if self.append(*facet, fact.clone()) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Renders the profile as a facet listing for context assembly.
    ///
    /// One line per non-empty facet: `Preferences: likes tea [s1]; vegetarian [s2]`.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for facet in ProfileFacet::ALL {
            let facts = self.facts(facet);
            if facts.is_empty() {
                continue;
            }
            let rendered: Vec<String> = facts.iter().map(ProfileFact::render).collect();
            lines.push(format!("{}: {}", facet.label(), rendered.join("; ")));
        }
        lines.join("\n")
    }
}
