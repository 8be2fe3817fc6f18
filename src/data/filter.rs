use super::model::Record;

/// Default cap on the number of search suggestions.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

/// A type predicate that can be switched off without losing its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilter {
    pub enabled: bool,
    pub value: String,
}

impl TypeFilter {
    /// Disabled filters accept everything, whatever `value` holds.
    fn accepts(filter: Option<&TypeFilter>, candidate: Option<&str>) -> bool {
        match filter {
            Some(f) if f.enabled => candidate == Some(f.value.as_str()),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Search {
    #[default]
    Off,
    Active {
        /// Text as typed (or the chosen suggestion).
        term: String,
        /// Lowercased key records are matched against.
        highlighted: String,
    },
}

/// Per-record rendering decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub visible: bool,
    pub emphasized: bool,
}

// ---------------------------------------------------------------------------
// InteractionState
// ---------------------------------------------------------------------------

/// Search / highlight / type-filter state of one chart session.
///
/// Every transition is synchronous; the renderer asks
/// [`InteractionState::visibility_and_emphasis`] for each record after any
/// change and keeps no filter logic of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionState {
    search: Search,
    suggestions: Vec<String>,
    type1_filter: Option<TypeFilter>,
    type2_filter: Option<TypeFilter>,
    suggestion_limit: usize,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::with_suggestion_limit(DEFAULT_SUGGESTION_LIMIT)
    }
}

impl InteractionState {
    pub fn with_suggestion_limit(suggestion_limit: usize) -> Self {
        Self {
            search: Search::Off,
            suggestions: Vec::new(),
            type1_filter: None,
            type2_filter: None,
            suggestion_limit,
        }
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn is_search_active(&self) -> bool {
        matches!(self.search, Search::Active { .. })
    }

    pub fn highlighted_name(&self) -> Option<&str> {
        match &self.search {
            Search::Active { highlighted, .. } => Some(highlighted.as_str()),
            Search::Off => None,
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        match &self.search {
            Search::Active { term, .. } => Some(term.as_str()),
            Search::Off => None,
        }
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn type1_filter(&self) -> Option<&TypeFilter> {
        self.type1_filter.as_ref()
    }

    pub fn type2_filter(&self) -> Option<&TypeFilter> {
        self.type2_filter.as_ref()
    }

    /// No facet is active.
    pub fn is_pristine(&self) -> bool {
        !self.is_search_active()
            && self.suggestions.is_empty()
            && self.type1_filter.is_none()
            && self.type2_filter.is_none()
    }

    // -- transitions --

    /// Update the search box text.
    ///
    /// Non-empty text highlights eagerly: the lowercased text becomes the
    /// highlight key even when no name equals it yet. Empty text clears the
    /// search.
    pub fn set_search_term<'a, I>(&mut self, text: &str, records: I)
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.clear_search();
            return;
        }

        let needle = trimmed.to_lowercase();
        self.suggestions = records
            .into_iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .take(self.suggestion_limit)
            .map(|r| r.name.clone())
            .collect();
        log::debug!(
            "search '{trimmed}': {} suggestion(s)",
            self.suggestions.len()
        );

        self.search = Search::Active {
            term: trimmed.to_string(),
            highlighted: needle,
        };
    }

    /// Pick a suggestion: highlight that name and close the list.
    pub fn select_suggestion(&mut self, name: &str) {
        log::debug!("suggestion selected: {name}");
        self.search = Search::Active {
            term: name.to_string(),
            highlighted: name.to_lowercase(),
        };
        self.suggestions.clear();
    }

    pub fn clear_search(&mut self) {
        self.search = Search::Off;
        self.suggestions.clear();
    }

    /// Hide the suggestion list; the search itself stays active.
    pub fn dismiss_suggestions(&mut self) {
        self.suggestions.clear();
    }

    pub fn set_type1_filter(&mut self, enabled: bool, value: impl Into<String>) {
        self.type1_filter = Some(TypeFilter {
            enabled,
            value: value.into(),
        });
    }

    pub fn set_type2_filter(&mut self, enabled: bool, value: impl Into<String>) {
        self.type2_filter = Some(TypeFilter {
            enabled,
            value: value.into(),
        });
    }

    /// Back to the initial state, all facets at once.
    pub fn reset(&mut self) {
        log::debug!("interaction state reset");
        *self = Self::with_suggestion_limit(self.suggestion_limit);
    }

    // -- decisions --

    fn matches_highlight(&self, record: &Record) -> bool {
        match &self.search {
            Search::Active { highlighted, .. } => record.search_key() == *highlighted,
            Search::Off => false,
        }
    }

    /// Combined visibility and emphasis for one record.
    pub fn visibility_and_emphasis(&self, record: &Record) -> Decision {
        let emphasized = self.matches_highlight(record);
        let type1_ok = TypeFilter::accepts(self.type1_filter.as_ref(), Some(&*record.type1));
        let type2_ok = TypeFilter::accepts(self.type2_filter.as_ref(), record.type2.as_deref());
        let search_ok = !self.is_search_active() || emphasized;
        let visible = type1_ok && type2_ok && search_ok;
        Decision {
            visible,
            emphasized,
        }
    }

    /// Whether hovering `record` should emphasize it: any record while no
    /// search is active, only the highlighted one otherwise.
    pub fn is_hover_target(&self, record: &Record) -> bool {
        !self.is_search_active() || self.matches_highlight(record)
    }

    /// Decisions for every record, in order.
    pub fn decide_all<'a, I>(&self, records: I) -> Vec<Decision>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().map(|r| self.visibility_and_emphasis(r)).collect()
    }

    /// Indices of visible records.
    pub fn visible_indices<'a, I>(&self, records: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .enumerate()
            .filter(|(_, r)| self.visibility_and_emphasis(r).visible)
            .map(|(i, _)| i)
            .collect()
    }
}
