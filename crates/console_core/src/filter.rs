use crate::ViewMode;

/// One per-harvester element in a view (list item, card, or table row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub dom_id: String,
    pub visible: bool,
}

impl Element {
    fn new(dom_id: String) -> Self {
        Self {
            dom_id,
            visible: true,
        }
    }

    /// Harvester name: the first hyphen-delimited segment of the id.
    pub fn harvester_name(&self) -> &str {
        harvester_name_of(&self.dom_id)
    }
}

pub fn harvester_name_of(dom_id: &str) -> &str {
    dom_id.split('-').next().unwrap_or(dom_id)
}

fn dom_id(name: &str, mode: ViewMode) -> String {
    match mode {
        ViewMode::List => format!("{name}-list-item"),
        ViewMode::Card => format!("{name}-card"),
        ViewMode::Table => format!("{name}-row"),
    }
}

/// The element collections of all three views.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewCollections {
    list: Vec<Element>,
    card: Vec<Element>,
    table: Vec<Element>,
}

impl ViewCollections {
    pub fn register(&mut self, name: &str) {
        for mode in ViewMode::ALL {
            let elements = self.collection_mut(mode);
            let id = dom_id(name, mode);
            if !elements.iter().any(|element| element.dom_id == id) {
                elements.push(Element::new(id));
            }
        }
    }

    pub fn collection(&self, mode: ViewMode) -> &[Element] {
        match mode {
            ViewMode::List => &self.list,
            ViewMode::Card => &self.card,
            ViewMode::Table => &self.table,
        }
    }

    fn collection_mut(&mut self, mode: ViewMode) -> &mut Vec<Element> {
        match mode {
            ViewMode::List => &mut self.list,
            ViewMode::Card => &mut self.card,
            ViewMode::Table => &mut self.table,
        }
    }

    pub fn is_visible(&self, mode: ViewMode, name: &str) -> bool {
        self.collection(mode)
            .iter()
            .find(|element| element.harvester_name() == name)
            .is_some_and(|element| element.visible)
    }
}

/// Text filter over the active view's elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterEngine {
    query: String,
}

impl FilterEngine {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Stores `query` and applies it to the active view only.
    pub fn apply(&mut self, query: &str, mode: ViewMode, collections: &mut ViewCollections) {
        self.query = query.to_uppercase();
        self.reapply(mode, collections);
    }

    /// Applies the stored query; used whenever the active view changes.
    pub fn reapply(&self, mode: ViewMode, collections: &mut ViewCollections) {
        for element in collections.collection_mut(mode) {
            element.visible = element
                .harvester_name()
                .to_uppercase()
                .contains(self.query.as_str());
        }
    }
}
