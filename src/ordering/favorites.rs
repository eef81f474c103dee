use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// An item that can be pinned to the favorite section.
pub trait Favoritable {
    fn key(&self) -> &Path;
    fn is_favorite(&self) -> bool;
    fn set_favorite(&mut self, favorite: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("unknown direction: {other} (expected up or down)")),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Link {
    prev: Option<PathBuf>,
    next: Option<PathBuf>,
}

/// One ordered section: a doubly linked list threaded through a map keyed by
/// path, so append, detach and neighbour swaps touch a constant number of links.
#[derive(Debug, Clone, Default)]
struct Section {
    head: Option<PathBuf>,
    tail: Option<PathBuf>,
    links: HashMap<PathBuf, Link>,
}

impl Section {
    fn len(&self) -> usize {
        self.links.len()
    }

    fn contains(&self, key: &Path) -> bool {
        self.links.contains_key(key)
    }

    fn push_back(&mut self, key: PathBuf) {
        if self.links.contains_key(&key) {
            return;
        }
        let link = Link {
            prev: self.tail.clone(),
            next: None,
        };
        match &self.tail {
            Some(tail) => {
                if let Some(tail_link) = self.links.get_mut(tail) {
                    tail_link.next = Some(key.clone());
                }
            }
            None => self.head = Some(key.clone()),
        }
        self.tail = Some(key.clone());
        self.links.insert(key, link);
    }

    /// Links `key` (not currently in the section) directly before `anchor`.
    fn insert_before(&mut self, key: PathBuf, anchor: &Path) {
        let prev = self.links.get(anchor).and_then(|l| l.prev.clone());
        match &prev {
            Some(p) => {
                if let Some(prev_link) = self.links.get_mut(p) {
                    prev_link.next = Some(key.clone());
                }
            }
            None => self.head = Some(key.clone()),
        }
        if let Some(anchor_link) = self.links.get_mut(anchor) {
            anchor_link.prev = Some(key.clone());
        }
        self.links.insert(
            key,
            Link {
                prev,
                next: Some(anchor.to_path_buf()),
            },
        );
    }

    fn detach(&mut self, key: &Path) -> bool {
        let Some(link) = self.links.remove(key) else {
            return false;
        };
        match &link.prev {
            Some(p) => {
                if let Some(prev_link) = self.links.get_mut(p) {
                    prev_link.next = link.next.clone();
                }
            }
            None => self.head = link.next.clone(),
        }
        match &link.next {
            Some(n) => {
                if let Some(next_link) = self.links.get_mut(n) {
                    next_link.prev = link.prev.clone();
                }
            }
            None => self.tail = link.prev.clone(),
        }
        true
    }

    /// Swaps `key` with its neighbour. False at the edge or for an unknown key.
    fn move_item(&mut self, key: &Path, direction: Direction) -> bool {
        let Some(link) = self.links.get(key) else {
            return false;
        };
        match direction {
            Direction::Up => {
                let Some(prev) = link.prev.clone() else {
                    return false;
                };
                self.detach(key);
                self.insert_before(key.to_path_buf(), &prev);
            }
            Direction::Down => {
                let Some(next) = link.next.clone() else {
                    return false;
                };
                self.detach(&next);
                self.insert_before(next, key);
            }
        }
        true
    }

    fn keys(&self) -> Vec<PathBuf> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head.as_ref();
        while let Some(key) = cursor {
            keys.push(key.clone());
            cursor = self.links.get(key).and_then(|l| l.next.as_ref());
        }
        keys
    }
}

/// Items partitioned into favorite and regular sections, each independently ordered.
///
/// Items live in an arena keyed by path; the two sections hold keys only. Every
/// item is in exactly one section, and its `is_favorite` flag says which.
#[derive(Debug, Clone)]
pub struct OrderedFavoriteList<T> {
    items: HashMap<PathBuf, T>,
    favorites: Section,
    regular: Section,
}

impl<T> Default for OrderedFavoriteList<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            favorites: Section::default(),
            regular: Section::default(),
        }
    }
}

impl<T: Favoritable> OrderedFavoriteList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the view from a freshly discovered set.
    ///
    /// Membership comes from `items` alone. An item is a favorite iff its key is
    /// in `favorite_order`; each section follows its order array, and items the
    /// arrays do not mention keep discovery order at the section's tail. Keys in
    /// the arrays with no matching item are ignored.
    pub fn rebuild(items: Vec<T>, favorite_order: &[PathBuf], regular_order: &[PathBuf]) -> Self {
        let favorite_set: HashSet<&Path> = favorite_order.iter().map(PathBuf::as_path).collect();
        let mut list = Self::new();
        let mut discovered = Vec::with_capacity(items.len());

        for mut item in items {
            let key = item.key().to_path_buf();
            if list.items.contains_key(&key) {
                continue;
            }
            item.set_favorite(favorite_set.contains(key.as_path()));
            discovered.push(key.clone());
            list.items.insert(key, item);
        }

        for key in favorite_order {
            if list.items.contains_key(key) {
                list.favorites.push_back(key.clone());
            }
        }
        for key in regular_order {
            if list.items.get(key).is_some_and(|i| !i.is_favorite()) {
                list.regular.push_back(key.clone());
            }
        }
        for key in discovered {
            if !list.favorites.contains(&key) {
                list.regular.push_back(key);
            }
        }

        list
    }

    /// Builds the view from records that already carry their favorite flag, in display order.
    pub fn from_ordered(items: Vec<T>) -> Self {
        let favorites: Vec<PathBuf> = items
            .iter()
            .filter(|i| i.is_favorite())
            .map(|i| i.key().to_path_buf())
            .collect();
        let regular: Vec<PathBuf> = items
            .iter()
            .filter(|i| !i.is_favorite())
            .map(|i| i.key().to_path_buf())
            .collect();
        Self::rebuild(items, &favorites, &regular)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.items.contains_key(key)
    }

    pub fn get(&self, key: &Path) -> Option<&T> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: &Path) -> Option<&mut T> {
        self.items.get_mut(key)
    }

    /// Appends a new item to the tail of its section. Returns false on a duplicate key.
    pub fn insert(&mut self, item: T) -> bool {
        let key = item.key().to_path_buf();
        if self.items.contains_key(&key) {
            return false;
        }
        self.section_mut(item.is_favorite()).push_back(key.clone());
        self.items.insert(key, item);
        true
    }

    pub fn remove(&mut self, key: &Path) -> Option<T> {
        let item = self.items.remove(key)?;
        self.section_mut(item.is_favorite()).detach(key);
        Some(item)
    }

    /// Flips the item's flag and appends it to the other section's tail.
    /// Returns the new flag, or None for an unknown key.
    pub fn toggle_favorite(&mut self, key: &Path) -> Option<bool> {
        let item = self.items.get_mut(key)?;
        let was_favorite = item.is_favorite();
        item.set_favorite(!was_favorite);

        self.section_mut(was_favorite).detach(key);
        self.section_mut(!was_favorite).push_back(key.to_path_buf());
        Some(!was_favorite)
    }

    /// Swaps the item with its neighbour inside its own section.
    /// Returns false when nothing moved (unknown key or already at the edge).
    pub fn move_item(&mut self, key: &Path, direction: Direction) -> bool {
        let Some(favorite) = self.items.get(key).map(|i| i.is_favorite()) else {
            return false;
        };
        self.section_mut(favorite).move_item(key, direction)
    }

    /// Favorites first, then regular items.
    pub fn snapshot(&self) -> Vec<&T> {
        let (mut favorites, regular) = self.sections();
        favorites.extend(regular);
        favorites
    }

    /// The two sections separately, for sectioned display.
    pub fn sections(&self) -> (Vec<&T>, Vec<&T>) {
        (self.resolve(&self.favorites), self.resolve(&self.regular))
    }

    pub fn favorite_keys(&self) -> Vec<PathBuf> {
        self.favorites.keys()
    }

    pub fn regular_keys(&self) -> Vec<PathBuf> {
        self.regular.keys()
    }

    fn resolve(&self, section: &Section) -> Vec<&T> {
        section
            .keys()
            .iter()
            .filter_map(|k| self.items.get(k))
            .collect()
    }

    fn section_mut(&mut self, favorite: bool) -> &mut Section {
        if favorite {
            &mut self.favorites
        } else {
            &mut self.regular
        }
    }
}

impl<T: Favoritable + Clone> OrderedFavoriteList<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.snapshot().into_iter().cloned().collect()
    }
}
