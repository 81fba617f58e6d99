//! Fixed-size tile grid and the character position.
//!
//! The map is the sole owner of items. Every way an item leaves the grid
//! (explicit removal, replacement, expiry) goes through [`TileMap::clean_tile`],
//! which fires the item's `removed` event before dropping it.

use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::event::ItemEvent;
use crate::item::Item;
use crate::types::Position;

/// Which tiles a removal applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Removal {
    /// Clear the tile unconditionally.
    At(Position),
    /// Clear the tile only if its occupant has this name.
    NamedAt(Position, String),
    /// Clear every tile whose occupant has this name.
    Named(String),
}

impl Removal {
    /// Builds a removal from optional coordinates and name.
    ///
    /// `x` and `y` must be given together. With neither coordinate nor name
    /// there is nothing to select and `None` is returned.
    pub fn from_parts(x: Option<i32>, y: Option<i32>, name: Option<&str>) -> Result<Option<Self>> {
        match (x, y, name) {
            (Some(x), Some(y), None) => Ok(Some(Self::At(Position::new(x, y)))),
            (Some(x), Some(y), Some(name)) => {
                Ok(Some(Self::NamedAt(Position::new(x, y), name.to_owned())))
            }
            (None, None, Some(name)) => Ok(Some(Self::Named(name.to_owned()))),
            (None, None, None) => Ok(None),
            (x, y, _) => {
                warn!(?x, ?y, "(x, y) should be specified at the same time");
                Err(EngineError::PartialPosition { x, y })
            }
        }
    }
}

/// Filters for [`TileMap::find`]. `None` fields match anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub hidden: Option<bool>,
    pub block: Option<bool>,
}

impl ItemFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    #[must_use]
    pub fn block(mut self, block: bool) -> Self {
        self.block = Some(block);
        self
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.name.as_deref().is_none_or(|n| item.name() == n)
            && self.symbol.as_deref().is_none_or(|s| item.symbol() == s)
            && self.hidden.is_none_or(|h| item.is_hidden() == h)
            && self.block.is_none_or(|b| item.is_blocking() == b)
    }
}

/// `height × width` grid of optional items plus the character position.
#[derive(Debug)]
pub struct TileMap {
    width: usize,
    height: usize,
    cells: Vec<Option<Item>>,
    character: Position,
}

impl TileMap {
    /// Creates an empty grid. The character is placed at `character`.
    pub fn new(width: usize, height: usize, character: Position) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        cells.resize_with(width * height, || None);
        Self {
            width,
            height,
            cells,
            character,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    pub fn character(&self) -> Position {
        self.character
    }

    /// Moves the character without any blocking check.
    pub fn set_character(&mut self, position: Position) -> Result<()> {
        self.bounds(position)?;
        self.character = position;
        Ok(())
    }

    pub fn get(&self, position: Position) -> Option<&Item> {
        self.index(position).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut Item> {
        self.index(position).and_then(|i| self.cells[i].as_mut())
    }

    pub fn is_blocked(&self, position: Position) -> bool {
        self.get(position).is_some_and(Item::is_blocking)
    }

    /// Stores `item` at its own position, removing any previous occupant first.
    pub fn place(&mut self, item: Item) -> Result<&mut Item> {
        let position = item.position();
        let index = self.bounds(position)?;

        if self.cells[index].is_some() {
            warn!(%position, "original item is replaced");
            self.clean_tile(position)?;
        }
        debug!(item = item.name(), %position, "item added");
        Ok(self.cells[index].insert(item))
    }

    /// Takes the item off a tile, firing its `removed` event.
    ///
    /// Returns whether the tile held an item.
    pub fn clean_tile(&mut self, position: Position) -> Result<bool> {
        let index = self.bounds(position)?;
        let Some(mut item) = self.cells[index].take() else {
            return Ok(false);
        };
        debug!(item = item.name(), %position, "item removed");
        item.fire(ItemEvent::Removed)?;
        Ok(true)
    }

    /// Applies a removal and returns whether at least one item was removed.
    pub fn remove(&mut self, removal: &Removal) -> Result<bool> {
        match removal {
            Removal::At(position) => self.clean_tile(*position),
            Removal::NamedAt(position, name) => {
                self.bounds(*position)?;
                match self.get(*position) {
                    Some(item) if item.name() == name => self.clean_tile(*position),
                    _ => Ok(false),
                }
            }
            Removal::Named(name) => {
                let filter = ItemFilter::new().name(name.as_str());
                let mut removed = false;
                for position in self.positions_matching(&filter) {
                    removed |= self.clean_tile(position)?;
                }
                Ok(removed)
            }
        }
    }

    /// Occupied tiles matching every supplied filter, in row-major order.
    pub fn find(&self, filter: &ItemFilter) -> Vec<&Item> {
        self.items().filter(|item| filter.matches(item)).collect()
    }

    /// All items on the grid, in row-major order.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.cells.iter().flatten()
    }

    /// Positions of all occupied tiles, in row-major order.
    pub fn occupied(&self) -> Vec<Position> {
        self.positions_matching(&ItemFilter::default())
    }

    pub fn len(&self) -> usize {
        self.items().count()
    }

    pub fn is_empty(&self) -> bool {
        self.items().next().is_none()
    }

    fn positions_matching(&self, filter: &ItemFilter) -> Vec<Position> {
        self.items()
            .filter(|item| filter.matches(item))
            .map(Item::position)
            .collect()
    }

    fn index(&self, position: Position) -> Option<usize> {
        let (x, y) = (usize::try_from(position.x).ok()?, usize::try_from(position.y).ok()?);
        (x < self.height && y < self.width).then(|| x * self.width + y)
    }

    fn bounds(&self, position: Position) -> Result<usize> {
        self.index(position).ok_or(EngineError::OutOfBounds {
            position,
            height: self.height,
            width: self.width,
        })
    }
}
