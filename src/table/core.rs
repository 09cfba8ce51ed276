use std::fmt;
use std::num::{NonZeroU16, NonZeroU64};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::Point;

/// Largest number of seats a single table may carry.
pub const MAX_CAPACITY: u16 = 50;

/// Stable identifier for a table. Ids are never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId(NonZeroU64);

impl TableId {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Monotonic id source owned by the registry.
#[derive(Debug, Clone)]
pub struct TableIdAllocator {
    next: NonZeroU64,
}

impl Default for TableIdAllocator {
    fn default() -> Self {
        Self {
            next: NonZeroU64::MIN,
        }
    }
}

impl TableIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> TableId {
        let id = TableId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    pub fn peek(&self) -> TableId {
        TableId(self.next)
    }
}

/// Table outline. Each shape has its own seat layout and footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    Round,
    Rectangular,
    Oval,
    Square,
}

impl TableShape {
    pub const ALL: [TableShape; 4] = [
        TableShape::Round,
        TableShape::Rectangular,
        TableShape::Oval,
        TableShape::Square,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TableShape::Round => "round",
            TableShape::Rectangular => "rectangular",
            TableShape::Oval => "oval",
            TableShape::Square => "square",
        }
    }
}

/// Donor tier attached to a table. Ordering sorts the highest tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Diamond,
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Diamond,
        Level::Platinum,
        Level::Gold,
        Level::Silver,
        Level::Bronze,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Diamond => "Diamond",
            Level::Platinum => "Platinum",
            Level::Gold => "Gold",
            Level::Silver => "Silver",
            Level::Bronze => "Bronze",
        }
    }

    /// Parse an edit-field value. Empty text or `none` clears the level.
    pub fn parse_optional(raw: &str) -> Result<Option<Level>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl FromStr for Level {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LayoutError::UnknownLevel(trimmed.to_string()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated seat count, `1..=MAX_CAPACITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct Capacity(NonZeroU16);

impl Capacity {
    pub fn new(raw: i64) -> Result<Self> {
        if raw <= 0 {
            return Err(LayoutError::InvalidCapacity(raw.to_string()));
        }
        if raw > i64::from(MAX_CAPACITY) {
            return Err(LayoutError::CapacityTooLarge {
                requested: raw,
                max: MAX_CAPACITY,
            });
        }
        let value = u16::try_from(raw).map_err(|_| LayoutError::InvalidCapacity(raw.to_string()))?;
        NonZeroU16::new(value)
            .map(Self)
            .ok_or_else(|| LayoutError::InvalidCapacity(raw.to_string()))
    }

    /// Parse form input. Fractional or non-numeric text is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| LayoutError::InvalidCapacity(trimmed.to_string()))?;
        Self::new(value)
    }

    pub fn get(self) -> u16 {
        self.0.get()
    }

    pub fn as_usize(self) -> usize {
        usize::from(self.0.get())
    }
}

impl TryFrom<i64> for Capacity {
    type Error = LayoutError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Capacity> for u16 {
    fn from(value: Capacity) -> Self {
        value.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatId {
    pub table: TableId,
    pub index: usize,
}

/// One assignable place at a table. Occupancy is derived from the guest binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    id: SeatId,
    guest: Option<String>,
}

impl Seat {
    fn empty(table: TableId, index: usize) -> Self {
        Self {
            id: SeatId { table, index },
            guest: None,
        }
    }

    pub fn id(&self) -> SeatId {
        self.id
    }

    pub fn index(&self) -> usize {
        self.id.index
    }

    pub fn is_occupied(&self) -> bool {
        self.guest.is_some()
    }

    pub fn guest(&self) -> Option<&str> {
        self.guest.as_deref()
    }
}

/// A seating unit placed on the venue canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRecord")]
pub struct Table {
    id: TableId,
    name: String,
    shape: TableShape,
    capacity: Capacity,
    level: Option<Level>,
    seats: Vec<Seat>,
    position: Point,
}

/// Wire form of [`Table`], checked before it becomes one.
#[derive(Deserialize)]
struct TableRecord {
    id: TableId,
    name: String,
    shape: TableShape,
    capacity: Capacity,
    level: Option<Level>,
    seats: Vec<Seat>,
    position: Point,
}

impl TryFrom<TableRecord> for Table {
    type Error = LayoutError;

    fn try_from(record: TableRecord) -> Result<Self> {
        if record.seats.len() != record.capacity.as_usize() {
            return Err(LayoutError::InvalidTable(format!(
                "{} has {} seats for capacity {}",
                record.id,
                record.seats.len(),
                record.capacity.get()
            )));
        }
        for (index, seat) in record.seats.iter().enumerate() {
            if seat.id.table != record.id || seat.id.index != index {
                return Err(LayoutError::InvalidTable(format!(
                    "seat {index} of {} is labelled {}#{}",
                    record.id, seat.id.table, seat.id.index
                )));
            }
        }
        Ok(Self {
            id: record.id,
            name: record.name,
            shape: record.shape,
            capacity: record.capacity,
            level: record.level,
            seats: record.seats,
            position: record.position,
        })
    }
}

impl Table {
    /// Build a table with all seats empty. `name` is stored as given.
    pub fn new(
        id: TableId,
        name: impl Into<String>,
        shape: TableShape,
        capacity: Capacity,
        position: Point,
    ) -> Self {
        let seats = (0..capacity.as_usize())
            .map(|index| Seat::empty(id, index))
            .collect();
        Self {
            id,
            name: name.into(),
            shape,
            capacity,
            level: None,
            seats,
            position,
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> TableShape {
        self.shape
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn level(&self) -> Option<Level> {
        self.level
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_occupied()).count()
    }

    pub fn seat_of(&self, guest: &str) -> Option<usize> {
        self.seats
            .iter()
            .position(|seat| seat.guest() == Some(guest))
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_level(&mut self, level: Option<Level>) {
        self.level = level;
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_shape(&mut self, shape: TableShape) {
        self.shape = shape;
    }

    /// Regenerate the seat list for a new capacity.
    ///
    /// Surviving indices keep their guests. Shrinking past an occupied seat is
    /// rejected and leaves the table untouched.
    pub(crate) fn resize(&mut self, capacity: Capacity) -> Result<()> {
        let target = capacity.as_usize();
        if let Some(occupied) = self.seats[target.min(self.seats.len())..]
            .iter()
            .find(|seat| seat.is_occupied())
        {
            return Err(LayoutError::CapacityBelowOccupancy {
                table: self.id,
                requested: capacity.get(),
                occupied_index: occupied.index(),
            });
        }

        self.seats.truncate(target);
        let id = self.id;
        let start = self.seats.len();
        self.seats
            .extend((start..target).map(|index| Seat::empty(id, index)));
        self.capacity = capacity;
        Ok(())
    }

    pub(crate) fn assign_guest(&mut self, index: usize, guest: String) -> Result<()> {
        let capacity = self.seats.len();
        let table = self.id;
        let seat = self
            .seats
            .get_mut(index)
            .ok_or(LayoutError::SeatOutOfRange {
                table,
                index,
                capacity,
            })?;
        if seat.is_occupied() {
            return Err(LayoutError::SeatOccupied { table, index });
        }
        seat.guest = Some(guest);
        Ok(())
    }

    pub(crate) fn release_seat(&mut self, index: usize) -> Result<Option<String>> {
        let capacity = self.seats.len();
        let table = self.id;
        self.seats
            .get_mut(index)
            .map(|seat| seat.guest.take())
            .ok_or(LayoutError::SeatOutOfRange {
                table,
                index,
                capacity,
            })
    }
}

/// Request for a single table created from the "Add Table" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: Option<String>,
    pub shape: TableShape,
    pub capacity: Capacity,
    #[serde(default)]
    pub level: Option<Level>,
}

impl TableSpec {
    pub fn new(shape: TableShape, capacity: Capacity) -> Self {
        Self {
            name: None,
            shape,
            capacity,
            level: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }
}
