//! Column and row contracts for grid display.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Trait for records that can be shown as grid rows.
///
/// The id must be stable and unique within the loaded rows; selection is
/// tracked by it.
pub trait GridRow {
    /// Unique identifier for this row.
    fn id(&self) -> String;
}

/// A typed cell value read from a row by a column accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    /// Total order used by sortable columns.
    ///
    /// Empty cells sort first. Integers and floats compare numerically; text
    /// compares case-insensitively with a case-sensitive tie break. Values of
    /// unrelated variants fall back to a fixed variant order.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        use CellValue::*;

        match (self, other) {
            (Empty, Empty) => Ordering::Equal,
            (Text(a), Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Bool(a), Bool(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Date(_) => 3,
            CellValue::Text(_) => 4,
        }
    }

    /// Returns `true` for empty cells and empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Bool(b) => f.write_str(if *b { "yes" } else { "no" }),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(v: NaiveDate) -> Self {
        CellValue::Date(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// A rendered cell: display text plus the column's alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub align: Alignment,
}

impl Cell {
    pub fn new(text: impl Into<String>, align: Alignment) -> Self {
        Self {
            text: text.into(),
            align,
        }
    }
}

/// Presentation hints a column carries for the host's renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMeta {
    /// Preferred width in characters, if fixed.
    pub width: Option<u16>,
    /// Horizontal alignment.
    pub align: Alignment,
}

/// Capability interface of a grid column.
///
/// Only [`id`](Self::id), [`header`](Self::header) and [`value`](Self::value)
/// are required. Rendering, comparison and search matching default to the
/// accessor's value.
pub trait GridColumn<T> {
    /// Stable column id; sort state refers to it.
    fn id(&self) -> &str;

    /// Header text.
    fn header(&self) -> &str;

    /// Reads the cell value from a row.
    fn value(&self, row: &T) -> CellValue;

    /// Presentation hints.
    fn meta(&self) -> ColumnMeta {
        ColumnMeta::default()
    }

    /// Renders the cell for a row.
    fn render(&self, row: &T) -> Cell {
        Cell::new(self.value(row).to_string(), self.meta().align)
    }

    /// Whether header interaction may sort by this column.
    fn sortable(&self) -> bool {
        false
    }

    /// Orders two rows by this column, ascending.
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.value(a).compare(&self.value(b))
    }

    /// Whether client-side search consults this column.
    fn filterable(&self) -> bool {
        false
    }

    /// Returns `true` if the row matches a lowercase search needle.
    fn matches(&self, row: &T, needle: &str) -> bool {
        self.value(row).to_string().to_lowercase().contains(needle)
    }
}

/// Accessor-based column, the common case.
///
/// # Example
///
/// ```
/// use leadgrid_lib::grid::{Alignment, CellValue, Column, GridColumn};
///
/// struct Prospect {
///     name: String,
///     score: i64,
/// }
///
/// let name = Column::new("name", "Name", |p: &Prospect| p.name.as_str().into())
///     .sortable()
///     .filterable();
/// let score = Column::new("score", "Score", |p: &Prospect| p.score.into())
///     .sortable()
///     .align(Alignment::Right);
///
/// let row = Prospect { name: "Jane".into(), score: 7 };
/// assert_eq!(name.render(&row).text, "Jane");
/// assert_eq!(score.value(&row), CellValue::Int(7));
/// ```
pub struct Column<T> {
    id: String,
    header: String,
    accessor: fn(&T) -> CellValue,
    sortable: bool,
    filterable: bool,
    meta: ColumnMeta,
}

impl<T> Column<T> {
    /// Creates a column from an accessor.
    pub fn new(id: impl Into<String>, header: impl Into<String>, accessor: fn(&T) -> CellValue) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            accessor,
            sortable: false,
            filterable: false,
            meta: ColumnMeta::default(),
        }
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Make the column participate in client-side search.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.meta.align = align;
        self
    }

    /// Set a fixed width.
    pub fn width(mut self, width: u16) -> Self {
        self.meta.width = Some(width);
        self
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

impl<T> GridColumn<T> for Column<T> {
    fn id(&self) -> &str {
        &self.id
    }

    fn header(&self) -> &str {
        &self.header
    }

    fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }

    fn meta(&self) -> ColumnMeta {
        self.meta
    }

    fn sortable(&self) -> bool {
        self.sortable
    }

    fn filterable(&self) -> bool {
        self.filterable
    }
}

/// The ordered, immutable column set of one grid.
pub struct Columns<T> {
    columns: Vec<Box<dyn GridColumn<T>>>,
}

impl<T> Columns<T> {
    /// Creates an empty column set.
    pub fn new() -> Self {
        Self { columns: Vec::new() }
    }

    /// Appends a column (builder form).
    pub fn with(mut self, column: impl GridColumn<T> + 'static) -> Self {
        self.columns.push(Box::new(column));
        self
    }

    /// Looks up a column by id.
    pub fn find(&self, id: &str) -> Option<&dyn GridColumn<T>> {
        self.columns.iter().find(|c| c.id() == id).map(|c| c.as_ref())
    }

    /// Looks up a column by id, only if it is sortable.
    pub fn find_sortable(&self, id: &str) -> Option<&dyn GridColumn<T>> {
        self.find(id).filter(|c| c.sortable())
    }

    /// Iterates over the columns in display order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn GridColumn<T>> {
        self.columns.iter().map(|c| c.as_ref())
    }

    /// Renders every column for one row.
    pub fn render_row(&self, row: &T) -> Vec<Cell> {
        self.iter().map(|c| c.render(row)).collect()
    }

    /// Returns `true` if any column matches the lowercase needle.
    ///
    /// Only filterable columns are consulted; with none, every row matches.
    pub fn row_matches(&self, row: &T, needle: &str) -> bool {
        let mut filterable = self.iter().filter(|c| c.filterable()).peekable();
        if filterable.peek().is_none() {
            return true;
        }
        filterable.any(|c| c.matches(row, needle))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<T> Default for Columns<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Columns<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|c| c.id())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sorts_first() {
        assert_eq!(CellValue::Empty.compare(&CellValue::Int(-5)), Ordering::Less);
        assert_eq!(CellValue::Text("a".into()).compare(&CellValue::Empty), Ordering::Greater);
    }

    #[test]
    fn test_text_compares_case_insensitively() {
        let a = CellValue::from("apple");
        let b = CellValue::from("Banana");
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn test_mixed_numbers_compare_numerically() {
        assert_eq!(CellValue::Int(2).compare(&CellValue::Float(1.5)), Ordering::Greater);
    }

    #[test]
    fn test_find_sortable_skips_plain_columns() {
        let columns = Columns::<(i64, i64)>::new()
            .with(Column::new("a", "A", |r: &(i64, i64)| r.0.into()).sortable())
            .with(Column::new("b", "B", |r: &(i64, i64)| r.1.into()));
        assert!(columns.find_sortable("a").is_some());
        assert!(columns.find_sortable("b").is_none());
        assert!(columns.find("b").is_some());
        assert!(columns.find_sortable("missing").is_none());
    }
}
