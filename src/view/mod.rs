//! Presentation components rendered from list views

pub mod chart;
pub mod table;

pub use chart::{PieChart, PieSlice};
pub use table::{
    Cell, Column, Header, Placeholder, RenderedRow, RowAction, RowActionKind, RowCallbacks,
    TableBody, TableModel, TableRow,
};
